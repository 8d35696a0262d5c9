// crates/listing-conformance-core/src/runtime/mod.rs
// ============================================================================
// Module: Listing Conformance Runtime
// Description: Oracle, runner, audit, reporting, catalog, and in-memory fake.
// Purpose: Execute scenarios against a gateway and aggregate verdicts.
// Dependencies: crate::{core, interfaces}, serde, serde_json, time
// ============================================================================

//! ## Overview
//! The runtime turns declarative scenarios into gateway calls and verdicts.
//! It owns no transport; callers inject a [`crate::ServiceGateway`] and a
//! [`HarnessAuditSink`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod catalog;
pub mod memory;
pub mod oracle;
pub mod report;
pub mod runner;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEventKind;
pub use audit::FileAuditSink;
pub use audit::HarnessAuditEvent;
pub use audit::HarnessAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use memory::InMemoryGateway;
pub use oracle::BodyContract;
pub use oracle::ConformanceOracle;
pub use oracle::Expectation;
pub use report::ReportTotals;
pub use report::SuiteReport;
pub use runner::Budget;
pub use runner::ObservedResponse;
pub use runner::Outcome;
pub use runner::RetryPolicy;
pub use runner::RunnerConfig;
pub use runner::Scenario;
pub use runner::ScenarioRunner;
pub use runner::SellerRef;
pub use runner::Step;
pub use runner::StepFailure;
pub use runner::StepRecord;
pub use runner::Suite;
pub use runner::Target;
pub use runner::TestResult;
