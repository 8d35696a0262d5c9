// crates/listing-conformance-core/src/lib.rs
// ============================================================================
// Module: Listing Conformance Core Library
// Description: Public API surface for the listing conformance harness.
// Purpose: Expose fixtures, the oracle, the runner, and the gateway contract.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Listing conformance core checks a remote item-listing service against its
//! documented contract. Fixtures feed a [`ScenarioRunner`], which calls a
//! [`ServiceGateway`] and asks the [`ConformanceOracle`] for a verdict on
//! every response. Transport is injected; the core never opens a socket.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::Endpoint;
pub use interfaces::GatewayResponse;
pub use interfaces::ServiceGateway;
pub use interfaces::TransportError;
pub use runtime::BodyContract;
pub use runtime::ConformanceOracle;
pub use runtime::Expectation;
pub use runtime::FileAuditSink;
pub use runtime::HarnessAuditEvent;
pub use runtime::HarnessAuditSink;
pub use runtime::InMemoryGateway;
pub use runtime::MemoryAuditSink;
pub use runtime::NoopAuditSink;
pub use runtime::Outcome;
pub use runtime::RetryPolicy;
pub use runtime::RunnerConfig;
pub use runtime::Scenario;
pub use runtime::ScenarioRunner;
pub use runtime::StderrAuditSink;
pub use runtime::Suite;
pub use runtime::SuiteReport;
pub use runtime::TestResult;
