// crates/listing-conformance-core/src/runtime/runner.rs
// ============================================================================
// Module: Scenario Runner
// Description: Step-by-step execution of declarative conformance scenarios.
// Purpose: Build fixtures, call the gateway, judge responses, and clean up.
// Dependencies: crate::{core, interfaces, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Scenario`] is an ordered list of [`Step`]s. The [`ScenarioRunner`]
//! executes them sequentially against an injected [`ServiceGateway`], asks the
//! [`ConformanceOracle`] for a verdict on every exchange, and produces a
//! [`TestResult`].
//!
//! Invariants:
//! - The first failing step stops the scenario; the result names that step and
//!   the literal responses observed.
//! - Teardown deletes every item created by the scenario that is not already
//!   deleted, in reverse creation order, even after a failure.
//! - Reads of captured items retry with bounded linear backoff before a
//!   status or body mismatch is reported.
//! - No state is shared between scenarios apart from the remote service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::core::fixtures::Fixture;
use crate::core::fixtures::FixtureGenerator;
use crate::core::fixtures::FixtureKind;
use crate::core::fixtures::FixtureOverrides;
use crate::core::fixtures::FixturePayload;
use crate::core::fixtures::SellerIdCase;
use crate::core::identifiers::ScenarioId;
use crate::core::identifiers::SlotId;
use crate::core::model::ItemDraft;
use crate::core::model::extract_item_id;
use crate::core::verdict::KnownBug;
use crate::core::verdict::Verdict;
use crate::core::verdict::Violation;
use crate::core::verdict::ViolationKind;
use crate::interfaces::Endpoint;
use crate::interfaces::GatewayResponse;
use crate::interfaces::ServiceGateway;
use crate::interfaces::TransportError;
use crate::runtime::audit::AuditEventKind;
use crate::runtime::audit::HarnessAuditEvent;
use crate::runtime::audit::HarnessAuditSink;
use crate::runtime::oracle::ConformanceOracle;
use crate::runtime::report::SuiteReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum characters of an identifier echoed into diagnostics.
const PREVIEW_CHARS: usize = 48;

// ============================================================================
// SECTION: Scenario Model
// ============================================================================

/// Scenario grouping, mirroring the service's functional areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Item creation contract.
    ItemCreation,
    /// Get-item contract.
    GetItem,
    /// Seller listing contract.
    SellerItems,
    /// Statistics v1/v2 contract.
    Statistics,
}

impl Suite {
    /// Every suite in catalog order.
    pub const ALL: [Self; 4] = [Self::ItemCreation, Self::GetItem, Self::SellerItems, Self::Statistics];

    /// Returns the stable suite label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ItemCreation => "item_creation",
            Self::GetItem => "get_item",
            Self::SellerItems => "seller_items",
            Self::Statistics => "statistics",
        }
    }

    /// Parses a suite label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|suite| suite.as_str() == label)
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seller identifier used by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerRef {
    /// A fresh random seller.
    Random,
    /// The seller drawn once for the whole scenario.
    Scenario,
    /// A literal seller identifier.
    Fixed(i64),
}

/// Input addressed by a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A captured item (existing, or deleted once a delete step ran).
    Slot(SlotId),
    /// A freshly generated fixture.
    Fixture(FixtureKind),
    /// A seller identifier.
    Seller(SellerRef),
}

/// Response-time budget selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Default read budget.
    Default,
    /// Seller listing budget.
    Listing,
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Creates an item; requires 200 and an extractable id, then captures it.
    Create {
        /// Fixture kind of the body.
        kind: FixtureKind,
        /// Seller to create under.
        seller: SellerRef,
        /// Item number for "Item N" names.
        item_number: Option<u32>,
        /// Slot receiving the captured id.
        slot: Option<SlotId>,
    },
    /// Sends one input to one endpoint and judges it with the oracle.
    Probe {
        /// Endpoint called.
        endpoint: Endpoint,
        /// Input sent.
        target: Target,
    },
    /// Sends every sample of an identifier kind to one endpoint.
    ProbeVariants {
        /// Endpoint called.
        endpoint: Endpoint,
        /// Identifier kind expanded into samples.
        kind: FixtureKind,
    },
    /// Reads a captured item back-to-back and requires identical answers.
    RepeatedReads {
        /// Item read.
        slot: SlotId,
        /// Number of reads; `None` uses the runner default.
        count: Option<usize>,
    },
    /// Reads statistics v1 and v2 for a captured item and requires equality.
    CompareStatistics {
        /// Item read.
        slot: SlotId,
    },
    /// Sends every sample of an identifier kind to both statistics versions.
    CompareErrorStatuses {
        /// Identifier kind expanded into samples.
        kind: FixtureKind,
    },
    /// Lists a seller's items and checks ownership and captured items.
    ListSeller {
        /// Seller listed.
        seller: SellerRef,
        /// Captured items that must appear with their submitted fields.
        expect_slots: Vec<SlotId>,
        /// Minimum listing size.
        min_items: usize,
    },
    /// Deletes a captured item.
    Delete {
        /// Item deleted.
        slot: SlotId,
    },
    /// Probes once and applies a soft response-time budget when the probe passes.
    Timed {
        /// Endpoint called.
        endpoint: Endpoint,
        /// Input sent.
        target: Target,
        /// Budget applied.
        budget: Budget,
    },
}

impl Step {
    /// Returns a short human-readable label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Create {
                kind,
                slot,
                ..
            } => match slot {
                Some(slot) => format!("create {kind} as {slot}"),
                None => format!("create {kind}"),
            },
            Self::Probe {
                endpoint,
                target,
            } => format!("probe {} {}", endpoint.as_str(), target_label(target)),
            Self::ProbeVariants {
                endpoint,
                kind,
            } => format!("probe {} variants of {kind}", endpoint.as_str()),
            Self::RepeatedReads {
                slot,
                ..
            } => format!("repeated reads of {slot}"),
            Self::CompareStatistics {
                slot,
            } => format!("compare statistics v1/v2 of {slot}"),
            Self::CompareErrorStatuses {
                kind,
            } => format!("compare statistics error statuses for {kind}"),
            Self::ListSeller {
                expect_slots,
                ..
            } => format!("list seller items expecting {} captured", expect_slots.len()),
            Self::Delete {
                slot,
            } => format!("delete {slot}"),
            Self::Timed {
                endpoint,
                target,
                ..
            } => format!("timed {} {}", endpoint.as_str(), target_label(target)),
        }
    }
}

/// Declarative conformance scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Stable identifier, `<suite>.<case>`.
    pub id: ScenarioId,
    /// Owning suite.
    pub suite: Suite,
    /// One-line description.
    pub title: String,
    /// Ordered steps.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates a scenario whose id is prefixed with the suite label.
    #[must_use]
    pub fn new(suite: Suite, case: &str, title: &str, steps: Vec<Step>) -> Self {
        Self {
            id: ScenarioId::new(format!("{}.{case}", suite.as_str())),
            suite,
            title: title.to_string(),
            steps,
        }
    }
}

// ============================================================================
// SECTION: Runner Configuration
// ============================================================================

/// Bounded linear backoff for read-after-write checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Backoff unit; attempt `n` waits `n * backoff`.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Returns the delay before retrying after `attempt` failed attempts.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

/// Runner tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Read-after-write retry policy.
    pub read_retry: RetryPolicy,
    /// Default soft response-time budget.
    pub response_time_budget: Duration,
    /// Soft response-time budget for seller listings.
    pub listing_time_budget: Duration,
    /// Default number of back-to-back reads.
    pub repeated_reads: usize,
    /// Whether captured items are deleted after each scenario.
    pub teardown: bool,
    /// Fixture seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            read_retry: RetryPolicy {
                attempts: 3,
                backoff: Duration::from_millis(200),
            },
            response_time_budget: Duration::from_secs(2),
            listing_time_budget: Duration::from_secs(3),
            repeated_reads: 3,
            teardown: true,
            seed: None,
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Scenario outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every step passed.
    Passed,
    /// A step failed.
    Failed,
    /// No step failed and at least one was inconclusive.
    Inconclusive,
}

impl Outcome {
    /// Returns a stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Inconclusive => "inconclusive",
        }
    }
}

/// Literal exchange recorded for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedResponse {
    /// Endpoint called.
    pub endpoint: Endpoint,
    /// Identifier or JSON body sent.
    pub request: String,
    /// HTTP status when a response was obtained.
    pub status: Option<u16>,
    /// Decoded JSON body.
    pub body: Option<Value>,
    /// Raw body text when not JSON.
    pub raw_error: Option<String>,
    /// Transport failure when no response was obtained.
    pub transport_error: Option<String>,
    /// Elapsed milliseconds.
    pub elapsed_ms: u64,
}

impl ObservedResponse {
    /// Captures an exchange outcome.
    fn capture(
        endpoint: Endpoint,
        payload: &FixturePayload,
        result: &Result<GatewayResponse, TransportError>,
        started: Instant,
    ) -> Self {
        let request = match payload {
            FixturePayload::Identifier(id) => preview(id),
            FixturePayload::Item(body) => body.to_string(),
        };
        match result {
            Ok(response) => Self {
                endpoint,
                request,
                status: Some(response.status),
                body: response.body.clone(),
                raw_error: response.raw_error.clone(),
                transport_error: None,
                elapsed_ms: response.elapsed_ms(),
            },
            Err(err) => Self {
                endpoint,
                request,
                status: None,
                body: None,
                raw_error: None,
                transport_error: Some(err.to_string()),
                elapsed_ms: millis(started.elapsed()),
            },
        }
    }
}

/// Verdict of one executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// Zero-based step index.
    pub index: usize,
    /// Step label.
    pub label: String,
    /// Step verdict.
    pub verdict: Verdict,
    /// Attempts made (greater than one after read retries).
    pub attempts: u32,
}

/// The step that failed a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    /// Zero-based step index.
    pub index: usize,
    /// Step label.
    pub label: String,
    /// Failure detail.
    pub violation: Violation,
    /// Exchanges observed by the failing attempt.
    pub observed: Vec<ObservedResponse>,
}

/// Result of one scenario run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Scenario identifier.
    pub scenario_id: ScenarioId,
    /// Owning suite.
    pub suite: Suite,
    /// Scenario title.
    pub title: String,
    /// Scenario outcome.
    pub outcome: Outcome,
    /// Executed steps.
    pub steps: Vec<StepRecord>,
    /// Failing step, when the scenario failed.
    pub failure: Option<StepFailure>,
    /// Tracked defect behind the failure, when any.
    pub known_bug: Option<KnownBug>,
    /// Teardown and other non-verdict notes.
    pub notes: Vec<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Result of executing one step, before it is recorded.
struct StepOutcome {
    /// Step verdict.
    verdict: Verdict,
    /// Exchanges of the last attempt.
    observed: Vec<ObservedResponse>,
    /// Responses of the last attempt.
    responses: Vec<GatewayResponse>,
    /// Attempts made.
    attempts: u32,
}

impl StepOutcome {
    /// Outcome of a step that could not issue a request.
    fn harness(detail: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::fail(ViolationKind::ContractViolation, detail),
            observed: Vec::new(),
            responses: Vec::new(),
            attempts: 1,
        }
    }

    /// Outcome of a single exchange.
    fn single(
        verdict: Verdict,
        observed: ObservedResponse,
        result: Result<GatewayResponse, TransportError>,
    ) -> Self {
        Self {
            verdict,
            observed: vec![observed],
            responses: result.into_iter().collect(),
            attempts: 1,
        }
    }

    /// Folds a later sub-outcome into this one.
    fn absorb(&mut self, other: Self) {
        self.verdict = std::mem::replace(&mut self.verdict, Verdict::Pass).and(other.verdict);
        self.observed.extend(other.observed);
        self.responses.extend(other.responses);
        self.attempts = self.attempts.max(other.attempts);
    }
}

/// Item captured by a create step.
#[derive(Debug, Clone)]
struct CapturedItem {
    /// Server-assigned identifier.
    id: String,
    /// Draft submitted at creation.
    draft: Option<ItemDraft>,
    /// Whether a delete step removed the item.
    deleted: bool,
}

/// Per-scenario mutable state.
struct RunContext {
    /// Seller drawn for the scenario.
    seller: i64,
    /// Captured items by slot.
    slots: BTreeMap<SlotId, CapturedItem>,
    /// Every created identifier in creation order.
    created: Vec<String>,
    /// Identifiers deleted by steps.
    deleted: BTreeSet<String>,
    /// Non-verdict notes.
    notes: Vec<String>,
}

/// Identifies the step currently executing.
#[derive(Clone, Copy)]
struct StepScope<'a> {
    /// Scenario identifier.
    scenario: &'a ScenarioId,
    /// Zero-based step index.
    index: usize,
}

/// Executes scenarios against a gateway.
pub struct ScenarioRunner<G, A> {
    /// Service transport.
    gateway: G,
    /// Audit sink.
    audit: A,
    /// Expected-behavior model.
    oracle: ConformanceOracle,
    /// Runner tuning.
    config: RunnerConfig,
    /// Fixture source.
    generator: FixtureGenerator,
}

impl<G: ServiceGateway, A: HarnessAuditSink> ScenarioRunner<G, A> {
    /// Creates a runner; fixtures are seeded from `config.seed` when set.
    #[must_use]
    pub fn new(gateway: G, audit: A, config: RunnerConfig) -> Self {
        let generator = config.seed.map_or_else(FixtureGenerator::new, FixtureGenerator::with_seed);
        Self {
            gateway,
            audit,
            oracle: ConformanceOracle::new(),
            config,
            generator,
        }
    }

    /// Returns the gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns the runner configuration.
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs scenarios sequentially and aggregates their results.
    pub fn run_all(&mut self, scenarios: &[Scenario], target: &str) -> SuiteReport {
        let results = scenarios.iter().map(|scenario| self.run(scenario)).collect();
        SuiteReport::from_results(target, results)
    }

    /// Runs one scenario, including teardown.
    pub fn run(&mut self, scenario: &Scenario) -> TestResult {
        let started = Instant::now();
        self.emit(
            &scenario.id,
            AuditEventKind::ScenarioStarted {
                suite: scenario.suite.as_str(),
                title: scenario.title.clone(),
            },
        );
        let mut ctx = RunContext {
            seller: self.generator.seller_id(),
            slots: BTreeMap::new(),
            created: Vec::new(),
            deleted: BTreeSet::new(),
            notes: Vec::new(),
        };
        let mut records = Vec::with_capacity(scenario.steps.len());
        let mut failure = None;
        for (index, step) in scenario.steps.iter().enumerate() {
            let scope = StepScope {
                scenario: &scenario.id,
                index,
            };
            let label = step.label();
            let outcome = self.execute(scope, step, &mut ctx);
            self.emit(
                &scenario.id,
                AuditEventKind::StepEvaluated {
                    step: index,
                    label: label.clone(),
                    verdict: outcome.verdict.label(),
                    detail: verdict_detail(&outcome.verdict),
                },
            );
            records.push(StepRecord {
                index,
                label: label.clone(),
                verdict: outcome.verdict.clone(),
                attempts: outcome.attempts,
            });
            if let Verdict::Fail(violation) = outcome.verdict {
                failure = Some(StepFailure {
                    index,
                    label,
                    violation,
                    observed: outcome.observed,
                });
                break;
            }
        }
        if self.config.teardown {
            self.teardown(&scenario.id, &mut ctx);
        }
        let outcome = if failure.is_some() {
            Outcome::Failed
        } else if records.iter().any(|record| record.verdict.is_inconclusive()) {
            Outcome::Inconclusive
        } else {
            Outcome::Passed
        };
        let known_bug = failure.as_ref().and_then(|failure| failure.violation.known_bug);
        let duration_ms = millis(started.elapsed());
        self.emit(
            &scenario.id,
            AuditEventKind::ScenarioFinished {
                outcome: outcome.as_str(),
                known_bug: known_bug.map(KnownBug::reference),
                duration_ms,
            },
        );
        TestResult {
            scenario_id: scenario.id.clone(),
            suite: scenario.suite,
            title: scenario.title.clone(),
            outcome,
            steps: records,
            failure,
            known_bug,
            notes: ctx.notes,
            duration_ms,
        }
    }

    // ------------------------------------------------------------------------
    // Step execution
    // ------------------------------------------------------------------------

    /// Dispatches one step.
    fn execute(&mut self, scope: StepScope<'_>, step: &Step, ctx: &mut RunContext) -> StepOutcome {
        match step {
            Step::Create {
                kind,
                seller,
                item_number,
                slot,
            } => self.create(scope, *kind, *seller, *item_number, slot.as_ref(), ctx),
            Step::Probe {
                endpoint,
                target,
            } => match self.resolve(target, ctx) {
                Ok(fixture) => {
                    let outcome = self.probe_with_retry(scope, *endpoint, &fixture, retries(target));
                    capture_created(*endpoint, &outcome, ctx);
                    outcome
                }
                Err(detail) => StepOutcome::harness(detail),
            },
            Step::ProbeVariants {
                endpoint,
                kind,
            } => self.probe_variants(scope, *endpoint, *kind),
            Step::RepeatedReads {
                slot,
                count,
            } => self.repeated_reads(scope, slot, count.unwrap_or(self.config.repeated_reads), ctx),
            Step::CompareStatistics {
                slot,
            } => self.compare_statistics(scope, slot, ctx),
            Step::CompareErrorStatuses {
                kind,
            } => self.compare_error_statuses(scope, *kind),
            Step::ListSeller {
                seller,
                expect_slots,
                min_items,
            } => self.list_seller(scope, *seller, expect_slots, *min_items, ctx),
            Step::Delete {
                slot,
            } => self.delete(scope, slot, ctx),
            Step::Timed {
                endpoint,
                target,
                budget,
            } => {
                let fixture = match self.resolve(target, ctx) {
                    Ok(fixture) => fixture,
                    Err(detail) => return StepOutcome::harness(detail),
                };
                let mut outcome = self.probe_with_retry(scope, *endpoint, &fixture, retries(target));
                let budget = match budget {
                    Budget::Default => self.config.response_time_budget,
                    Budget::Listing => self.config.listing_time_budget,
                };
                if outcome.verdict.is_pass()
                    && let Some(response) = outcome.responses.last()
                {
                    outcome.verdict = self.oracle.check_response_time(response.elapsed, budget);
                }
                outcome
            }
        }
    }

    /// Creates an item and captures its identifier.
    fn create(
        &mut self,
        scope: StepScope<'_>,
        kind: FixtureKind,
        seller: SellerRef,
        item_number: Option<u32>,
        slot: Option<&SlotId>,
        ctx: &mut RunContext,
    ) -> StepOutcome {
        let overrides = FixtureOverrides {
            seller_id: self.seller_override(seller, ctx),
            item_number,
            name: None,
        };
        let fixture = match self.generator.generate(kind, &overrides) {
            Ok(fixture) => fixture,
            Err(err) => return StepOutcome::harness(err.to_string()),
        };
        let (result, observed) = self.exchange(scope, Endpoint::CreateItem, &fixture.payload);
        let verdict = match &result {
            Err(err) => Verdict::fail(ViolationKind::Transport, err.to_string()),
            Ok(response) if response.is_server_error() => Verdict::fail(
                ViolationKind::ServerError,
                format!("create answered {} for {kind}", response.status),
            ),
            Ok(response) if response.status != 200 => Verdict::fail(
                ViolationKind::UnexpectedStatus,
                format!("create expected 200 for {kind}, got {}", response.status),
            ),
            Ok(response) => match response.body.as_ref().and_then(extract_item_id) {
                Some(id) => {
                    ctx.created.push(id.clone());
                    if let Some(slot) = slot {
                        ctx.slots.insert(
                            slot.clone(),
                            CapturedItem {
                                id,
                                draft: fixture.draft.clone(),
                                deleted: false,
                            },
                        );
                    }
                    Verdict::Pass
                }
                None => Verdict::fail(
                    ViolationKind::ContractViolation,
                    "create response carries no item id",
                ),
            },
        };
        StepOutcome::single(verdict, observed, result)
    }

    /// Probes every sample of an identifier kind; stops at the first failure.
    fn probe_variants(
        &mut self,
        scope: StepScope<'_>,
        endpoint: Endpoint,
        kind: FixtureKind,
    ) -> StepOutcome {
        let fixtures = match self.generator.identifier_variants(kind) {
            Ok(fixtures) => fixtures,
            Err(err) => return StepOutcome::harness(err.to_string()),
        };
        let mut combined = empty_outcome();
        for fixture in &fixtures {
            let mut outcome = self.probe_once(scope, endpoint, fixture);
            annotate_variant(&mut outcome.verdict, fixture);
            combined.absorb(outcome);
            if combined.verdict.is_fail() {
                break;
            }
        }
        combined
    }

    /// Reads a captured item back-to-back.
    fn repeated_reads(
        &mut self,
        scope: StepScope<'_>,
        slot: &SlotId,
        count: usize,
        ctx: &RunContext,
    ) -> StepOutcome {
        let fixture = match bind_slot(slot, ctx) {
            Ok(fixture) => fixture,
            Err(detail) => return StepOutcome::harness(detail),
        };
        let first = self.probe_with_retry(scope, Endpoint::GetItem, &fixture, true);
        if !first.verdict.is_pass() {
            return first;
        }
        let mut combined = first;
        for _ in 0..count {
            let (result, observed) = self.exchange(scope, Endpoint::GetItem, &fixture.payload);
            combined.observed.push(observed);
            match result {
                Ok(response) => combined.responses.push(response),
                Err(err) => {
                    combined.verdict = Verdict::fail(ViolationKind::Transport, err.to_string());
                    return combined;
                }
            }
        }
        let item_id = fixture.identifier().unwrap_or_default();
        combined.verdict = self.oracle.check_stable_reads(item_id, &combined.responses);
        combined
    }

    /// Compares statistics v1 and v2 for a captured item.
    fn compare_statistics(
        &mut self,
        scope: StepScope<'_>,
        slot: &SlotId,
        ctx: &RunContext,
    ) -> StepOutcome {
        let fixture = match bind_slot(slot, ctx) {
            Ok(fixture) => fixture,
            Err(detail) => return StepOutcome::harness(detail),
        };
        let mut combined = self.probe_with_retry(scope, Endpoint::StatisticsV1, &fixture, true);
        if combined.verdict.is_fail() {
            return combined;
        }
        combined.absorb(self.probe_with_retry(scope, Endpoint::StatisticsV2, &fixture, true));
        if combined.verdict.is_fail() {
            return combined;
        }
        if let [v1, v2] = combined.responses.as_slice() {
            let comparison = self.oracle.compare_statistics(v1, v2);
            combined.verdict = std::mem::replace(&mut combined.verdict, Verdict::Pass).and(comparison);
        }
        combined
    }

    /// Sends every sample of an identifier kind to both statistics versions.
    fn compare_error_statuses(&mut self, scope: StepScope<'_>, kind: FixtureKind) -> StepOutcome {
        let fixtures = match self.generator.identifier_variants(kind) {
            Ok(fixtures) => fixtures,
            Err(err) => return StepOutcome::harness(err.to_string()),
        };
        let mut combined = empty_outcome();
        for fixture in &fixtures {
            let (v1, v1_observed) = self.exchange(scope, Endpoint::StatisticsV1, &fixture.payload);
            let (v2, v2_observed) = self.exchange(scope, Endpoint::StatisticsV2, &fixture.payload);
            let mut verdict = match (&v1, &v2) {
                (Ok(v1), Ok(v2)) => self.oracle.compare_error_statuses(v1, v2),
                (Err(err), _) | (_, Err(err)) => {
                    Verdict::fail(ViolationKind::Transport, err.to_string())
                }
            };
            annotate_variant(&mut verdict, fixture);
            combined.absorb(StepOutcome {
                verdict,
                observed: vec![v1_observed, v2_observed],
                responses: v1.into_iter().chain(v2).collect(),
                attempts: 1,
            });
            if combined.verdict.is_fail() {
                break;
            }
        }
        combined
    }

    /// Lists a seller's items and checks the captured ones appear.
    fn list_seller(
        &mut self,
        scope: StepScope<'_>,
        seller: SellerRef,
        expect_slots: &[SlotId],
        min_items: usize,
        ctx: &RunContext,
    ) -> StepOutcome {
        let seller_id = self.seller_id(seller, ctx);
        let mut expected = Vec::with_capacity(expect_slots.len());
        for slot in expect_slots {
            match ctx.slots.get(slot) {
                Some(CapturedItem {
                    id,
                    draft: Some(draft),
                    ..
                }) => expected.push((id.as_str(), draft)),
                _ => return StepOutcome::harness(format!("slot {slot} holds no captured draft")),
            }
        }
        let payload = FixturePayload::Identifier(seller_id.to_string());
        self.with_read_retry(true, || {
            let (result, observed) = self.exchange(scope, Endpoint::ListSellerItems, &payload);
            let verdict = match &result {
                Ok(response) => {
                    self.oracle.check_listing_contains(response, seller_id, &expected, min_items)
                }
                Err(err) => Verdict::fail(ViolationKind::Transport, err.to_string()),
            };
            StepOutcome::single(verdict, observed, result)
        })
    }

    /// Deletes a captured item and marks it deleted.
    fn delete(&mut self, scope: StepScope<'_>, slot: &SlotId, ctx: &mut RunContext) -> StepOutcome {
        let fixture = match bind_slot(slot, ctx) {
            Ok(fixture) => fixture,
            Err(detail) => return StepOutcome::harness(detail),
        };
        let outcome = self.probe_once(scope, Endpoint::DeleteItem, &fixture);
        if !outcome.verdict.is_fail()
            && let Some(captured) = ctx.slots.get_mut(slot)
        {
            captured.deleted = true;
            ctx.deleted.insert(captured.id.clone());
        }
        outcome
    }

    /// Deletes every created item that is still live, newest first.
    fn teardown(&self, scenario: &ScenarioId, ctx: &mut RunContext) {
        for id in ctx.created.iter().rev() {
            if ctx.deleted.contains(id) {
                continue;
            }
            let detail = match self.gateway.delete_item(id) {
                Ok(response) if !response.is_server_error() => continue,
                Ok(response) => format!("delete answered {}", response.status),
                Err(err) => err.to_string(),
            };
            ctx.notes.push(format!("teardown of {id} failed: {detail}"));
            self.emit(
                scenario,
                AuditEventKind::TeardownFailed {
                    item_id: id.clone(),
                    detail,
                },
            );
        }
    }

    // ------------------------------------------------------------------------
    // Exchanges
    // ------------------------------------------------------------------------

    /// Probes once, retrying on status or body mismatches when `retry` is set.
    fn probe_with_retry(
        &self,
        scope: StepScope<'_>,
        endpoint: Endpoint,
        fixture: &Fixture,
        retry: bool,
    ) -> StepOutcome {
        self.with_read_retry(retry, || self.probe_once(scope, endpoint, fixture))
    }

    /// Sends a fixture once and judges the response.
    fn probe_once(&self, scope: StepScope<'_>, endpoint: Endpoint, fixture: &Fixture) -> StepOutcome {
        let (result, observed) = self.exchange(scope, endpoint, &fixture.payload);
        let verdict = self.oracle.evaluate_outcome(endpoint, fixture, &result);
        StepOutcome::single(verdict, observed, result)
    }

    /// Repeats `attempt` with linear backoff while it fails on status or body.
    fn with_read_retry<F>(&self, retry: bool, mut attempt: F) -> StepOutcome
    where
        F: FnMut() -> StepOutcome,
    {
        let policy = self.config.read_retry;
        let mut outcome = attempt();
        let mut tries = 1;
        while retry && tries < policy.attempts && is_read_lag(&outcome.verdict) {
            std::thread::sleep(policy.delay(tries));
            tries += 1;
            outcome = attempt();
        }
        outcome.attempts = tries;
        outcome
    }

    /// Performs one gateway call and records it.
    fn exchange(
        &self,
        scope: StepScope<'_>,
        endpoint: Endpoint,
        payload: &FixturePayload,
    ) -> (Result<GatewayResponse, TransportError>, ObservedResponse) {
        let started = Instant::now();
        let result = self.gateway.call(endpoint, payload);
        let observed = ObservedResponse::capture(endpoint, payload, &result, started);
        self.emit(
            scope.scenario,
            AuditEventKind::RequestCompleted {
                step: scope.index,
                endpoint,
                status: observed.status,
                elapsed_ms: observed.elapsed_ms,
                transport_error: result.as_ref().err().map(|err| err.kind().to_string()),
            },
        );
        (result, observed)
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Turns a probe target into a fixture.
    fn resolve(&mut self, target: &Target, ctx: &RunContext) -> Result<Fixture, String> {
        match target {
            Target::Slot(slot) => bind_slot(slot, ctx),
            Target::Fixture(kind) => self
                .generator
                .generate(*kind, &FixtureOverrides::default())
                .map_err(|err| err.to_string()),
            Target::Seller(seller) => {
                let overrides = FixtureOverrides::seller(self.seller_id(*seller, ctx));
                self.generator
                    .generate(FixtureKind::SellerId(SellerIdCase::Random), &overrides)
                    .map_err(|err| err.to_string())
            }
        }
    }

    /// Resolves a seller reference to a concrete identifier.
    fn seller_id(&mut self, seller: SellerRef, ctx: &RunContext) -> i64 {
        match seller {
            SellerRef::Random => self.generator.seller_id(),
            SellerRef::Scenario => ctx.seller,
            SellerRef::Fixed(id) => id,
        }
    }

    /// Resolves a seller reference to a fixture override.
    fn seller_override(&mut self, seller: SellerRef, ctx: &RunContext) -> Option<i64> {
        match seller {
            SellerRef::Random => None,
            other => Some(self.seller_id(other, ctx)),
        }
    }

    /// Sends an event to the audit sink.
    fn emit(&self, scenario: &ScenarioId, kind: AuditEventKind) {
        self.audit.record(&HarnessAuditEvent::new(scenario, kind));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a fixture addressing a captured slot.
fn bind_slot(slot: &SlotId, ctx: &RunContext) -> Result<Fixture, String> {
    let captured =
        ctx.slots.get(slot).ok_or_else(|| format!("scenario references uncaptured slot {slot}"))?;
    let kind =
        if captured.deleted { FixtureKind::DeletedItemId } else { FixtureKind::ExistingItemId };
    Fixture::bound_item_id(kind, captured.id.clone(), captured.draft.clone())
        .map_err(|err| err.to_string())
}

/// Registers items created by a create-item probe for teardown.
fn capture_created(endpoint: Endpoint, outcome: &StepOutcome, ctx: &mut RunContext) {
    if endpoint != Endpoint::CreateItem {
        return;
    }
    for response in &outcome.responses {
        if response.status == 200
            && let Some(id) = response.body.as_ref().and_then(extract_item_id)
        {
            ctx.created.push(id);
        }
    }
}

/// Returns `true` when a probe target may lag behind a write.
const fn retries(target: &Target) -> bool {
    matches!(target, Target::Slot(_) | Target::Seller(_))
}

/// Returns `true` for failures that read-after-write lag can explain.
fn is_read_lag(verdict: &Verdict) -> bool {
    verdict.violation().is_some_and(|violation| {
        matches!(violation.kind, ViolationKind::UnexpectedStatus | ViolationKind::ContractViolation)
    })
}

/// Prefixes a failure detail with the identifier variant that caused it.
fn annotate_variant(verdict: &mut Verdict, fixture: &Fixture) {
    if let Verdict::Fail(violation) = verdict
        && let Some(id) = fixture.identifier()
    {
        violation.detail = format!("variant '{}': {}", preview(id), violation.detail);
    }
}

/// Outcome that absorbs sub-outcomes.
const fn empty_outcome() -> StepOutcome {
    StepOutcome {
        verdict: Verdict::Pass,
        observed: Vec::new(),
        responses: Vec::new(),
        attempts: 1,
    }
}

/// Returns the detail text of a verdict, if any.
fn verdict_detail(verdict: &Verdict) -> Option<String> {
    match verdict {
        Verdict::Pass => None,
        Verdict::Fail(violation) => Some(violation.to_string()),
        Verdict::Inconclusive(reason) => Some(reason.clone()),
    }
}

/// Returns a label for a probe target.
fn target_label(target: &Target) -> String {
    match target {
        Target::Slot(slot) => slot.to_string(),
        Target::Fixture(kind) => kind.to_string(),
        Target::Seller(SellerRef::Fixed(id)) => format!("seller {id}"),
        Target::Seller(_) => "seller".to_string(),
    }
}

/// Escapes and truncates an identifier for diagnostics.
fn preview(raw: &str) -> String {
    let count = raw.chars().count();
    let head = raw.chars().take(PREVIEW_CHARS).collect::<String>();
    if count > PREVIEW_CHARS {
        format!("{}... ({count} chars)", head.escape_debug())
    } else {
        head.escape_debug().to_string()
    }
}

/// Converts a duration to whole milliseconds.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
