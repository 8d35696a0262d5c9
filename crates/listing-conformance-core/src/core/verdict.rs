// crates/listing-conformance-core/src/core/verdict.rs
// ============================================================================
// Module: Verdicts and Status Contracts
// Description: Oracle outcomes, violation taxonomy, and status expectations.
// Purpose: Give every check a stable, serializable result shape.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Verdict`] is the outcome of one oracle check. Failures carry a
//! [`Violation`] whose [`ViolationKind`] separates unreachable services,
//! server faults, contract breaches and tracked [`KnownBug`] regressions.
//! [`StatusExpectation`] models both single expected codes and allowed sets.
//!
//! Invariants:
//! - A 5xx status is never admitted by any expectation.
//! - Known-bug failures always carry their bug reference.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;

// ============================================================================
// SECTION: Known Bugs
// ============================================================================

/// Tracked service defects asserted as still-failing until fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownBug {
    /// Create accepts a negative price (returns 200, should be 400).
    NegativePrice,
    /// Create accepts negative statistics counters (returns 200, should be 400).
    NegativeStatistics,
}

impl KnownBug {
    /// Every tracked defect.
    pub const ALL: [Self; 2] = [Self::NegativePrice, Self::NegativeStatistics];

    /// Returns the stable bug reference used in reports.
    #[must_use]
    pub const fn reference(self) -> &'static str {
        match self {
            Self::NegativePrice => "KB-001",
            Self::NegativeStatistics => "KB-002",
        }
    }

    /// Returns a one-line description of the defect.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::NegativePrice => "service accepts negative prices",
            Self::NegativeStatistics => "service accepts negative statistics",
        }
    }
}

impl fmt::Display for KnownBug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reference(), self.summary())
    }
}

// ============================================================================
// SECTION: Violations
// ============================================================================

/// Classification of a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Timeout, connection failure or malformed transport response.
    Transport,
    /// The service answered 5xx.
    ServerError,
    /// The status code is outside the expected set.
    UnexpectedStatus,
    /// The status is acceptable but the body breaks the contract.
    ContractViolation,
    /// A tracked defect is still present.
    KnownBug,
    /// A soft response-time budget was exceeded.
    SlowResponse,
}

impl ViolationKind {
    /// Returns a stable label for the violation kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::ServerError => "server_error",
            Self::UnexpectedStatus => "unexpected_status",
            Self::ContractViolation => "contract_violation",
            Self::KnownBug => "known_bug",
            Self::SlowResponse => "slow_response",
        }
    }
}

/// A failed check with its diagnostic detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Violation classification.
    pub kind: ViolationKind,
    /// Human-readable detail.
    pub detail: String,
    /// Bug reference when the failure is a tracked defect.
    pub known_bug: Option<KnownBug>,
}

impl Violation {
    /// Creates a violation without a bug reference.
    #[must_use]
    pub fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            known_bug: None,
        }
    }

    /// Creates a known-bug violation.
    #[must_use]
    pub fn known_bug(bug: KnownBug, detail: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::KnownBug,
            detail: detail.into(),
            known_bug: Some(bug),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known_bug {
            Some(bug) => write!(f, "[{}] {} ({bug})", self.kind.as_str(), self.detail),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.detail),
        }
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of one oracle check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum Verdict {
    /// The behavior matches the contract.
    Pass,
    /// The behavior breaks the contract.
    Fail(Violation),
    /// The contract does not pin the behavior down; the observation was admitted.
    Inconclusive(String),
}

impl Verdict {
    /// Shorthand for a failure without a bug reference.
    #[must_use]
    pub fn fail(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self::Fail(Violation::new(kind, detail))
    }

    /// Returns `true` for [`Verdict::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns `true` for [`Verdict::Fail`].
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }

    /// Returns `true` for [`Verdict::Inconclusive`].
    #[must_use]
    pub const fn is_inconclusive(&self) -> bool {
        matches!(self, Self::Inconclusive(_))
    }

    /// Returns the violation when the verdict is a failure.
    #[must_use]
    pub const fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Fail(violation) => Some(violation),
            _ => None,
        }
    }

    /// Returns a stable label for the verdict.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail(_) => "fail",
            Self::Inconclusive(_) => "inconclusive",
        }
    }

    /// Combines two verdicts: failures dominate, then inconclusive, then pass.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (fail @ Self::Fail(_), _) | (_, fail @ Self::Fail(_)) => fail,
            (open @ Self::Inconclusive(_), _) | (_, open @ Self::Inconclusive(_)) => open,
            (Self::Pass, Self::Pass) => Self::Pass,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("pass"),
            Self::Fail(violation) => write!(f, "fail {violation}"),
            Self::Inconclusive(reason) => write!(f, "inconclusive: {reason}"),
        }
    }
}

// ============================================================================
// SECTION: Status Contracts
// ============================================================================

/// HTTP status classification used by the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseClass {
    /// 1xx.
    Informational,
    /// 2xx.
    Success,
    /// 3xx.
    Redirection,
    /// 4xx.
    ClientError,
    /// 5xx.
    ServerError,
    /// Anything outside 100..=599.
    Unknown,
}

impl ResponseClass {
    /// Classifies a status code.
    #[must_use]
    pub const fn of(status: u16) -> Self {
        match status {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Expected status for an endpoint/fixture pair.
///
/// # Invariants
/// - No variant admits a 5xx status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "codes", rename_all = "snake_case")]
pub enum StatusExpectation {
    /// Exactly one documented status.
    Exact(u16),
    /// Any member of a documented allowed set.
    OneOf(&'static [u16]),
    /// Any member of a set the contract leaves open; admitted statuses are inconclusive.
    Ambiguous(&'static [u16]),
    /// Anything except a server error.
    NotServerError,
}

impl StatusExpectation {
    /// Returns `true` when `status` satisfies the expectation.
    #[must_use]
    pub fn admits(&self, status: u16) -> bool {
        if ResponseClass::of(status) == ResponseClass::ServerError {
            return false;
        }
        match self {
            Self::Exact(code) => *code == status,
            Self::OneOf(codes) | Self::Ambiguous(codes) => codes.contains(&status),
            Self::NotServerError => true,
        }
    }

    /// Returns `true` when admitted statuses only yield an inconclusive verdict.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }
}

impl fmt::Display for StatusExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{code}"),
            Self::OneOf(codes) | Self::Ambiguous(codes) => {
                let joined = codes.iter().map(u16::to_string).collect::<Vec<_>>().join(",");
                write!(f, "{{{joined}}}")
            }
            Self::NotServerError => f.write_str("any non-5xx"),
        }
    }
}
