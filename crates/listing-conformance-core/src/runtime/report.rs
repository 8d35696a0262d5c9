// crates/listing-conformance-core/src/runtime/report.rs
// ============================================================================
// Module: Suite Report
// Description: Aggregated results of a conformance run.
// Purpose: Summarize scenario outcomes for JSON and Markdown rendering.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] collects [`TestResult`]s and totals them. Failures caused
//! by tracked defects are counted apart from genuine failures so a known-bug
//! regression is never mistaken for environment flakiness. The Markdown
//! rendering lists each reproduced defect with the scenarios that hit it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::verdict::KnownBug;
use crate::runtime::runner::Outcome;
use crate::runtime::runner::TestResult;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    /// Scenarios run.
    pub total: usize,
    /// Scenarios passed.
    pub passed: usize,
    /// Scenarios failed for reasons other than a tracked defect.
    pub failed: usize,
    /// Scenarios failed by a tracked defect.
    pub known_bug_failures: usize,
    /// Scenarios neither failed nor fully pinned down.
    pub inconclusive: usize,
}

/// Aggregated run results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteReport {
    /// RFC 3339 generation timestamp.
    pub generated_at: String,
    /// Service base URL or fake label.
    pub target: String,
    /// Outcome counts.
    pub totals: ReportTotals,
    /// Per-scenario results in run order.
    pub results: Vec<TestResult>,
}

impl SuiteReport {
    /// Builds a report and its totals from results.
    #[must_use]
    pub fn from_results(target: &str, results: Vec<TestResult>) -> Self {
        let mut totals = ReportTotals {
            total: results.len(),
            ..ReportTotals::default()
        };
        for result in &results {
            match (result.outcome, result.known_bug) {
                (Outcome::Passed, _) => totals.passed += 1,
                (Outcome::Inconclusive, _) => totals.inconclusive += 1,
                (Outcome::Failed, Some(_)) => totals.known_bug_failures += 1,
                (Outcome::Failed, None) => totals.failed += 1,
            }
        }
        let generated_at =
            OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "unknown".to_string());
        Self {
            generated_at,
            target: target.to_string(),
            totals,
            results,
        }
    }

    /// Returns `true` when any scenario failed, tracked defects included.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.totals.failed + self.totals.known_bug_failures > 0
    }

    /// Iterates over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|result| result.outcome == Outcome::Failed)
    }

    /// Renders a Markdown summary.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let totals = &self.totals;
        let mut out = String::new();
        let _ = writeln!(out, "# Listing Conformance Report\n");
        let _ = writeln!(out, "- Target: `{}`", self.target);
        let _ = writeln!(out, "- Generated: {}", self.generated_at);
        let _ = writeln!(
            out,
            "- Total: {} | passed: {} | failed: {} | known bugs: {} | inconclusive: {}\n",
            totals.total,
            totals.passed,
            totals.failed,
            totals.known_bug_failures,
            totals.inconclusive
        );
        let reproduced = KnownBug::ALL
            .into_iter()
            .map(|bug| {
                let ids = self
                    .failures()
                    .filter(|result| result.known_bug == Some(bug))
                    .map(|result| format!("`{}`", result.scenario_id))
                    .collect::<Vec<_>>();
                (bug, ids)
            })
            .filter(|(_, ids)| !ids.is_empty())
            .collect::<Vec<_>>();
        if !reproduced.is_empty() {
            let _ = writeln!(out, "## Tracked Defects\n");
            for (bug, ids) in reproduced {
                let _ = writeln!(out, "- {bug}: reproduced by {}", ids.join(", "));
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "| Scenario | Outcome | Duration (ms) | Detail |");
        let _ = writeln!(out, "|---|---|---|---|");
        for result in &self.results {
            let detail = match (&result.failure, result.known_bug) {
                (Some(failure), Some(bug)) => {
                    format!("{} at step {}: {}", bug.reference(), failure.index, failure.violation.detail)
                }
                (Some(failure), None) => {
                    format!("step {} ({}): {}", failure.index, failure.label, failure.violation.detail)
                }
                (None, _) => String::new(),
            };
            let _ = writeln!(
                out,
                "| `{}` | {} | {} | {} |",
                result.scenario_id,
                result.outcome.as_str(),
                result.duration_ms,
                detail.replace('|', "\\|").replace('\n', " ")
            );
        }
        out
    }
}
