// crates/listing-conformance-cli/src/artifacts.rs
// ============================================================================
// Module: Report Artifacts
// Description: Writes run reports and renders one-line scenario summaries.
// Purpose: Persist canonical JSON and Markdown reports for each run.
// Dependencies: listing-conformance-core, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! `report.json` is written with canonical JSON (JCS) so two runs with the
//! same results diff cleanly; `report.md` is the human summary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use listing_conformance_core::Outcome;
use listing_conformance_core::SuiteReport;
use listing_conformance_core::TestResult;
use listing_conformance_core::runtime::ReportTotals;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON report filename.
pub const REPORT_JSON: &str = "report.json";
/// Markdown report filename.
pub const REPORT_MARKDOWN: &str = "report.md";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Paths of the written report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Canonical JSON report.
    pub json: PathBuf,
    /// Markdown summary.
    pub markdown: PathBuf,
}

/// Report writing failures.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Filesystem failure.
    #[error("report io error: {path}: {detail}")]
    Io {
        /// Path being written.
        path: String,
        /// Underlying failure.
        detail: String,
    },
    /// Canonical serialization failure.
    #[error("report serialization failed: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Writers
// ============================================================================

/// Writes `report.json` and `report.md` into `dir`, creating it when needed.
///
/// # Errors
///
/// Returns [`ArtifactError`] when serialization or any write fails.
pub fn write_report(dir: &Path, report: &SuiteReport) -> Result<ReportPaths, ArtifactError> {
    fs::create_dir_all(dir).map_err(|err| io_error(dir, &err))?;
    let json = dir.join(REPORT_JSON);
    let bytes = serde_jcs::to_vec(report).map_err(|err| ArtifactError::Serialize(err.to_string()))?;
    fs::write(&json, bytes).map_err(|err| io_error(&json, &err))?;
    let markdown = dir.join(REPORT_MARKDOWN);
    fs::write(&markdown, report.to_markdown()).map_err(|err| io_error(&markdown, &err))?;
    Ok(ReportPaths {
        json,
        markdown,
    })
}

/// Renders one scenario result as a single line.
#[must_use]
pub fn result_line(result: &TestResult) -> String {
    let tag = match (result.outcome, result.known_bug) {
        (Outcome::Passed, _) => "PASS",
        (Outcome::Inconclusive, _) => "INCONCLUSIVE",
        (Outcome::Failed, Some(_)) => "KNOWN-BUG",
        (Outcome::Failed, None) => "FAIL",
    };
    let mut line = format!("{tag:<12} {} ({} ms)", result.scenario_id, result.duration_ms);
    if let Some(failure) = &result.failure {
        line.push_str(&format!(" step {} [{}]", failure.index, failure.label));
        if let Some(bug) = result.known_bug {
            line.push_str(&format!(" {}", bug.reference()));
        }
        line.push_str(": ");
        line.push_str(&failure.violation.detail.replace('\n', " "));
    }
    line
}

/// Renders report totals as a single line.
#[must_use]
pub fn totals_line(totals: &ReportTotals) -> String {
    format!(
        "total {} | passed {} | failed {} | known bugs {} | inconclusive {}",
        totals.total, totals.passed, totals.failed, totals.known_bug_failures, totals.inconclusive
    )
}

/// Maps an I/O failure to an artifact error.
fn io_error(path: &Path, err: &std::io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.display().to_string(),
        detail: err.to_string(),
    }
}
