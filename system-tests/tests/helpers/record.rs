// system-tests/tests/helpers/record.rs
// ============================================================================
// Module: Run Records
// Description: Per-run artifact directory and scenario outcome record.
// Purpose: Leave a readable trace of every loopback and live run.
// Dependencies: listing-conformance-core, system-tests, serde, serde_jcs
// ============================================================================

//! ## Overview
//! A [`RunRecorder`] owns the artifact directory of one system-test run. It
//! stores the suite report, the audit trail and a `run.json` / `run.md`
//! record listing each scenario outcome next to the run totals. When a test
//! ends without recording, dropping the recorder still writes a record marked
//! `panicked` or `abandoned`.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use listing_conformance_core::HarnessAuditEvent;
use listing_conformance_core::KnownBug;
use listing_conformance_core::Outcome;
use listing_conformance_core::SuiteReport;
use listing_conformance_core::runtime::ReportTotals;
use serde::Serialize;
use system_tests::config::SystemTestConfig;

// ============================================================================
// SECTION: Record Types
// ============================================================================

/// How a recorded run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Nothing failed.
    Passed,
    /// Only tracked defects failed.
    TrackedDefects,
    /// A scenario or check failed outright.
    Failed,
    /// The test panicked before recording.
    Panicked,
    /// The test returned before recording.
    Abandoned,
}

impl RunStatus {
    /// Derives the status of a suite report.
    pub const fn of_report(report: &SuiteReport) -> Self {
        if report.totals.failed > 0 {
            Self::Failed
        } else if report.totals.known_bug_failures > 0 {
            Self::TrackedDefects
        } else {
            Self::Passed
        }
    }

    /// Returns a stable label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::TrackedDefects => "tracked_defects",
            Self::Failed => "failed",
            Self::Panicked => "panicked",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Outcome line of one scenario.
#[derive(Debug, Clone, Serialize)]
struct ScenarioLine {
    /// Scenario identifier.
    id: String,
    /// Scenario outcome.
    outcome: Outcome,
    /// Tracked defect behind a failure.
    known_bug: Option<KnownBug>,
    /// Violation detail of a failure.
    detail: Option<String>,
}

/// Serialized run record.
#[derive(Debug, Serialize)]
struct RunRecord {
    /// Run name, also the artifact directory name.
    name: String,
    /// Service base URL, once a report was recorded.
    target: Option<String>,
    /// Final status.
    status: RunStatus,
    /// Start time in milliseconds since the epoch.
    started_at_ms: u64,
    /// Wall-clock duration.
    duration_ms: u64,
    /// Report totals, once a report was recorded.
    totals: Option<ReportTotals>,
    /// Scenario outcomes in run order.
    scenarios: Vec<ScenarioLine>,
    /// Failed direct checks.
    failed_checks: Vec<String>,
    /// Files written next to the record.
    artifacts: Vec<String>,
}

fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Recorder
// ============================================================================

/// Artifact directory and record of one system-test run.
pub struct RunRecorder {
    /// Artifact directory.
    root: PathBuf,
    /// Record written on finish.
    record: RunRecord,
    /// Whether the record was written.
    finished: bool,
}

impl RunRecorder {
    /// Creates the artifact directory for the named run.
    ///
    /// The directory is `<run root>/<name>` when a run root is configured and
    /// `target/system-tests/run_<millis>/<name>` otherwise.
    pub fn new(name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let started_at_ms = now_millis();
        let root = config
            .run_root
            .unwrap_or_else(|| PathBuf::from("target/system-tests").join(format!("run_{started_at_ms}")))
            .join(name);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            record: RunRecord {
                name: name.to_string(),
                target: None,
                status: RunStatus::Abandoned,
                started_at_ms,
                duration_ms: 0,
                totals: None,
                scenarios: Vec::new(),
                failed_checks: Vec::new(),
                artifacts: Vec::new(),
            },
            finished: false,
        })
    }

    /// Returns the artifact directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores a suite report with its audit trail and writes the run record.
    pub fn record_report(
        &mut self,
        report: &SuiteReport,
        audit: &[HarnessAuditEvent],
    ) -> io::Result<RunStatus> {
        self.write_json("report.json", report)?;
        self.write_text("report.md", &report.to_markdown())?;
        self.write_json("audit.json", &audit)?;
        self.record.target = Some(report.target.clone());
        self.record.totals = Some(report.totals);
        self.record.scenarios = report
            .results
            .iter()
            .map(|result| ScenarioLine {
                id: result.scenario_id.to_string(),
                outcome: result.outcome,
                known_bug: result.known_bug,
                detail: result.failure.as_ref().map(|failure| failure.violation.detail.clone()),
            })
            .collect();
        let status = RunStatus::of_report(report);
        self.finish(status)?;
        Ok(status)
    }

    /// Writes the run record for a test made of direct checks.
    pub fn record_checks(&mut self, failed_checks: Vec<String>) -> io::Result<RunStatus> {
        let status = if failed_checks.is_empty() { RunStatus::Passed } else { RunStatus::Failed };
        self.record.failed_checks = failed_checks;
        self.finish(status)?;
        Ok(status)
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    fn write_json<T: Serialize>(&mut self, name: &str, value: &T) -> io::Result<()> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(self.root.join(name), bytes)?;
        self.record.artifacts.push(name.to_string());
        Ok(())
    }

    /// Writes a UTF-8 text artifact.
    fn write_text(&mut self, name: &str, value: &str) -> io::Result<()> {
        fs::write(self.root.join(name), value.as_bytes())?;
        self.record.artifacts.push(name.to_string());
        Ok(())
    }

    /// Writes `run.json` and `run.md` with the final status.
    fn finish(&mut self, status: RunStatus) -> io::Result<()> {
        self.record.status = status;
        self.record.duration_ms = now_millis().saturating_sub(self.record.started_at_ms);
        let bytes =
            serde_jcs::to_vec(&self.record).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(self.root.join("run.json"), bytes)?;
        fs::write(self.root.join("run.md"), run_markdown(&self.record))?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for RunRecorder {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let status =
            if std::thread::panicking() { RunStatus::Panicked } else { RunStatus::Abandoned };
        let _ = self.finish(status);
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

fn run_markdown(record: &RunRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Conformance Run `{}`\n", record.name);
    let _ = writeln!(out, "- Status: {}", record.status.as_str());
    if let Some(target) = &record.target {
        let _ = writeln!(out, "- Target: `{target}`");
    }
    let _ = writeln!(out, "- Duration (ms): {}", record.duration_ms);
    if let Some(totals) = record.totals {
        let _ = writeln!(
            out,
            "- Totals: {} run, {} passed, {} failed, {} tracked defects, {} inconclusive",
            totals.total, totals.passed, totals.failed, totals.known_bug_failures, totals.inconclusive
        );
    }
    let flagged = record
        .scenarios
        .iter()
        .filter(|line| line.outcome != Outcome::Passed)
        .collect::<Vec<_>>();
    if !flagged.is_empty() {
        let _ = writeln!(out, "\n## Not Passed\n");
        for line in flagged {
            let tracked = line.known_bug.map(|bug| format!(" [{}]", bug.reference())).unwrap_or_default();
            let detail = line.detail.as_deref().unwrap_or("");
            let _ = writeln!(out, "- `{}` {}{tracked} {detail}", line.id, line.outcome.as_str());
        }
    }
    if !record.failed_checks.is_empty() {
        let _ = writeln!(out, "\n## Failed Checks\n");
        for check in &record.failed_checks {
            let _ = writeln!(out, "- {check}");
        }
    }
    if !record.artifacts.is_empty() {
        let _ = writeln!(out, "\n## Artifacts\n");
        for artifact in &record.artifacts {
            let _ = writeln!(out, "- {artifact}");
        }
    }
    out
}
