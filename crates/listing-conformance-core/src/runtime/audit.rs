// crates/listing-conformance-core/src/runtime/audit.rs
// ============================================================================
// Module: Harness Audit Logging
// Description: Structured audit events for scenario execution.
// Purpose: Emit JSON-line run logs without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The runner reports every scenario start, HTTP exchange, step verdict,
//! scenario outcome and teardown failure to a [`HarnessAuditSink`]. Sinks write
//! one JSON object per line so runs can be replayed or grepped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::identifiers::ScenarioId;
use crate::interfaces::Endpoint;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessAuditEvent {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Scenario the event belongs to.
    pub scenario_id: ScenarioId,
    /// Event-specific fields.
    #[serde(flatten)]
    pub kind: AuditEventKind,
}

/// Event-specific audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A scenario began.
    ScenarioStarted {
        /// Suite label.
        suite: &'static str,
        /// Scenario title.
        title: String,
    },
    /// An HTTP exchange finished (or failed at the transport level).
    RequestCompleted {
        /// Zero-based step index.
        step: usize,
        /// Endpoint called.
        endpoint: Endpoint,
        /// HTTP status when a response was obtained.
        status: Option<u16>,
        /// Elapsed milliseconds.
        elapsed_ms: u64,
        /// Transport failure label when no response was obtained.
        transport_error: Option<String>,
    },
    /// A step was judged.
    StepEvaluated {
        /// Zero-based step index.
        step: usize,
        /// Step label.
        label: String,
        /// Verdict label.
        verdict: &'static str,
        /// Verdict detail.
        detail: Option<String>,
    },
    /// A scenario finished.
    ScenarioFinished {
        /// Outcome label.
        outcome: &'static str,
        /// Bug reference when the failure is a tracked defect.
        known_bug: Option<&'static str>,
        /// Scenario duration in milliseconds.
        duration_ms: u64,
    },
    /// A teardown delete did not succeed.
    TeardownFailed {
        /// Item identifier that could not be deleted.
        item_id: String,
        /// Failure detail.
        detail: String,
    },
}

impl HarnessAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(scenario_id: &ScenarioId, kind: AuditEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            scenario_id: scenario_id.clone(),
            kind,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for harness events.
pub trait HarnessAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &HarnessAuditEvent);
}

impl<S: HarnessAuditSink + ?Sized> HarnessAuditSink for Arc<S> {
    fn record(&self, event: &HarnessAuditEvent) {
        (**self).record(event);
    }
}

impl<S: HarnessAuditSink + ?Sized> HarnessAuditSink for Box<S> {
    fn record(&self, event: &HarnessAuditEvent) {
        (**self).record(event);
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl HarnessAuditSink for StderrAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl HarnessAuditSink for FileAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl HarnessAuditSink for NoopAuditSink {
    fn record(&self, _event: &HarnessAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<HarnessAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<HarnessAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl HarnessAuditSink for MemoryAuditSink {
    fn record(&self, event: &HarnessAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
