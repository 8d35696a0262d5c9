// crates/listing-conformance-core/tests/audit_sinks.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Tests for JSON-line audit output.
// ============================================================================
//! ## Overview
//! Validates that file sinks append one JSON object per event and that the
//! event payload is flattened with a snake-case `event` tag.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use listing_conformance_core::Endpoint;
use listing_conformance_core::FileAuditSink;
use listing_conformance_core::HarnessAuditEvent;
use listing_conformance_core::HarnessAuditSink;
use listing_conformance_core::MemoryAuditSink;
use listing_conformance_core::ScenarioId;
use listing_conformance_core::runtime::AuditEventKind;
use serde_json::Value;

fn request_event(step: usize) -> HarnessAuditEvent {
    HarnessAuditEvent::new(
        &ScenarioId::new("get_item.audit"),
        AuditEventKind::RequestCompleted {
            step,
            endpoint: Endpoint::GetItem,
            status: Some(404),
            elapsed_ms: 3,
            transport_error: None,
        },
    )
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).unwrap();
    sink.record(&request_event(0));
    sink.record(&request_event(1));
    drop(sink);

    let reopened = FileAuditSink::new(&path).unwrap();
    reopened.record(&request_event(2));
    drop(reopened);

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    for (index, line) in lines.iter().enumerate() {
        let value: Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["event"], "request_completed");
        assert_eq!(value["scenario_id"], "get_item.audit");
        assert_eq!(value["step"], index);
        assert_eq!(value["endpoint"], "get_item");
        assert_eq!(value["status"], 404);
        assert!(value["timestamp_ms"].as_u64().unwrap() > 0);
    }
}

#[test]
fn file_sink_reports_unopenable_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("audit.jsonl");
    assert!(FileAuditSink::new(&path).is_err());
}

#[test]
fn memory_sink_keeps_arrival_order() {
    let sink = MemoryAuditSink::new();
    for step in 0 .. 4 {
        sink.record(&request_event(step));
    }
    let steps = sink
        .events()
        .into_iter()
        .map(|event| match event.kind {
            AuditEventKind::RequestCompleted {
                step,
                ..
            } => step,
            other => panic!("unexpected event {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(steps, vec![0, 1, 2, 3]);
}

#[test]
fn finished_event_serializes_bug_reference() {
    let event = HarnessAuditEvent::new(
        &ScenarioId::new("item_creation.negative_price"),
        AuditEventKind::ScenarioFinished {
            outcome: "failed",
            known_bug: Some("KB-001"),
            duration_ms: 12,
        },
    );
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "scenario_finished");
    assert_eq!(value["known_bug"], "KB-001");
    assert_eq!(value["outcome"], "failed");
}
