// system-tests/tests/loopback.rs
// ============================================================================
// Module: Loopback Suite
// Description: Aggregates loopback system tests into one binary.
// Purpose: Run the full catalog over real HTTP against a local service.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates loopback system tests into one binary.
//! Invariants:
//! - The faithful service passes every catalog scenario over HTTP.
//! - The defect-reproducing service fails exactly the tracked scenarios.

mod helpers;

#[path = "suites/loopback_catalog.rs"]
mod loopback_catalog;
