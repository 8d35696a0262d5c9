// system-tests/tests/live.rs
// ============================================================================
// Module: Live Suite
// Description: Aggregates live-service system tests into one binary.
// Purpose: Run each catalog suite against the configured listing service.
// Dependencies: suites/*, helpers
// ============================================================================

//! ## Overview
//! Aggregates live-service system tests into one binary. The target comes
//! from `listing-conformance.toml` and the `LISTING_CONFORMANCE_*` overrides,
//! then from the `LISTING_CONFORMANCE_SYSTEM_TEST_*` variables.
//! Invariants:
//! - Every suite writes `report.json` and `report.md`, pass or fail.
//! - Tracked-defect failures only fail a suite in strict mode.

mod helpers;

#[path = "suites/live_catalog.rs"]
mod live_catalog;
