// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for listing conformance system-tests.
// Purpose: Provide loopback services, run harnesses, and run records.
// Dependencies: system-tests, listing-conformance-core, listing-conformance-gateway
// ============================================================================

//! ## Overview
//! Shared helpers for listing conformance system-tests.
//! Invariants:
//! - Every run writes a run record, pass, fail or panic.
//! - Loopback services are torn down when their handle drops.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod harness;
pub mod loopback;
pub mod record;
