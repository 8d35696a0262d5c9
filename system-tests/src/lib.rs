// system-tests/src/lib.rs
// ============================================================================
// Module: Listing Conformance System Tests Library
// Description: Shared configuration for system test binaries.
// Purpose: Provide typed environment settings for live and loopback suites.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. The `loopback` binary serves the in-memory service over
//! real HTTP; the `live` binary targets a deployed listing service.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
