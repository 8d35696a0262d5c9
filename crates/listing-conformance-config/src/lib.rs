// crates/listing-conformance-config/src/lib.rs
// ============================================================================
// Module: Listing Conformance Config Library
// Description: Harness configuration model and validation.
// Purpose: Single source of truth for listing-conformance.toml semantics.
// Dependencies: listing-conformance-core, listing-conformance-gateway, serde, toml
// ============================================================================

//! ## Overview
//! `listing-conformance-config` loads the harness TOML file, applies
//! environment overrides and validates the result. Invalid input fails closed;
//! a valid config converts directly into gateway and runner settings.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
