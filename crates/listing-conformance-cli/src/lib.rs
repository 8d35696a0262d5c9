// crates/listing-conformance-cli/src/lib.rs
// ============================================================================
// Module: Listing Conformance CLI Library
// Description: Scenario selection and report artifacts for the CLI.
// Purpose: Keep command helpers testable outside the binary.
// Dependencies: listing-conformance-core, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! Helpers shared by the `listing-conformance` binary: resolving which catalog
//! scenarios a run covers and writing the JSON and Markdown reports.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifacts;
pub mod selection;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use artifacts::ArtifactError;
pub use artifacts::ReportPaths;
pub use artifacts::result_line;
pub use artifacts::totals_line;
pub use artifacts::write_report;
pub use selection::SelectionError;
pub use selection::select_scenarios;
