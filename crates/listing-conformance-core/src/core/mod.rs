// crates/listing-conformance-core/src/core/mod.rs
// ============================================================================
// Module: Listing Conformance Core Types
// Description: Data model, fixtures, identifiers, and verdicts.
// Purpose: Provide stable, serializable types shared by the oracle and runner.
// Dependencies: rand, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what the listing service stores, what the harness sends
//! it, and how observations are judged. They carry no I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod fixtures;
pub mod identifiers;
pub mod model;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fixtures::AdversarialKind;
pub use fixtures::BoundaryCase;
pub use fixtures::Fixture;
pub use fixtures::FixtureClass;
pub use fixtures::FixtureError;
pub use fixtures::FixtureGenerator;
pub use fixtures::FixtureKind;
pub use fixtures::FixtureOverrides;
pub use fixtures::FixturePayload;
pub use fixtures::PayloadField;
pub use fixtures::SellerIdCase;
pub use identifiers::ScenarioId;
pub use identifiers::SlotId;
pub use model::ITEM_FIELDS;
pub use model::Item;
pub use model::ItemDraft;
pub use model::SELLER_ID_MAX;
pub use model::SELLER_ID_MIN;
pub use model::STATISTICS_FIELDS;
pub use model::Statistics;
pub use model::extract_item_id;
pub use model::inspect_item;
pub use model::inspect_statistics;
pub use verdict::KnownBug;
pub use verdict::ResponseClass;
pub use verdict::StatusExpectation;
pub use verdict::Verdict;
pub use verdict::Violation;
pub use verdict::ViolationKind;
