// crates/listing-conformance-core/src/runtime/catalog.rs
// ============================================================================
// Module: Scenario Catalog
// Description: Declarative conformance scenarios grouped by suite.
// Purpose: Encode the listing service test plan as data the runner executes.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Every check the harness knows is a [`Scenario`] built here. Identifiers are
//! `<suite>.<case>` and stable across releases so reports and CI filters can
//! refer to them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::fixtures::AdversarialKind;
use crate::core::fixtures::BoundaryCase;
use crate::core::fixtures::FixtureKind;
use crate::core::fixtures::PayloadField;
use crate::core::fixtures::SellerIdCase;
use crate::core::identifiers::SlotId;
use crate::core::verdict::KnownBug;
use crate::interfaces::Endpoint;
use crate::runtime::runner::Budget;
use crate::runtime::runner::Scenario;
use crate::runtime::runner::SellerRef;
use crate::runtime::runner::Step;
use crate::runtime::runner::Suite;
use crate::runtime::runner::Target;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Returns every scenario in catalog order.
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    Suite::ALL.into_iter().flat_map(suite).collect()
}

/// Returns the scenarios of one suite.
#[must_use]
pub fn suite(suite: Suite) -> Vec<Scenario> {
    match suite {
        Suite::ItemCreation => item_creation(),
        Suite::GetItem => get_item(),
        Suite::SellerItems => seller_items(),
        Suite::Statistics => statistics(),
    }
}

/// Finds a scenario by identifier.
#[must_use]
pub fn find(id: &str) -> Option<Scenario> {
    scenarios().into_iter().find(|scenario| scenario.id.as_str() == id)
}

// ============================================================================
// SECTION: Item Creation
// ============================================================================

/// Create-item contract scenarios.
fn item_creation() -> Vec<Scenario> {
    let s = Suite::ItemCreation;
    let mut out = vec![Scenario::new(
        s,
        "valid_item",
        "valid item is created with a full item body",
        vec![probe_create(FixtureKind::ValidItem)],
    )];
    for field in PayloadField::ALL {
        out.push(Scenario::new(
            s,
            &format!("missing_{}", field_case(field)),
            &format!("omitting {} is rejected with 400", field.wire_name()),
            vec![probe_create(FixtureKind::MissingField(field))],
        ));
    }
    for field in PayloadField::ALL {
        out.push(Scenario::new(
            s,
            &format!("mistyped_{}", field_case(field)),
            &format!("wrongly typed {} is rejected with 400", field.wire_name()),
            vec![probe_create(FixtureKind::TypeMismatch(field))],
        ));
    }
    out.extend([
        Scenario::new(
            s,
            "negative_price",
            "negative price is rejected with 400",
            vec![probe_create(FixtureKind::KnownBug(KnownBug::NegativePrice))],
        ),
        Scenario::new(
            s,
            "minimal_price",
            "price 1 is accepted",
            vec![probe_create(FixtureKind::Boundary(BoundaryCase::PriceMin))],
        ),
        Scenario::new(
            s,
            "zero_price",
            "price 0 is rejected with 400",
            vec![probe_create(FixtureKind::Boundary(BoundaryCase::PriceZero))],
        ),
        Scenario::new(
            s,
            "boundary_seller_ids",
            "seller ids 111111 and 999999 are accepted",
            vec![
                probe_create(FixtureKind::Boundary(BoundaryCase::SellerIdMin)),
                probe_create(FixtureKind::Boundary(BoundaryCase::SellerIdMax)),
            ],
        ),
        Scenario::new(
            s,
            "out_of_range_seller_ids",
            "seller ids 111110 and 1000000 are rejected with 400",
            vec![
                probe_create(FixtureKind::Boundary(BoundaryCase::SellerIdBelowMin)),
                probe_create(FixtureKind::Boundary(BoundaryCase::SellerIdAboveMax)),
            ],
        ),
        Scenario::new(
            s,
            "empty_name",
            "empty name is rejected with 400",
            vec![probe_create(FixtureKind::Boundary(BoundaryCase::EmptyName))],
        ),
        Scenario::new(
            s,
            "negative_statistics",
            "negative statistics are rejected with 400",
            vec![probe_create(FixtureKind::KnownBug(KnownBug::NegativeStatistics))],
        ),
        Scenario::new(
            s,
            "zero_statistics",
            "all-zero statistics are accepted",
            vec![probe_create(FixtureKind::Boundary(BoundaryCase::ZeroStatistics))],
        ),
        Scenario::new(
            s,
            "two_items_same_seller",
            "one seller can own several items",
            vec![
                create_numbered("first", 1),
                create_numbered("second", 2),
                list_scenario_seller(&["first", "second"], 2),
            ],
        ),
        Scenario::new(
            s,
            "create_then_get",
            "a created item is readable with the submitted fields",
            vec![create("item", FixtureKind::ValidItem), get("item")],
        ),
        Scenario::new(
            s,
            "max_int32_values",
            "price and counters at the 32-bit maximum are accepted",
            vec![probe_create(FixtureKind::Boundary(BoundaryCase::MaxValues))],
        ),
        Scenario::new(
            s,
            "special_characters_name",
            "a name with punctuation and Cyrillic is accepted",
            vec![probe_create(FixtureKind::AdversarialName(AdversarialKind::SpecialCharacters))],
        ),
        Scenario::new(
            s,
            "unicode_name",
            "a name with emoji is accepted",
            vec![probe_create(FixtureKind::AdversarialName(AdversarialKind::Unicode))],
        ),
        Scenario::new(
            s,
            "all_fields_mistyped",
            "a body with every field wrongly typed is rejected with 400",
            vec![probe_create(FixtureKind::AllFieldsMistyped)],
        ),
        Scenario::new(
            s,
            "extra_field",
            "an undocumented field is tolerated or rejected, never a 5xx",
            vec![probe_create(FixtureKind::ExtraField)],
        ),
        Scenario::new(
            s,
            "oversize_name",
            "a 1000-character name is accepted or rejected, never a 5xx",
            vec![probe_create(FixtureKind::Boundary(BoundaryCase::OversizeName))],
        ),
        Scenario::new(
            s,
            "sql_injection_name",
            "a SQL injection name is stored verbatim",
            vec![
                create("item", FixtureKind::AdversarialName(AdversarialKind::SqlInjection)),
                get("item"),
            ],
        ),
        Scenario::new(
            s,
            "script_name",
            "a script-tag name is stored verbatim",
            vec![
                create("item", FixtureKind::AdversarialName(AdversarialKind::ScriptTag)),
                get("item"),
            ],
        ),
        Scenario::new(
            s,
            "concrete_seller_500000",
            "seller 500000 with price 9900 round-trips",
            vec![
                Step::Create {
                    kind: FixtureKind::ValidItem,
                    seller: SellerRef::Fixed(500_000),
                    item_number: None,
                    slot: Some(slot("item")),
                },
                get("item"),
            ],
        ),
    ]);
    out
}

// ============================================================================
// SECTION: Get Item
// ============================================================================

/// Get-item contract scenarios.
fn get_item() -> Vec<Scenario> {
    let s = Suite::GetItem;
    vec![
        Scenario::new(
            s,
            "existing_item",
            "an existing item is returned with the submitted fields",
            vec![create("item", FixtureKind::ValidItem), get("item")],
        ),
        Scenario::new(
            s,
            "not_found",
            "unknown ids answer 404 with a result/status envelope",
            vec![variants(Endpoint::GetItem, FixtureKind::UnknownItemId)],
        ),
        Scenario::new(
            s,
            "empty_id",
            "an empty id answers 400 or 404",
            vec![probe(Endpoint::GetItem, Target::Fixture(malformed(AdversarialKind::Empty)))],
        ),
        Scenario::new(
            s,
            "special_character_ids",
            "ids with punctuation answer 400 or 404",
            vec![variants(Endpoint::GetItem, malformed(AdversarialKind::SpecialCharacters))],
        ),
        Scenario::new(
            s,
            "sql_injection_id",
            "SQL injection ids answer 400 or 404",
            vec![variants(Endpoint::GetItem, malformed(AdversarialKind::SqlInjection))],
        ),
        Scenario::new(
            s,
            "script_id",
            "script-tag ids answer 400 or 404",
            vec![variants(Endpoint::GetItem, malformed(AdversarialKind::ScriptTag))],
        ),
        Scenario::new(
            s,
            "long_id",
            "oversize ids answer 400 or 404",
            vec![variants(Endpoint::GetItem, malformed(AdversarialKind::Oversize))],
        ),
        Scenario::new(
            s,
            "numeric_id",
            "numeric-looking ids answer 400 or 404",
            vec![variants(Endpoint::GetItem, malformed(AdversarialKind::NumericLike))],
        ),
        Scenario::new(
            s,
            "response_types",
            "every item field has its documented JSON type",
            vec![create("item", FixtureKind::Boundary(BoundaryCase::MaxValues)), get("item")],
        ),
        Scenario::new(
            s,
            "data_consistency",
            "zero statistics survive the round trip",
            vec![create("item", FixtureKind::Boundary(BoundaryCase::ZeroStatistics)), get("item")],
        ),
        Scenario::new(
            s,
            "repeated_reads",
            "consecutive reads return the same item",
            vec![
                create("item", FixtureKind::ValidItem),
                Step::RepeatedReads {
                    slot: slot("item"),
                    count: None,
                },
            ],
        ),
        Scenario::new(
            s,
            "created_at_present",
            "a read item carries createdAt",
            vec![create("item", FixtureKind::Boundary(BoundaryCase::PriceMin)), get("item")],
        ),
        Scenario::new(
            s,
            "boundary_literal_ids",
            "keyword, whitespace and numeric literal ids answer 400 or 404",
            vec![
                variants(Endpoint::GetItem, malformed(AdversarialKind::Keyword)),
                variants(Endpoint::GetItem, malformed(AdversarialKind::Whitespace)),
                variants(Endpoint::GetItem, malformed(AdversarialKind::Empty)),
            ],
        ),
        Scenario::new(
            s,
            "response_time",
            "get-item answers within the default budget",
            vec![
                create("item", FixtureKind::ValidItem),
                Step::Timed {
                    endpoint: Endpoint::GetItem,
                    target: Target::Slot(slot("item")),
                    budget: Budget::Default,
                },
            ],
        ),
        Scenario::new(
            s,
            "back_to_back_reads",
            "five back-to-back reads all succeed identically",
            vec![
                create("item", FixtureKind::ValidItem),
                Step::RepeatedReads {
                    slot: slot("item"),
                    count: Some(5),
                },
            ],
        ),
        Scenario::new(
            s,
            "no_server_error_for_odd_ids",
            "odd ids never produce a 5xx",
            vec![
                variants(Endpoint::GetItem, malformed(AdversarialKind::Freeform)),
                variants(Endpoint::GetItem, malformed(AdversarialKind::ControlCharacter)),
                variants(Endpoint::GetItem, malformed(AdversarialKind::Unicode)),
                variants(Endpoint::GetItem, malformed(AdversarialKind::PathTraversal)),
            ],
        ),
        Scenario::new(
            s,
            "deletion_is_terminal",
            "after delete, get-item and both statistics versions answer 404",
            vec![
                create("item", FixtureKind::ValidItem),
                Step::Delete {
                    slot: slot("item"),
                },
                get("item"),
                probe(Endpoint::StatisticsV1, Target::Slot(slot("item"))),
                probe(Endpoint::StatisticsV2, Target::Slot(slot("item"))),
            ],
        ),
    ]
}

// ============================================================================
// SECTION: Seller Items
// ============================================================================

/// Seller listing contract scenarios.
fn seller_items() -> Vec<Scenario> {
    let s = Suite::SellerItems;
    vec![
        Scenario::new(
            s,
            "listing_with_items",
            "a seller listing contains the seller's created items",
            vec![
                create_numbered("first", 1),
                create_numbered("second", 2),
                list_scenario_seller(&["first", "second"], 2),
            ],
        ),
        Scenario::new(
            s,
            "empty_seller",
            "a seller without items answers 200 with a list",
            vec![probe(Endpoint::ListSellerItems, Target::Seller(SellerRef::Random))],
        ),
        Scenario::new(
            s,
            "below_range_seller",
            "a seller below the documented range answers 200 or 404",
            vec![probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::BelowRange))],
        ),
        Scenario::new(
            s,
            "boundary_sellers",
            "sellers 111111 and 999999 answer 200 with a list",
            vec![
                probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::Min)),
                probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::Max)),
            ],
        ),
        Scenario::new(
            s,
            "out_of_range_sellers",
            "sellers 111110 and 1000000 answer 400 or 404",
            vec![
                probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::BelowMin)),
                probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::AboveMax)),
            ],
        ),
        Scenario::new(
            s,
            "invalid_formats",
            "non-numeric seller ids answer 400 or 404",
            vec![
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::Freeform)),
                variants(
                    Endpoint::ListSellerItems,
                    malformed_seller(AdversarialKind::SpecialCharacters),
                ),
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::Empty)),
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::Whitespace)),
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::Keyword)),
            ],
        ),
        Scenario::new(
            s,
            "injection_strings",
            "injection seller ids answer 400 or 404",
            vec![
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::SqlInjection)),
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::ScriptTag)),
                variants(
                    Endpoint::ListSellerItems,
                    malformed_seller(AdversarialKind::PathTraversal),
                ),
                variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::Oversize)),
            ],
        ),
        Scenario::new(
            s,
            "response_types",
            "listed items carry every field with its documented type",
            vec![create_numbered("item", 1), list_scenario_seller(&["item"], 1)],
        ),
        Scenario::new(
            s,
            "data_consistency",
            "listed items match the submitted fields",
            vec![
                Step::Create {
                    kind: FixtureKind::Boundary(BoundaryCase::ZeroStatistics),
                    seller: SellerRef::Scenario,
                    item_number: None,
                    slot: Some(slot("item")),
                },
                list_scenario_seller(&["item"], 1),
            ],
        ),
        Scenario::new(
            s,
            "seller_isolation",
            "a listing never contains another seller's items",
            vec![
                create_numbered("mine", 1),
                create("other", FixtureKind::ValidItem),
                list_scenario_seller(&["mine"], 1),
            ],
        ),
        Scenario::new(
            s,
            "ordering_created_at",
            "every listed item carries createdAt",
            vec![
                create_numbered("first", 1),
                create_numbered("second", 2),
                create_numbered("third", 3),
                list_scenario_seller(&["first", "second", "third"], 3),
            ],
        ),
        Scenario::new(
            s,
            "response_time",
            "seller listing answers within the listing budget",
            vec![
                create_numbered("item", 1),
                Step::Timed {
                    endpoint: Endpoint::ListSellerItems,
                    target: Target::Seller(SellerRef::Scenario),
                    budget: Budget::Listing,
                },
            ],
        ),
        Scenario::new(
            s,
            "many_items",
            "a seller with five items lists all of them",
            vec![
                create_numbered("one", 1),
                create_numbered("two", 2),
                create_numbered("three", 3),
                create_numbered("four", 4),
                create_numbered("five", 5),
                list_scenario_seller(&["one", "two", "three", "four", "five"], 5),
            ],
        ),
        Scenario::new(
            s,
            "very_large_seller",
            "a ten-digit seller id answers 200, 400 or 404",
            vec![probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::VeryLarge))],
        ),
        Scenario::new(
            s,
            "negative_seller",
            "a negative seller id answers 400 or 404",
            vec![probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::Negative))],
        ),
        Scenario::new(
            s,
            "zero_seller",
            "seller id 0 answers 200, 400 or 404",
            vec![probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::Zero))],
        ),
        Scenario::new(
            s,
            "fractional_seller",
            "a fractional seller id answers 400 or 404",
            vec![probe(Endpoint::ListSellerItems, seller_case(SellerIdCase::Fractional))],
        ),
        Scenario::new(
            s,
            "emoji_seller",
            "a non-ASCII seller id answers 400 or 404",
            vec![variants(Endpoint::ListSellerItems, malformed_seller(AdversarialKind::Unicode))],
        ),
    ]
}

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Statistics v1/v2 contract scenarios.
fn statistics() -> Vec<Scenario> {
    let s = Suite::Statistics;
    let mut out = Vec::new();
    for (endpoint, version) in [(Endpoint::StatisticsV1, "v1"), (Endpoint::StatisticsV2, "v2")] {
        out.extend([
            Scenario::new(
                s,
                &format!("{version}_existing"),
                &format!("{version} returns the submitted statistics"),
                vec![create("item", FixtureKind::ValidItem), probe(endpoint, Target::Slot(slot("item")))],
            ),
            Scenario::new(
                s,
                &format!("{version}_not_found"),
                &format!("{version} answers 404 for an unknown id"),
                vec![probe(endpoint, Target::Fixture(FixtureKind::UnknownItemId))],
            ),
            Scenario::new(
                s,
                &format!("{version}_invalid_ids"),
                &format!("{version} answers 400 or 404 for malformed ids"),
                vec![
                    variants(endpoint, malformed(AdversarialKind::Freeform)),
                    variants(endpoint, malformed(AdversarialKind::NumericLike)),
                    variants(endpoint, malformed(AdversarialKind::Whitespace)),
                    variants(endpoint, malformed(AdversarialKind::Empty)),
                ],
            ),
            Scenario::new(
                s,
                &format!("{version}_special_characters"),
                &format!("{version} answers 400 or 404 for punctuation ids"),
                vec![variants(endpoint, malformed(AdversarialKind::SpecialCharacters))],
            ),
            Scenario::new(
                s,
                &format!("{version}_sql_injection"),
                &format!("{version} answers 400 or 404 for SQL injection ids"),
                vec![variants(endpoint, malformed(AdversarialKind::SqlInjection))],
            ),
            Scenario::new(
                s,
                &format!("{version}_script"),
                &format!("{version} answers 400 or 404 for script-tag ids"),
                vec![variants(endpoint, malformed(AdversarialKind::ScriptTag))],
            ),
            Scenario::new(
                s,
                &format!("{version}_long_id"),
                &format!("{version} answers 400 or 404 for oversize ids"),
                vec![variants(endpoint, malformed(AdversarialKind::Oversize))],
            ),
            Scenario::new(
                s,
                &format!("{version}_response_structure"),
                &format!("{version} entries carry integer likes, viewCount and contacts"),
                vec![
                    create("item", FixtureKind::Boundary(BoundaryCase::ZeroStatistics)),
                    probe(endpoint, Target::Slot(slot("item"))),
                ],
            ),
            Scenario::new(
                s,
                &format!("{version}_data_consistency"),
                &format!("{version} returns maximal counters unchanged"),
                vec![
                    create("item", FixtureKind::Boundary(BoundaryCase::MaxValues)),
                    probe(endpoint, Target::Slot(slot("item"))),
                ],
            ),
            Scenario::new(
                s,
                &format!("{version}_response_time"),
                &format!("{version} answers within the default budget"),
                vec![
                    create("item", FixtureKind::ValidItem),
                    Step::Timed {
                        endpoint,
                        target: Target::Slot(slot("item")),
                        budget: Budget::Default,
                    },
                ],
            ),
        ]);
    }
    out.extend([
        Scenario::new(
            s,
            "v1_v2_equal",
            "v1 and v2 report identical statistics",
            vec![
                create("item", FixtureKind::ValidItem),
                Step::CompareStatistics {
                    slot: slot("item"),
                },
            ],
        ),
        Scenario::new(
            s,
            "v1_v2_error_consistency",
            "v1 and v2 both answer 4xx for invalid ids",
            vec![
                Step::CompareErrorStatuses {
                    kind: malformed(AdversarialKind::Freeform),
                },
                Step::CompareErrorStatuses {
                    kind: malformed(AdversarialKind::SpecialCharacters),
                },
                Step::CompareErrorStatuses {
                    kind: malformed(AdversarialKind::Empty),
                },
                Step::CompareErrorStatuses {
                    kind: malformed(AdversarialKind::NumericLike),
                },
            ],
        ),
        Scenario::new(
            s,
            "after_deletion",
            "statistics of a deleted item answer 404 in both versions",
            vec![
                create("item", FixtureKind::ValidItem),
                Step::Delete {
                    slot: slot("item"),
                },
                probe(Endpoint::StatisticsV1, Target::Slot(slot("item"))),
                probe(Endpoint::StatisticsV2, Target::Slot(slot("item"))),
            ],
        ),
    ]);
    out
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Slot identifier shorthand.
fn slot(name: &str) -> SlotId {
    SlotId::new(name)
}

/// Create step for a random seller.
fn create(name: &str, kind: FixtureKind) -> Step {
    Step::Create {
        kind,
        seller: SellerRef::Random,
        item_number: None,
        slot: Some(slot(name)),
    }
}

/// Create step for the scenario seller with an "Item N" name.
fn create_numbered(name: &str, number: u32) -> Step {
    Step::Create {
        kind: FixtureKind::ValidItem,
        seller: SellerRef::Scenario,
        item_number: Some(number),
        slot: Some(slot(name)),
    }
}

/// Probe of the create endpoint with a generated body.
const fn probe_create(kind: FixtureKind) -> Step {
    Step::Probe {
        endpoint: Endpoint::CreateItem,
        target: Target::Fixture(kind),
    }
}

/// Probe step shorthand.
const fn probe(endpoint: Endpoint, target: Target) -> Step {
    Step::Probe {
        endpoint,
        target,
    }
}

/// Get-item probe of a captured slot.
fn get(name: &str) -> Step {
    probe(Endpoint::GetItem, Target::Slot(slot(name)))
}

/// Variant probe shorthand.
const fn variants(endpoint: Endpoint, kind: FixtureKind) -> Step {
    Step::ProbeVariants {
        endpoint,
        kind,
    }
}

/// Listing of the scenario seller expecting the given slots.
fn list_scenario_seller(names: &[&str], min_items: usize) -> Step {
    Step::ListSeller {
        seller: SellerRef::Scenario,
        expect_slots: names.iter().map(|name| slot(name)).collect(),
        min_items,
    }
}

/// Malformed item id kind shorthand.
const fn malformed(kind: AdversarialKind) -> FixtureKind {
    FixtureKind::MalformedItemId(kind)
}

/// Malformed seller id kind shorthand.
const fn malformed_seller(kind: AdversarialKind) -> FixtureKind {
    FixtureKind::SellerId(SellerIdCase::Malformed(kind))
}

/// Seller id case target shorthand.
const fn seller_case(case: SellerIdCase) -> Target {
    Target::Fixture(FixtureKind::SellerId(case))
}

/// Scenario-id fragment for a payload field.
const fn field_case(field: PayloadField) -> &'static str {
    match field {
        PayloadField::SellerId => "seller_id",
        PayloadField::Name => "name",
        PayloadField::Price => "price",
        PayloadField::Statistics => "statistics",
    }
}
