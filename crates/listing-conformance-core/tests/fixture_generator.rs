// crates/listing-conformance-core/tests/fixture_generator.rs
// ============================================================================
// Module: Fixture Generator Tests
// Description: Tests for synthetic payloads and identifiers.
// ============================================================================
//! ## Overview
//! Validates that each fixture kind overrides exactly what it names and that
//! seeded generation is reproducible.

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

use std::collections::BTreeSet;

use listing_conformance_core::AdversarialKind;
use listing_conformance_core::BoundaryCase;
use listing_conformance_core::Fixture;
use listing_conformance_core::FixtureClass;
use listing_conformance_core::FixtureError;
use listing_conformance_core::FixtureGenerator;
use listing_conformance_core::FixtureKind;
use listing_conformance_core::FixtureOverrides;
use listing_conformance_core::ItemDraft;
use listing_conformance_core::KnownBug;
use listing_conformance_core::PayloadField;
use listing_conformance_core::SELLER_ID_MAX;
use listing_conformance_core::SELLER_ID_MIN;
use listing_conformance_core::SellerIdCase;
use listing_conformance_core::Statistics;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn body_of(fixture: &Fixture) -> &serde_json::Map<String, Value> {
    match fixture.body() {
        Some(Value::Object(map)) => map,
        other => panic!("expected object body, got {other:?}"),
    }
}

fn generate(generator: &mut FixtureGenerator, kind: FixtureKind) -> Fixture {
    generator.generate(kind, &FixtureOverrides::default()).unwrap()
}

fn unnamed_draft(fixture: Fixture) -> ItemDraft {
    let mut draft = fixture.draft.unwrap();
    draft.name.clear();
    draft
}

// ============================================================================
// SECTION: Valid Items
// ============================================================================

#[test]
fn valid_item_uses_documented_defaults() {
    let mut generator = FixtureGenerator::with_seed(1);
    let fixture = generate(&mut generator, FixtureKind::ValidItem);
    let draft = fixture.draft.clone().unwrap();
    assert!((SELLER_ID_MIN ..= SELLER_ID_MAX).contains(&draft.seller_id));
    assert_eq!(draft.price, 9900);
    assert_eq!(
        draft.statistics,
        Statistics {
            likes: 21,
            view_count: 11,
            contacts: 43,
        }
    );
    let body = body_of(&fixture);
    assert_eq!(body.get("sellerID"), Some(&json!(draft.seller_id)));
    assert_eq!(body.get("statistics"), Some(&json!({"likes": 21, "viewCount": 11, "contacts": 43})));
    assert_eq!(fixture.class(), FixtureClass::Valid);
}

#[test]
fn names_are_unique_within_a_generator() {
    let mut generator = FixtureGenerator::with_seed(2);
    let names = (0 .. 50)
        .map(|_| generate(&mut generator, FixtureKind::ValidItem).draft.unwrap().name)
        .collect::<BTreeSet<_>>();
    assert_eq!(names.len(), 50);
}

#[test]
fn seeded_generators_are_reproducible() {
    let mut first = FixtureGenerator::with_seed(7);
    let mut second = FixtureGenerator::with_seed(7);
    assert_eq!(
        generate(&mut first, FixtureKind::UnknownItemId),
        generate(&mut second, FixtureKind::UnknownItemId)
    );
    for kind in [FixtureKind::ValidItem, FixtureKind::ExtraField, FixtureKind::Boundary(BoundaryCase::PriceMin)] {
        assert_eq!(unnamed_draft(generate(&mut first, kind)), unnamed_draft(generate(&mut second, kind)));
    }
    assert_eq!(first.seller_id(), second.seller_id());
}

#[test]
fn seeded_generators_tag_each_run_apart() {
    let mut first = FixtureGenerator::with_seed(7);
    let mut second = FixtureGenerator::with_seed(7);
    assert!(first.run_tag().starts_with("7-"), "tag was {}", first.run_tag());
    assert_ne!(first.run_tag(), second.run_tag());
    assert_eq!(first.seller_id(), second.seller_id());
    let first_name = first.unique_name();
    let second_name = second.unique_name();
    assert_ne!(first_name, second_name);
    assert!(first_name.contains(first.run_tag()), "name was {first_name}");
}

#[test]
fn overrides_fix_seller_and_numbered_name() {
    let mut generator = FixtureGenerator::with_seed(3);
    let overrides = FixtureOverrides {
        seller_id: Some(500_000),
        item_number: Some(3),
        name: None,
    };
    let fixture = generator.generate(FixtureKind::ValidItem, &overrides).unwrap();
    let draft = fixture.draft.unwrap();
    assert_eq!(draft.seller_id, 500_000);
    assert!(draft.name.starts_with("Item 3 "), "name was {}", draft.name);

    let named = FixtureOverrides {
        name: Some("T".to_string()),
        ..FixtureOverrides::seller(500_000)
    };
    let fixture = generator.generate(FixtureKind::ValidItem, &named).unwrap();
    assert_eq!(fixture.draft.unwrap().name, "T");
}

// ============================================================================
// SECTION: Invalid Bodies
// ============================================================================

#[test]
fn missing_field_removes_exactly_one_key() {
    let mut generator = FixtureGenerator::with_seed(4);
    for field in PayloadField::ALL {
        let fixture = generate(&mut generator, FixtureKind::MissingField(field));
        let body = body_of(&fixture);
        assert!(!body.contains_key(field.wire_name()));
        assert_eq!(body.len(), 3);
        assert!(fixture.draft.is_none());
    }
}

#[test]
fn type_mismatch_replaces_one_value() {
    let mut generator = FixtureGenerator::with_seed(5);
    for field in PayloadField::ALL {
        let fixture = generate(&mut generator, FixtureKind::TypeMismatch(field));
        let body = body_of(&fixture);
        assert_eq!(body.get(field.wire_name()), Some(&field.mistyped_value()));
        assert_eq!(body.len(), 4);
    }
}

#[test]
fn all_fields_mistyped_covers_every_field() {
    let mut generator = FixtureGenerator::with_seed(6);
    let fixture = generate(&mut generator, FixtureKind::AllFieldsMistyped);
    let body = body_of(&fixture);
    assert_eq!(body.get("sellerID"), Some(&json!("string_instead_of_int")));
    assert_eq!(body.get("name"), Some(&json!(12345)));
    assert_eq!(body.get("price"), Some(&json!("string_price")));
    assert_eq!(body.get("statistics"), Some(&json!("not_an_object")));
}

#[test]
fn extra_field_keeps_the_valid_draft() {
    let mut generator = FixtureGenerator::with_seed(8);
    let fixture = generate(&mut generator, FixtureKind::ExtraField);
    let body = body_of(&fixture);
    assert_eq!(body.get("extra_field"), Some(&json!("should_be_ignored")));
    assert!(fixture.draft.is_some());
}

#[test]
fn boundary_cases_override_their_field() {
    let mut generator = FixtureGenerator::with_seed(9);
    let draft_of = |generator: &mut FixtureGenerator, case| {
        generate(generator, FixtureKind::Boundary(case)).draft.unwrap()
    };
    assert_eq!(draft_of(&mut generator, BoundaryCase::SellerIdMin).seller_id, 111_111);
    assert_eq!(draft_of(&mut generator, BoundaryCase::SellerIdMax).seller_id, 999_999);
    assert_eq!(draft_of(&mut generator, BoundaryCase::SellerIdBelowMin).seller_id, 111_110);
    assert_eq!(draft_of(&mut generator, BoundaryCase::SellerIdAboveMax).seller_id, 1_000_000);
    assert_eq!(draft_of(&mut generator, BoundaryCase::PriceMin).price, 1);
    assert_eq!(draft_of(&mut generator, BoundaryCase::PriceZero).price, 0);
    assert_eq!(draft_of(&mut generator, BoundaryCase::ZeroStatistics).statistics, Statistics::zero());
    let max = draft_of(&mut generator, BoundaryCase::MaxValues);
    assert_eq!(max.price, 2_147_483_647);
    assert_eq!(max.statistics.contacts, 2_147_483_647);
    assert!(draft_of(&mut generator, BoundaryCase::EmptyName).name.is_empty());
    assert_eq!(draft_of(&mut generator, BoundaryCase::OversizeName).name.len(), 1000);
}

#[test]
fn known_bug_fixtures_carry_negative_values() {
    let mut generator = FixtureGenerator::with_seed(10);
    let price = generate(&mut generator, FixtureKind::KnownBug(KnownBug::NegativePrice));
    assert_eq!(price.draft.unwrap().price, -100);
    let stats = generate(&mut generator, FixtureKind::KnownBug(KnownBug::NegativeStatistics));
    assert_eq!(
        stats.draft.unwrap().statistics,
        Statistics {
            likes: -5,
            view_count: -10,
            contacts: -1,
        }
    );
}

#[test]
fn adversarial_names_use_name_samples() {
    let mut generator = FixtureGenerator::with_seed(11);
    let sql = generate(&mut generator, FixtureKind::AdversarialName(AdversarialKind::SqlInjection));
    assert_eq!(sql.draft.unwrap().name, "test'; DROP TABLE items; --");
    let special =
        generate(&mut generator, FixtureKind::AdversarialName(AdversarialKind::SpecialCharacters));
    assert_eq!(special.draft.unwrap().name, "Тест @#$% 100%");
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

#[test]
fn captured_item_kinds_require_binding() {
    let mut generator = FixtureGenerator::with_seed(12);
    for kind in [FixtureKind::ExistingItemId, FixtureKind::DeletedItemId] {
        let err = generator.generate(kind, &FixtureOverrides::default()).unwrap_err();
        assert!(matches!(err, FixtureError::RequiresBinding(_)));
    }
    let bound = Fixture::bound_item_id(FixtureKind::ExistingItemId, "abc-1", None).unwrap();
    assert_eq!(bound.identifier(), Some("abc-1"));
    let err = Fixture::bound_item_id(FixtureKind::UnknownItemId, "abc-1", None).unwrap_err();
    assert!(matches!(err, FixtureError::NotBindable(_)));
}

#[test]
fn unknown_item_ids_are_uuid_shaped() {
    let mut generator = FixtureGenerator::with_seed(13);
    let id = generator.unknown_item_id();
    let groups = id.split('-').map(str::len).collect::<Vec<_>>();
    assert_eq!(groups, vec![8, 4, 4, 4, 12]);
    assert!(id.chars().all(|ch| ch == '-' || ch.is_ascii_hexdigit()));
}

#[test]
fn unknown_item_variants_include_literals() {
    let mut generator = FixtureGenerator::with_seed(14);
    let variants = generator.identifier_variants(FixtureKind::UnknownItemId).unwrap();
    let ids = variants.iter().filter_map(Fixture::identifier).collect::<Vec<_>>();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&"nonexistent_id_12345"));
    assert!(ids.contains(&"123456"));
}

#[test]
fn malformed_variants_expand_every_sample() {
    let mut generator = FixtureGenerator::with_seed(15);
    for family in AdversarialKind::ALL {
        let variants = generator.identifier_variants(FixtureKind::MalformedItemId(family)).unwrap();
        assert_eq!(variants.len(), family.samples().len());
        assert_eq!(variants[0].identifier(), Some(family.canonical().as_str()));
    }
}

#[test]
fn seller_cases_render_documented_literals() {
    let mut generator = FixtureGenerator::with_seed(16);
    let render = |generator: &mut FixtureGenerator, case| {
        generate(generator, FixtureKind::SellerId(case)).identifier().unwrap().to_string()
    };
    assert_eq!(render(&mut generator, SellerIdCase::Min), "111111");
    assert_eq!(render(&mut generator, SellerIdCase::Max), "999999");
    assert_eq!(render(&mut generator, SellerIdCase::BelowMin), "111110");
    assert_eq!(render(&mut generator, SellerIdCase::AboveMax), "1000000");
    assert_eq!(render(&mut generator, SellerIdCase::Negative), "-123456");
    assert_eq!(render(&mut generator, SellerIdCase::Zero), "0");
    assert_eq!(render(&mut generator, SellerIdCase::Fractional), "123456.78");
    assert_eq!(render(&mut generator, SellerIdCase::VeryLarge), "10000000000");
    let below: i64 = render(&mut generator, SellerIdCase::BelowRange).parse().unwrap();
    assert!((100_000 .. SELLER_ID_MIN).contains(&below));

    let fixed = generator
        .generate(FixtureKind::SellerId(SellerIdCase::Random), &FixtureOverrides::seller(222_222))
        .unwrap();
    assert_eq!(fixed.identifier(), Some("222222"));
}

#[test]
fn kinds_render_stable_labels() {
    assert_eq!(FixtureKind::MissingField(PayloadField::SellerId).to_string(), "missing_field:sellerID");
    assert_eq!(FixtureKind::SellerId(SellerIdCase::Min).to_string(), "seller_id:min");
    assert_eq!(
        FixtureKind::SellerId(SellerIdCase::Malformed(AdversarialKind::Empty)).to_string(),
        "seller_id:malformed:empty"
    );
    assert_eq!(FixtureKind::KnownBug(KnownBug::NegativePrice).to_string(), "known_bug:KB-001");
}
