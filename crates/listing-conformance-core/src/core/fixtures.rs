// crates/listing-conformance-core/src/core/fixtures.rs
// ============================================================================
// Module: Fixture Generator
// Description: Synthetic payloads and identifiers across valid and hostile classes.
// Purpose: Produce tagged fixtures the oracle pattern-matches on.
// Dependencies: rand, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! A [`FixtureKind`] names what a fixture exercises; [`FixtureGenerator::generate`]
//! turns it into a concrete [`Fixture`] carrying either a create-item body or a
//! path identifier. Variants of a valid item override exactly one field.
//! Generation has no side effects and is deterministic for a fixed seed,
//! except for the per-run tag embedded in names.
//!
//! Invariants:
//! - Default seller identifiers fall in [`SELLER_ID_MIN`]..=[`SELLER_ID_MAX`].
//! - Default names are unique per generator (run tag plus monotonic counter).
//! - Identifier kinds that refer to a live item must be bound with
//!   [`Fixture::bound_item_id`]; `generate` refuses them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::model::ItemDraft;
use crate::core::model::SELLER_ID_MAX;
use crate::core::model::SELLER_ID_MIN;
use crate::core::model::Statistics;
use crate::core::verdict::KnownBug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default price used by valid fixtures.
pub const DEFAULT_PRICE: i64 = 9900;
/// Default statistics used by valid fixtures.
pub const DEFAULT_STATISTICS: Statistics = Statistics {
    likes: 21,
    view_count: 11,
    contacts: 43,
};
/// Length of oversize string fixtures.
pub const OVERSIZE_LEN: usize = 1000;

/// Literal identifiers that are well-formed but name no item.
const LITERAL_UNKNOWN_ITEM_IDS: [&str; 2] = ["nonexistent_id_12345", "123456"];

/// Largest 32-bit signed integer, used by the max-values fixture.
const MAX_INT32: i64 = 2_147_483_647;

// ============================================================================
// SECTION: Fixture Taxonomy
// ============================================================================

/// Expectation class a fixture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureClass {
    /// Well-formed input inside the documented domain.
    Valid,
    /// Input on the edge of the documented domain, still valid.
    BoundaryValid,
    /// Input just outside the documented domain.
    BoundaryInvalid,
    /// Missing or wrongly typed fields.
    MalformedType,
    /// SQL, markup or path injection strings.
    Injection,
    /// Strings far beyond plausible lengths.
    Oversize,
    /// Empty or whitespace-only values.
    Empty,
    /// Non-ASCII text.
    Unicode,
}

/// Top-level field of the create-item body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadField {
    /// `sellerID`.
    SellerId,
    /// `name`.
    Name,
    /// `price`.
    Price,
    /// `statistics`.
    Statistics,
}

impl PayloadField {
    /// Every required create-item field.
    pub const ALL: [Self; 4] = [Self::SellerId, Self::Name, Self::Price, Self::Statistics];

    /// Returns the JSON key used on the wire.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::SellerId => "sellerID",
            Self::Name => "name",
            Self::Price => "price",
            Self::Statistics => "statistics",
        }
    }

    /// Returns a value of the wrong JSON type for this field.
    #[must_use]
    pub fn mistyped_value(self) -> Value {
        match self {
            Self::SellerId => json!("string_instead_of_int"),
            Self::Name => json!(12345),
            Self::Price => json!("string_price"),
            Self::Statistics => json!("not_an_object"),
        }
    }
}

/// Boundary variants of a valid create-item body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCase {
    /// `sellerID = 111111`.
    SellerIdMin,
    /// `sellerID = 999999`.
    SellerIdMax,
    /// `sellerID = 111110`.
    SellerIdBelowMin,
    /// `sellerID = 1000000`.
    SellerIdAboveMax,
    /// `price = 1`.
    PriceMin,
    /// `price = 0`.
    PriceZero,
    /// All statistics counters zero.
    ZeroStatistics,
    /// Price and counters at the 32-bit maximum.
    MaxValues,
    /// `name = ""`.
    EmptyName,
    /// A 1000-character name.
    OversizeName,
}

impl BoundaryCase {
    /// Every boundary case.
    pub const ALL: [Self; 10] = [
        Self::SellerIdMin,
        Self::SellerIdMax,
        Self::SellerIdBelowMin,
        Self::SellerIdAboveMax,
        Self::PriceMin,
        Self::PriceZero,
        Self::ZeroStatistics,
        Self::MaxValues,
        Self::EmptyName,
        Self::OversizeName,
    ];

    /// Returns the expectation class of this case.
    #[must_use]
    pub const fn class(self) -> FixtureClass {
        match self {
            Self::SellerIdMin
            | Self::SellerIdMax
            | Self::PriceMin
            | Self::ZeroStatistics
            | Self::MaxValues => FixtureClass::BoundaryValid,
            Self::SellerIdBelowMin | Self::SellerIdAboveMax | Self::PriceZero => {
                FixtureClass::BoundaryInvalid
            }
            Self::EmptyName => FixtureClass::Empty,
            Self::OversizeName => FixtureClass::Oversize,
        }
    }

    /// Returns a stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SellerIdMin => "seller_id_min",
            Self::SellerIdMax => "seller_id_max",
            Self::SellerIdBelowMin => "seller_id_below_min",
            Self::SellerIdAboveMax => "seller_id_above_max",
            Self::PriceMin => "price_min",
            Self::PriceZero => "price_zero",
            Self::ZeroStatistics => "zero_statistics",
            Self::MaxValues => "max_values",
            Self::EmptyName => "empty_name",
            Self::OversizeName => "oversize_name",
        }
    }

    /// Applies the case to a valid draft.
    fn apply(self, draft: &mut ItemDraft) {
        match self {
            Self::SellerIdMin => draft.seller_id = SELLER_ID_MIN,
            Self::SellerIdMax => draft.seller_id = SELLER_ID_MAX,
            Self::SellerIdBelowMin => draft.seller_id = SELLER_ID_MIN - 1,
            Self::SellerIdAboveMax => draft.seller_id = SELLER_ID_MAX + 1,
            Self::PriceMin => draft.price = 1,
            Self::PriceZero => draft.price = 0,
            Self::ZeroStatistics => draft.statistics = Statistics::zero(),
            Self::MaxValues => {
                draft.price = MAX_INT32;
                draft.statistics = Statistics {
                    likes: MAX_INT32,
                    view_count: MAX_INT32,
                    contacts: MAX_INT32,
                };
            }
            Self::EmptyName => draft.name = String::new(),
            Self::OversizeName => draft.name = "a".repeat(OVERSIZE_LEN),
        }
    }
}

/// Hostile string families reused across names, item ids and seller ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdversarialKind {
    /// SQL injection payloads.
    SqlInjection,
    /// Script tags.
    ScriptTag,
    /// Path traversal sequences.
    PathTraversal,
    /// 1000-character strings.
    Oversize,
    /// Non-ASCII text and emoji.
    Unicode,
    /// The empty string.
    Empty,
    /// Whitespace only.
    Whitespace,
    /// Punctuation-heavy strings.
    SpecialCharacters,
    /// Embedded control characters.
    ControlCharacter,
    /// JSON and JavaScript keywords.
    Keyword,
    /// Strings that look numeric but are not valid identifiers.
    NumericLike,
    /// Plausible-looking identifiers that name nothing.
    Freeform,
}

impl AdversarialKind {
    /// Every adversarial family.
    pub const ALL: [Self; 12] = [
        Self::SqlInjection,
        Self::ScriptTag,
        Self::PathTraversal,
        Self::Oversize,
        Self::Unicode,
        Self::Empty,
        Self::Whitespace,
        Self::SpecialCharacters,
        Self::ControlCharacter,
        Self::Keyword,
        Self::NumericLike,
        Self::Freeform,
    ];

    /// Returns the representative sample used when one value is needed.
    #[must_use]
    pub fn canonical(self) -> String {
        match self {
            Self::SqlInjection => "1; DROP TABLE items; --".to_string(),
            Self::ScriptTag => "<script>alert('xss')</script>".to_string(),
            Self::PathTraversal => "../../etc/passwd".to_string(),
            Self::Oversize => "a".repeat(OVERSIZE_LEN),
            Self::Unicode => "тест🚀".to_string(),
            Self::Empty => String::new(),
            Self::Whitespace => "   ".to_string(),
            Self::SpecialCharacters => "test@#$%^".to_string(),
            Self::ControlCharacter => "test\nid".to_string(),
            Self::Keyword => "null".to_string(),
            Self::NumericLike => "1.5".to_string(),
            Self::Freeform => "invalid_id".to_string(),
        }
    }

    /// Returns the value used when the family fills an item name.
    #[must_use]
    pub fn name_sample(self) -> String {
        match self {
            Self::SqlInjection => "test'; DROP TABLE items; --".to_string(),
            Self::SpecialCharacters => "Тест @#$% 100%".to_string(),
            other => other.canonical(),
        }
    }

    /// Returns every sample of the family, canonical first.
    #[must_use]
    pub fn samples(self) -> Vec<String> {
        let extra: &[&str] = match self {
            Self::SqlInjection => &[
                "1;DROP TABLE items;--",
                "123; DROP TABLE items; --",
                "1; DROP TABLE statistics; --",
                "123' OR '1'='1",
            ],
            Self::ScriptTag => &["<img src=x onerror=alert(1)>"],
            Self::PathTraversal => &["..%2F..%2Fetc%2Fpasswd"],
            Self::Oversize => return vec![self.canonical(), "a".repeat(100)],
            Self::Unicode => &["🚀🌟💫", "продавец"],
            Self::Empty => &[],
            Self::Whitespace => &[" "],
            Self::SpecialCharacters => &[
                "invalid@id#format",
                "@#$%",
                "@#$%^",
                "test@#$%^&*()",
                "invalid@id",
            ],
            Self::ControlCharacter => &["test\tid"],
            Self::Keyword => &["undefined", "true", "false"],
            Self::NumericLike => &["0", "-1", "123-abc", "123abc", "123.45"],
            Self::Freeform => &[
                "nonexistent_id",
                "123-invalid-456",
                "script_alert_xss_script",
                "id-with-dashes",
                "id_with_underscores",
                "test.id.with.dots",
                "invalid_string",
                "error-trigger",
            ],
        };
        std::iter::once(self.canonical()).chain(extra.iter().map(|s| (*s).to_string())).collect()
    }

    /// Returns the expectation class of the family.
    #[must_use]
    pub const fn class(self) -> FixtureClass {
        match self {
            Self::SqlInjection | Self::ScriptTag | Self::PathTraversal => FixtureClass::Injection,
            Self::Oversize => FixtureClass::Oversize,
            Self::Unicode => FixtureClass::Unicode,
            Self::Empty | Self::Whitespace => FixtureClass::Empty,
            Self::SpecialCharacters
            | Self::ControlCharacter
            | Self::Keyword
            | Self::NumericLike
            | Self::Freeform => FixtureClass::MalformedType,
        }
    }

    /// Returns a stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SqlInjection => "sql_injection",
            Self::ScriptTag => "script_tag",
            Self::PathTraversal => "path_traversal",
            Self::Oversize => "oversize",
            Self::Unicode => "unicode",
            Self::Empty => "empty",
            Self::Whitespace => "whitespace",
            Self::SpecialCharacters => "special_characters",
            Self::ControlCharacter => "control_character",
            Self::Keyword => "keyword",
            Self::NumericLike => "numeric_like",
            Self::Freeform => "freeform",
        }
    }
}

/// Seller identifier variants for the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "case", content = "family", rename_all = "snake_case")]
pub enum SellerIdCase {
    /// Uniform random in the documented domain (or the override).
    Random,
    /// `111111`.
    Min,
    /// `999999`.
    Max,
    /// `111110`.
    BelowMin,
    /// `1000000`.
    AboveMax,
    /// Random in `100000..=111110`.
    BelowRange,
    /// `-123456`.
    Negative,
    /// `0`.
    Zero,
    /// `123456.78`.
    Fractional,
    /// `10000000000`.
    VeryLarge,
    /// Hostile string family.
    Malformed(AdversarialKind),
}

impl SellerIdCase {
    /// Returns the expectation class of the case.
    #[must_use]
    pub const fn class(self) -> FixtureClass {
        match self {
            Self::Random => FixtureClass::Valid,
            Self::Min | Self::Max => FixtureClass::BoundaryValid,
            Self::BelowMin
            | Self::AboveMax
            | Self::BelowRange
            | Self::Negative
            | Self::Zero
            | Self::VeryLarge => FixtureClass::BoundaryInvalid,
            Self::Fractional => FixtureClass::MalformedType,
            Self::Malformed(kind) => kind.class(),
        }
    }

    /// Returns a stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Min => "min",
            Self::Max => "max",
            Self::BelowMin => "below_min",
            Self::AboveMax => "above_max",
            Self::BelowRange => "below_range",
            Self::Negative => "negative",
            Self::Zero => "zero",
            Self::Fractional => "fractional",
            Self::VeryLarge => "very_large",
            Self::Malformed(kind) => kind.as_str(),
        }
    }
}

/// What a fixture exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "variant", rename_all = "snake_case")]
pub enum FixtureKind {
    /// Fully valid create-item body.
    ValidItem,
    /// Valid body with one required field removed.
    MissingField(PayloadField),
    /// Valid body with one field replaced by a wrongly typed value.
    TypeMismatch(PayloadField),
    /// Every field wrongly typed.
    AllFieldsMistyped,
    /// Valid body plus an undocumented field.
    ExtraField,
    /// Valid body with one boundary override.
    Boundary(BoundaryCase),
    /// Valid body whose name is an adversarial string.
    AdversarialName(AdversarialKind),
    /// Valid body reproducing a tracked defect.
    KnownBug(KnownBug),
    /// Identifier of an item created during the scenario.
    ExistingItemId,
    /// Identifier of an item deleted during the scenario.
    DeletedItemId,
    /// Well-formed identifier that names no item.
    UnknownItemId,
    /// Adversarial string used as an item identifier.
    MalformedItemId(AdversarialKind),
    /// Seller identifier for the listing endpoint.
    SellerId(SellerIdCase),
}

impl FixtureKind {
    /// Returns the expectation class of the kind.
    #[must_use]
    pub const fn class(self) -> FixtureClass {
        match self {
            Self::ValidItem | Self::ExtraField | Self::ExistingItemId => FixtureClass::Valid,
            Self::MissingField(_) | Self::TypeMismatch(_) | Self::AllFieldsMistyped => {
                FixtureClass::MalformedType
            }
            Self::Boundary(case) => case.class(),
            Self::AdversarialName(kind) | Self::MalformedItemId(kind) => kind.class(),
            Self::KnownBug(_) | Self::DeletedItemId | Self::UnknownItemId => {
                FixtureClass::BoundaryInvalid
            }
            Self::SellerId(case) => case.class(),
        }
    }

    /// Returns `true` when the kind produces a path identifier rather than a body.
    #[must_use]
    pub const fn is_identifier(self) -> bool {
        matches!(
            self,
            Self::ExistingItemId
                | Self::DeletedItemId
                | Self::UnknownItemId
                | Self::MalformedItemId(_)
                | Self::SellerId(_)
        )
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidItem => f.write_str("valid_item"),
            Self::MissingField(field) => write!(f, "missing_field:{}", field.wire_name()),
            Self::TypeMismatch(field) => write!(f, "type_mismatch:{}", field.wire_name()),
            Self::AllFieldsMistyped => f.write_str("all_fields_mistyped"),
            Self::ExtraField => f.write_str("extra_field"),
            Self::Boundary(case) => write!(f, "boundary:{}", case.as_str()),
            Self::AdversarialName(kind) => write!(f, "adversarial_name:{}", kind.as_str()),
            Self::KnownBug(bug) => write!(f, "known_bug:{}", bug.reference()),
            Self::ExistingItemId => f.write_str("existing_item_id"),
            Self::DeletedItemId => f.write_str("deleted_item_id"),
            Self::UnknownItemId => f.write_str("unknown_item_id"),
            Self::MalformedItemId(kind) => write!(f, "malformed_item_id:{}", kind.as_str()),
            Self::SellerId(SellerIdCase::Malformed(kind)) => {
                write!(f, "seller_id:malformed:{}", kind.as_str())
            }
            Self::SellerId(case) => write!(f, "seller_id:{}", case.as_str()),
        }
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Concrete request input produced from a [`FixtureKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FixturePayload {
    /// Create-item JSON body.
    Item(Value),
    /// Path identifier (item id or seller id), unencoded.
    Identifier(String),
}

/// A tagged synthetic input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fixture {
    /// What the fixture exercises.
    pub kind: FixtureKind,
    /// Request input.
    pub payload: FixturePayload,
    /// Typed draft submitted (bodies) or referenced (bound identifiers), when representable.
    pub draft: Option<ItemDraft>,
}

impl Fixture {
    /// Binds an identifier kind to a captured item.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotBindable`] for kinds that do not refer to a captured item.
    pub fn bound_item_id(
        kind: FixtureKind,
        id: impl Into<String>,
        draft: Option<ItemDraft>,
    ) -> Result<Self, FixtureError> {
        match kind {
            FixtureKind::ExistingItemId | FixtureKind::DeletedItemId => Ok(Self {
                kind,
                payload: FixturePayload::Identifier(id.into()),
                draft,
            }),
            other => Err(FixtureError::NotBindable(other.to_string())),
        }
    }

    /// Returns the expectation class of the fixture.
    #[must_use]
    pub const fn class(&self) -> FixtureClass {
        self.kind.class()
    }

    /// Returns the identifier when the payload is a path identifier.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        match &self.payload {
            FixturePayload::Identifier(id) => Some(id),
            FixturePayload::Item(_) => None,
        }
    }

    /// Returns the JSON body when the payload is a create-item body.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match &self.payload {
            FixturePayload::Item(body) => Some(body),
            FixturePayload::Identifier(_) => None,
        }
    }
}

/// Explicit values replacing generated defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureOverrides {
    /// Seller identifier to use instead of a random one.
    pub seller_id: Option<i64>,
    /// Item number for "Item N" style names.
    pub item_number: Option<u32>,
    /// Name to use instead of the unique template.
    pub name: Option<String>,
}

impl FixtureOverrides {
    /// Overrides carrying only a seller identifier.
    #[must_use]
    pub fn seller(seller_id: i64) -> Self {
        Self {
            seller_id: Some(seller_id),
            ..Self::default()
        }
    }
}

/// Fixture generation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FixtureError {
    /// The kind refers to a captured item and must be bound explicitly.
    #[error("fixture kind {0} must be bound to a captured item")]
    RequiresBinding(String),
    /// The kind cannot be bound to a captured item.
    #[error("fixture kind {0} cannot be bound to an item id")]
    NotBindable(String),
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Deterministic fixture source.
///
/// # Invariants
/// - Two generators built with the same seed yield identical fixture values;
///   only the run tag inside generated names differs.
#[derive(Debug, Clone)]
pub struct FixtureGenerator {
    /// Random source for seller ids and unknown identifiers.
    rng: StdRng,
    /// Tag distinguishing names produced by this generator.
    run_tag: String,
    /// Monotonic name counter.
    counter: u64,
}

impl FixtureGenerator {
    /// Creates a generator seeded from OS entropy, tagged with the current time.
    #[must_use]
    pub fn new() -> Self {
        let mut rng = StdRng::from_entropy();
        let stamp = time::OffsetDateTime::now_utc().unix_timestamp();
        let salt: u16 = rng.r#gen();
        Self {
            rng,
            run_tag: format!("{stamp}{salt:04x}"),
            counter: 0,
        }
    }

    /// Creates a generator whose fixture values depend only on `seed`.
    ///
    /// The run tag still carries a fresh random salt, so names from two runs
    /// with the same seed never collide on a shared service.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let salt: u32 = rand::thread_rng().r#gen();
        Self {
            rng: StdRng::seed_from_u64(seed),
            run_tag: format!("{seed:x}-{salt:08x}"),
            counter: 0,
        }
    }

    /// Returns the tag embedded in generated names.
    #[must_use]
    pub fn run_tag(&self) -> &str {
        &self.run_tag
    }

    /// Returns a uniform-random seller identifier in the documented domain.
    pub fn seller_id(&mut self) -> i64 {
        self.rng.gen_range(SELLER_ID_MIN..=SELLER_ID_MAX)
    }

    /// Returns a name unique within this generator.
    pub fn unique_name(&mut self) -> String {
        self.counter += 1;
        format!("Test Item {}-{}", self.run_tag, self.counter)
    }

    /// Returns an "Item N" name, still unique within this generator.
    pub fn numbered_name(&mut self, number: u32) -> String {
        self.counter += 1;
        format!("Item {number} {}-{}", self.run_tag, self.counter)
    }

    /// Returns a valid draft honoring `overrides`.
    pub fn valid_draft(&mut self, overrides: &FixtureOverrides) -> ItemDraft {
        let seller_id = overrides.seller_id.unwrap_or_else(|| self.seller_id());
        let name = match (&overrides.name, overrides.item_number) {
            (Some(name), _) => name.clone(),
            (None, Some(number)) => self.numbered_name(number),
            (None, None) => self.unique_name(),
        };
        ItemDraft {
            seller_id,
            name,
            price: DEFAULT_PRICE,
            statistics: DEFAULT_STATISTICS,
        }
    }

    /// Returns a well-formed identifier that names no item.
    pub fn unknown_item_id(&mut self) -> String {
        let a: u32 = self.rng.r#gen();
        let b: u16 = self.rng.r#gen();
        let c: u16 = self.rng.r#gen();
        let d: u16 = self.rng.r#gen();
        let e: u64 = self.rng.r#gen::<u64>() & 0xffff_ffff_ffff;
        format!("{a:08x}-{b:04x}-{c:04x}-{d:04x}-{e:012x}")
    }

    /// Builds a fixture for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::RequiresBinding`] for kinds that reference a captured item.
    pub fn generate(
        &mut self,
        kind: FixtureKind,
        overrides: &FixtureOverrides,
    ) -> Result<Fixture, FixtureError> {
        let fixture = match kind {
            FixtureKind::ValidItem => item_fixture(kind, self.valid_draft(overrides)),
            FixtureKind::MissingField(field) => {
                let mut body = self.valid_draft(overrides).to_value();
                if let Value::Object(map) = &mut body {
                    map.remove(field.wire_name());
                }
                Fixture {
                    kind,
                    payload: FixturePayload::Item(body),
                    draft: None,
                }
            }
            FixtureKind::TypeMismatch(field) => {
                let mut body = self.valid_draft(overrides).to_value();
                if let Value::Object(map) = &mut body {
                    map.insert(field.wire_name().to_string(), field.mistyped_value());
                }
                Fixture {
                    kind,
                    payload: FixturePayload::Item(body),
                    draft: None,
                }
            }
            FixtureKind::AllFieldsMistyped => {
                let body = PayloadField::ALL
                    .iter()
                    .map(|field| (field.wire_name().to_string(), field.mistyped_value()))
                    .collect::<serde_json::Map<_, _>>();
                Fixture {
                    kind,
                    payload: FixturePayload::Item(Value::Object(body)),
                    draft: None,
                }
            }
            FixtureKind::ExtraField => {
                let draft = self.valid_draft(overrides);
                let mut body = draft.to_value();
                if let Value::Object(map) = &mut body {
                    map.insert("extra_field".to_string(), json!("should_be_ignored"));
                }
                Fixture {
                    kind,
                    payload: FixturePayload::Item(body),
                    draft: Some(draft),
                }
            }
            FixtureKind::Boundary(case) => {
                let mut draft = self.valid_draft(overrides);
                case.apply(&mut draft);
                item_fixture(kind, draft)
            }
            FixtureKind::AdversarialName(family) => {
                let mut draft = self.valid_draft(overrides);
                draft.name = family.name_sample();
                item_fixture(kind, draft)
            }
            FixtureKind::KnownBug(bug) => {
                let mut draft = self.valid_draft(overrides);
                match bug {
                    KnownBug::NegativePrice => draft.price = -100,
                    KnownBug::NegativeStatistics => {
                        draft.statistics = Statistics {
                            likes: -5,
                            view_count: -10,
                            contacts: -1,
                        };
                    }
                }
                item_fixture(kind, draft)
            }
            FixtureKind::ExistingItemId | FixtureKind::DeletedItemId => {
                return Err(FixtureError::RequiresBinding(kind.to_string()));
            }
            FixtureKind::UnknownItemId => identifier_fixture(kind, self.unknown_item_id()),
            FixtureKind::MalformedItemId(family) => identifier_fixture(kind, family.canonical()),
            FixtureKind::SellerId(case) => {
                let raw = self.seller_identifier(case, overrides);
                identifier_fixture(kind, raw)
            }
        };
        Ok(fixture)
    }

    /// Builds every sample fixture of an identifier kind.
    ///
    /// Adversarial families expand to all their samples; other kinds yield the
    /// single generated fixture.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::RequiresBinding`] for kinds that reference a captured item.
    pub fn identifier_variants(&mut self, kind: FixtureKind) -> Result<Vec<Fixture>, FixtureError> {
        match kind {
            FixtureKind::MalformedItemId(family)
            | FixtureKind::SellerId(SellerIdCase::Malformed(family)) => Ok(family
                .samples()
                .into_iter()
                .map(|sample| identifier_fixture(kind, sample))
                .collect()),
            FixtureKind::UnknownItemId => {
                let mut out = vec![identifier_fixture(kind, self.unknown_item_id())];
                out.extend(
                    LITERAL_UNKNOWN_ITEM_IDS
                        .iter()
                        .map(|raw| identifier_fixture(kind, (*raw).to_string())),
                );
                Ok(out)
            }
            other => Ok(vec![self.generate(other, &FixtureOverrides::default())?]),
        }
    }

    /// Renders a seller identifier case as a path segment.
    fn seller_identifier(&mut self, case: SellerIdCase, overrides: &FixtureOverrides) -> String {
        match case {
            SellerIdCase::Random => {
                overrides.seller_id.unwrap_or_else(|| self.seller_id()).to_string()
            }
            SellerIdCase::Min => SELLER_ID_MIN.to_string(),
            SellerIdCase::Max => SELLER_ID_MAX.to_string(),
            SellerIdCase::BelowMin => (SELLER_ID_MIN - 1).to_string(),
            SellerIdCase::AboveMax => (SELLER_ID_MAX + 1).to_string(),
            SellerIdCase::BelowRange => self.rng.gen_range(100_000..SELLER_ID_MIN).to_string(),
            SellerIdCase::Negative => "-123456".to_string(),
            SellerIdCase::Zero => "0".to_string(),
            SellerIdCase::Fractional => "123456.78".to_string(),
            SellerIdCase::VeryLarge => "10000000000".to_string(),
            SellerIdCase::Malformed(family) => family.canonical(),
        }
    }
}

impl Default for FixtureGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a draft as a body fixture.
fn item_fixture(kind: FixtureKind, draft: ItemDraft) -> Fixture {
    Fixture {
        kind,
        payload: FixturePayload::Item(draft.to_value()),
        draft: Some(draft),
    }
}

/// Wraps a raw identifier as a fixture.
fn identifier_fixture(kind: FixtureKind, raw: String) -> Fixture {
    Fixture {
        kind,
        payload: FixturePayload::Identifier(raw),
        draft: None,
    }
}
