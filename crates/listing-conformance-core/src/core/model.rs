// crates/listing-conformance-core/src/core/model.rs
// ============================================================================
// Module: Listing Data Model
// Description: Item and statistics records exchanged with the listing service.
// Purpose: Provide typed wire records plus strict shape inspection of raw JSON.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The listing service accepts an [`ItemDraft`] on create (note the `sellerID`
//! spelling) and answers with [`Item`] records (`sellerId`). Response bodies are
//! untrusted: [`inspect_item`] and [`inspect_statistics`] check every field for
//! presence and exact JSON type instead of relying on lenient decoding, so a
//! string where an integer belongs is reported rather than coerced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Domain Constants
// ============================================================================

/// Smallest documented seller identifier.
pub const SELLER_ID_MIN: i64 = 111_111;
/// Largest documented seller identifier.
pub const SELLER_ID_MAX: i64 = 999_999;
/// Field names every item record must carry.
pub const ITEM_FIELDS: [&str; 6] = ["id", "sellerId", "name", "price", "statistics", "createdAt"];
/// Field names every statistics record must carry.
pub const STATISTICS_FIELDS: [&str; 3] = ["likes", "viewCount", "contacts"];

// ============================================================================
// SECTION: Records
// ============================================================================

/// Per-item counters.
///
/// # Invariants
/// - Documented domain for every counter is `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of likes.
    pub likes: i64,
    /// Number of views.
    #[serde(rename = "viewCount")]
    pub view_count: i64,
    /// Number of contact requests.
    pub contacts: i64,
}

impl Statistics {
    /// Returns statistics with every counter set to zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            likes: 0,
            view_count: 0,
            contacts: 0,
        }
    }

    /// Returns `true` when every counter is inside the documented domain.
    #[must_use]
    pub const fn is_non_negative(&self) -> bool {
        self.likes >= 0 && self.view_count >= 0 && self.contacts >= 0
    }

    /// Returns the counters in [`STATISTICS_FIELDS`] order.
    #[must_use]
    pub const fn counters(&self) -> [i64; 3] {
        [self.likes, self.view_count, self.contacts]
    }

    /// Renders the statistics as the wire JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "likes": self.likes,
            "viewCount": self.view_count,
            "contacts": self.contacts,
        })
    }
}

/// Create-item request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Seller identifier (`sellerID` on the wire).
    #[serde(rename = "sellerID")]
    pub seller_id: i64,
    /// Listing title.
    pub name: String,
    /// Listing price.
    pub price: i64,
    /// Initial counters.
    pub statistics: Statistics,
}

impl ItemDraft {
    /// Renders the draft as the create-item JSON body.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "sellerID": self.seller_id,
            "name": self.name,
            "price": self.price,
            "statistics": self.statistics.to_value(),
        })
    }

    /// Lists every field where `item` differs from this draft.
    #[must_use]
    pub fn mismatches(&self, item: &Item) -> Vec<String> {
        let mut out = Vec::new();
        if item.seller_id != self.seller_id {
            out.push(format!("sellerId {} != submitted {}", item.seller_id, self.seller_id));
        }
        if item.name != self.name {
            out.push(format!(
                "name '{}' != submitted '{}'",
                item.name.escape_debug(),
                self.name.escape_debug()
            ));
        }
        if item.price != self.price {
            out.push(format!("price {} != submitted {}", item.price, self.price));
        }
        out.extend(statistics_mismatches(&self.statistics, &item.statistics));
        out
    }
}

/// Item record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Server-assigned identifier.
    pub id: String,
    /// Seller identifier.
    pub seller_id: i64,
    /// Listing title.
    pub name: String,
    /// Listing price.
    pub price: i64,
    /// Embedded counters.
    pub statistics: Statistics,
    /// Creation timestamp as rendered by the service.
    pub created_at: String,
}

// ============================================================================
// SECTION: Shape Inspection
// ============================================================================

/// Inspects a JSON value as an item record with exact field types.
///
/// # Errors
///
/// Returns every shape problem found (missing fields, wrong types).
pub fn inspect_item(value: &Value) -> Result<Item, Vec<String>> {
    let Value::Object(map) = value else {
        return Err(vec![format!("item must be a JSON object, got {}", json_type(value))]);
    };
    let [id_field, seller_field, name_field, price_field, statistics_field, created_field] =
        ITEM_FIELDS;
    let mut problems = Vec::new();
    let id = require_string(map, id_field, &mut problems);
    let seller_id = require_integer(map, seller_field, &mut problems);
    let name = require_string(map, name_field, &mut problems);
    let price = require_integer(map, price_field, &mut problems);
    let created_at = require_string(map, created_field, &mut problems);
    let statistics = match map.get(statistics_field) {
        None => {
            problems.push(format!("missing field '{statistics_field}'"));
            None
        }
        Some(raw) => match inspect_statistics(raw) {
            Ok(stats) => Some(stats),
            Err(inner) => {
                problems.extend(inner.into_iter().map(|problem| format!("statistics: {problem}")));
                None
            }
        },
    };
    match (id, seller_id, name, price, statistics, created_at) {
        (Some(id), Some(seller_id), Some(name), Some(price), Some(statistics), Some(created_at))
            if problems.is_empty() =>
        {
            Ok(Item {
                id,
                seller_id,
                name,
                price,
                statistics,
                created_at,
            })
        }
        _ => Err(problems),
    }
}

/// Inspects a JSON value as a statistics record with exact field types.
///
/// # Errors
///
/// Returns every shape problem found (missing fields, wrong types).
pub fn inspect_statistics(value: &Value) -> Result<Statistics, Vec<String>> {
    let Value::Object(map) = value else {
        return Err(vec![format!("statistics must be a JSON object, got {}", json_type(value))]);
    };
    let mut problems = Vec::new();
    let [likes, view_count, contacts] =
        STATISTICS_FIELDS.map(|field| require_integer(map, field, &mut problems));
    match (likes, view_count, contacts) {
        (Some(likes), Some(view_count), Some(contacts)) => Ok(Statistics {
            likes,
            view_count,
            contacts,
        }),
        _ => Err(problems),
    }
}

/// Lists every counter where `observed` differs from `expected`.
#[must_use]
pub fn statistics_mismatches(expected: &Statistics, observed: &Statistics) -> Vec<String> {
    STATISTICS_FIELDS
        .into_iter()
        .zip(expected.counters().into_iter().zip(observed.counters()))
        .filter(|(_, (want, got))| want != got)
        .map(|(field, (want, got))| format!("statistics.{field} {got} != expected {want}"))
        .collect()
}

/// Extracts the created item identifier from a create response body.
///
/// Accepts a bare item object, a list whose first element is an item, or the
/// legacy `{"status": "... - <id>"}` acknowledgement envelope.
#[must_use]
pub fn extract_item_id(body: &Value) -> Option<String> {
    match body {
        Value::Array(items) => items.first().and_then(extract_item_id),
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("id") {
                return Some(id.clone());
            }
            let Some(Value::String(status)) = map.get("status") else {
                return None;
            };
            let (_, tail) = status.rsplit_once(" - ")?;
            let tail = tail.trim();
            let well_formed = !tail.is_empty()
                && tail.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
            well_formed.then(|| tail.to_string())
        }
        _ => None,
    }
}

/// Returns a short JSON type label for diagnostics.
#[must_use]
pub const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a required string field, recording a problem when absent or mistyped.
fn require_string(
    map: &Map<String, Value>,
    field: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match map.get(field) {
        None => {
            problems.push(format!("missing field '{field}'"));
            None
        }
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => {
            problems.push(format!("field '{field}' must be a string, got {}", json_type(other)));
            None
        }
    }
}

/// Reads a required integer field, recording a problem when absent or mistyped.
fn require_integer(
    map: &Map<String, Value>,
    field: &str,
    problems: &mut Vec<String>,
) -> Option<i64> {
    match map.get(field) {
        None => {
            problems.push(format!("missing field '{field}'"));
            None
        }
        Some(value) => {
            let integer = value.as_i64();
            if integer.is_none() {
                problems.push(format!(
                    "field '{field}' must be an integer, got {}",
                    describe_non_integer(value)
                ));
            }
            integer
        }
    }
}

/// Describes a value that failed the integer check.
fn describe_non_integer(value: &Value) -> String {
    match value {
        Value::Number(number) => format!("non-integer number {number}"),
        other => json_type(other).to_string(),
    }
}
