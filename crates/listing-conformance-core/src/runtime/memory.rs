// crates/listing-conformance-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Listing Service
// Description: Contract-faithful fake of the listing service.
// Purpose: Drive runner and catalog checks without a network.
// Dependencies: crate::{core, interfaces}, serde_json, time
// ============================================================================

//! ## Overview
//! [`InMemoryGateway`] implements [`ServiceGateway`] by answering every
//! endpoint from an in-process item map, following the documented contract:
//! strict input types, seller range checks, 404 envelopes and terminal
//! deletion. [`InMemoryGateway::with_known_bugs`] reproduces the tracked
//! defects (negative prices and statistics accepted). It is not intended for
//! production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Instant;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::model::Item;
use crate::core::model::SELLER_ID_MAX;
use crate::core::model::SELLER_ID_MIN;
use crate::core::model::Statistics;
use crate::interfaces::GatewayResponse;
use crate::interfaces::ServiceGateway;
use crate::interfaces::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Longest identifier the fake accepts as well-formed.
const MAX_ID_LEN: usize = 64;

// ============================================================================
// SECTION: State
// ============================================================================

/// Stored item with its deletion flag.
#[derive(Debug, Clone)]
struct StoredItem {
    /// Item record.
    item: Item,
    /// Whether the item was deleted.
    deleted: bool,
}

/// Mutable fake service state.
#[derive(Debug, Default)]
struct ServiceState {
    /// Items keyed by identifier.
    items: BTreeMap<String, StoredItem>,
    /// Identifiers in creation order.
    order: Vec<String>,
    /// Monotonic identifier counter.
    next_id: u64,
    /// Requests served.
    requests: u64,
}

/// In-memory listing service for tests and offline runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGateway {
    /// Service state protected by a mutex.
    state: Arc<Mutex<ServiceState>>,
    /// Whether the tracked defects are reproduced.
    known_bugs: bool,
}

impl InMemoryGateway {
    /// Creates a fake that follows the documented contract.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fake that reproduces the tracked defects.
    #[must_use]
    pub fn with_known_bugs() -> Self {
        Self {
            known_bugs: true,
            ..Self::default()
        }
    }

    /// Returns the number of items that are stored and not deleted.
    #[must_use]
    pub fn live_items(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.items.values().filter(|stored| !stored.deleted).count())
            .unwrap_or_default()
    }

    /// Returns the number of requests served.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.state.lock().map(|state| state.requests).unwrap_or_default()
    }

    /// Runs `f` against the locked state, counting the request.
    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut ServiceState) -> T,
    ) -> Result<T, TransportError> {
        let mut guard = self.state.lock().map_err(|_| TransportError::Request {
            url: "memory://listing".to_string(),
            detail: "in-memory service mutex poisoned".to_string(),
        })?;
        guard.requests += 1;
        Ok(f(&mut guard))
    }

    /// Validates a create body, returning the rejection message on failure.
    fn validate_create(&self, body: &Value) -> Result<(i64, String, i64, Statistics), String> {
        let Value::Object(map) = body else {
            return Err("body must be an object".to_string());
        };
        let seller_id = integer_field(map, "sellerID")?;
        if !(SELLER_ID_MIN..=SELLER_ID_MAX).contains(&seller_id) {
            return Err(format!("sellerID {seller_id} out of range"));
        }
        let name = match map.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(Value::String(_)) => return Err("name is empty".to_string()),
            Some(_) => return Err("name must be a string".to_string()),
            None => return Err("name is required".to_string()),
        };
        let price = integer_field(map, "price")?;
        if price == 0 || (price < 0 && !self.known_bugs) {
            return Err("price must be positive".to_string());
        }
        let Some(Value::Object(stats)) = map.get("statistics") else {
            return Err("statistics must be an object".to_string());
        };
        let statistics = Statistics {
            likes: integer_field(stats, "likes")?,
            view_count: integer_field(stats, "viewCount")?,
            contacts: integer_field(stats, "contacts")?,
        };
        if !statistics.is_non_negative() && !self.known_bugs {
            return Err("statistics must be non-negative".to_string());
        }
        Ok((seller_id, name, price, statistics))
    }
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

impl ServiceGateway for InMemoryGateway {
    fn create_item(&self, body: &Value) -> Result<GatewayResponse, TransportError> {
        let started = Instant::now();
        let validated = self.validate_create(body);
        self.with_state(|state| match validated {
            Err(message) => error_response(400, &message, started),
            Ok((seller_id, name, price, statistics)) => {
                state.next_id += 1;
                let id = format!("{:08x}-0000-4000-8000-{:012x}", state.next_id, state.next_id);
                let created_at = OffsetDateTime::now_utc()
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string());
                let item = Item {
                    id: id.clone(),
                    seller_id,
                    name,
                    price,
                    statistics,
                    created_at,
                };
                let payload = item_json(&item);
                state.order.push(id.clone());
                state.items.insert(
                    id,
                    StoredItem {
                        item,
                        deleted: false,
                    },
                );
                GatewayResponse::json(200, payload, started.elapsed())
            }
        })
    }

    fn get_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        let started = Instant::now();
        self.with_state(|state| match lookup(state, id) {
            Lookup::Invalid => error_response(400, "invalid item id", started),
            Lookup::Missing => not_found(id, started),
            Lookup::Found(item) => {
                GatewayResponse::json(200, Value::Array(vec![item_json(item)]), started.elapsed())
            }
        })
    }

    fn list_seller_items(&self, seller_id: &str) -> Result<GatewayResponse, TransportError> {
        let started = Instant::now();
        self.with_state(|state| {
            let seller = match seller_id.parse::<i64>() {
                Ok(seller) if seller >= 0 => seller,
                _ => return error_response(400, "invalid seller id", started),
            };
            if !(SELLER_ID_MIN..=SELLER_ID_MAX).contains(&seller) {
                return error_response(404, &format!("seller {seller} not found"), started);
            }
            let items = state
                .order
                .iter()
                .filter_map(|id| state.items.get(id))
                .filter(|stored| !stored.deleted && stored.item.seller_id == seller)
                .map(|stored| item_json(&stored.item))
                .collect();
            GatewayResponse::json(200, Value::Array(items), started.elapsed())
        })
    }

    fn get_statistics_v1(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.statistics(id)
    }

    fn get_statistics_v2(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.statistics(id)
    }

    fn delete_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        let started = Instant::now();
        self.with_state(|state| {
            if !well_formed_id(id) {
                return error_response(400, "invalid item id", started);
            }
            match state.items.get_mut(id) {
                Some(stored) if !stored.deleted => {
                    stored.deleted = true;
                    GatewayResponse {
                        status: 200,
                        body: None,
                        raw_error: None,
                        elapsed: started.elapsed(),
                    }
                }
                _ => not_found(id, started),
            }
        })
    }
}

impl InMemoryGateway {
    /// Shared statistics handler for both API versions.
    fn statistics(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        let started = Instant::now();
        self.with_state(|state| match lookup(state, id) {
            Lookup::Invalid => error_response(400, "invalid item id", started),
            Lookup::Missing => not_found(id, started),
            Lookup::Found(item) => GatewayResponse::json(
                200,
                Value::Array(vec![item.statistics.to_value()]),
                started.elapsed(),
            ),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Result of an identifier lookup.
enum Lookup<'a> {
    /// Identifier is not well-formed.
    Invalid,
    /// Identifier names no live item.
    Missing,
    /// Live item.
    Found(&'a Item),
}

/// Looks up a live item by identifier.
fn lookup<'a>(state: &'a ServiceState, id: &str) -> Lookup<'a> {
    if !well_formed_id(id) {
        return Lookup::Invalid;
    }
    match state.items.get(id) {
        Some(stored) if !stored.deleted => Lookup::Found(&stored.item),
        _ => Lookup::Missing,
    }
}

/// Returns `true` for identifiers made of ASCII alphanumerics, `-` and `_`.
fn well_formed_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Reads a required integer field.
fn integer_field(map: &Map<String, Value>, field: &str) -> Result<i64, String> {
    match map.get(field) {
        None => Err(format!("{field} is required")),
        Some(value) => value.as_i64().ok_or_else(|| format!("{field} must be an integer")),
    }
}

/// Renders an item as the service's JSON record.
fn item_json(item: &Item) -> Value {
    json!({
        "id": item.id,
        "sellerId": item.seller_id,
        "name": item.name,
        "price": item.price,
        "statistics": item.statistics.to_value(),
        "createdAt": item.created_at,
    })
}

/// Builds an error envelope response.
fn error_response(status: u16, message: &str, started: Instant) -> GatewayResponse {
    GatewayResponse::json(
        status,
        json!({
            "result": { "message": message, "messages": {} },
            "status": status.to_string(),
        }),
        started.elapsed(),
    )
}

/// Builds the 404 envelope for an identifier.
fn not_found(id: &str, started: Instant) -> GatewayResponse {
    error_response(404, &format!("item {id} not found"), started)
}
