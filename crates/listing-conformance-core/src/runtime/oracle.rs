// crates/listing-conformance-core/src/runtime/oracle.rs
// ============================================================================
// Module: Conformance Oracle
// Description: Expected-behavior model for the listing service.
// Purpose: Decide whether an observed response is acceptable for a fixture.
// Dependencies: crate::{core, interfaces}, serde, serde_json
// ============================================================================

//! ## Overview
//! The oracle maps every endpoint and [`FixtureKind`] pair to an
//! [`Expectation`]: an allowed status set, a body contract checked on the
//! primary status, and an optional tracked bug. Evaluation is pure and runs in
//! a fixed order:
//! 1. Any 5xx fails as a server error.
//! 2. A status outside the allowed set fails (annotated when a bug is tracked).
//! 3. The body contract is checked on its primary status.
//! 4. Statuses admitted from an ambiguous set yield inconclusive.
//!
//! Cross-endpoint checks (v1/v2 equality, error-status consistency, stable
//! reads, seller listings, response budgets) are separate predicates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::core::fixtures::AdversarialKind;
use crate::core::fixtures::BoundaryCase;
use crate::core::fixtures::Fixture;
use crate::core::fixtures::FixtureKind;
use crate::core::fixtures::SellerIdCase;
use crate::core::model::Item;
use crate::core::model::ItemDraft;
use crate::core::model::Statistics;
use crate::core::model::inspect_item;
use crate::core::model::inspect_statistics;
use crate::core::model::json_type;
use crate::core::model::statistics_mismatches;
use crate::core::verdict::KnownBug;
use crate::core::verdict::ResponseClass;
use crate::core::verdict::StatusExpectation;
use crate::core::verdict::Verdict;
use crate::core::verdict::Violation;
use crate::core::verdict::ViolationKind;
use crate::interfaces::Endpoint;
use crate::interfaces::GatewayResponse;
use crate::interfaces::TransportError;

// ============================================================================
// SECTION: Status Sets
// ============================================================================

/// Client-error set for invalid identifiers.
const CLIENT_ERRORS: &[u16] = &[400, 404];
/// Create statuses left open by the contract.
const CREATE_OPEN: &[u16] = &[200, 400];
/// Listing statuses for zero and very large seller identifiers.
const SELLER_OUT_OF_RANGE: &[u16] = &[200, 400, 404];
/// Listing statuses for in-range sellers that may not exist.
const SELLER_MISSING: &[u16] = &[200, 404];
/// Statistics v2 success statuses.
const V2_SUCCESS: &[u16] = &[200, 100];

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Body check applied on the expectation's primary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyContract {
    /// Body is not asserted.
    Unchecked,
    /// 200 body is a full item matching the submitted draft.
    CreatedItem,
    /// 200 body is a non-empty item list whose first element is the requested item.
    ItemList,
    /// 200 body is an item list whose elements all belong to the requested seller.
    SellerItemList,
    /// 200 body is a non-empty statistics list.
    StatisticsList,
    /// 404 body is an object carrying `result` and `status`.
    NotFoundEnvelope,
}

impl BodyContract {
    /// Returns the status the contract applies to.
    #[must_use]
    pub const fn primary_status(self) -> Option<u16> {
        match self {
            Self::Unchecked => None,
            Self::CreatedItem | Self::ItemList | Self::SellerItemList | Self::StatisticsList => {
                Some(200)
            }
            Self::NotFoundEnvelope => Some(404),
        }
    }
}

/// Expected behavior for one endpoint and fixture kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expectation {
    /// Allowed statuses.
    pub status: StatusExpectation,
    /// Body check on the primary status.
    pub body: BodyContract,
    /// Tracked defect that currently breaks this expectation.
    pub known_bug: Option<KnownBug>,
}

impl Expectation {
    /// Expectation without a body contract.
    const fn status(status: StatusExpectation) -> Self {
        Self {
            status,
            body: BodyContract::Unchecked,
            known_bug: None,
        }
    }

    /// Expectation with a body contract.
    const fn with_body(status: StatusExpectation, body: BodyContract) -> Self {
        Self {
            status,
            body,
            known_bug: None,
        }
    }
}

// ============================================================================
// SECTION: Oracle
// ============================================================================

/// Pure model of documented listing service behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConformanceOracle;

impl ConformanceOracle {
    /// Creates the oracle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the expectation for `kind` sent to `endpoint`.
    #[must_use]
    pub const fn expectation(&self, endpoint: Endpoint, kind: FixtureKind) -> Expectation {
        match endpoint {
            Endpoint::CreateItem => create_expectation(kind),
            Endpoint::GetItem => match kind {
                FixtureKind::ExistingItemId => {
                    Expectation::with_body(StatusExpectation::Exact(200), BodyContract::ItemList)
                }
                FixtureKind::DeletedItemId => Expectation::status(StatusExpectation::Exact(404)),
                FixtureKind::UnknownItemId => Expectation::with_body(
                    StatusExpectation::Exact(404),
                    BodyContract::NotFoundEnvelope,
                ),
                _ => Expectation::status(StatusExpectation::OneOf(CLIENT_ERRORS)),
            },
            Endpoint::ListSellerItems => match kind {
                FixtureKind::SellerId(
                    SellerIdCase::Random | SellerIdCase::Min | SellerIdCase::Max,
                ) => Expectation::with_body(
                    StatusExpectation::Exact(200),
                    BodyContract::SellerItemList,
                ),
                FixtureKind::SellerId(SellerIdCase::BelowRange) => Expectation::with_body(
                    StatusExpectation::Ambiguous(SELLER_MISSING),
                    BodyContract::SellerItemList,
                ),
                FixtureKind::SellerId(SellerIdCase::Zero | SellerIdCase::VeryLarge) => {
                    Expectation::with_body(
                        StatusExpectation::Ambiguous(SELLER_OUT_OF_RANGE),
                        BodyContract::SellerItemList,
                    )
                }
                _ => Expectation::status(StatusExpectation::OneOf(CLIENT_ERRORS)),
            },
            Endpoint::StatisticsV1 => match kind {
                FixtureKind::ExistingItemId => Expectation::with_body(
                    StatusExpectation::Exact(200),
                    BodyContract::StatisticsList,
                ),
                FixtureKind::DeletedItemId | FixtureKind::UnknownItemId => {
                    Expectation::status(StatusExpectation::Exact(404))
                }
                _ => Expectation::status(StatusExpectation::OneOf(CLIENT_ERRORS)),
            },
            Endpoint::StatisticsV2 => match kind {
                FixtureKind::ExistingItemId => Expectation::with_body(
                    StatusExpectation::OneOf(V2_SUCCESS),
                    BodyContract::StatisticsList,
                ),
                FixtureKind::DeletedItemId | FixtureKind::UnknownItemId => {
                    Expectation::status(StatusExpectation::Exact(404))
                }
                _ => Expectation::status(StatusExpectation::OneOf(CLIENT_ERRORS)),
            },
            Endpoint::DeleteItem => Expectation::status(StatusExpectation::NotServerError),
        }
    }

    /// Judges a transport outcome; transport failures fail the check.
    #[must_use]
    pub fn evaluate_outcome(
        &self,
        endpoint: Endpoint,
        fixture: &Fixture,
        outcome: &Result<GatewayResponse, TransportError>,
    ) -> Verdict {
        match outcome {
            Ok(response) => self.evaluate(endpoint, fixture, response),
            Err(err) => Verdict::fail(ViolationKind::Transport, err.to_string()),
        }
    }

    /// Judges a response to `fixture` sent to `endpoint`.
    #[must_use]
    pub fn evaluate(
        &self,
        endpoint: Endpoint,
        fixture: &Fixture,
        response: &GatewayResponse,
    ) -> Verdict {
        let expectation = self.expectation(endpoint, fixture.kind);
        let status = response.status;
        if ResponseClass::of(status) == ResponseClass::ServerError {
            return Verdict::fail(
                ViolationKind::ServerError,
                format!("{} answered {status} for {}", endpoint.as_str(), fixture.kind),
            );
        }
        if !expectation.status.admits(status) {
            let detail = format!(
                "{} expected {} for {}, got {status}",
                endpoint.as_str(),
                expectation.status,
                fixture.kind
            );
            return match expectation.known_bug {
                Some(bug) => Verdict::Fail(Violation::known_bug(bug, detail)),
                None => Verdict::fail(ViolationKind::UnexpectedStatus, detail),
            };
        }
        let body = if expectation.body.primary_status() == Some(status) {
            check_body(expectation.body, fixture, response)
        } else {
            Verdict::Pass
        };
        if body.is_fail() {
            return body;
        }
        if expectation.status.is_ambiguous() {
            return Verdict::Inconclusive(format!(
                "{} answered {status} from allowed set {}",
                endpoint.as_str(),
                expectation.status
            ));
        }
        if endpoint == Endpoint::StatisticsV2 && status == 100 {
            return Verdict::Inconclusive("statistics_v2 answered 100".to_string());
        }
        body
    }

    /// Checks that v1 and v2 statistics agree when both succeed.
    #[must_use]
    pub fn compare_statistics(&self, v1: &GatewayResponse, v2: &GatewayResponse) -> Verdict {
        if let Some(verdict) = server_error_of(&[("statistics_v1", v1), ("statistics_v2", v2)]) {
            return verdict;
        }
        if v1.status != 200 || v2.status != 200 {
            return Verdict::Inconclusive(format!(
                "versions not comparable: v1 answered {}, v2 answered {}",
                v1.status, v2.status
            ));
        }
        let first_v1 = match first_statistics(v1) {
            Ok(stats) => stats,
            Err(detail) => {
                return Verdict::fail(ViolationKind::ContractViolation, format!("v1: {detail}"));
            }
        };
        let first_v2 = match first_statistics(v2) {
            Ok(stats) => stats,
            Err(detail) => {
                return Verdict::fail(ViolationKind::ContractViolation, format!("v2: {detail}"));
            }
        };
        let diffs = statistics_mismatches(&first_v1, &first_v2);
        if diffs.is_empty() {
            Verdict::Pass
        } else {
            Verdict::fail(
                ViolationKind::ContractViolation,
                format!("v2 differs from v1: {}", diffs.join("; ")),
            )
        }
    }

    /// Checks that both statistics versions reject an invalid identifier with 4xx.
    #[must_use]
    pub fn compare_error_statuses(&self, v1: &GatewayResponse, v2: &GatewayResponse) -> Verdict {
        if let Some(verdict) = server_error_of(&[("statistics_v1", v1), ("statistics_v2", v2)]) {
            return verdict;
        }
        let off = [("statistics_v1", v1.status), ("statistics_v2", v2.status)]
            .into_iter()
            .filter(|(_, status)| ResponseClass::of(*status) != ResponseClass::ClientError)
            .map(|(label, status)| format!("{label} answered {status}"))
            .collect::<Vec<_>>();
        if off.is_empty() {
            Verdict::Pass
        } else {
            Verdict::fail(
                ViolationKind::UnexpectedStatus,
                format!("expected 4xx from both versions: {}", off.join(", ")),
            )
        }
    }

    /// Checks that back-to-back reads return the same item every time.
    #[must_use]
    pub fn check_stable_reads(&self, item_id: &str, responses: &[GatewayResponse]) -> Verdict {
        let mut baseline: Option<Item> = None;
        for (index, response) in responses.iter().enumerate() {
            if response.is_server_error() {
                return Verdict::fail(
                    ViolationKind::ServerError,
                    format!("read {} answered {}", index + 1, response.status),
                );
            }
            if response.status != 200 {
                return Verdict::fail(
                    ViolationKind::UnexpectedStatus,
                    format!("read {} expected 200, got {}", index + 1, response.status),
                );
            }
            let item = match first_item(response) {
                Ok(item) => item,
                Err(detail) => {
                    return Verdict::fail(
                        ViolationKind::ContractViolation,
                        format!("read {}: {detail}", index + 1),
                    );
                }
            };
            if item.id != item_id {
                return Verdict::fail(
                    ViolationKind::ContractViolation,
                    format!("read {} returned id {} instead of {item_id}", index + 1, item.id),
                );
            }
            match &baseline {
                None => baseline = Some(item),
                Some(first) if *first != item => {
                    return Verdict::fail(
                        ViolationKind::ContractViolation,
                        format!("read {} differs from read 1", index + 1),
                    );
                }
                Some(_) => {}
            }
        }
        Verdict::Pass
    }

    /// Checks a seller listing: ownership, expected items with their fields, and size.
    #[must_use]
    pub fn check_listing_contains(
        &self,
        response: &GatewayResponse,
        seller_id: i64,
        expected: &[(&str, &ItemDraft)],
        min_items: usize,
    ) -> Verdict {
        if response.is_server_error() {
            return Verdict::fail(
                ViolationKind::ServerError,
                format!("list_seller_items answered {}", response.status),
            );
        }
        if response.status != 200 {
            return Verdict::fail(
                ViolationKind::UnexpectedStatus,
                format!("list_seller_items expected 200, got {}", response.status),
            );
        }
        let items = match item_list(response) {
            Ok(items) => items,
            Err(detail) => return Verdict::fail(ViolationKind::ContractViolation, detail),
        };
        let mut problems = Vec::new();
        for item in &items {
            if item.seller_id != seller_id {
                problems.push(format!("item {} belongs to seller {}", item.id, item.seller_id));
            }
        }
        for (id, draft) in expected {
            match items.iter().find(|item| item.id == *id) {
                None => problems.push(format!("item {id} missing from listing")),
                Some(item) => problems.extend(
                    draft.mismatches(item).into_iter().map(|diff| format!("item {id}: {diff}")),
                ),
            }
        }
        if items.len() < min_items {
            problems.push(format!("listing has {} items, expected at least {min_items}", items.len()));
        }
        if problems.is_empty() {
            Verdict::Pass
        } else {
            Verdict::fail(ViolationKind::ContractViolation, problems.join("; "))
        }
    }

    /// Checks a soft response-time budget.
    #[must_use]
    pub fn check_response_time(&self, elapsed: Duration, budget: Duration) -> Verdict {
        if elapsed < budget {
            Verdict::Pass
        } else {
            Verdict::fail(
                ViolationKind::SlowResponse,
                format!(
                    "response took {} ms, budget {} ms",
                    elapsed.as_millis(),
                    budget.as_millis()
                ),
            )
        }
    }
}

// ============================================================================
// SECTION: Create Expectations
// ============================================================================

/// Expectation table for `POST /api/1/item`.
const fn create_expectation(kind: FixtureKind) -> Expectation {
    let accepted = Expectation::with_body(StatusExpectation::Exact(200), BodyContract::CreatedItem);
    let rejected = Expectation::status(StatusExpectation::Exact(400));
    let open = Expectation::with_body(StatusExpectation::Ambiguous(CREATE_OPEN), BodyContract::CreatedItem);
    match kind {
        FixtureKind::ValidItem
        | FixtureKind::Boundary(
            BoundaryCase::SellerIdMin
            | BoundaryCase::SellerIdMax
            | BoundaryCase::PriceMin
            | BoundaryCase::ZeroStatistics
            | BoundaryCase::MaxValues,
        )
        | FixtureKind::AdversarialName(
            AdversarialKind::SqlInjection
            | AdversarialKind::ScriptTag
            | AdversarialKind::PathTraversal
            | AdversarialKind::SpecialCharacters
            | AdversarialKind::Unicode
            | AdversarialKind::Keyword
            | AdversarialKind::NumericLike
            | AdversarialKind::Freeform,
        ) => accepted,
        FixtureKind::ExtraField
        | FixtureKind::Boundary(BoundaryCase::OversizeName)
        | FixtureKind::AdversarialName(
            AdversarialKind::Oversize
            | AdversarialKind::Whitespace
            | AdversarialKind::ControlCharacter,
        ) => open,
        FixtureKind::KnownBug(bug) => Expectation {
            status: StatusExpectation::Exact(400),
            body: BodyContract::Unchecked,
            known_bug: Some(bug),
        },
        FixtureKind::MissingField(_)
        | FixtureKind::TypeMismatch(_)
        | FixtureKind::AllFieldsMistyped
        | FixtureKind::Boundary(
            BoundaryCase::SellerIdBelowMin
            | BoundaryCase::SellerIdAboveMax
            | BoundaryCase::PriceZero
            | BoundaryCase::EmptyName,
        )
        | FixtureKind::AdversarialName(AdversarialKind::Empty)
        | FixtureKind::ExistingItemId
        | FixtureKind::DeletedItemId
        | FixtureKind::UnknownItemId
        | FixtureKind::MalformedItemId(_)
        | FixtureKind::SellerId(_) => rejected,
    }
}

// ============================================================================
// SECTION: Body Checks
// ============================================================================

/// Applies a body contract to a response on its primary status.
fn check_body(contract: BodyContract, fixture: &Fixture, response: &GatewayResponse) -> Verdict {
    let problems = match contract {
        BodyContract::Unchecked => Vec::new(),
        BodyContract::CreatedItem => created_item_problems(fixture, response),
        BodyContract::ItemList => item_list_problems(fixture, response),
        BodyContract::SellerItemList => seller_list_problems(fixture, response),
        BodyContract::StatisticsList => statistics_list_problems(fixture, response),
        BodyContract::NotFoundEnvelope => not_found_problems(response),
    };
    if problems.is_empty() {
        Verdict::Pass
    } else {
        Verdict::fail(ViolationKind::ContractViolation, problems.join("; "))
    }
}

/// Problems with a create response body.
fn created_item_problems(fixture: &Fixture, response: &GatewayResponse) -> Vec<String> {
    let Some(body) = json_body(response) else {
        return vec![missing_body(response)];
    };
    match inspect_item(body) {
        Ok(item) => fixture.draft.as_ref().map_or_else(Vec::new, |draft| draft.mismatches(&item)),
        Err(problems) => problems,
    }
}

/// Problems with a get-item response body.
fn item_list_problems(fixture: &Fixture, response: &GatewayResponse) -> Vec<String> {
    let item = match first_item(response) {
        Ok(item) => item,
        Err(detail) => return vec![detail],
    };
    let mut problems = Vec::new();
    if let Some(id) = fixture.identifier()
        && item.id != id
    {
        problems.push(format!("list[0].id {} != requested {id}", item.id));
    }
    if let Some(draft) = &fixture.draft {
        problems.extend(draft.mismatches(&item));
    }
    problems
}

/// Problems with a seller listing body.
fn seller_list_problems(fixture: &Fixture, response: &GatewayResponse) -> Vec<String> {
    let items = match item_list(response) {
        Ok(items) => items,
        Err(detail) => return vec![detail],
    };
    let seller = fixture.identifier().and_then(|raw| raw.parse::<i64>().ok());
    let Some(seller) = seller else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| item.seller_id != seller)
        .map(|item| format!("item {} belongs to seller {}, requested {seller}", item.id, item.seller_id))
        .collect()
}

/// Problems with a statistics response body.
fn statistics_list_problems(fixture: &Fixture, response: &GatewayResponse) -> Vec<String> {
    let Some(body) = json_body(response) else {
        return vec![missing_body(response)];
    };
    let Value::Array(entries) = body else {
        return vec![format!("statistics body must be a list, got {}", json_type(body))];
    };
    if entries.is_empty() {
        return vec!["statistics list is empty".to_string()];
    }
    let mut problems = Vec::new();
    let mut first = None;
    for (index, entry) in entries.iter().enumerate() {
        match inspect_statistics(entry) {
            Ok(stats) => {
                if first.is_none() {
                    first = Some(stats);
                }
            }
            Err(inner) => {
                problems.extend(inner.into_iter().map(|problem| format!("list[{index}]: {problem}")));
            }
        }
    }
    if let (Some(observed), Some(draft)) = (first, &fixture.draft) {
        problems.extend(statistics_mismatches(&draft.statistics, &observed));
    }
    problems
}

/// Problems with a not-found body.
fn not_found_problems(response: &GatewayResponse) -> Vec<String> {
    let Some(body) = json_body(response) else {
        return vec![missing_body(response)];
    };
    let Value::Object(map) = body else {
        return vec![format!("not-found body must be an object, got {}", json_type(body))];
    };
    ["result", "status"]
        .into_iter()
        .filter(|field| !map.contains_key(*field))
        .map(|field| format!("not-found body lacks '{field}'"))
        .collect()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a server-error verdict for the first 5xx response, if any.
fn server_error_of(responses: &[(&str, &GatewayResponse)]) -> Option<Verdict> {
    responses.iter().find(|(_, response)| response.is_server_error()).map(|(label, response)| {
        Verdict::fail(ViolationKind::ServerError, format!("{label} answered {}", response.status))
    })
}

/// Returns the decoded JSON body, if present.
const fn json_body(response: &GatewayResponse) -> Option<&Value> {
    response.body.as_ref()
}

/// Describes a response with no JSON body.
fn missing_body(response: &GatewayResponse) -> String {
    match &response.raw_error {
        Some(raw) => format!("body is not JSON: {raw}"),
        None => "body is empty".to_string(),
    }
}

/// Decodes an item list body, reporting the first shape problem found.
fn item_list(response: &GatewayResponse) -> Result<Vec<Item>, String> {
    let body = json_body(response).ok_or_else(|| missing_body(response))?;
    let Value::Array(entries) = body else {
        return Err(format!("body must be a list, got {}", json_type(body)));
    };
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            inspect_item(entry).map_err(|problems| format!("list[{index}]: {}", problems.join(", ")))
        })
        .collect()
}

/// Decodes the first item of a non-empty item list body.
fn first_item(response: &GatewayResponse) -> Result<Item, String> {
    let mut items = item_list(response)?;
    if items.is_empty() {
        return Err("item list is empty".to_string());
    }
    Ok(items.swap_remove(0))
}

/// Decodes the first statistics record of a statistics list body.
fn first_statistics(response: &GatewayResponse) -> Result<Statistics, String> {
    let body = json_body(response).ok_or_else(|| missing_body(response))?;
    let Value::Array(entries) = body else {
        return Err(format!("statistics body must be a list, got {}", json_type(body)));
    };
    let first = entries.first().ok_or_else(|| "statistics list is empty".to_string())?;
    inspect_statistics(first).map_err(|problems| problems.join(", "))
}
