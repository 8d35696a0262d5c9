// crates/listing-conformance-core/src/interfaces/mod.rs
// ============================================================================
// Module: Listing Conformance Interfaces
// Description: Transport-agnostic contract for the listing service gateway.
// Purpose: Define the seam between the runner and any transport.
// Dependencies: crate::core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`ServiceGateway`] exposes one call per documented endpoint. Every HTTP
//! status, including 4xx and 5xx, is a normal [`GatewayResponse`]; only
//! timeouts, connection failures and malformed transport responses surface as
//! [`TransportError`]. Gateways never retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::fixtures::FixturePayload;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Documented listing service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// `POST /api/1/item`.
    CreateItem,
    /// `GET /api/1/item/{id}`.
    GetItem,
    /// `GET /api/1/{sellerId}/item`.
    ListSellerItems,
    /// `GET /api/1/statistic/{id}`.
    StatisticsV1,
    /// `GET /api/2/statistic/{id}`.
    StatisticsV2,
    /// `DELETE /api/2/item/{id}`.
    DeleteItem,
}

impl Endpoint {
    /// Every endpoint.
    pub const ALL: [Self; 6] = [
        Self::CreateItem,
        Self::GetItem,
        Self::ListSellerItems,
        Self::StatisticsV1,
        Self::StatisticsV2,
        Self::DeleteItem,
    ];

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::CreateItem => "POST",
            Self::DeleteItem => "DELETE",
            Self::GetItem | Self::ListSellerItems | Self::StatisticsV1 | Self::StatisticsV2 => {
                "GET"
            }
        }
    }

    /// Returns the documented path template.
    #[must_use]
    pub const fn path_template(self) -> &'static str {
        match self {
            Self::CreateItem => "/api/1/item",
            Self::GetItem => "/api/1/item/{id}",
            Self::ListSellerItems => "/api/1/{sellerId}/item",
            Self::StatisticsV1 => "/api/1/statistic/{id}",
            Self::StatisticsV2 => "/api/2/statistic/{id}",
            Self::DeleteItem => "/api/2/item/{id}",
        }
    }

    /// Returns a stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateItem => "create_item",
            Self::GetItem => "get_item",
            Self::ListSellerItems => "list_seller_items",
            Self::StatisticsV1 => "statistics_v1",
            Self::StatisticsV2 => "statistics_v2",
            Self::DeleteItem => "delete_item",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path_template())
    }
}

// ============================================================================
// SECTION: Responses and Errors
// ============================================================================

/// Observed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body, when the body parsed as JSON.
    pub body: Option<Value>,
    /// Raw body text or decode error when the body was not JSON.
    pub raw_error: Option<String>,
    /// Wall-clock time of the exchange.
    pub elapsed: Duration,
}

impl GatewayResponse {
    /// Creates a response with a JSON body.
    #[must_use]
    pub const fn json(status: u16, body: Value, elapsed: Duration) -> Self {
        Self {
            status,
            body: Some(body),
            raw_error: None,
            elapsed,
        }
    }

    /// Returns the elapsed time in whole milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    /// Returns `true` for 5xx statuses.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status <= 599
    }
}

/// Transport-level failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timeout: {url}")]
    Timeout {
        /// Request URL.
        url: String,
    },
    /// The connection could not be established.
    #[error("connection error: {url}: {detail}")]
    Connect {
        /// Request URL.
        url: String,
        /// Underlying failure.
        detail: String,
    },
    /// The response could not be read at the transport level.
    #[error("malformed response from {url}: {detail}")]
    Malformed {
        /// Request URL.
        url: String,
        /// Underlying failure.
        detail: String,
    },
    /// The request could not be built or sent.
    #[error("request failed: {url}: {detail}")]
    Request {
        /// Request URL or endpoint label.
        url: String,
        /// Underlying failure.
        detail: String,
    },
}

impl TransportError {
    /// Returns a stable label for the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout {
                ..
            } => "timeout",
            Self::Connect {
                ..
            } => "connect",
            Self::Malformed {
                ..
            } => "malformed",
            Self::Request {
                ..
            } => "request",
        }
    }
}

// ============================================================================
// SECTION: Service Gateway
// ============================================================================

/// Transport for the listing service.
pub trait ServiceGateway {
    /// Calls `POST /api/1/item` with `body`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    fn create_item(&self, body: &Value) -> Result<GatewayResponse, TransportError>;

    /// Calls `GET /api/1/item/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    fn get_item(&self, id: &str) -> Result<GatewayResponse, TransportError>;

    /// Calls `GET /api/1/{sellerId}/item`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    fn list_seller_items(&self, seller_id: &str) -> Result<GatewayResponse, TransportError>;

    /// Calls `GET /api/1/statistic/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    fn get_statistics_v1(&self, id: &str) -> Result<GatewayResponse, TransportError>;

    /// Calls `GET /api/2/statistic/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    fn get_statistics_v2(&self, id: &str) -> Result<GatewayResponse, TransportError>;

    /// Calls `DELETE /api/2/item/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was obtained.
    fn delete_item(&self, id: &str) -> Result<GatewayResponse, TransportError>;

    /// Dispatches `payload` to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the payload shape does not fit
    /// the endpoint, or any transport failure from the call itself.
    fn call(
        &self,
        endpoint: Endpoint,
        payload: &FixturePayload,
    ) -> Result<GatewayResponse, TransportError> {
        match (endpoint, payload) {
            (Endpoint::CreateItem, FixturePayload::Item(body)) => self.create_item(body),
            (Endpoint::GetItem, FixturePayload::Identifier(id)) => self.get_item(id),
            (Endpoint::ListSellerItems, FixturePayload::Identifier(id)) => {
                self.list_seller_items(id)
            }
            (Endpoint::StatisticsV1, FixturePayload::Identifier(id)) => self.get_statistics_v1(id),
            (Endpoint::StatisticsV2, FixturePayload::Identifier(id)) => self.get_statistics_v2(id),
            (Endpoint::DeleteItem, FixturePayload::Identifier(id)) => self.delete_item(id),
            (endpoint, _) => Err(TransportError::Request {
                url: endpoint.path_template().to_string(),
                detail: format!("payload shape not accepted by {}", endpoint.as_str()),
            }),
        }
    }
}

impl<G: ServiceGateway + ?Sized> ServiceGateway for &G {
    fn create_item(&self, body: &Value) -> Result<GatewayResponse, TransportError> {
        (**self).create_item(body)
    }

    fn get_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).get_item(id)
    }

    fn list_seller_items(&self, seller_id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).list_seller_items(seller_id)
    }

    fn get_statistics_v1(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).get_statistics_v1(id)
    }

    fn get_statistics_v2(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).get_statistics_v2(id)
    }

    fn delete_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).delete_item(id)
    }
}

impl<G: ServiceGateway + ?Sized> ServiceGateway for Box<G> {
    fn create_item(&self, body: &Value) -> Result<GatewayResponse, TransportError> {
        (**self).create_item(body)
    }

    fn get_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).get_item(id)
    }

    fn list_seller_items(&self, seller_id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).list_seller_items(seller_id)
    }

    fn get_statistics_v1(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).get_statistics_v1(id)
    }

    fn get_statistics_v2(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).get_statistics_v2(id)
    }

    fn delete_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        (**self).delete_item(id)
    }
}
