// crates/listing-conformance-gateway/src/http.rs
// ============================================================================
// Module: HTTP Service Gateway
// Description: Blocking HTTP client for the listing service endpoints.
// Purpose: Issue one bounded request per endpoint call and report raw outcomes.
// Dependencies: listing-conformance-core, reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The HTTP gateway maps each [`Endpoint`] to its documented method and path,
//! percent-encodes identifiers as single path segments, enforces a response
//! size limit and decodes JSON bodies. Bodies that are not JSON are kept as
//! raw text so the oracle can report them.
//!
//! Invariants:
//! - Redirects are not followed.
//! - Every call is bounded by the configured timeout.
//! - Statuses are never turned into errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;
use std::time::Instant;

use listing_conformance_core::Endpoint;
use listing_conformance_core::GatewayResponse;
use listing_conformance_core::ServiceGateway;
use listing_conformance_core::TransportError;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default listing service base URL.
pub const DEFAULT_BASE_URL: &str = "https://qa-internship.avito.com";

/// JSON media type sent in `Accept` and `Content-Type`.
const JSON_MEDIA_TYPE: &str = "application/json";

/// Maximum characters of a non-JSON body kept for diagnostics.
const RAW_BODY_PREVIEW: usize = 2048;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP gateway.
///
/// # Invariants
/// - `base_url` uses `http` or `https` and can carry a path prefix.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - `timeout` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Service base URL.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_response_bytes: 1024 * 1024,
            user_agent: "listing-conformance/0.1".to_string(),
        }
    }
}

/// Errors raised while constructing the gateway.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayBuildError {
    /// The base URL does not parse or cannot carry path segments.
    #[error("invalid base url {url}: {detail}")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
        /// Parse failure.
        detail: String,
    },
    /// The base URL scheme is not `http` or `https`.
    #[error("unsupported base url scheme: {0}")]
    UnsupportedScheme(String),
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Listing service gateway over blocking HTTP.
pub struct HttpGateway {
    /// Parsed base URL.
    base: Url,
    /// Gateway configuration.
    config: GatewayConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpGateway {
    /// Creates a gateway for the configured service.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayBuildError`] when the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayBuildError> {
        let base = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| GatewayBuildError::Client(err.to_string()))?;
        Ok(Self {
            base,
            config,
            client,
        })
    }

    /// Returns the base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Returns the gateway configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Builds the request URL for an endpoint, encoding `segment` as one path segment.
    fn url_for(&self, endpoint: Endpoint, segment: &str) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| TransportError::Request {
                url: self.base.to_string(),
                detail: "base url cannot carry path segments".to_string(),
            })?;
            segments.pop_if_empty();
            match endpoint {
                Endpoint::CreateItem => segments.extend(["api", "1", "item"]),
                Endpoint::GetItem => segments.extend(["api", "1", "item", segment]),
                Endpoint::ListSellerItems => segments.extend(["api", "1", segment, "item"]),
                Endpoint::StatisticsV1 => segments.extend(["api", "1", "statistic", segment]),
                Endpoint::StatisticsV2 => segments.extend(["api", "2", "statistic", segment]),
                Endpoint::DeleteItem => segments.extend(["api", "2", "item", segment]),
            };
        }
        Ok(url)
    }

    /// Sends a request and reads the response within the size limit.
    fn execute(&self, url: &Url, request: RequestBuilder) -> Result<GatewayResponse, TransportError> {
        let started = Instant::now();
        let response = request.send().map_err(|err| map_send_error(url, &err))?;
        let status = response.status().as_u16();
        let bytes = read_response_limited(url, response, self.config.max_response_bytes)?;
        let elapsed = started.elapsed();
        Ok(decode_body(status, &bytes, elapsed))
    }

    /// Issues a JSON-accepting GET for an identifier-addressed endpoint.
    fn get(&self, endpoint: Endpoint, segment: &str) -> Result<GatewayResponse, TransportError> {
        let url = self.url_for(endpoint, segment)?;
        let request = self.client.get(url.clone()).header(ACCEPT, JSON_MEDIA_TYPE);
        self.execute(&url, request)
    }
}

impl ServiceGateway for HttpGateway {
    fn create_item(&self, body: &Value) -> Result<GatewayResponse, TransportError> {
        let url = self.url_for(Endpoint::CreateItem, "")?;
        let payload = serde_json::to_vec(body).map_err(|err| TransportError::Request {
            url: url.to_string(),
            detail: err.to_string(),
        })?;
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .body(payload);
        self.execute(&url, request)
    }

    fn get_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.get(Endpoint::GetItem, id)
    }

    fn list_seller_items(&self, seller_id: &str) -> Result<GatewayResponse, TransportError> {
        self.get(Endpoint::ListSellerItems, seller_id)
    }

    fn get_statistics_v1(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.get(Endpoint::StatisticsV1, id)
    }

    fn get_statistics_v2(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.get(Endpoint::StatisticsV2, id)
    }

    fn delete_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        let url = self.url_for(Endpoint::DeleteItem, id)?;
        let request = self.client.delete(url.clone()).header(ACCEPT, JSON_MEDIA_TYPE);
        self.execute(&url, request)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates the base URL.
fn parse_base_url(raw: &str) -> Result<Url, GatewayBuildError> {
    let url = Url::parse(raw).map_err(|err| GatewayBuildError::InvalidBaseUrl {
        url: raw.to_string(),
        detail: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(GatewayBuildError::UnsupportedScheme(other.to_string())),
    }
    if url.cannot_be_a_base() {
        return Err(GatewayBuildError::InvalidBaseUrl {
            url: raw.to_string(),
            detail: "url cannot be a base".to_string(),
        });
    }
    Ok(url)
}

/// Maps reqwest send errors to transport errors.
fn map_send_error(url: &Url, error: &reqwest::Error) -> TransportError {
    let url = url.to_string();
    if error.is_timeout() {
        TransportError::Timeout {
            url,
        }
    } else if error.is_connect() {
        TransportError::Connect {
            url,
            detail: error.to_string(),
        }
    } else if error.is_body() || error.is_decode() {
        TransportError::Malformed {
            url,
            detail: error.to_string(),
        }
    } else {
        TransportError::Request {
            url,
            detail: error.to_string(),
        }
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(
    url: &Url,
    response: Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let too_large = || TransportError::Malformed {
        url: url.to_string(),
        detail: format!("response exceeds {max_bytes} bytes"),
    };
    let max_bytes_u64 = u64::try_from(max_bytes).map_err(|_| too_large())?;
    if let Some(length) = response.content_length()
        && length > max_bytes_u64
    {
        return Err(too_large());
    }
    let mut limited = response.take(max_bytes_u64.saturating_add(1));
    let mut buf = Vec::new();
    limited.read_to_end(&mut buf).map_err(|err| {
        if err.kind() == std::io::ErrorKind::TimedOut {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Malformed {
                url: url.to_string(),
                detail: err.to_string(),
            }
        }
    })?;
    if buf.len() > max_bytes {
        return Err(too_large());
    }
    Ok(buf)
}

/// Decodes a response body as JSON, keeping non-JSON text as a raw error.
fn decode_body(status: u16, bytes: &[u8], elapsed: Duration) -> GatewayResponse {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return GatewayResponse {
            status,
            body: None,
            raw_error: None,
            elapsed,
        };
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(body) => GatewayResponse::json(status, body, elapsed),
        Err(_) => {
            let text = String::from_utf8_lossy(bytes);
            GatewayResponse {
                status,
                body: None,
                raw_error: Some(text.chars().take(RAW_BODY_PREVIEW).collect()),
                elapsed,
            }
        }
    }
}
