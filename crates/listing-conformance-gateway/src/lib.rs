// crates/listing-conformance-gateway/src/lib.rs
// ============================================================================
// Module: Listing Conformance Gateway Library
// Description: HTTP transport for the listing conformance harness.
// Purpose: Implement the core service gateway over blocking HTTP.
// Dependencies: listing-conformance-core, reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`HttpGateway`] is the production [`listing_conformance_core::ServiceGateway`]:
//! one bounded request per call, no retries, no redirects. Non-2xx statuses are
//! returned as data; only transport failures become errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::DEFAULT_BASE_URL;
pub use http::GatewayBuildError;
pub use http::GatewayConfig;
pub use http::HttpGateway;
