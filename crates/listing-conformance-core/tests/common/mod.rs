// crates/listing-conformance-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared gateways and configs for listing-conformance-core tests.
// Purpose: Inject transport faults and read lag around the in-memory service.
// Dependencies: listing-conformance-core, serde_json
// ============================================================================

//! ## Overview
//! Provides a fault-injecting gateway wrapper and fast runner settings.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers are shared across test binaries that use different subsets."
)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use listing_conformance_core::Endpoint;
use listing_conformance_core::GatewayResponse;
use listing_conformance_core::InMemoryGateway;
use listing_conformance_core::RetryPolicy;
use listing_conformance_core::RunnerConfig;
use listing_conformance_core::ServiceGateway;
use listing_conformance_core::TransportError;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Runner Settings
// ============================================================================

/// Runner configuration with millisecond backoff and a fixed seed.
pub fn fast_config() -> RunnerConfig {
    RunnerConfig {
        read_retry: RetryPolicy {
            attempts: 3,
            backoff: Duration::from_millis(1),
        },
        seed: Some(42),
        ..RunnerConfig::default()
    }
}

// ============================================================================
// SECTION: Fault Injection
// ============================================================================

/// Fault injected in place of a real answer.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Answer with this status and an error body.
    Status(u16),
    /// Fail with a transport timeout.
    Timeout,
    /// Answer 200 with a body that is not JSON.
    NotJson,
    /// Sleep before delegating.
    Delay(Duration),
}

/// Wraps the in-memory service and replaces answers on one endpoint.
pub struct FaultyGateway {
    /// Wrapped service.
    pub inner: InMemoryGateway,
    /// Endpoint whose answers are replaced.
    endpoint: Endpoint,
    /// Replacement answer.
    fault: Fault,
    /// Remaining injections.
    remaining: AtomicUsize,
    /// Calls seen on the faulty endpoint.
    calls: AtomicUsize,
}

impl FaultyGateway {
    /// Injects `fault` on every call to `endpoint`.
    pub fn always(inner: InMemoryGateway, endpoint: Endpoint, fault: Fault) -> Self {
        Self::times(inner, endpoint, fault, usize::MAX)
    }

    /// Injects `fault` on the first `times` calls to `endpoint`.
    pub const fn times(
        inner: InMemoryGateway,
        endpoint: Endpoint,
        fault: Fault,
        times: usize,
    ) -> Self {
        Self {
            inner,
            endpoint,
            fault,
            remaining: AtomicUsize::new(times),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls seen on the faulty endpoint.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn intercept(
        &self,
        endpoint: Endpoint,
        delegate: impl FnOnce() -> Result<GatewayResponse, TransportError>,
    ) -> Result<GatewayResponse, TransportError> {
        if endpoint != self.endpoint {
            return delegate();
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fire = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if !fire {
            return delegate();
        }
        match self.fault {
            Fault::Status(status) => Ok(GatewayResponse::json(
                status,
                json!({"result": {"message": "injected", "messages": {}}, "status": status.to_string()}),
                Duration::from_millis(1),
            )),
            Fault::Timeout => Err(TransportError::Timeout {
                url: format!("memory://{}", endpoint.as_str()),
            }),
            Fault::NotJson => Ok(GatewayResponse {
                status: 200,
                body: None,
                raw_error: Some("<html>oops</html>".to_string()),
                elapsed: Duration::from_millis(1),
            }),
            Fault::Delay(delay) => {
                std::thread::sleep(delay);
                delegate().map(|mut response| {
                    response.elapsed += delay;
                    response
                })
            }
        }
    }
}

impl ServiceGateway for FaultyGateway {
    fn create_item(&self, body: &Value) -> Result<GatewayResponse, TransportError> {
        self.intercept(Endpoint::CreateItem, || self.inner.create_item(body))
    }

    fn get_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.intercept(Endpoint::GetItem, || self.inner.get_item(id))
    }

    fn list_seller_items(&self, seller_id: &str) -> Result<GatewayResponse, TransportError> {
        self.intercept(Endpoint::ListSellerItems, || self.inner.list_seller_items(seller_id))
    }

    fn get_statistics_v1(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.intercept(Endpoint::StatisticsV1, || self.inner.get_statistics_v1(id))
    }

    fn get_statistics_v2(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.intercept(Endpoint::StatisticsV2, || self.inner.get_statistics_v2(id))
    }

    fn delete_item(&self, id: &str) -> Result<GatewayResponse, TransportError> {
        self.intercept(Endpoint::DeleteItem, || self.inner.delete_item(id))
    }
}
