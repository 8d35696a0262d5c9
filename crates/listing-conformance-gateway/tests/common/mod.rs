// crates/listing-conformance-gateway/tests/common/mod.rs
// ============================================================================
// Module: Gateway Test Helpers
// Description: Local HTTP stubs for gateway tests.
// ============================================================================

//! Shared helpers that serve canned responses and record inbound requests.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Helpers are shared across test binaries with different needs."
)]

use std::net::TcpListener;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use listing_conformance_gateway::GatewayConfig;
use listing_conformance_gateway::HttpGateway;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Request as observed by the stub server.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// HTTP method.
    pub method: String,
    /// Raw request target, still percent-encoded.
    pub url: String,
    /// Lowercased header names with their values.
    pub headers: Vec<(String, String)>,
    /// Request body text.
    pub body: String,
}

impl Recorded {
    /// Returns the first value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(field, _)| *field == name).map(|(_, value)| value.as_str())
    }
}

/// Canned reply served by the stub.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Status code.
    pub status: u16,
    /// Body text.
    pub body: String,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Delay before responding.
    pub delay: Duration,
}

impl Reply {
    /// JSON reply with the given status.
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            delay: Duration::ZERO,
        }
    }

    /// Plain-text reply with the given status.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// Adds a header to the reply.
    pub fn with_header(mut self, field: &str, value: &str) -> Self {
        self.headers.push((field.to_string(), value.to_string()));
        self
    }

    /// Delays the reply.
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serves `replies` in order, one per request, and returns the recorded requests.
pub fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<Recorded>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for reply in replies {
            let Ok(mut request) = server.recv() else {
                break;
            };
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            recorded.push(Recorded {
                method: request.method().as_str().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|header| {
                        (
                            header.field.as_str().as_str().to_ascii_lowercase(),
                            header.value.as_str().to_string(),
                        )
                    })
                    .collect(),
                body,
            });
            if !reply.delay.is_zero() {
                thread::sleep(reply.delay);
            }
            let mut response = Response::from_string(reply.body).with_status_code(reply.status);
            for (field, value) in &reply.headers {
                response = response
                    .with_header(Header::from_bytes(field.as_bytes(), value.as_bytes()).unwrap());
            }
            let _ = request.respond(response);
        }
        recorded
    });
    (format!("http://{addr}"), handle)
}

/// Returns a loopback URL with nothing listening on it.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Builds a gateway for `base_url` with a short timeout.
pub fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(GatewayConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        ..GatewayConfig::default()
    })
    .unwrap()
}
