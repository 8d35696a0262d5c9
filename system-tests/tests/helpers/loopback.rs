// system-tests/tests/helpers/loopback.rs
// ============================================================================
// Module: Loopback Listing Service
// Description: Serves the in-memory listing service over real HTTP.
// Purpose: Exercise the HTTP gateway and catalog end to end without a network.
// Dependencies: listing-conformance-core, serde_json, tiny_http
// ============================================================================

use std::io;
use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use listing_conformance_core::GatewayResponse;
use listing_conformance_core::InMemoryGateway;
use listing_conformance_core::ServiceGateway;
use serde_json::Value;
use serde_json::json;
use tiny_http::Method;
use tiny_http::Response;
use tiny_http::Server;

/// Handle for a loopback listing service bound to `127.0.0.1`.
pub struct LoopbackService {
    base_url: String,
    server: Arc<Server>,
    service: InMemoryGateway,
    join: Option<thread::JoinHandle<()>>,
}

impl LoopbackService {
    /// Starts a loopback server that follows the documented contract.
    pub fn start() -> io::Result<Self> {
        Self::serve(InMemoryGateway::new())
    }

    /// Starts a loopback server that reproduces the tracked defects.
    pub fn start_with_known_bugs() -> io::Result<Self> {
        Self::serve(InMemoryGateway::with_known_bugs())
    }

    fn serve(service: InMemoryGateway) -> io::Result<Self> {
        let server = Server::http("127.0.0.1:0").map_err(|err| io::Error::other(err.to_string()))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| io::Error::other("loopback server is not bound to an ip address"))?;
        let server = Arc::new(server);
        let worker = Arc::clone(&server);
        let backend = service.clone();
        let join = thread::spawn(move || {
            for mut request in worker.incoming_requests() {
                let mut body = Vec::new();
                if request.as_reader().read_to_end(&mut body).is_err() {
                    let _ = request.respond(Response::from_string("").with_status_code(400));
                    continue;
                }
                let response = route(&backend, request.method(), request.url(), &body);
                let _ = request.respond(into_http(response));
            }
        });
        Ok(Self {
            base_url: format!("http://{addr}"),
            server,
            service,
            join: Some(join),
        })
    }

    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the backing in-memory service.
    pub fn service(&self) -> &InMemoryGateway {
        &self.service
    }
}

impl Drop for LoopbackService {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Dispatches one request to the in-memory service.
///
/// Path segments are matched undecoded, so any percent-escape reaches the
/// service as part of the id and is rejected the same way a direct call is.
fn route(service: &InMemoryGateway, method: &Method, url: &str, body: &[u8]) -> GatewayResponse {
    let path = url.split_once('?').map_or(url, |(path, _)| path);
    let segments = path.trim_start_matches('/').split('/').collect::<Vec<_>>();
    let result = match (method, segments.as_slice()) {
        (Method::Post, ["api", "1", "item"]) => match serde_json::from_slice::<Value>(body) {
            Ok(value) => service.create_item(&value),
            Err(_) => Ok(envelope(400, "request body is not valid json")),
        },
        (Method::Get, ["api", "1", "item", id]) => service.get_item(id),
        (Method::Get, ["api", "1", "statistic", id]) => service.get_statistics_v1(id),
        (Method::Get, ["api", "2", "statistic", id]) => service.get_statistics_v2(id),
        (Method::Delete, ["api", "2", "item", id]) => service.delete_item(id),
        (Method::Get, ["api", "1", seller, "item"]) => service.list_seller_items(seller),
        _ => Ok(envelope(404, "route not found")),
    };
    result.unwrap_or_else(|err| envelope(500, &err.to_string()))
}

/// Builds an error envelope in the service's wire shape.
fn envelope(status: u16, message: &str) -> GatewayResponse {
    GatewayResponse::json(
        status,
        json!({ "result": { "message": message, "messages": {} }, "status": status.to_string() }),
        Duration::ZERO,
    )
}

fn into_http(response: GatewayResponse) -> Response<io::Cursor<Vec<u8>>> {
    let body = match (response.body, response.raw_error) {
        (Some(value), _) => value.to_string(),
        (None, Some(raw)) => raw,
        (None, None) => String::new(),
    };
    Response::from_string(body).with_status_code(response.status)
}
