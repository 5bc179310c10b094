//! Integration tests using WireMock
//!
//! These tests drive the client through the real reqwest transport against a
//! mock HTTP server, covering wire paths, authentication and retries.

mod auth;
mod blocking;
mod compose;
mod resilience;
mod templates;

use plato_client::{Credentials, PlatoClient, RetryConfig};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{MockServer, ResponseTemplate};

/// Starts a fresh mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client without authentication pointing at `server`.
pub fn client_for(server: &MockServer) -> PlatoClient {
    PlatoClient::builder()
        .base_url(server.uri())
        .retry(fast_retry())
        .build()
        .expect("Failed to build client")
}

/// Client using client credentials against `{server}/oauth/token`.
pub fn authenticated_client_for(server: &MockServer) -> PlatoClient {
    PlatoClient::builder()
        .base_url(server.uri())
        .credentials(
            Credentials::new("billing", "s3cret", format!("{}/oauth/token", server.uri()))
                .with_scope("templates"),
        )
        .retry(fast_retry())
        .build()
        .expect("Failed to build client")
}

/// Backoff short enough for tests.
pub fn fast_retry() -> RetryConfig {
    RetryConfig::new()
        .initial_delay(Duration::from_millis(10))
        .jitter(false)
}

/// Wire representation of a template.
pub fn template_json(template_id: &str) -> Value {
    json!({
        "template_id": template_id,
        "template_schema": {"type": "object"},
        "type": "text/html",
        "metadata": {"owner": "billing"},
        "tags": ["invoice"]
    })
}

/// Token endpoint success response.
pub fn token_response(token: &str, expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in
    }))
}
