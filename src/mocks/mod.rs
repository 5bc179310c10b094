//! Mock implementations for testing.
//!
//! Provides a scripted [`HttpTransport`] and template fixtures.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::TemplateInfo;

type Scripted = Result<HttpResponse, TransportError>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock HTTP transport replaying queued responses and failures in order.
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
    default_response: Option<HttpResponse>,
}

impl MockTransport {
    /// Creates a mock transport with an empty script.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: None,
        }
    }

    /// Creates a mock transport answering every unscripted request with `response`.
    pub fn with_default(response: HttpResponse) -> Self {
        Self {
            default_response: Some(response),
            ..Self::new()
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: HttpResponse) {
        lock(&self.script).push_back(Ok(response));
    }

    /// Queues a 200 response with a JSON body.
    pub fn queue_json(&self, body: &Value) {
        self.queue(
            HttpResponse::new(200, body.to_string())
                .with_content_type(mime::APPLICATION_JSON.as_ref()),
        );
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        lock(&self.script).push_back(Err(error));
    }

    /// Returns all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Returns the last request made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Returns the number of scripted entries not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        let next = lock(&self.script).pop_front();
        match next {
            Some(scripted) => scripted,
            None => self
                .default_response
                .clone()
                .ok_or_else(|| TransportError::InvalidResponse {
                    message: "No mock response available".to_string(),
                }),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("queued", &lock(&self.script).len())
            .field("recorded_requests", &lock(&self.requests).len())
            .finish()
    }
}

/// Template fixtures.
pub struct TestFixtures;

impl TestFixtures {
    /// Wire representation of a sample template.
    pub fn template_json(template_id: &str) -> Value {
        json!({
            "template_id": template_id,
            "template_schema": {
                "type": "object",
                "properties": {"name": {"type": "string"}}
            },
            "type": "application/pdf",
            "metadata": {"qr_entries": ["ticket"]},
            "tags": ["invoice", "ranger"]
        })
    }

    /// Decoded sample template.
    pub fn template(template_id: &str) -> TemplateInfo {
        TemplateInfo {
            template_id: template_id.to_string(),
            template_schema: json!({
                "type": "object",
                "properties": {"name": {"type": "string"}}
            }),
            mime_type: "application/pdf".to_string(),
            metadata: json!({"qr_entries": ["ticket"]}),
            tags: vec!["invoice".to_string(), "ranger".to_string()],
        }
    }
}
