//! Request executor with auth, retries and status mapping.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::TokenCache;
use crate::config::PlatoConfig;
use crate::errors::{PlatoError, PlatoResult};
use crate::resilience::RetryPolicy;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Sends requests on behalf of the services.
///
/// Resolves the bearer header (renewing the token if needed), merges the
/// configured headers, runs the transport call through the retry policy and
/// maps any status other than the expected one to [`PlatoError::Service`].
pub(crate) struct RequestExecutor {
    config: PlatoConfig,
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
    auth: Option<Arc<TokenCache>>,
}

impl RequestExecutor {
    pub(crate) fn new(
        config: PlatoConfig,
        transport: Arc<dyn HttpTransport>,
        retry: RetryPolicy,
        auth: Option<Arc<TokenCache>>,
    ) -> Self {
        Self {
            config,
            transport,
            retry,
            auth,
        }
    }

    /// Absolute URL for a path relative to the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        self.config.endpoint_url(path)
    }

    /// Executes `request` and returns the response if its status is `expected`.
    pub(crate) async fn execute(
        &self,
        request: HttpRequest,
        expected: u16,
    ) -> PlatoResult<HttpResponse> {
        let mut request = request.with_timeout(self.config.timeout);

        for (name, value) in &self.config.custom_headers {
            request.headers.entry(name.clone()).or_insert_with(|| value.clone());
        }

        if let Some(auth) = &self.auth {
            request = request.with_headers(auth.header().await?);
        }

        let response = self
            .retry
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let req = request.clone();
                async move { transport.send(req).await.map_err(PlatoError::from) }
            })
            .await?;

        if response.status != expected {
            tracing::debug!(
                status = response.status,
                expected,
                "Unexpected status from Plato"
            );
            return Err(PlatoError::service(response.status, response.text()));
        }

        Ok(response)
    }

    /// Executes `request` and decodes the JSON body.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        expected: u16,
    ) -> PlatoResult<T> {
        let response = self.execute(request, expected).await?;
        Ok(response.json()?)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("authenticated", &self.auth.is_some())
            .finish()
    }
}

/// Characters left as-is in a single path segment.
const PATH_SEGMENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Rejects template ids that cannot address a single path segment.
pub(crate) fn validate_template_id(template_id: &str) -> PlatoResult<()> {
    if template_id.trim().is_empty() {
        return Err(PlatoError::validation("Template ID cannot be empty"));
    }
    if template_id == "." || template_id == ".." {
        return Err(PlatoError::validation(format!(
            "Invalid template ID: {}",
            template_id
        )));
    }
    Ok(())
}

/// Validates a template id and percent-encodes it as one path segment.
pub(crate) fn template_segment(template_id: &str) -> PlatoResult<String> {
    validate_template_id(template_id)?;
    Ok(utf8_percent_encode(template_id, PATH_SEGMENT_SET).to_string())
}
