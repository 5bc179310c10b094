//! Configuration module for the Plato client.
//!
//! Provides the service base URL, per-request timeout, retry ceiling and the
//! optional OAuth2 client credentials.

use std::time::Duration;
use url::Url;

use crate::auth::Credentials;
use crate::errors::{PlatoError, PlatoResult};
use crate::resilience::DEFAULT_MAX_ATTEMPTS;

/// Default request timeout (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Plato client.
#[derive(Clone)]
pub struct PlatoConfig {
    /// Base URL of the templating service, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts per operation, the first one included.
    pub max_attempts: u32,
    /// OAuth2 client credentials, when the service requires authentication.
    pub(crate) credentials: Option<Credentials>,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl PlatoConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PlatoConfigBuilder {
        PlatoConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PLATO_BASE_URL` (required): Templating service base URL
    /// - `PLATO_TIMEOUT` (optional): Request timeout in seconds
    /// - `PLATO_MAX_ATTEMPTS` (optional): Total attempts per operation
    /// - `PLATO_CLIENT_ID` (optional): Enables OAuth2 client credentials;
    ///   then `PLATO_CLIENT_SECRET` and `PLATO_AUTH_URL` are required and
    ///   `PLATO_SCOPE` is optional
    pub fn from_env() -> PlatoResult<Self> {
        let base_url = std::env::var("PLATO_BASE_URL")
            .map_err(|_| PlatoError::configuration("PLATO_BASE_URL environment variable not set"))?;

        let mut builder = PlatoConfigBuilder::new().base_url(base_url);

        if let Ok(timeout_str) = std::env::var("PLATO_TIMEOUT") {
            let secs = timeout_str.parse::<u64>().map_err(|_| {
                PlatoError::configuration(format!("Invalid PLATO_TIMEOUT: {}", timeout_str))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Ok(attempts_str) = std::env::var("PLATO_MAX_ATTEMPTS") {
            let attempts = attempts_str.parse::<u32>().map_err(|_| {
                PlatoError::configuration(format!("Invalid PLATO_MAX_ATTEMPTS: {}", attempts_str))
            })?;
            builder = builder.max_attempts(attempts);
        }

        if let Ok(client_id) = std::env::var("PLATO_CLIENT_ID") {
            let client_secret = std::env::var("PLATO_CLIENT_SECRET").map_err(|_| {
                PlatoError::configuration("PLATO_CLIENT_SECRET environment variable not set")
            })?;
            let auth_url = std::env::var("PLATO_AUTH_URL").map_err(|_| {
                PlatoError::configuration("PLATO_AUTH_URL environment variable not set")
            })?;

            let mut credentials = Credentials::new(client_id, client_secret, auth_url);
            if let Ok(scope) = std::env::var("PLATO_SCOPE") {
                credentials = credentials.with_scope(scope);
            }
            builder = builder.credentials(credentials);
        }

        builder.build()
    }

    /// Returns the OAuth2 credentials, if configured.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for PlatoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatoConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Builder for `PlatoConfig`.
#[derive(Default)]
pub struct PlatoConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_attempts: Option<u32>,
    credentials: Option<Credentials>,
    custom_headers: Vec<(String, String)>,
}

impl PlatoConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Sets the total number of attempts per operation.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Enables OAuth2 client-credentials authentication.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> PlatoResult<PlatoConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| PlatoError::configuration("Base URL is required"))?
            .trim_end_matches('/')
            .to_string();

        validate_http_url(&base_url, "Base URL")?;

        if let Some(credentials) = &self.credentials {
            if credentials.client_id.is_empty() {
                return Err(PlatoError::configuration("Client ID cannot be empty"));
            }
            validate_http_url(&credentials.token_endpoint, "Token endpoint")?;
        }

        let max_attempts = self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        if max_attempts == 0 {
            return Err(PlatoError::configuration("max_attempts must be at least 1"));
        }

        Ok(PlatoConfig {
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_attempts,
            credentials: self.credentials,
            custom_headers: self.custom_headers,
        })
    }
}

fn validate_http_url(raw: &str, what: &str) -> PlatoResult<()> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(PlatoError::configuration(format!(
            "{} must use http or https, got {}",
            what, scheme
        ))),
    }
}
