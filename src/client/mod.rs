//! Plato API client.
//!
//! Provides the main client interface for the templating service.

pub(crate) mod executor;

use std::sync::Arc;

use crate::auth::{Credentials, TokenCache};
use crate::config::{PlatoConfig, PlatoConfigBuilder};
use crate::errors::{PlatoError, PlatoResult};
use crate::resilience::{RetryConfig, RetryPolicy};
use crate::services::{CompositionService, TemplatesService};
use crate::transport::{HttpTransport, ReqwestTransport};
use executor::RequestExecutor;

/// The main Plato client.
///
/// Operations are async and run to completion on the calling task,
/// backoff delays included. See [`crate::blocking::PlatoClient`] for a
/// synchronous facade.
///
/// # Example
///
/// ```rust,no_run
/// use plato_client::{ComposeOptions, PlatoClient};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PlatoClient::builder()
///         .base_url("http://localhost:5000")
///         .build()?;
///
///     let pdf = client
///         .composition()
///         .compose("invoice", &json!({"customer": "ACME"}), &ComposeOptions::default())
///         .await?;
///     println!("{} bytes", pdf.len());
///     Ok(())
/// }
/// ```
pub struct PlatoClient {
    config: PlatoConfig,
    templates_service: TemplatesService,
    composition_service: CompositionService,
    token_cache: Option<Arc<TokenCache>>,
}

impl PlatoClient {
    /// Creates a new client builder.
    pub fn builder() -> PlatoClientBuilder {
        PlatoClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`PlatoConfig::from_env`] for the variables read.
    pub fn from_env() -> PlatoResult<Self> {
        let config = PlatoConfig::from_env()?;
        PlatoClientBuilder::from_config(config).build()
    }

    /// Returns the templates service.
    pub fn templates(&self) -> &TemplatesService {
        &self.templates_service
    }

    /// Returns the composition service.
    pub fn composition(&self) -> &CompositionService {
        &self.composition_service
    }

    /// Returns the token cache, when client credentials are configured.
    pub fn token_cache(&self) -> Option<&TokenCache> {
        self.token_cache.as_deref()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PlatoConfig {
        &self.config
    }
}

impl std::fmt::Debug for PlatoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatoClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Plato client.
pub struct PlatoClientBuilder {
    config_builder: PlatoConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    retry_config: RetryConfig,
}

impl PlatoClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: PlatoConfigBuilder::new(),
            transport: None,
            retry_config: RetryConfig::default(),
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: PlatoConfig) -> Self {
        let mut config_builder = PlatoConfigBuilder::new()
            .base_url(config.base_url)
            .timeout(config.timeout)
            .max_attempts(config.max_attempts);
        if let Some(credentials) = config.credentials {
            config_builder = config_builder.credentials(credentials);
        }
        for (name, value) in config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            ..Self::new()
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the total number of attempts per operation.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config_builder = self.config_builder.max_attempts(attempts);
        self
    }

    /// Enables OAuth2 client-credentials authentication.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config_builder = self.config_builder.credentials(credentials);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the backoff shape. The attempt ceiling always comes from
    /// [`PlatoClientBuilder::max_attempts`].
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Builds the client.
    pub fn build(self) -> PlatoResult<PlatoClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::new(config.timeout)
                    .map_err(|e| PlatoError::configuration(e.to_string()))?,
            ),
        };

        let retry = RetryPolicy::new(self.retry_config.max_attempts(config.max_attempts));

        let token_cache = config.credentials.clone().map(|credentials| {
            Arc::new(TokenCache::new(
                credentials,
                Arc::clone(&transport),
                retry.clone(),
                config.timeout,
            ))
        });

        let executor = Arc::new(RequestExecutor::new(
            config.clone(),
            transport,
            retry,
            token_cache.clone(),
        ));

        tracing::debug!(base_url = %config.base_url, authenticated = token_cache.is_some(), "Plato client ready");

        Ok(PlatoClient {
            config,
            templates_service: TemplatesService::new(Arc::clone(&executor)),
            composition_service: CompositionService::new(executor),
            token_cache,
        })
    }
}

impl Default for PlatoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
