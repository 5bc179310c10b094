//! Authentication module for the Plato client.
//!
//! Implements the OAuth2 client-credentials grant with a bearer-token cache.
//! The cached token is renewed only when absent or expired; access exactly at
//! the expiry instant still counts as valid.
//!
//! # Thread Safety
//!
//! The check-then-renew sequence runs under an async mutex, so concurrent
//! callers hitting an expired token share a single credential exchange.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::errors::{PlatoError, PlatoResult};
use crate::params::RequestParams;
use crate::resilience::RetryPolicy;
use crate::transport::{HttpRequest, HttpTransport, RequestBody};

/// OAuth2 client credentials for the authorization server.
#[derive(Clone)]
pub struct Credentials {
    /// Client identifier.
    pub client_id: String,
    client_secret: SecretString,
    /// Optional scope requested with every exchange.
    pub scope: Option<String>,
    /// Absolute URL of the token endpoint.
    pub token_endpoint: String,
}

impl Credentials {
    /// Creates new client credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            scope: None,
            token_endpoint: token_endpoint.into(),
        }
    }

    /// Sets the requested scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Builds the url-encoded form body of a client-credentials exchange.
    fn token_request_form(&self) -> RequestParams {
        RequestParams::new()
            .with("client_id", self.client_id.as_str())
            .with("client_secret", self.client_secret.expose_secret().as_str())
            .with("grant_type", "client_credentials")
            .with("scope", self.scope.clone())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

/// Bearer token with its absolute expiry instant.
#[derive(Clone)]
pub struct CachedToken {
    value: SecretString,
    /// Instant after which the token must be renewed.
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Creates a cached token.
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: SecretString::new(value.into()),
            expires_at,
        }
    }

    /// Returns the raw token value.
    pub fn value(&self) -> &str {
        self.value.expose_secret()
    }

    /// Checks whether the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks whether the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.value.expose_secret())
    }
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Bearer-token cache backed by a client-credentials exchange.
pub struct TokenCache {
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
    retry: RetryPolicy,
    timeout: std::time::Duration,
    state: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates an empty token cache.
    pub fn new(
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
        retry: RetryPolicy,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            credentials,
            transport,
            retry,
            timeout,
            state: Mutex::new(None),
        }
    }

    /// Returns `{"Authorization": "Bearer <token>"}`, renewing the token if needed.
    pub async fn header(&self) -> PlatoResult<HashMap<String, String>> {
        let token = self.get_or_renew(Utc::now()).await?;
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), token.authorization_header());
        Ok(headers)
    }

    /// Same as [`TokenCache::header`] plus a JSON content type.
    pub async fn json_header(&self) -> PlatoResult<HashMap<String, String>> {
        let mut headers = self.header().await?;
        headers.insert(
            "Content-Type".to_string(),
            mime::APPLICATION_JSON.to_string(),
        );
        Ok(headers)
    }

    /// Returns the cached token if still valid at `now`, otherwise exchanges
    /// the credentials for a new one and caches it.
    pub async fn get_or_renew(&self, now: DateTime<Utc>) -> PlatoResult<CachedToken> {
        let mut state = self.state.lock().await;

        if let Some(token) = state.as_ref() {
            if !token.is_expired_at(now) {
                return Ok(token.clone());
            }
            tracing::debug!(expires_at = %token.expires_at, "Cached token expired");
        }

        let token = self.exchange(now).await?;
        *state = Some(token.clone());
        Ok(token)
    }

    /// Returns the currently cached token without renewing it.
    pub async fn cached(&self) -> Option<CachedToken> {
        self.state.lock().await.clone()
    }

    #[instrument(skip(self, now), fields(client_id = %self.credentials.client_id))]
    async fn exchange(&self, now: DateTime<Utc>) -> PlatoResult<CachedToken> {
        let request = HttpRequest::post(&self.credentials.token_endpoint)
            .with_header("Accept", mime::APPLICATION_JSON.to_string())
            .with_body(RequestBody::Form(self.credentials.token_request_form()))
            .with_timeout(self.timeout);

        let response = self
            .retry
            .execute(|| {
                let transport = Arc::clone(&self.transport);
                let req = request.clone();
                async move { transport.send(req).await.map_err(PlatoError::from) }
            })
            .await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Token endpoint rejected credentials");
            return Err(PlatoError::Authentication {
                status_code: response.status,
                body: response.text(),
            });
        }

        let token: TokenResponse = response.json()?;
        let expires_at = Duration::try_seconds(token.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| PlatoError::Serialization {
                message: format!("Invalid token lifetime: {}", token.expires_in),
            })?;

        tracing::info!(%expires_at, "Obtained access token");

        Ok(CachedToken::new(token.access_token, expires_at))
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("credentials", &self.credentials)
            .finish()
    }
}
