//! Error types for the Plato client.
//!
//! Separates the three remote failure classes callers care about:
//! the service could not be reached at all ([`PlatoError::Unavailable`]),
//! the authorization server rejected the client credentials
//! ([`PlatoError::Authentication`]), and the templating service answered
//! with an unexpected status ([`PlatoError::Service`]).

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Plato operations.
pub type PlatoResult<T> = Result<T, PlatoError>;

/// Error type for Plato client operations.
#[derive(Debug, Error)]
pub enum PlatoError {
    /// The service could not be reached after exhausting every attempt.
    #[error("Plato unavailable after {attempts} attempt(s): {source}")]
    Unavailable {
        /// Number of attempts made.
        attempts: u32,
        /// The last connectivity failure.
        #[source]
        source: TransportError,
    },

    /// The authorization server answered but rejected the credential exchange.
    #[error("Authentication failed (HTTP {status_code}): {body}")]
    Authentication {
        /// HTTP status code returned by the token endpoint.
        status_code: u16,
        /// Raw response body.
        body: String,
    },

    /// The templating service answered with an unexpected status.
    #[error("Plato service error (HTTP {status_code}): {body}")]
    Service {
        /// HTTP status code.
        status_code: u16,
        /// Raw response body.
        body: String,
    },

    /// A single attempt failed at the transport level.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A response body could not be decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Input rejected before any request was sent.
    #[error("Validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// Local IO failure, e.g. while writing a composed document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlatoError {
    /// Returns true if this is a connectivity failure eligible for retry.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, PlatoError::Transport(e) if e.is_connectivity())
    }

    /// Returns the HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PlatoError::Authentication { status_code, .. }
            | PlatoError::Service { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PlatoError::Validation {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        PlatoError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a service error from a status and body.
    pub fn service(status_code: u16, body: impl Into<String>) -> Self {
        PlatoError::Service {
            status_code,
            body: body.into(),
        }
    }
}

impl From<serde_json::Error> for PlatoError {
    fn from(err: serde_json::Error) -> Self {
        PlatoError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for PlatoError {
    fn from(err: url::ParseError) -> Self {
        PlatoError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
