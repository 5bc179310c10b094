//! Plato Templating Client Library
//!
//! A Rust client for the Plato document-templating service: list and manage
//! templates, and compose them with data into PDF or image documents.
//!
//! # Features
//!
//! - **Templates**: list (optionally by tag), fetch, create, update
//! - **Composition**: render to bytes or straight to a file, with page and resize controls
//! - **Resilience**: connectivity failures retried with exponential backoff
//! - **OAuth2**: optional client-credentials flow with a cached bearer token
//! - **Blocking API**: a synchronous facade in [`blocking`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use plato_client::{ComposeOptions, Credentials, PlatoClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatoClient::builder()
//!         .base_url("https://plato.example.com")
//!         .credentials(Credentials::new(
//!             "billing",
//!             "client-secret",
//!             "https://auth.example.com/oauth/token",
//!         ))
//!         .build()?;
//!
//!     for template in client.templates().list(["invoice"]).await? {
//!         println!("{} ({})", template.template_id, template.mime_type);
//!     }
//!
//!     client
//!         .composition()
//!         .compose_to_file(
//!             "invoice",
//!             &json!({"customer": "ACME", "total": 42}),
//!             &ComposeOptions::new().page(1),
//!             "invoice.pdf",
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod blocking;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod params;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{CachedToken, Credentials, TokenCache};
pub use client::{PlatoClient, PlatoClientBuilder};
pub use config::PlatoConfig;
pub use errors::{PlatoError, PlatoResult};
pub use params::RequestParams;
pub use resilience::{RetryConfig, RetryPolicy};
pub use types::{ComposeOptions, TemplateInfo};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
