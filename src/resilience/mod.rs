//! Resilience layer for the Plato client.
//!
//! Every network-calling operation runs its attempt through a
//! [`RetryPolicy`], which retries connectivity failures with exponential
//! backoff and surfaces [`crate::PlatoError::Unavailable`] once the attempt
//! ceiling is reached.

mod retry;

pub use retry::{RetryConfig, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
