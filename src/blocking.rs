//! Synchronous facade over [`crate::PlatoClient`].
//!
//! Each call blocks the current thread until the operation, retries and
//! backoff included, has completed. The facade owns a current-thread tokio
//! runtime and must not be used from within an async context.

use bytes::Bytes;
use serde_json::Value;
use std::io::{Read, Seek};
use std::path::Path;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use crate::client::PlatoClient as AsyncPlatoClient;
use crate::errors::PlatoResult;
use crate::types::{ComposeOptions, TemplateInfo};

/// Blocking Plato client.
pub struct PlatoClient {
    inner: AsyncPlatoClient,
    runtime: Runtime,
}

impl PlatoClient {
    /// Wraps an async client.
    pub fn new(inner: AsyncPlatoClient) -> PlatoResult<Self> {
        let runtime = RuntimeBuilder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    /// Creates a client from environment variables.
    pub fn from_env() -> PlatoResult<Self> {
        Self::new(AsyncPlatoClient::from_env()?)
    }

    /// Returns the wrapped async client.
    pub fn inner(&self) -> &AsyncPlatoClient {
        &self.inner
    }

    /// Lists templates, optionally filtered by tags.
    pub fn templates<I, S>(&self, tags: I) -> PlatoResult<Vec<TemplateInfo>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runtime.block_on(self.inner.templates().list(tags))
    }

    /// Gets a template by ID.
    pub fn template(&self, template_id: &str) -> PlatoResult<TemplateInfo> {
        self.runtime.block_on(self.inner.templates().get(template_id))
    }

    /// Composes a template and returns the rendered document.
    pub fn compose(
        &self,
        template_id: &str,
        data: &Value,
        options: &ComposeOptions,
    ) -> PlatoResult<Bytes> {
        self.runtime
            .block_on(self.inner.composition().compose(template_id, data, options))
    }

    /// Renders the template's example document.
    pub fn template_example(
        &self,
        template_id: &str,
        options: &ComposeOptions,
    ) -> PlatoResult<Bytes> {
        self.runtime
            .block_on(self.inner.composition().example(template_id, options))
    }

    /// Creates a template from a zipped bundle.
    pub fn create_template<R>(&self, bundle: &mut R, details: &Value) -> PlatoResult<TemplateInfo>
    where
        R: Read + Seek + ?Sized,
    {
        self.runtime
            .block_on(self.inner.templates().create(bundle, details))
    }

    /// Replaces a template's bundle and details.
    pub fn update_template<R>(
        &self,
        template_id: &str,
        bundle: &mut R,
        details: &Value,
    ) -> PlatoResult<TemplateInfo>
    where
        R: Read + Seek + ?Sized,
    {
        self.runtime
            .block_on(self.inner.templates().update(template_id, bundle, details))
    }

    /// Updates a template's details.
    pub fn update_template_details(
        &self,
        template_id: &str,
        details: &Value,
    ) -> PlatoResult<TemplateInfo> {
        self.runtime
            .block_on(self.inner.templates().update_details(template_id, details))
    }

    /// Composes a template and writes the document to `destination`.
    pub fn compose_to_file(
        &self,
        template_id: &str,
        data: &Value,
        options: &ComposeOptions,
        destination: impl AsRef<Path>,
    ) -> PlatoResult<()> {
        self.runtime.block_on(self.inner.composition().compose_to_file(
            template_id,
            data,
            options,
            destination,
        ))
    }
}

impl std::fmt::Debug for PlatoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::PlatoClient")
            .field("inner", &self.inner)
            .finish()
    }
}
