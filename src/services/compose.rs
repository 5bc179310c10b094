//! Composition service.

use bytes::Bytes;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use crate::client::executor::{template_segment, RequestExecutor};
use crate::errors::{PlatoError, PlatoResult};
use crate::transport::{HttpRequest, RequestBody};
use crate::types::ComposeOptions;

const STATUS_OK: u16 = 200;

/// Composition service rendering templates into documents.
#[derive(Debug, Clone)]
pub struct CompositionService {
    executor: Arc<RequestExecutor>,
}

impl CompositionService {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Composes a template with `data` and returns the rendered document.
    #[instrument(skip(self, data, options), fields(mime_type = %options.mime_type))]
    pub async fn compose(
        &self,
        template_id: &str,
        data: &Value,
        options: &ComposeOptions,
    ) -> PlatoResult<Bytes> {
        let segment = template_segment(template_id)?;

        let request =
            HttpRequest::post(self.executor.url(&format!("template/{}/compose", segment)))
                .with_header("Accept", options.mime_type.as_str())
                .with_query(options.query())
                .with_body(RequestBody::Json(data.clone()));

        let response = self.executor.execute(request, STATUS_OK).await?;
        tracing::debug!(size = response.body.len(), "Composed document");
        Ok(response.body)
    }

    /// Renders the template's example document.
    #[instrument(skip(self, options), fields(mime_type = %options.mime_type))]
    pub async fn example(&self, template_id: &str, options: &ComposeOptions) -> PlatoResult<Bytes> {
        let segment = template_segment(template_id)?;

        let request =
            HttpRequest::get(self.executor.url(&format!("template/{}/example", segment)))
                .with_header("Accept", options.mime_type.as_str())
                .with_query(options.query());

        let response = self.executor.execute(request, STATUS_OK).await?;
        Ok(response.body)
    }

    /// Composes a template and writes the document to `destination`.
    ///
    /// The document is written to a temporary file next to `destination` and
    /// renamed over it once complete, so a failure never leaves a truncated
    /// file behind. An existing file at `destination` is replaced.
    #[instrument(skip(self, data, options, destination), fields(destination = %destination.as_ref().display()))]
    pub async fn compose_to_file(
        &self,
        template_id: &str,
        data: &Value,
        options: &ComposeOptions,
        destination: impl AsRef<Path>,
    ) -> PlatoResult<()> {
        let destination = destination.as_ref().to_path_buf();
        let document = self.compose(template_id, data, options).await?;

        tokio::task::spawn_blocking(move || write_atomically(&destination, &document))
            .await
            .map_err(|e| PlatoError::Io(std::io::Error::other(e)))??;

        tracing::info!("Composed document written");
        Ok(())
    }
}

fn write_atomically(destination: &Path, contents: &[u8]) -> PlatoResult<()> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(directory)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged
        .persist(destination)
        .map_err(|e| PlatoError::Io(e.error))?;
    Ok(())
}
