//! Templates service.

use serde_json::Value;
use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::instrument;

use crate::client::executor::{template_segment, RequestExecutor};
use crate::errors::PlatoResult;
use crate::params::RequestParams;
use crate::transport::{HttpRequest, MultipartPart, RequestBody};
use crate::types::TemplateInfo;

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// Templates service for listing, reading and managing templates.
#[derive(Debug, Clone)]
pub struct TemplatesService {
    executor: Arc<RequestExecutor>,
}

impl TemplatesService {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists templates, optionally filtered by tags.
    ///
    /// An empty filter sends no `tags` parameter at all.
    #[instrument(skip(self, tags))]
    pub async fn list<I, S>(&self, tags: I) -> PlatoResult<Vec<TemplateInfo>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<Value> = tags
            .into_iter()
            .map(|tag| Value::String(tag.into()))
            .collect();

        let mut query = RequestParams::new();
        if !tags.is_empty() {
            query.set("tags", tags);
        }

        let request = HttpRequest::get(self.executor.url("templates/")).with_query(query);
        let templates: Vec<TemplateInfo> = self.executor.execute_json(request, STATUS_OK).await?;

        tracing::debug!(count = templates.len(), "Listed templates");
        Ok(templates)
    }

    /// Gets a template by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, template_id: &str) -> PlatoResult<TemplateInfo> {
        let segment = template_segment(template_id)?;

        let request = HttpRequest::get(self.executor.url(&format!("templates/{}", segment)));
        self.executor.execute_json(request, STATUS_OK).await
    }

    /// Creates a template from a zipped template bundle.
    ///
    /// The bundle is read from its start regardless of the reader's position.
    #[instrument(skip(self, bundle, details))]
    pub async fn create<R>(&self, bundle: &mut R, details: &Value) -> PlatoResult<TemplateInfo>
    where
        R: Read + Seek + ?Sized,
    {
        let parts = bundle_parts(bundle, details)?;

        let request = HttpRequest::post(self.executor.url("template/create"))
            .with_body(RequestBody::Multipart(parts));
        let template: TemplateInfo = self.executor.execute_json(request, STATUS_CREATED).await?;

        tracing::info!(template_id = %template.template_id, "Created template");
        Ok(template)
    }

    /// Replaces a template's bundle and details.
    #[instrument(skip(self, bundle, details))]
    pub async fn update<R>(
        &self,
        template_id: &str,
        bundle: &mut R,
        details: &Value,
    ) -> PlatoResult<TemplateInfo>
    where
        R: Read + Seek + ?Sized,
    {
        let segment = template_segment(template_id)?;
        let parts = bundle_parts(bundle, details)?;

        let request =
            HttpRequest::put(self.executor.url(&format!("template/{}/update", segment)))
                .with_body(RequestBody::Multipart(parts));
        self.executor.execute_json(request, STATUS_OK).await
    }

    /// Updates a template's details, leaving its bundle untouched.
    #[instrument(skip(self, details))]
    pub async fn update_details(
        &self,
        template_id: &str,
        details: &Value,
    ) -> PlatoResult<TemplateInfo> {
        let segment = template_segment(template_id)?;

        let request = HttpRequest::patch(
            self.executor
                .url(&format!("template/{}/update_details", segment)),
        )
        .with_body(RequestBody::Json(details.clone()));
        self.executor.execute_json(request, STATUS_OK).await
    }
}

/// Multipart fields shared by create and update.
fn bundle_parts<R>(bundle: &mut R, details: &Value) -> PlatoResult<Vec<MultipartPart>>
where
    R: Read + Seek + ?Sized,
{
    bundle.seek(SeekFrom::Start(0))?;
    let mut data = Vec::new();
    bundle.read_to_end(&mut data)?;

    Ok(vec![
        MultipartPart::File {
            name: "zipfile".to_string(),
            filename: "template.zip".to_string(),
            content_type: "application/zip".to_string(),
            data,
        },
        MultipartPart::Text {
            name: "template_details".to_string(),
            value: serde_json::to_string(details)?,
        },
    ])
}
