//! Template types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A template registered with the templating service.
///
/// Every field is required on the wire; a payload missing any of them fails
/// to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo {
    /// Template identifier.
    pub template_id: String,

    /// JSON schema of the data the template accepts.
    pub template_schema: Value,

    /// Mime type of the template source, sent as `type` on the wire.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Free-form template metadata.
    pub metadata: Value,

    /// Tags attached to the template.
    pub tags: Vec<String>,
}

impl TemplateInfo {
    /// Returns true if the template carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
