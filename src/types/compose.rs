//! Composition options.

use crate::params::RequestParams;

/// Mime type requested when none is given.
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// Rendering controls for compose and example requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Mime type of the rendered document, sent as the `Accept` header.
    pub mime_type: String,
    /// Single page to render.
    pub page: Option<u32>,
    /// Target height when resizing.
    pub resize_height: Option<u32>,
    /// Target width when resizing.
    pub resize_width: Option<u32>,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            page: None,
            resize_height: None,
            resize_width: None,
        }
    }
}

impl ComposeOptions {
    /// Creates options rendering the whole document as PDF.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested mime type.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Renders a single page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Resizes to the given height.
    pub fn resize_height(mut self, height: u32) -> Self {
        self.resize_height = Some(height);
        self
    }

    /// Resizes to the given width.
    pub fn resize_width(mut self, width: u32) -> Self {
        self.resize_width = Some(width);
        self
    }

    /// Query parameters; unset controls are left out entirely.
    pub(crate) fn query(&self) -> RequestParams {
        RequestParams::new()
            .with("page", self.page)
            .with("height", self.resize_height)
            .with("width", self.resize_width)
    }
}
