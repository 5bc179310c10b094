//! Request and response types for the Plato API.

mod compose;
mod templates;

pub use compose::{ComposeOptions, DEFAULT_MIME_TYPE};
pub use templates::TemplateInfo;
