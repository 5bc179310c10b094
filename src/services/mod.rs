//! Service implementations for the Plato API.

mod compose;
mod templates;

pub use compose::CompositionService;
pub use templates::TemplatesService;
