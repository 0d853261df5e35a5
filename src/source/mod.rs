//! Search sources: the built-in engines plus user-defined ones.

mod model;
mod registry;

pub use model::{Category, SearchSource, SourceDraft, UrlTemplateMode};
pub use registry::SourceRegistry;
