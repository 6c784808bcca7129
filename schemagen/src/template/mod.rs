//! Template resolution, caching and custom filters

mod embedded;
pub mod filters;
mod resolver;

pub use embedded::default_template;
pub use resolver::{CompiledTemplate, SourceKey, TemplateOrigin, TemplateResolver, TemplateSource};
