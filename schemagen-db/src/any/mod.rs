//! Metadata access over sqlx's `Any` driver

mod metadata;
mod row;
mod statements;

pub use metadata::AnyMetadata;
pub use row::{normalize_type_name, to_text_row};
