//! Core traits for schema metadata access

mod metadata;

pub use metadata::{ColumnMeta, MetadataSource, TextRow};
