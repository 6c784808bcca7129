//! Per-table model handed to the templates

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::GenerationOptions;

/// Everything a template knows about one table.
///
/// Serializes to the template context; the generation options are flattened
/// into the top level, so templates read `author` or `packages.entity`
/// directly next to `entity_name` and `columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDescriptor {
    pub table_name: String,
    /// PascalCase class name, e.g. `UserAccount`
    pub entity_name: String,
    /// camelCase variable name, e.g. `userAccount`
    pub entity_name_lower: String,
    /// Empty when no comment could be found
    pub table_comment: String,
    /// Columns in database order, never empty
    pub columns: Vec<ColumnDescriptor>,
    pub import_packages: BTreeSet<String>,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub column_name: String,
    /// Native type name as reported by the database
    pub column_type: String,
    pub field_name: String,
    pub field_type: String,
    pub comment: String,
}
