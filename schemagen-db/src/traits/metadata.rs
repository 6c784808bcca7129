//! Metadata source trait: the driver-level view of a schema

use async_trait::async_trait;

use crate::dialect::DatabaseKind;
use crate::error::Result;

/// A column as reported by driver-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Column name as stored in the database
    pub name: String,
    /// Native type name, upper case, without length or precision
    pub type_name: String,
    /// Column remarks (comment), if the metadata carries them
    pub remarks: Option<String>,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// One result row with every cell decoded as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRow {
    columns: Vec<String>,
    values: Vec<Option<String>>,
}

impl TextRow {
    pub fn new(columns: Vec<String>, values: Vec<Option<String>>) -> Self {
        Self { columns, values }
    }

    /// Cell by zero-based position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    /// Cell by column label, compared case-insensitively
    pub fn get_named(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Trait for sources of table and column metadata.
///
/// `table_remarks` and `columns` are the standard metadata every backend
/// answers the same way; `query` runs dialect-specific statements for the
/// information standard metadata cannot supply reliably.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Dialect of the underlying database
    fn kind(&self) -> DatabaseKind;

    /// Make sure the database is reachable before any metadata is read
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// Table comment from standard metadata
    async fn table_remarks(&self, table: &str) -> Result<Option<String>>;

    /// Columns of a table in database order
    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>>;

    /// Run a statement with positional string parameters
    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<TextRow>>;
}
