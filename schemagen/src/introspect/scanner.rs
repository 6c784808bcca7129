//! Builds table descriptors from live metadata

use std::collections::BTreeSet;

use indexmap::IndexMap;
use schemagen_db::{ColumnMeta, DatabaseKind, MetadataSource};
use tracing::{debug, info, warn};

use super::comments::{comment_provider_for, ColumnComments, CommentProvider};
use super::descriptor::{ColumnDescriptor, TableDescriptor};
use crate::codegen::{map_type, to_entity_name, to_field_name};
use crate::config::GenerationOptions;
use crate::error::{CodegenError, Result};

/// Imports added to every descriptor when Lombok is enabled
pub const LOMBOK_IMPORTS: [&str; 3] = [
    "lombok.AllArgsConstructor",
    "lombok.Data",
    "lombok.NoArgsConstructor",
];

/// Scans configured tables into descriptors, in configured order.
///
/// The scanner owns the resulting map. Every scan starts from an empty map,
/// so a table dropped from the configuration never survives into the next
/// run's output.
pub struct SchemaScanner {
    provider: Box<dyn CommentProvider>,
    tables: IndexMap<String, TableDescriptor>,
}

impl SchemaScanner {
    pub fn new(provider: Box<dyn CommentProvider>) -> Self {
        Self {
            provider,
            tables: IndexMap::new(),
        }
    }

    /// Scanner using the comment queries of `kind`
    pub fn for_kind(kind: DatabaseKind) -> Self {
        Self::new(comment_provider_for(kind))
    }

    /// Descriptors from the last successful scan
    pub fn tables(&self) -> &IndexMap<String, TableDescriptor> {
        &self.tables
    }

    pub fn into_tables(self) -> IndexMap<String, TableDescriptor> {
        self.tables
    }

    /// Scan `table_names` in order.
    ///
    /// The source is connected once up front, so an unreachable database
    /// fails with [`CodegenError::ConnectionError`] before any table is read.
    /// A connection lost mid-scan is fatal too, even inside the comment
    /// lookups that otherwise degrade to empty comments. Any fatal error
    /// leaves the map empty.
    pub async fn scan(
        &mut self,
        source: &dyn MetadataSource,
        table_names: &[String],
        options: &GenerationOptions,
    ) -> Result<&IndexMap<String, TableDescriptor>> {
        self.tables.clear();

        source.connect().await?;

        for table in table_names {
            match self.scan_table(source, table, options).await {
                Ok(descriptor) => {
                    self.tables.insert(table.clone(), descriptor);
                }
                Err(e) => {
                    self.tables.clear();
                    return Err(e);
                }
            }
        }

        Ok(&self.tables)
    }

    async fn scan_table(
        &self,
        source: &dyn MetadataSource,
        table: &str,
        options: &GenerationOptions,
    ) -> Result<TableDescriptor> {
        info!("Loading table {}", table);

        let table_comment = self.table_comment(source, table).await?;

        let metas = source.columns(table).await.map_err(|source| {
            if source.is_connection() {
                CodegenError::from(source)
            } else {
                CodegenError::IntrospectionError {
                    table: table.to_string(),
                    source,
                }
            }
        })?;
        if metas.is_empty() {
            return Err(CodegenError::EmptyTable {
                table: table.to_string(),
            });
        }

        let comments = self.column_comments(source, table, &metas).await?;

        let mut import_packages = BTreeSet::new();
        if options.lombok_enable {
            import_packages.extend(LOMBOK_IMPORTS.iter().map(|i| i.to_string()));
        }

        let mut columns = Vec::with_capacity(metas.len());
        for meta in metas {
            let mapped = map_type(&meta.type_name).map_err(|unmapped| {
                CodegenError::UnsupportedDataType {
                    type_name: unmapped.0,
                    table: table.to_string(),
                }
            })?;
            if let Some(import) = mapped.import {
                import_packages.insert(import.to_string());
            }

            columns.push(ColumnDescriptor {
                field_name: to_field_name(&meta.name),
                field_type: mapped.field_type.to_string(),
                comment: lookup_comment(&comments, &meta.name),
                column_name: meta.name,
                column_type: meta.type_name,
            });
        }

        info!("Loaded table {} ({} columns)", table, columns.len());

        Ok(TableDescriptor {
            table_name: table.to_string(),
            entity_name: to_entity_name(table),
            entity_name_lower: to_field_name(table),
            table_comment,
            columns,
            import_packages,
            options: options.clone(),
        })
    }

    /// Standard remarks first, then the dialect catalog.
    ///
    /// Lookup failures degrade to an empty comment unless the connection
    /// itself is gone.
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String> {
        match source.table_remarks(table).await {
            Ok(Some(remarks)) if !remarks.is_empty() => return Ok(remarks),
            Ok(_) => {}
            Err(e) if e.is_connection() => return Err(e.into()),
            Err(e) => warn!("Reading remarks of table {} failed: {}", table, e),
        }

        debug!("No standard remarks for {}, asking the catalog", table);
        match self.provider.table_comment(source, table).await {
            Ok(comment) => Ok(comment),
            Err(e) if e.is_connection() => Err(e.into()),
            Err(e) => {
                warn!("Reading comment of table {} failed: {}", table, e);
                Ok(String::new())
            }
        }
    }

    /// Column comments for one table, with at most one catalog query
    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
        metas: &[ColumnMeta],
    ) -> Result<ColumnComments> {
        let remarks: ColumnComments = metas
            .iter()
            .map(|m| (m.name.clone(), m.remarks.clone().unwrap_or_default()))
            .collect();
        if remarks.values().any(|c| !c.is_empty()) {
            return Ok(remarks);
        }

        match self.provider.column_comments(source, table).await {
            Ok(comments) => Ok(comments),
            Err(e) if e.is_connection() => Err(e.into()),
            Err(e) => {
                warn!("Reading column comments of table {} failed: {}", table, e);
                Ok(ColumnComments::new())
            }
        }
    }
}

/// Exact match first, then case-insensitive
fn lookup_comment(comments: &ColumnComments, column: &str) -> String {
    comments
        .get(column)
        .or_else(|| {
            comments
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column))
                .map(|(_, comment)| comment)
        })
        .cloned()
        .unwrap_or_default()
}
