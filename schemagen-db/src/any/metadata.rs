//! sqlx-backed metadata source

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::AnyPool;
use tracing::debug;

use super::row::{normalize_type_name, to_text_row};
use super::statements::*;
use crate::dialect::DatabaseKind;
use crate::error::{Error, Result};
use crate::pool::ConnectionManager;
use crate::traits::{ColumnMeta, MetadataSource, TextRow};

/// Metadata source reading through the run's [`ConnectionManager`].
///
/// Cloning is cheap; clones share the manager and its pool.
#[derive(Debug, Clone)]
pub struct AnyMetadata {
    manager: Arc<ConnectionManager>,
    kind: DatabaseKind,
}

impl AnyMetadata {
    /// Create a source for the manager's configured database.
    pub fn new(manager: Arc<ConnectionManager>) -> Result<Self> {
        let kind = manager.kind()?;
        Ok(Self { manager, kind })
    }

    /// The manager this source reads through
    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    async fn fetch(&self, sql: &str, params: &[&str]) -> Result<Vec<AnyRow>> {
        let pool: AnyPool = self.manager.pool().await?;
        debug!("Executing metadata query: {}", sql);
        let mut query = sqlx::query(sql).persistent(false);
        for param in params {
            query = query.bind(*param);
        }
        Ok(query.fetch_all(&pool).await?)
    }

    fn unsupported(&self) -> Error {
        Error::UnsupportedDialect(self.kind)
    }
}

#[async_trait]
impl MetadataSource for AnyMetadata {
    fn kind(&self) -> DatabaseKind {
        self.kind
    }

    async fn connect(&self) -> Result<()> {
        self.manager.pool().await.map(|_| ())
    }

    async fn table_remarks(&self, table: &str) -> Result<Option<String>> {
        let sql = match self.kind {
            DatabaseKind::MySql => MYSQL_TABLE_REMARKS,
            DatabaseKind::PostgreSql => POSTGRES_TABLE_REMARKS,
            // SQLite has no table comments
            DatabaseKind::Sqlite => return Ok(None),
            _ => return Err(self.unsupported()),
        };

        let rows = self.fetch(sql, &[table]).await?;
        Ok(rows
            .first()
            .map(to_text_row)
            .and_then(|row| row.get(0).map(str::to_string)))
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>> {
        let sql = match self.kind {
            DatabaseKind::MySql => MYSQL_COLUMNS,
            DatabaseKind::PostgreSql => POSTGRES_COLUMNS,
            DatabaseKind::Sqlite => SQLITE_COLUMNS,
            _ => return Err(self.unsupported()),
        };

        let rows = self.fetch(sql, &[table]).await?;
        rows.iter()
            .map(|row| {
                let row = to_text_row(row);
                let name = row
                    .get(0)
                    .ok_or_else(|| Error::Query(format!("column without a name in `{}`", table)))?;
                let type_name = normalize_type_name(row.get(1).unwrap_or_default());
                Ok(ColumnMeta {
                    name: name.to_string(),
                    type_name,
                    remarks: row.get(2).map(str::to_string),
                })
            })
            .collect()
    }

    async fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<TextRow>> {
        let rows = self.fetch(sql, params).await?;
        Ok(rows.iter().map(to_text_row).collect())
    }
}
