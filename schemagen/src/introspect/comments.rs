//! Dialect-specific comment lookups
//!
//! Standard metadata often comes back without remarks (MySQL's JDBC-style
//! metadata, SQL Server's extended properties). Each dialect gets a
//! [`CommentProvider`] that asks the catalog directly; the scanner only
//! consults it when standard metadata had nothing.

use std::collections::HashMap;

use async_trait::async_trait;
use schemagen_db::{DatabaseKind, MetadataSource, Result, TextRow};
use tracing::debug;

/// Column name to comment
pub type ColumnComments = HashMap<String, String>;

/// Catalog queries for table and column comments
#[async_trait]
pub trait CommentProvider: Send + Sync {
    /// Table comment, empty when the table has none
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String>;

    /// Comments of every column of the table
    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
    ) -> Result<ColumnComments>;
}

/// Provider for a dialect, chosen once per run
pub fn comment_provider_for(kind: DatabaseKind) -> Box<dyn CommentProvider> {
    match kind {
        DatabaseKind::MySql | DatabaseKind::H2 => Box::new(MySqlComments),
        DatabaseKind::PostgreSql => Box::new(PostgresComments),
        DatabaseKind::Oracle => Box::new(OracleComments),
        DatabaseKind::SqlServer => Box::new(SqlServerComments),
        DatabaseKind::Db2 => Box::new(Db2Comments),
        DatabaseKind::Sqlite => Box::new(NoComments),
    }
}

/// First cell of the first row, empty when absent
fn first_cell(rows: &[TextRow]) -> String {
    rows.first()
        .and_then(|row| row.get(0))
        .unwrap_or_default()
        .to_string()
}

/// Two-column rows of `(name, comment)`, null comments as empty
fn pairs(rows: &[TextRow]) -> ColumnComments {
    rows.iter()
        .filter_map(|row| {
            let name = row.get(0)?;
            Some((name.to_string(), row.get(1).unwrap_or_default().to_string()))
        })
        .collect()
}

/// Backtick-quote an identifier for statements that cannot take parameters
fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// MySQL, and H2 in MySQL mode
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlComments;

#[async_trait]
impl CommentProvider for MySqlComments {
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String> {
        let sql = format!("SHOW CREATE TABLE {}", quote_backtick(table));
        let rows = source.query(&sql, &[]).await?;
        let ddl = rows
            .first()
            .and_then(|row| row.get_named("Create Table").or_else(|| row.get(1)))
            .unwrap_or_default();
        Ok(parse_table_comment(ddl).unwrap_or_default())
    }

    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
    ) -> Result<ColumnComments> {
        let sql = format!("SHOW FULL COLUMNS FROM {}", quote_backtick(table));
        let rows = source.query(&sql, &[]).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let field = row.get_named("Field")?;
                let comment = row.get_named("Comment").unwrap_or_default();
                Some((field.to_string(), comment.to_string()))
            })
            .collect())
    }
}

/// Extract the table-level `COMMENT='...'` option from `SHOW CREATE TABLE`
/// output.
///
/// Only the text after the closing parenthesis of the column list is
/// searched, so column comments are never mistaken for the table comment.
pub fn parse_table_comment(ddl: &str) -> Option<String> {
    let options = &ddl[column_list_end(ddl)?..];
    let start = options.find("COMMENT='")? + "COMMENT='".len();

    let mut comment = String::new();
    let mut chars = options[start..].chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next()?;
                comment.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '0' => '\0',
                    other => other,
                });
            }
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                comment.push('\'');
            }
            '\'' => return Some(comment),
            other => comment.push(other),
        }
    }
    // Unterminated literal
    None
}

/// Byte offset just past the parenthesis closing the column list
fn column_list_end(ddl: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in ddl.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresComments;

const POSTGRES_TABLE_COMMENT: &str = "SELECT obj_description(oid, 'pg_class') \
     FROM pg_catalog.pg_class WHERE relname = $1";

const POSTGRES_COLUMN_COMMENTS: &str = "SELECT a.attname::text, col_description(a.attrelid, a.attnum) \
     FROM pg_catalog.pg_attribute a \
     JOIN pg_catalog.pg_class c ON c.oid = a.attrelid \
     WHERE c.relname = $1 AND a.attnum > 0 AND NOT a.attisdropped";

#[async_trait]
impl CommentProvider for PostgresComments {
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String> {
        Ok(first_cell(&source.query(POSTGRES_TABLE_COMMENT, &[table]).await?))
    }

    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
    ) -> Result<ColumnComments> {
        Ok(pairs(&source.query(POSTGRES_COLUMN_COMMENTS, &[table]).await?))
    }
}

/// Oracle stores unquoted identifiers upper case
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleComments;

const ORACLE_TABLE_COMMENT: &str =
    "SELECT comments FROM user_tab_comments WHERE table_name = :1";

const ORACLE_COLUMN_COMMENTS: &str =
    "SELECT column_name, comments FROM user_col_comments WHERE table_name = :1";

#[async_trait]
impl CommentProvider for OracleComments {
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String> {
        let name = table.to_uppercase();
        Ok(first_cell(&source.query(ORACLE_TABLE_COMMENT, &[name.as_str()]).await?))
    }

    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
    ) -> Result<ColumnComments> {
        let name = table.to_uppercase();
        Ok(pairs(&source.query(ORACLE_COLUMN_COMMENTS, &[name.as_str()]).await?))
    }
}

/// SQL Server `MS_Description` extended properties
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerComments;

const SQLSERVER_TABLE_COMMENT: &str = "SELECT CAST(value AS NVARCHAR(4000)) \
     FROM sys.extended_properties \
     WHERE major_id = OBJECT_ID(@P1) AND name = 'MS_Description' AND minor_id = 0";

const SQLSERVER_COLUMN_COMMENTS: &str = "SELECT c.name, CAST(ep.value AS NVARCHAR(4000)) \
     FROM sys.columns c \
     LEFT JOIN sys.extended_properties ep \
     ON ep.major_id = c.object_id AND ep.minor_id = c.column_id AND ep.name = 'MS_Description' \
     WHERE OBJECT_NAME(c.object_id) = @P1";

#[async_trait]
impl CommentProvider for SqlServerComments {
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String> {
        Ok(first_cell(&source.query(SQLSERVER_TABLE_COMMENT, &[table]).await?))
    }

    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
    ) -> Result<ColumnComments> {
        Ok(pairs(&source.query(SQLSERVER_COLUMN_COMMENTS, &[table]).await?))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Db2Comments;

const DB2_TABLE_COMMENT: &str =
    "SELECT REMARKS FROM SYSCAT.TABLES WHERE TABSCHEMA = CURRENT SCHEMA AND TABNAME = ?";

const DB2_COLUMN_COMMENTS: &str =
    "SELECT COLNAME, REMARKS FROM SYSCAT.COLUMNS WHERE TABSCHEMA = CURRENT SCHEMA AND TABNAME = ?";

#[async_trait]
impl CommentProvider for Db2Comments {
    async fn table_comment(&self, source: &dyn MetadataSource, table: &str) -> Result<String> {
        let name = table.to_uppercase();
        Ok(first_cell(&source.query(DB2_TABLE_COMMENT, &[name.as_str()]).await?))
    }

    async fn column_comments(
        &self,
        source: &dyn MetadataSource,
        table: &str,
    ) -> Result<ColumnComments> {
        let name = table.to_uppercase();
        Ok(pairs(&source.query(DB2_COLUMN_COMMENTS, &[name.as_str()]).await?))
    }
}

/// Dialects without a comment catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComments;

#[async_trait]
impl CommentProvider for NoComments {
    async fn table_comment(&self, _source: &dyn MetadataSource, table: &str) -> Result<String> {
        debug!(table, "Dialect has no table comments");
        Ok(String::new())
    }

    async fn column_comments(
        &self,
        _source: &dyn MetadataSource,
        _table: &str,
    ) -> Result<ColumnComments> {
        Ok(ColumnComments::new())
    }
}
