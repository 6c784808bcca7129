//! Database dialect detection from connection URLs

use std::fmt;

use tracing::warn;

use crate::error::{Error, Result};

/// The database products schemagen knows how to talk about.
///
/// Variant order is significant: [`DatabaseKind::resolve`] tests tokens in
/// this order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseKind {
    MySql,
    PostgreSql,
    Oracle,
    SqlServer,
    Db2,
    H2,
    Sqlite,
}

impl DatabaseKind {
    /// All kinds, in match order.
    pub const ALL: [DatabaseKind; 7] = [
        DatabaseKind::MySql,
        DatabaseKind::PostgreSql,
        DatabaseKind::Oracle,
        DatabaseKind::SqlServer,
        DatabaseKind::Db2,
        DatabaseKind::H2,
        DatabaseKind::Sqlite,
    ];

    /// Token searched for in a connection URL
    pub fn token(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "mysql",
            DatabaseKind::PostgreSql => "postgresql",
            DatabaseKind::Oracle => "oracle",
            DatabaseKind::SqlServer => "sqlserver",
            DatabaseKind::Db2 => "db2",
            DatabaseKind::H2 => "h2",
            DatabaseKind::Sqlite => "sqlite",
        }
    }

    /// Human readable product name
    pub fn display_name(&self) -> &'static str {
        match self {
            DatabaseKind::MySql => "MySQL",
            DatabaseKind::PostgreSql => "PostgreSQL",
            DatabaseKind::Oracle => "Oracle",
            DatabaseKind::SqlServer => "SQL Server",
            DatabaseKind::Db2 => "DB2",
            DatabaseKind::H2 => "H2 Database",
            DatabaseKind::Sqlite => "SQLite",
        }
    }

    /// Classify a connection URL.
    ///
    /// A `sqlite:` scheme (optionally behind `jdbc:`) is SQLite whatever the
    /// file path contains. Otherwise matching is a case-insensitive
    /// substring search. A URL that matches no token resolves to
    /// [`DatabaseKind::MySql`]; an empty URL is a configuration error.
    pub fn resolve(url: &str) -> Result<DatabaseKind> {
        if url.trim().is_empty() {
            return Err(Error::Configuration(
                "database url must not be empty".into(),
            ));
        }

        let lowered = url.trim().to_lowercase();
        let scheme = lowered.strip_prefix("jdbc:").unwrap_or(&lowered);
        if scheme.starts_with("sqlite:") {
            return Ok(DatabaseKind::Sqlite);
        }

        if let Some(kind) = Self::ALL
            .iter()
            .find(|kind| lowered.contains(kind.token()))
        {
            return Ok(*kind);
        }

        warn!(
            "No known database token in url, defaulting to {}",
            DatabaseKind::MySql.display_name()
        );
        Ok(DatabaseKind::MySql)
    }

    /// Whether a sqlx driver is compiled in for this kind
    pub fn has_driver(&self) -> bool {
        matches!(
            self,
            DatabaseKind::MySql | DatabaseKind::PostgreSql | DatabaseKind::Sqlite
        )
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_urls() {
        assert_eq!(
            DatabaseKind::resolve("jdbc:mysql://localhost:3306/db").unwrap(),
            DatabaseKind::MySql
        );
        assert_eq!(
            DatabaseKind::resolve("jdbc:postgresql://host/db").unwrap(),
            DatabaseKind::PostgreSql
        );
        assert_eq!(
            DatabaseKind::resolve("jdbc:oracle:thin:@host:1521:orcl").unwrap(),
            DatabaseKind::Oracle
        );
        assert_eq!(
            DatabaseKind::resolve("jdbc:sqlserver://host;databaseName=db").unwrap(),
            DatabaseKind::SqlServer
        );
        assert_eq!(
            DatabaseKind::resolve("jdbc:db2://host:50000/db").unwrap(),
            DatabaseKind::Db2
        );
        assert_eq!(
            DatabaseKind::resolve("jdbc:h2:mem:test").unwrap(),
            DatabaseKind::H2
        );
        assert_eq!(
            DatabaseKind::resolve("sqlite:///tmp/app.db").unwrap(),
            DatabaseKind::Sqlite
        );
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(
            DatabaseKind::resolve("JDBC:PostgreSQL://HOST/DB").unwrap(),
            DatabaseKind::PostgreSql
        );
    }

    #[test]
    fn test_first_match_wins() {
        // "mysql" is tested before "h2"
        assert_eq!(
            DatabaseKind::resolve("jdbc:mysql://h2host/db").unwrap(),
            DatabaseKind::MySql
        );
    }

    #[test]
    fn test_sqlite_scheme_wins_over_path_tokens() {
        for url in [
            "sqlite:///srv/h2/app.db",
            "sqlite://./mysql_export.db",
            "jdbc:sqlite:/data/db2/legacy.db",
            "SQLITE://backup/postgresql.db",
        ] {
            assert_eq!(DatabaseKind::resolve(url).unwrap(), DatabaseKind::Sqlite, "{}", url);
        }
    }

    #[test]
    fn test_unknown_defaults_to_mysql() {
        assert_eq!(
            DatabaseKind::resolve("jdbc:mariadb://localhost/db").unwrap(),
            DatabaseKind::MySql
        );
    }

    #[test]
    fn test_empty_url_is_configuration_error() {
        assert!(matches!(
            DatabaseKind::resolve(""),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            DatabaseKind::resolve("   "),
            Err(Error::Configuration(_))
        ));
    }
}
