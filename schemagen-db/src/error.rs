//! Error types for schemagen-db

use thiserror::Error;

use crate::dialect::DatabaseKind;

/// Result type alias for schemagen-db operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while connecting to or reading from a database
#[derive(Error, Debug)]
pub enum Error {
    /// Driver error raised by sqlx
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Missing or invalid connection settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pool initialization or connection acquisition failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// A metadata row did not have the expected shape
    #[error("Query error: {0}")]
    Query(String),

    /// No metadata statements exist for this database kind
    #[error("Schema metadata is not available for {0}")]
    UnsupportedDialect(DatabaseKind),
}

impl Error {
    /// Whether the database could not be reached at all, as opposed to a
    /// statement failing on a live connection.
    pub fn is_connection(&self) -> bool {
        match self {
            Error::Connection(_) => true,
            Error::Sqlx(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            ),
            _ => false,
        }
    }
}
