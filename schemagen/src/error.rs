//! Error types for schemagen

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for schemagen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Failed to read metadata for table `{table}`: {source}")]
    IntrospectionError {
        table: String,
        #[source]
        source: schemagen_db::Error,
    },

    #[error("Table `{table}` has no columns")]
    EmptyTable { table: String },

    #[error("Unsupported column type `{type_name}` in table `{table}`")]
    UnsupportedDataType { type_name: String, table: String },

    #[error("Template `{name}`: {message}")]
    TemplateError { name: String, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Generation worker failed: {0}")]
    WorkerError(String),
}

impl CodegenError {
    pub(crate) fn template(name: &str, message: impl Into<String>) -> Self {
        CodegenError::TemplateError {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl From<schemagen_db::Error> for CodegenError {
    fn from(err: schemagen_db::Error) -> Self {
        match err {
            schemagen_db::Error::Configuration(msg) => CodegenError::ConfigError(msg),
            other => CodegenError::ConnectionError(other.to_string()),
        }
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}

/// Flatten an error and its sources into one line.
///
/// Tera reports the useful part (the failing expression) in the source
/// chain, not the top-level message.
pub(crate) fn render_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
