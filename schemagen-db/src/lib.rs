//! schemagen-db: database access for schemagen
//!
//! This crate hides the differences between SQL dialects behind a small
//! surface:
//!
//! - [`DatabaseKind`]: classify a connection URL into a dialect
//! - [`ConnectionManager`]: a lazily built, explicitly closed connection pool
//! - [`MetadataSource`]: standard table/column metadata plus raw queries,
//!   implemented over sqlx's `Any` driver by [`AnyMetadata`]
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use schemagen_db::{AnyMetadata, ConnectionManager, DbSettings, MetadataSource};
//!
//! let manager = Arc::new(ConnectionManager::with_settings(
//!     DbSettings::new("jdbc:mysql://localhost:3306/app").credentials("root", "secret"),
//! ));
//! let source = AnyMetadata::new(Arc::clone(&manager))?;
//! let columns = source.columns("user_account").await?;
//! manager.close().await;
//! ```

pub mod any;
pub mod dialect;
pub mod error;
pub mod pool;
pub mod traits;

pub use any::AnyMetadata;
pub use dialect::DatabaseKind;
pub use error::{Error, Result};
pub use pool::{ConnectionManager, DbSettings};
pub use traits::{ColumnMeta, MetadataSource, TextRow};
