//! schemagen: Generate entity, mapper, service and controller sources from a live database schema
//!
//! This crate provides both a CLI tool and a library. A run reads the
//! configured tables through a pooled connection, turns each one into a
//! [`TableDescriptor`](introspect::TableDescriptor) and renders it through
//! Tera templates into a Java/Spring/MyBatis source layout:
//!
//! - entity, data-transfer object, mapper interface and mapper XML
//! - service interface, service implementation and REST controller
//! - the shared `BaseResponseDto` / `Result` response wrappers, once per run
//!
//! Templates default to the ones compiled into the crate; a `template_dir`
//! may override any subset of them by file name.
//!
//! # Configuration
//!
//! ```yaml
//! database:
//!   url: jdbc:mysql://localhost:3306/shop
//!   username: root
//!   password: secret
//! tables:
//!   - table_name: orders
//!   - table_name: order_item
//! output:
//!   base_output_dir: src/main/java/com/example/shop
//!   author: shop-team
//!   package_url: com.example.shop
//! custom_properties:
//!   lombok_enable: true
//! ```
//!
//! # Library Usage
//!
//! ```rust,ignore
//! let config = schemagen::CodegenConfig::load(Some(Path::new("schemagen.yml")))?;
//! let report = schemagen::generate(&config).await?;
//! println!("{} written, {} skipped", report.written(), report.skipped());
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! schemagen --config schemagen.yml generate
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod introspect;
pub mod template;

use std::sync::Arc;

use indexmap::IndexMap;
use schemagen_db::{AnyMetadata, ConnectionManager, MetadataSource};
use tracing::info;

pub use codegen::{ArtifactKind, CodeGenerator, GenerationReport, GenerationResult, GenerationStatus};
pub use config::{CodegenConfig, GenerationOptions};
pub use error::{CodegenError, Result};
pub use introspect::{SchemaScanner, TableDescriptor};

/// Main entry point for code generation
pub async fn generate(config: &CodegenConfig) -> Result<GenerationReport> {
    config.validate()?;

    let tables = scan_tables(config).await?;
    info!("Scanned {} tables", tables.len());

    let report = CodeGenerator::new(config).generate(&tables).await?;
    info!("Code generation complete");
    Ok(report)
}

/// Scan the configured tables without generating anything
pub async fn inspect(config: &CodegenConfig) -> Result<IndexMap<String, TableDescriptor>> {
    config.validate()?;
    scan_tables(config).await
}

/// Connect, scan, and close the pool whether or not the scan succeeded
async fn scan_tables(config: &CodegenConfig) -> Result<IndexMap<String, TableDescriptor>> {
    let manager = Arc::new(ConnectionManager::with_settings(config.db_settings()));

    let scanned = async {
        let source = AnyMetadata::new(Arc::clone(&manager))?;
        info!("Scanning {} database", source.kind());

        let options = GenerationOptions::from_config(config);
        let mut scanner = SchemaScanner::for_kind(source.kind());
        scanner
            .scan(&source, &config.table_names(), &options)
            .await?;
        Ok::<_, CodegenError>(scanner.into_tables())
    }
    .await;

    manager.close().await;
    scanned
}
