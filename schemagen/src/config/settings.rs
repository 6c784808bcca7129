//! Configuration settings for schemagen

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use schemagen_db::DbSettings;
use serde::{Deserialize, Serialize};

use super::defaults;
use crate::codegen::{is_java_identifier, to_entity_name, ArtifactKind};
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Database connection parameters
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Tables to generate, in order
    #[serde(default)]
    pub tables: Vec<TableConfig>,

    /// API documentation annotations
    #[serde(default)]
    pub api_doc: ApiDocConfig,

    /// Output location and header information
    #[serde(default)]
    pub output: OutputConfig,

    /// Directory searched for template overrides before the embedded defaults
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Artifact kinds to generate (all when absent)
    #[serde(default)]
    pub artifacts: Option<Vec<ArtifactKind>>,

    /// Feature flags, layer naming and free-form template properties
    #[serde(default)]
    pub custom_properties: CustomProperties,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (`jdbc:` prefix accepted)
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Driver identifier, kept for configs shared with JDBC tooling
    #[serde(default)]
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableConfig {
    pub table_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDocConfig {
    #[serde(default = "default_api_doc_enable")]
    pub enable: bool,
    /// swagger, openapi, ...
    #[serde(default = "default_api_doc_type")]
    pub doc_type: String,
    #[serde(default = "default_api_doc_version")]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_base_output_dir")]
    pub base_output_dir: PathBuf,
    #[serde(default = "default_overwrite_enable")]
    pub overwrite_enable: bool,
    #[serde(default)]
    pub author: String,
    /// Base package, e.g. `com.example.demo`
    #[serde(default)]
    pub package_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomProperties {
    #[serde(default = "default_lombok_enable")]
    pub lombok_enable: bool,

    #[serde(default)]
    pub layer_suffix: LayerSuffix,

    #[serde(default)]
    pub layer_package_name: LayerPackages,

    /// Any other keys, passed to templates untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Package segment of each layer, relative to `output.package_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPackages {
    #[serde(default = "layer_package::dto")]
    pub dto: String,
    #[serde(default = "layer_package::entity")]
    pub entity: String,
    #[serde(default = "layer_package::service")]
    pub service: String,
    #[serde(default = "layer_package::service_impl")]
    pub service_impl: String,
    #[serde(default = "layer_package::mapper")]
    pub mapper: String,
    #[serde(default = "layer_package::controller")]
    pub controller: String,
    #[serde(default = "layer_package::util")]
    pub util: String,
}

/// Class-name suffix of each layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSuffix {
    #[serde(default = "layer_suffix::entity")]
    pub entity: String,
    #[serde(default = "layer_suffix::dto")]
    pub dto: String,
    #[serde(default = "layer_suffix::service")]
    pub service: String,
    #[serde(default = "layer_suffix::service_impl")]
    pub service_impl: String,
    #[serde(default = "layer_suffix::mapper")]
    pub mapper: String,
    #[serde(default = "layer_suffix::controller")]
    pub controller: String,
}

// Default value functions for serde
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}
fn default_api_doc_enable() -> bool {
    defaults::API_DOC_ENABLE
}
fn default_api_doc_type() -> String {
    defaults::API_DOC_TYPE.to_string()
}
fn default_api_doc_version() -> String {
    defaults::API_DOC_VERSION.to_string()
}
fn default_base_output_dir() -> PathBuf {
    PathBuf::from(defaults::BASE_OUTPUT_DIR)
}
fn default_overwrite_enable() -> bool {
    defaults::OVERWRITE_ENABLE
}
fn default_lombok_enable() -> bool {
    defaults::LOMBOK_ENABLE
}

mod layer_package {
    use crate::config::defaults::layer_package as d;

    pub fn dto() -> String {
        d::DTO.to_string()
    }
    pub fn entity() -> String {
        d::ENTITY.to_string()
    }
    pub fn service() -> String {
        d::SERVICE.to_string()
    }
    pub fn service_impl() -> String {
        d::SERVICE_IMPL.to_string()
    }
    pub fn mapper() -> String {
        d::MAPPER.to_string()
    }
    pub fn controller() -> String {
        d::CONTROLLER.to_string()
    }
    pub fn util() -> String {
        d::UTIL.to_string()
    }
}

mod layer_suffix {
    use crate::config::defaults::layer_suffix as d;

    pub fn entity() -> String {
        d::ENTITY.to_string()
    }
    pub fn dto() -> String {
        d::DTO.to_string()
    }
    pub fn service() -> String {
        d::SERVICE.to_string()
    }
    pub fn service_impl() -> String {
        d::SERVICE_IMPL.to_string()
    }
    pub fn mapper() -> String {
        d::MAPPER.to_string()
    }
    pub fn controller() -> String {
        d::CONTROLLER.to_string()
    }
}

impl Default for ApiDocConfig {
    fn default() -> Self {
        Self {
            enable: default_api_doc_enable(),
            doc_type: default_api_doc_type(),
            version: default_api_doc_version(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_output_dir: default_base_output_dir(),
            overwrite_enable: default_overwrite_enable(),
            author: String::new(),
            package_url: String::new(),
        }
    }
}

impl Default for LayerPackages {
    fn default() -> Self {
        Self {
            dto: layer_package::dto(),
            entity: layer_package::entity(),
            service: layer_package::service(),
            service_impl: layer_package::service_impl(),
            mapper: layer_package::mapper(),
            controller: layer_package::controller(),
            util: layer_package::util(),
        }
    }
}

impl Default for LayerSuffix {
    fn default() -> Self {
        Self {
            entity: layer_suffix::entity(),
            dto: layer_suffix::dto(),
            service: layer_suffix::service(),
            service_impl: layer_suffix::service_impl(),
            mapper: layer_suffix::mapper(),
            controller: layer_suffix::controller(),
        }
    }
}

impl CodegenConfig {
    /// Load configuration from a file (format chosen by extension)
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                CodegenError::ConfigError(format!(
                    "Failed to read config file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE_STEM).required(false));
        }

        // Override with environment variables (SCHEMAGEN_*)
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Ordered table names
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.table_name.clone()).collect()
    }

    /// Artifact kinds selected for this run
    pub fn artifact_kinds(&self) -> Vec<ArtifactKind> {
        self.artifacts
            .clone()
            .unwrap_or_else(|| ArtifactKind::ALL.to_vec())
    }

    /// Connection settings for the connection manager
    pub fn db_settings(&self) -> DbSettings {
        let mut settings = DbSettings::new(self.database.url.clone())
            .credentials(self.database.username.clone(), self.database.password.clone());
        settings.driver = self.database.driver.clone();
        settings
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        require(&self.database.url, "database.url")?;
        require(&self.database.username, "database.username")?;

        if self.tables.is_empty() {
            return Err(CodegenError::ConfigError(
                "tables must list at least one table".into(),
            ));
        }
        for (idx, table) in self.tables.iter().enumerate() {
            require(&table.table_name, &format!("tables[{}].table_name", idx))?;
            let entity = to_entity_name(&table.table_name);
            if !is_java_identifier(&entity) {
                return Err(CodegenError::ConfigError(format!(
                    "table `{}` does not give a valid Java class name (`{}`)",
                    table.table_name, entity
                )));
            }
        }

        if self.output.base_output_dir.as_os_str().is_empty() {
            return Err(CodegenError::ConfigError(
                "missing required field: output.base_output_dir".into(),
            ));
        }
        require(&self.output.author, "output.author")?;
        require(&self.output.package_url, "output.package_url")?;

        if let Some(artifacts) = &self.artifacts {
            if artifacts.is_empty() {
                return Err(CodegenError::ConfigError(
                    "artifacts must not be an empty list".into(),
                ));
            }
        }

        if let Some(dir) = &self.template_dir {
            if !dir.is_dir() {
                return Err(CodegenError::ConfigError(format!(
                    "template_dir is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CodegenError::ConfigError(format!(
            "missing required field: {}",
            field
        )));
    }
    Ok(())
}
