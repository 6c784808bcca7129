//! Immutable generation options shared by every descriptor of a run

use std::collections::BTreeMap;

use serde::Serialize;

use super::settings::{CodegenConfig, LayerPackages, LayerSuffix};

/// Fully qualified package of each layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerPaths {
    pub base: String,
    pub dto: String,
    pub entity: String,
    pub service: String,
    pub service_impl: String,
    pub mapper: String,
    pub controller: String,
    pub util: String,
}

impl LayerPaths {
    pub fn new(base: &str, layers: &LayerPackages) -> Self {
        let join = |segment: &str| {
            if base.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", base, segment)
            }
        };
        Self {
            base: base.to_string(),
            dto: join(&layers.dto),
            entity: join(&layers.entity),
            service: join(&layers.service),
            service_impl: join(&layers.service_impl),
            mapper: join(&layers.mapper),
            controller: join(&layers.controller),
            util: join(&layers.util),
        }
    }
}

/// Options every template sees, snapshotted from the configuration.
///
/// Each `TableDescriptor` owns its own copy, so nothing a later run does to
/// a configuration is visible through descriptors already built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOptions {
    pub author: String,
    pub packages: LayerPaths,
    /// Package segments relative to `packages.base`, used for output paths
    pub layers: LayerPackages,
    pub suffixes: LayerSuffix,
    pub lombok_enable: bool,
    pub api_doc_enable: bool,
    pub api_doc_type: String,
    pub api_doc_version: String,
    pub overwrite_enable: bool,
    pub custom_properties: BTreeMap<String, serde_json::Value>,
}

impl GenerationOptions {
    pub fn from_config(config: &CodegenConfig) -> Self {
        let custom = &config.custom_properties;
        Self {
            author: config.output.author.clone(),
            packages: LayerPaths::new(&config.output.package_url, &custom.layer_package_name),
            layers: custom.layer_package_name.clone(),
            suffixes: custom.layer_suffix.clone(),
            lombok_enable: custom.lombok_enable,
            api_doc_enable: config.api_doc.enable,
            api_doc_type: config.api_doc.doc_type.clone(),
            api_doc_version: config.api_doc.version.clone(),
            overwrite_enable: config.output.overwrite_enable,
            custom_properties: custom.extra.clone(),
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::from_config(&CodegenConfig::default())
    }
}
