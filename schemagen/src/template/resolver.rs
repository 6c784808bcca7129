//! Template lookup with per-run caching
//!
//! Templates are looked up by name under a source key: either the embedded
//! defaults or an override directory. An override directory only has to
//! contain the templates it changes; any other name falls back to the
//! embedded default.
//!
//! Both the source configuration and the compiled templates are cached in
//! [`DashMap`]s. Misses go through `entry().or_try_insert_with()`, which
//! holds the shard lock while loading, so concurrent first lookups of one
//! key load it once. A failed load leaves nothing behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};

use super::{embedded, filters};
use crate::error::{render_chain, CodegenError, Result};

/// Where a run's templates come from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Embedded,
    Directory(PathBuf),
}

impl SourceKey {
    pub fn for_override(override_dir: Option<&Path>) -> Self {
        match override_dir {
            Some(dir) => SourceKey::Directory(dir.to_path_buf()),
            None => SourceKey::Embedded,
        }
    }
}

/// Where a single compiled template was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Embedded,
    File(PathBuf),
}

/// A configured template source root
#[derive(Debug)]
pub struct TemplateSource {
    root: Option<PathBuf>,
}

impl TemplateSource {
    fn open(key: &SourceKey) -> Result<Self> {
        match key {
            SourceKey::Embedded => Ok(Self { root: None }),
            SourceKey::Directory(dir) => {
                if !dir.is_dir() {
                    return Err(CodegenError::ConfigError(format!(
                        "template directory does not exist: {}",
                        dir.display()
                    )));
                }
                debug!(dir = %dir.display(), "Template override directory configured");
                Ok(Self {
                    root: Some(dir.clone()),
                })
            }
        }
    }

    /// Template text for `name`, preferring the override directory
    fn load(&self, name: &str) -> Result<(String, TemplateOrigin)> {
        if let Some(root) = &self.root {
            let path = root.join(name);
            if path.is_file() {
                let content = fs::read_to_string(&path).map_err(|e| {
                    CodegenError::template(
                        name,
                        format!("cannot read {}: {}", path.display(), e),
                    )
                })?;
                return Ok((content, TemplateOrigin::File(path)));
            }
            info!(
                "No {} under {}, using the built-in template",
                name,
                root.display()
            );
        }

        embedded::default_template(name)
            .map(|content| (content.to_string(), TemplateOrigin::Embedded))
            .ok_or_else(|| CodegenError::template(name, "no built-in template with this name"))
    }
}

/// A parsed template, ready to render
#[derive(Debug)]
pub struct CompiledTemplate {
    name: String,
    origin: TemplateOrigin,
    tera: Tera,
}

impl CompiledTemplate {
    fn compile(name: &str, content: &str, origin: TemplateOrigin) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        filters::register(&mut tera);
        tera.add_raw_template(name, content)
            .map_err(|e| CodegenError::template(name, render_chain(&e)))?;
        Ok(Self {
            name: name.to_string(),
            origin,
            tera,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &TemplateOrigin {
        &self.origin
    }

    /// Render `model` as the template context, streaming into `writer`
    pub fn render_to<T: Serialize>(&self, model: &T, writer: impl Write) -> Result<()> {
        let context = Context::from_serialize(model)
            .map_err(|e| CodegenError::template(&self.name, render_chain(&e)))?;
        self.tera
            .render_to(&self.name, &context, writer)
            .map_err(|e| CodegenError::template(&self.name, render_chain(&e)))
    }

    /// Render into a string
    pub fn render<T: Serialize>(&self, model: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.render_to(model, &mut buf)?;
        String::from_utf8(buf).map_err(|e| CodegenError::template(&self.name, e.to_string()))
    }
}

/// Resolves template names to compiled templates, caching both levels
#[derive(Debug, Default)]
pub struct TemplateResolver {
    sources: DashMap<SourceKey, Arc<TemplateSource>>,
    compiled: DashMap<(SourceKey, String), Arc<CompiledTemplate>>,
    loads: AtomicUsize,
}

impl TemplateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled template for `name`, loading it on first use
    pub fn resolve(&self, name: &str, override_dir: Option<&Path>) -> Result<Arc<CompiledTemplate>> {
        let key = SourceKey::for_override(override_dir);

        let compile_key = (key.clone(), name.to_string());
        if let Some(hit) = self.compiled.get(&compile_key) {
            return Ok(Arc::clone(hit.value()));
        }

        let source = self.source(&key)?;
        let entry = self.compiled.entry(compile_key).or_try_insert_with(|| {
            let (content, origin) = source.load(name)?;
            let template = CompiledTemplate::compile(name, &content, origin)?;
            self.loads.fetch_add(1, Ordering::Relaxed);
            debug!(template = name, origin = ?template.origin, "Template compiled");
            Ok::<_, CodegenError>(Arc::new(template))
        })?;
        Ok(Arc::clone(entry.value()))
    }

    fn source(&self, key: &SourceKey) -> Result<Arc<TemplateSource>> {
        if let Some(hit) = self.sources.get(key) {
            return Ok(Arc::clone(hit.value()));
        }
        let entry = self
            .sources
            .entry(key.clone())
            .or_try_insert_with(|| TemplateSource::open(key).map(Arc::new))?;
        Ok(Arc::clone(entry.value()))
    }

    /// Number of templates compiled so far
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of cached compiled templates
    pub fn cached(&self) -> usize {
        self.compiled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationOptions;
    use crate::introspect::{ColumnDescriptor, TableDescriptor, LOMBOK_IMPORTS};
    use serde_json::json;
    use std::collections::BTreeSet;

    #[test]
    fn test_embedded_template_is_resolved() {
        let resolver = TemplateResolver::new();
        let template = resolver.resolve("result.tera", None).unwrap();
        assert_eq!(template.name(), "result.tera");
        assert_eq!(template.origin(), &TemplateOrigin::Embedded);
    }

    #[test]
    fn test_second_resolve_is_cached() {
        let resolver = TemplateResolver::new();
        let first = resolver.resolve("entity.tera", None).unwrap();
        let second = resolver.resolve("entity.tera", None).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.loads(), 1);
    }

    #[test]
    fn test_missing_template_is_error_and_not_cached() {
        let resolver = TemplateResolver::new();
        let err = resolver.resolve("missing.tera", None).unwrap_err();
        match err {
            CodegenError::TemplateError { name, .. } => assert_eq!(name, "missing.tera"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn test_override_directory_mixes_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("entity.tera"), "custom {{ entity_name }}").unwrap();

        let resolver = TemplateResolver::new();
        let entity = resolver.resolve("entity.tera", Some(dir.path())).unwrap();
        let dto = resolver.resolve("dto.tera", Some(dir.path())).unwrap();

        assert_eq!(
            entity.origin(),
            &TemplateOrigin::File(dir.path().join("entity.tera"))
        );
        assert_eq!(dto.origin(), &TemplateOrigin::Embedded);
        assert_eq!(
            entity.render(&json!({ "entity_name": "Order" })).unwrap(),
            "custom Order"
        );
    }

    #[test]
    fn test_sources_are_cached_separately() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("result.tera"), "override").unwrap();

        let resolver = TemplateResolver::new();
        let embedded = resolver.resolve("result.tera", None).unwrap();
        let custom = resolver.resolve("result.tera", Some(dir.path())).unwrap();

        assert!(!Arc::ptr_eq(&embedded, &custom));
        assert_eq!(resolver.loads(), 2);
    }

    #[test]
    fn test_missing_override_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = TemplateResolver::new()
            .resolve("entity.tera", Some(&missing))
            .unwrap_err();
        assert!(matches!(err, CodegenError::ConfigError(_)));
    }

    #[test]
    fn test_malformed_override_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dto.tera"), "{% if %}").unwrap();

        let resolver = TemplateResolver::new();
        let err = resolver.resolve("dto.tera", Some(dir.path())).unwrap_err();
        assert!(matches!(err, CodegenError::TemplateError { ref name, .. } if name == "dto.tera"));
        assert_eq!(resolver.cached(), 0);
    }

    #[test]
    fn test_concurrent_resolves_load_once() {
        let resolver = TemplateResolver::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    resolver.resolve("controller.tera", None).unwrap();
                });
            }
        });
        assert_eq!(resolver.loads(), 1);
        assert_eq!(resolver.cached(), 1);
    }

    fn orders(configure: impl FnOnce(&mut GenerationOptions)) -> TableDescriptor {
        let mut options = GenerationOptions::default();
        options.author = "tester".into();
        configure(&mut options);
        let mut import_packages: BTreeSet<String> = BTreeSet::new();
        if options.lombok_enable {
            import_packages.extend(LOMBOK_IMPORTS.iter().map(|i| i.to_string()));
        }
        TableDescriptor {
            table_name: "orders".into(),
            entity_name: "Orders".into(),
            entity_name_lower: "orders".into(),
            table_comment: "Customer orders".into(),
            columns: vec![ColumnDescriptor {
                column_name: "order_id".into(),
                column_type: "BIGINT".into(),
                field_name: "orderId".into(),
                field_type: "Long".into(),
                comment: "Key".into(),
            }],
            import_packages,
            options,
        }
    }

    fn render_default(name: &str, model: &TableDescriptor) -> String {
        TemplateResolver::new()
            .resolve(name, None)
            .unwrap()
            .render(model)
            .unwrap()
    }

    #[test]
    fn test_lombok_replaces_accessors() {
        let plain = render_default("entity.tera", &orders(|_| {}));
        assert!(plain.contains("public Long getOrderId() {"));
        assert!(plain.contains("public void setOrderId(Long orderId) {"));
        assert!(!plain.contains("@Data"));

        let lombok = render_default("entity.tera", &orders(|o| o.lombok_enable = true));
        assert!(lombok.contains("import lombok.Data;"));
        assert!(lombok.contains("@Data\n@NoArgsConstructor\n@AllArgsConstructor\npublic class Orders {"));
        assert!(!lombok.contains("getOrderId"));
        assert!(!lombok.contains("setOrderId"));

        let dto = render_default("dto.tera", &orders(|o| o.lombok_enable = true));
        assert!(dto.contains("@Data"));
        assert!(!dto.contains("getOrderId"));
    }

    #[test]
    fn test_api_doc_disabled_adds_no_annotations() {
        let entity = render_default("entity.tera", &orders(|_| {}));
        assert!(!entity.contains("swagger"));
        assert!(!entity.contains("@Schema"));
        assert!(!entity.contains("@ApiModel"));
    }

    #[test]
    fn test_api_doc_openapi_3_annotations() {
        let model = orders(|o| {
            o.api_doc_enable = true;
            o.api_doc_version = "3.0".into();
        });

        let entity = render_default("entity.tera", &model);
        assert!(entity.contains("import io.swagger.v3.oas.annotations.media.Schema;"));
        assert!(entity.contains("@Schema(description = \"Customer orders\")"));
        assert!(entity.contains("@Schema(description = \"Key\")"));
        assert!(!entity.contains("ApiModel"));

        let controller = render_default("controller.tera", &model);
        assert!(controller.contains("@Tag(name = \"Customer orders\")"));
        assert!(controller.contains("@Operation(summary = \"Get by id\")"));
        assert!(!controller.contains("io.swagger.annotations"));
    }

    #[test]
    fn test_api_doc_swagger_2_annotations() {
        let model = orders(|o| {
            o.api_doc_enable = true;
            o.api_doc_version = "2.0".into();
        });

        let dto = render_default("dto.tera", &model);
        assert!(dto.contains("import io.swagger.annotations.ApiModel;"));
        assert!(dto.contains("@ApiModel(description = \"Customer orders\")"));
        assert!(dto.contains("@ApiModelProperty(value = \"Key\")"));
        assert!(!dto.contains("io.swagger.v3"));

        let controller = render_default("controller.tera", &model);
        assert!(controller.contains("@Api(tags = \"Customer orders\")"));
        assert!(controller.contains("@ApiOperation(\"Get by id\")"));
        assert!(!controller.contains("@Operation("));
    }

    #[test]
    fn test_comments_are_escaped_inside_annotations() {
        let mut model = orders(|o| o.api_doc_enable = true);
        model.table_comment = r#"Say "hi""#.into();
        model.columns[0].comment = r"C:\orders".into();

        let entity = render_default("entity.tera", &model);
        assert!(entity.contains(r#"@Schema(description = "Say \"hi\"")"#));
        assert!(entity.contains(r#"@Schema(description = "C:\\orders")"#));
    }

    #[test]
    fn test_render_error_names_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service.tera"), "{{ missing.field }}").unwrap();

        let template = TemplateResolver::new()
            .resolve("service.tera", Some(dir.path()))
            .unwrap();
        let err = template.render(&json!({})).unwrap_err();
        assert!(matches!(err, CodegenError::TemplateError { ref name, .. } if name == "service.tera"));
    }
}
