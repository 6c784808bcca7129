//! Writes one rendered template to disk, honouring the overwrite policy

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{CodegenError, Result};
use crate::template::CompiledTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Ok,
    SkippedExists,
}

/// Outcome of a single emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    status: GenerationStatus,
    path: PathBuf,
    message: String,
}

impl GenerationResult {
    fn written(path: &Path) -> Self {
        Self {
            status: GenerationStatus::Ok,
            path: path.to_path_buf(),
            message: format!("generated: {}", path.display()),
        }
    }

    fn skipped(path: &Path) -> Self {
        Self {
            status: GenerationStatus::SkippedExists,
            path: path.to_path_buf(),
            message: format!("file already exists: {}", path.display()),
        }
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Render `model` through `template` into `output_path`.
///
/// An existing file is left untouched unless `overwrite` is set, in which
/// case it is removed and written again.
pub fn emit<T: Serialize>(
    template: &CompiledTemplate,
    model: &T,
    output_path: &Path,
    overwrite: bool,
) -> Result<GenerationResult> {
    let write_error = |source: std::io::Error| CodegenError::WriteError {
        path: output_path.to_path_buf(),
        source,
    };

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    if output_path.exists() {
        if !overwrite {
            info!("Skipping {}: file already exists", output_path.display());
            return Ok(GenerationResult::skipped(output_path));
        }
        fs::remove_file(output_path).map_err(write_error)?;
    }

    let file = File::create(output_path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    template.render_to(model, &mut writer)?;
    writer.flush().map_err(write_error)?;

    info!("Generated {}", output_path.display());
    Ok(GenerationResult::written(output_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateResolver;
    use serde_json::json;
    use std::fs;

    fn template_in(dir: &Path, name: &str, body: &str) -> std::sync::Arc<CompiledTemplate> {
        fs::write(dir.join(name), body).unwrap();
        TemplateResolver::new().resolve(name, Some(dir)).unwrap()
    }

    #[test]
    fn test_emit_creates_parent_directories() {
        let templates = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let template = template_in(templates.path(), "entity.tera", "class {{ name }}");
        let path = out.path().join("com/example/domain/Order.java");

        let result = emit(&template, &json!({ "name": "Order" }), &path, false).unwrap();

        assert_eq!(result.status(), GenerationStatus::Ok);
        assert_eq!(result.path(), path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "class Order");
    }

    #[test]
    fn test_existing_file_is_skipped_without_overwrite() {
        let templates = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let template = template_in(templates.path(), "entity.tera", "new");
        let path = out.path().join("Order.java");
        fs::write(&path, "hand edited").unwrap();

        let result = emit(&template, &json!({}), &path, false).unwrap();

        assert_eq!(result.status(), GenerationStatus::SkippedExists);
        assert_eq!(
            result.message(),
            format!("file already exists: {}", path.display())
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "hand edited");
    }

    #[test]
    fn test_existing_file_is_replaced_with_overwrite() {
        let templates = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let template = template_in(templates.path(), "entity.tera", "new");
        let path = out.path().join("Order.java");
        fs::write(&path, "a much longer hand edited body").unwrap();

        let result = emit(&template, &json!({}), &path, true).unwrap();

        assert_eq!(result.status(), GenerationStatus::Ok);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_render_failure_is_template_error() {
        let templates = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let template = template_in(templates.path(), "dto.tera", "{{ absent }}");
        let path = out.path().join("OrderDto.java");

        let err = emit(&template, &json!({}), &path, false).unwrap_err();
        assert!(matches!(err, CodegenError::TemplateError { .. }));
    }

    #[test]
    fn test_unwritable_target_is_write_error() {
        let templates = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let template = template_in(templates.path(), "dto.tera", "x");
        // A regular file where a directory is needed
        let blocker = out.path().join("dto");
        fs::write(&blocker, "").unwrap();

        let err = emit(&template, &json!({}), &blocker.join("OrderDto.java"), false).unwrap_err();
        assert!(matches!(err, CodegenError::WriteError { ref path, .. } if path.ends_with("OrderDto.java")));
    }
}
