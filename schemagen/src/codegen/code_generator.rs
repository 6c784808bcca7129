//! Main code generator orchestrator

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use super::artifact::ArtifactKind;
use super::emitter::{emit, GenerationResult, GenerationStatus};
use crate::config::CodegenConfig;
use crate::error::{CodegenError, Result};
use crate::introspect::TableDescriptor;
use crate::template::{CompiledTemplate, TemplateResolver};

/// Every file a run produced, in completion order
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    results: Vec<GenerationResult>,
}

impl GenerationReport {
    pub fn results(&self) -> &[GenerationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<GenerationResult> {
        self.results
    }

    /// Number of files written
    pub fn written(&self) -> usize {
        self.count(GenerationStatus::Ok)
    }

    /// Number of existing files left untouched
    pub fn skipped(&self) -> usize {
        self.count(GenerationStatus::SkippedExists)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn count(&self, status: GenerationStatus) -> usize {
        self.results.iter().filter(|r| r.status() == status).count()
    }
}

/// One artifact for one descriptor
struct Job {
    template: Arc<CompiledTemplate>,
    descriptor: Arc<TableDescriptor>,
    path: PathBuf,
    overwrite: bool,
}

impl Job {
    fn run(self) -> Result<GenerationResult> {
        emit(&self.template, &*self.descriptor, &self.path, self.overwrite)
    }
}

/// Renders the configured artifacts for scanned tables
pub struct CodeGenerator<'a> {
    config: &'a CodegenConfig,
    resolver: Arc<TemplateResolver>,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator with the given configuration
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self::with_resolver(config, Arc::new(TemplateResolver::new()))
    }

    /// Share a template cache with other generators
    pub fn with_resolver(config: &'a CodegenConfig, resolver: Arc<TemplateResolver>) -> Self {
        Self { config, resolver }
    }

    pub fn resolver(&self) -> &Arc<TemplateResolver> {
        &self.resolver
    }

    fn base_dir(&self) -> &Path {
        &self.config.output.base_output_dir
    }

    fn template(&self, kind: ArtifactKind) -> Result<Arc<CompiledTemplate>> {
        self.resolver
            .resolve(kind.template_name(), self.config.template_dir.as_deref())
    }

    /// Target path of `kind` for `descriptor`
    pub fn output_path(&self, kind: ArtifactKind, descriptor: &TableDescriptor) -> PathBuf {
        kind.output_path(self.base_dir(), &descriptor.entity_name, &descriptor.options)
    }

    /// Every path a run would write, shared artifacts first
    pub fn planned_paths(&self, tables: &IndexMap<String, TableDescriptor>) -> Vec<PathBuf> {
        let kinds = self.config.artifact_kinds();
        let mut paths = Vec::new();
        if let Some(first) = tables.values().next() {
            for kind in kinds.iter().filter(|k| k.is_shared()) {
                paths.push(self.output_path(*kind, first));
            }
        }
        for descriptor in tables.values() {
            for kind in kinds.iter().filter(|k| !k.is_shared()) {
                paths.push(self.output_path(*kind, descriptor));
            }
        }
        paths
    }

    /// Generate every configured artifact.
    ///
    /// Shared artifacts are written first, in order, using the first
    /// descriptor. Per-table artifacts then run on blocking workers, at most
    /// one per available core at a time. The first failure stops new work;
    /// jobs already running are waited for before the error is returned.
    pub async fn generate(&self, tables: &IndexMap<String, TableDescriptor>) -> Result<GenerationReport> {
        if self.config.dry_run {
            for path in self.planned_paths(tables) {
                info!("[dry run] Would generate {}", path.display());
            }
            return Ok(GenerationReport::default());
        }

        let Some(first) = tables.values().next() else {
            info!("No tables scanned, nothing to generate");
            return Ok(GenerationReport::default());
        };

        let kinds = self.config.artifact_kinds();
        let overwrite = self.config.output.overwrite_enable;
        let mut report = GenerationReport::default();

        let first = Arc::new(first.clone());
        for kind in kinds.iter().copied().filter(|k| k.is_shared()) {
            info!("Generating shared {}", kind);
            let job = Job {
                template: self.template(kind)?,
                descriptor: Arc::clone(&first),
                path: self.output_path(kind, &first),
                overwrite,
            };
            report.results.push(run_blocking(job).await?);
        }

        let per_table: Vec<ArtifactKind> = kinds.into_iter().filter(|k| !k.is_shared()).collect();
        let workers = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        debug!("Rendering per-table artifacts on {} workers", workers);

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut set = JoinSet::new();
        let mut first_error: Option<CodegenError> = None;

        'tables: for descriptor in tables.values() {
            let descriptor = Arc::new(descriptor.clone());
            for kind in per_table.iter().copied() {
                while let Some(done) = set.try_join_next() {
                    collect(done, &mut report, &mut first_error);
                }
                if first_error.is_some() {
                    break 'tables;
                }

                let template = match self.template(kind) {
                    Ok(template) => template,
                    Err(e) => {
                        first_error = Some(e);
                        break 'tables;
                    }
                };
                let job = Job {
                    template,
                    path: self.output_path(kind, &descriptor),
                    descriptor: Arc::clone(&descriptor),
                    overwrite,
                };

                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .map_err(|e| CodegenError::WorkerError(e.to_string()))?;
                set.spawn_blocking(move || {
                    let _permit = permit;
                    job.run()
                });
            }
        }

        while let Some(done) = set.join_next().await {
            collect(done, &mut report, &mut first_error);
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!(
                    "Generation finished: {} written, {} skipped",
                    report.written(),
                    report.skipped()
                );
                Ok(report)
            }
        }
    }
}

async fn run_blocking(job: Job) -> Result<GenerationResult> {
    tokio::task::spawn_blocking(move || job.run())
        .await
        .map_err(|e| CodegenError::WorkerError(e.to_string()))?
}

fn collect(
    done: std::result::Result<Result<GenerationResult>, JoinError>,
    report: &mut GenerationReport,
    first_error: &mut Option<CodegenError>,
) {
    match done {
        Ok(Ok(result)) => report.results.push(result),
        Ok(Err(e)) => {
            first_error.get_or_insert(e);
        }
        Err(e) => {
            first_error.get_or_insert(CodegenError::WorkerError(e.to_string()));
        }
    }
}
