use crate::config::Config;
use crate::document::Document;
use crate::error::{ConfigError, SnapshotError};
use crate::git::{GitWalker, RepositoryHandle, history};
use crate::project::ProjectWalker;
use crate::snapshot::index::render_project_index;
use crate::snapshot::{
    DocumentIndex, MaterializedDocument, OutputLayout, OutputWriter, PathRegistry,
    SnapshotMaterializer, VersionResolver,
};
use anyhow::Context;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};


/// Outcome of one generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Number of documents the project walk found
    pub documents_processed: usize,
    /// Number of snapshot files written (index pages excluded)
    pub snapshots_written: usize,
    /// Documents with no retained version, relative to the project root
    pub empty_documents: Vec<PathBuf>,
    /// Documents that failed, with the reason (non-fatal)
    pub failures: Vec<(PathBuf, String)>,
    /// Project-wide index page
    pub project_index: PathBuf,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Processed {} documents: {} snapshots written, {} without versions, {} failed",
            self.documents_processed,
            self.snapshots_written,
            self.empty_documents.len(),
            self.failures.len()
        )
    }
}

/// Runs the snapshot pipeline over every document of a project
pub struct SnapshotGenerator<'a> {
    repo: &'a dyn RepositoryHandle,
    layout: OutputLayout,
    /// Project root relative to the repository root, as history paths need it
    repo_prefix: PathBuf,
    resolver: VersionResolver,
    include_working_copy: bool,
    exclude_patterns: Vec<String>,
}

impl<'a> SnapshotGenerator<'a> {
    pub fn new(
        repo: &'a dyn RepositoryHandle,
        project_root: impl Into<PathBuf>,
        snapshots_dir: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            layout: OutputLayout::new(project_root, snapshots_dir),
            repo_prefix: PathBuf::new(),
            resolver: VersionResolver::default(),
            include_working_copy: false,
            exclude_patterns: Vec::new(),
        }
    }

    pub fn with_repo_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.repo_prefix = prefix.into();
        self
    }

    pub fn with_keep_unversioned(mut self, keep: bool) -> Self {
        self.resolver = VersionResolver::new(keep);
        self
    }

    pub fn with_working_copy(mut self, include: bool) -> Self {
        self.include_working_copy = include;
        self
    }

    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Build a generator for `config`'s project inside a git working tree
    pub fn for_git(walker: &'a GitWalker, config: &Config) -> Result<Self, SnapshotError> {
        let project_root = config.project_root();
        if !project_root.is_dir() {
            return Err(ConfigError::ProjectNotFound(project_root.display().to_string()).into());
        }
        let prefix = walker
            .relative_path(&project_root)
            .context("Project directory must live inside the repository")?;

        Ok(Self::new(walker, project_root, config.snapshots.dir.clone())
            .with_repo_prefix(prefix)
            .with_keep_unversioned(config.snapshots.keep_unversioned)
            .with_working_copy(config.snapshots.include_working_copy)
            .with_excludes(config.project.exclude_patterns.clone()))
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Snapshot every document and write the project-wide index
    ///
    /// Per-document failures are logged and collected in the report. Configuration
    /// problems and output path collisions abort the run.
    pub fn generate(&self, writer: &mut dyn OutputWriter) -> Result<GenerationReport, SnapshotError> {
        let project_root = self.layout.project_root();
        if !project_root.is_dir() {
            return Err(ConfigError::ProjectNotFound(project_root.display().to_string()).into());
        }

        let documents = ProjectWalker::new(project_root, self.layout.snapshots_dir())
            .with_excludes(self.exclude_patterns.clone())
            .discover()?;
        tracing::info!(
            "Generating snapshots for {} documents in {}",
            documents.len(),
            project_root.display()
        );

        let mut registry = PathRegistry::new();
        let mut report = GenerationReport {
            documents_processed: documents.len(),
            project_index: self.layout.project_index_path(),
            ..Default::default()
        };
        let mut indices: Vec<DocumentIndex> = Vec::new();

        for source in &documents {
            match self.process(source, writer, &mut registry) {
                Ok(Some(materialized)) => {
                    report.snapshots_written += materialized.written.len();
                    indices.push(materialized.index);
                }
                Ok(None) => {
                    tracing::debug!("No versions to snapshot for {}", source.display());
                    report.empty_documents.push(source.clone());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!("Failed to snapshot {}: {}", source.display(), e);
                    report.failures.push((source.clone(), e.to_string()));
                }
            }
        }

        let index_path = self.layout.project_index_path();
        registry.claim(&index_path, "project index")?;
        let page = render_project_index(&self.layout.snapshots_root(), &indices)?;
        writer.write_file(&index_path, page.as_bytes())?;
        tracing::info!("Wrote {}", index_path.display());

        tracing::info!("{}", report.summary());
        Ok(report)
    }

    fn process(
        &self,
        source: &Path,
        writer: &mut dyn OutputWriter,
        registry: &mut PathRegistry,
    ) -> Result<Option<MaterializedDocument>, SnapshotError> {
        let revisions = history(self.repo, &self.repo_prefix.join(source))?;
        let mut table = self.resolver.resolve(source, &revisions)?;

        if self.include_working_copy {
            let full = self.layout.project_root().join(source);
            let bytes = std::fs::read(&full)?;
            let document = Document::from_path_bytes(source, &bytes)?;
            let date = modified_date(&full)?;
            let author = self.repo.default_author();
            self.resolver
                .add_working_copy(&mut table, document, &date, author.as_deref());
        }

        if table.is_empty() {
            return Ok(None);
        }

        SnapshotMaterializer::new(&self.layout)
            .materialize(source, table, writer, registry)
            .map(Some)
    }
}

/// Local modification date of `path` as `YYYY-MM-DD`
fn modified_date(path: &Path) -> Result<String, SnapshotError> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).format("%Y-%m-%d").to_string())
}
