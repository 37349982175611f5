use crate::document::DocumentFormat;
use crate::glob_utils::{compile_patterns, matches_any_matcher};
use crate::paths::to_slash;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};


/// Enumerates the documents of a project eligible for snapshotting
pub struct ProjectWalker {
    root: PathBuf,
    snapshots_dir: String,
    exclude_patterns: Vec<String>,
}

impl ProjectWalker {
    pub fn new(root: impl AsRef<Path>, snapshots_dir: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            snapshots_dir: snapshots_dir.into(),
            exclude_patterns: vec![],
        }
    }

    pub fn with_excludes(mut self, exclude_patterns: Vec<String>) -> Self {
        self.exclude_patterns = exclude_patterns;
        self
    }

    /// Collect every `.md`, `.qmd` and `.ipynb` file, relative to the root
    ///
    /// The snapshots output directory is never entered. Results are sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            anyhow::bail!("Project directory does not exist: {:?}", self.root);
        }
        if !self.root.is_dir() {
            anyhow::bail!("Project path is not a directory: {:?}", self.root);
        }

        let excludes = compile_patterns(&self.exclude_patterns)?;
        let snapshots_root = self.root.join(&self.snapshots_dir);

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(true) // Respect .gitignore, .ignore, etc.
            .hidden(true) // Skip .git, .quarto and other hidden entries
            .require_git(false) // Don't require a .git directory
            .filter_entry(move |entry| entry.path() != snapshots_root.as_path())
            .build();

        let mut documents = Vec::new();
        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let recognized = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(DocumentFormat::from_extension)
                .is_some();
            if !recognized {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
            if matches_any_matcher(&to_slash(&relative), &excludes) {
                tracing::debug!("Excluded by pattern: {}", relative.display());
                continue;
            }

            documents.push(relative);
        }

        documents.sort();
        tracing::debug!(
            "Found {} documents under {}",
            documents.len(),
            self.root.display()
        );
        Ok(documents)
    }
}
