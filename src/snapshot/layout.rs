use crate::error::SnapshotError;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Stem of index documents
pub const INDEX_STEM: &str = "index";
/// Suffix of generated index pages
pub const INDEX_EXTENSION: &str = "qmd";
/// Extension the external renderer produces
pub const RENDERED_EXTENSION: &str = "html";

fn is_safe_version_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-')
}

/// Make a version label usable inside a file name
///
/// Bytes outside `[A-Za-z0-9._+-]` (including `%`) become `%XX`, so distinct labels
/// always map to distinct names.
pub fn sanitize_version(version: &str) -> Cow<'_, str> {
    if version.bytes().all(is_safe_version_byte) {
        return Cow::Borrowed(version);
    }
    let mut out = String::with_capacity(version.len() + 8);
    for b in version.bytes() {
        if is_safe_version_byte(b) {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{:02X}", b);
        }
    }
    Cow::Owned(out)
}

/// Maps source documents (relative to the project root) to output locations
#[derive(Debug, Clone)]
pub struct OutputLayout {
    project_root: PathBuf,
    snapshots_dir: String,
}

impl OutputLayout {
    pub fn new(project_root: impl Into<PathBuf>, snapshots_dir: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            snapshots_dir: snapshots_dir.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn snapshots_dir(&self) -> &str {
        &self.snapshots_dir
    }

    /// `<project>/<snapshots>`
    pub fn snapshots_root(&self) -> PathBuf {
        self.project_root.join(&self.snapshots_dir)
    }

    pub fn is_index(source: &Path) -> bool {
        source.file_stem().is_some_and(|stem| stem == INDEX_STEM)
    }

    /// The index document sitting directly in the project root
    pub fn is_top_level_index(source: &Path) -> bool {
        Self::is_index(source)
            && source
                .parent()
                .is_none_or(|parent| parent.as_os_str().is_empty())
    }

    /// Directory holding a document's snapshots
    ///
    /// `notes/a.qmd` maps to `<snapshots>/notes/a`; index documents go next to their
    /// siblings instead (`notes/index.qmd` maps to `<snapshots>/notes`).
    pub fn base_dir(&self, source: &Path) -> PathBuf {
        let base = self.snapshots_root().join(source.with_extension(""));
        if Self::is_index(source) {
            base.parent().map(Path::to_path_buf).unwrap_or(base)
        } else {
            base
        }
    }

    /// `<base>/<stem>_<version>.<suffix>`
    pub fn snapshot_path(&self, source: &Path, version: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let mut name = format!("{}_{}", stem, sanitize_version(version));
        if let Some(ext) = source.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        self.base_dir(source).join(name)
    }

    /// Per-document index page; the top-level index document has none
    pub fn document_index_path(&self, source: &Path) -> Option<PathBuf> {
        if Self::is_top_level_index(source) {
            return None;
        }
        Some(
            self.base_dir(source)
                .join(format!("{}.{}", INDEX_STEM, INDEX_EXTENSION)),
        )
    }

    /// `<project>/<snapshots>/index.qmd`
    pub fn project_index_path(&self) -> PathBuf {
        self.snapshots_root()
            .join(format!("{}.{}", INDEX_STEM, INDEX_EXTENSION))
    }
}

/// Every output path claimed during one run, with the claimant's identity
#[derive(Debug, Default)]
pub struct PathRegistry {
    claims: HashMap<PathBuf, String>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `path` for `owner`; a different owner already holding it is a collision
    pub fn claim(&mut self, path: &Path, owner: impl Into<String>) -> Result<(), SnapshotError> {
        let owner = owner.into();
        match self.claims.get(path) {
            Some(existing) if *existing != owner => Err(SnapshotError::PathCollision {
                path: path.to_path_buf(),
                first: existing.clone(),
                second: owner,
            }),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(path.to_path_buf(), owner);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
