use crate::document::{Document, DocumentFormat};
use crate::error::DocumentError;
use crate::git::Revision;
use std::collections::HashMap;
use std::path::Path;

/// Version assigned to revisions without a `version` field
pub const UNVERSIONED: &str = "unversioned";
/// Version value requesting a synthetic sequential label
pub const AUTO: &str = "auto";
/// Version under which the working copy is stored
pub const LATEST: &str = "latest";

/// A version-tagged document ready to be materialized
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: String,
    pub document: Document,
}

/// Snapshots of one source document keyed by version
///
/// Iteration follows first-insertion order; replacing a version keeps its slot.
#[derive(Debug, Clone, Default)]
pub struct VersionTable {
    entries: Vec<Snapshot>,
    positions: HashMap<String, usize>,
}

impl VersionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot for `version`, returning the replaced document
    pub fn insert(&mut self, version: impl Into<String>, document: Document) -> Option<Document> {
        let version = version.into();
        match self.positions.get(&version) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].document, document)),
            None => {
                self.positions.insert(version.clone(), self.entries.len());
                self.entries.push(Snapshot { version, document });
                None
            }
        }
    }

    pub fn remove(&mut self, version: &str) -> Option<Document> {
        let index = self.positions.remove(version)?;
        let removed = self.entries.remove(index);
        for position in self.positions.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        Some(removed.document)
    }

    pub fn get(&self, version: &str) -> Option<&Document> {
        self.positions.get(version).map(|&i| &self.entries[i].document)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.positions.contains_key(version)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn versions(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.version.as_str()).collect()
    }

    /// Consume the table, newest first
    pub fn into_newest_first(self) -> impl Iterator<Item = Snapshot> {
        self.entries.into_iter().rev()
    }
}

/// Maps a document's committed revisions to a deduplicated version table
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    keep_unversioned: bool,
}

impl VersionResolver {
    pub fn new(keep_unversioned: bool) -> Self {
        Self { keep_unversioned }
    }

    /// Build the version table for `source` from its revisions (oldest first)
    ///
    /// Revisions whose header cannot be parsed are logged and skipped.
    pub fn resolve(
        &self,
        source: &Path,
        revisions: &[Revision],
    ) -> Result<VersionTable, DocumentError> {
        let format = DocumentFormat::from_path(source)?;
        let mut table = VersionTable::new();
        let mut auto_counter = 0usize;

        for revision in revisions {
            let mut document = match Document::parse(&revision.content, format) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!(
                        "Skipping {} at commit {}: {}",
                        source.display(),
                        revision.commit.short_hash(),
                        e
                    );
                    continue;
                }
            };

            document.set("date", revision.commit.date());
            document.set_default("author", revision.commit.author_name.as_str());

            let mut version = document.get_str_or("version", UNVERSIONED);
            // Numeric labels keep their written form (`1.10` is not `1.1`)
            if matches!(document.get("version"), Some(serde_yaml::Value::Number(_)))
                && let Some(raw) = document.raw_str("version")
            {
                document.set("version", raw.as_str());
                version = raw;
            }
            if version == AUTO {
                version = format!("0.1.{}", auto_counter);
                auto_counter += 1;
                document.set("version", version.as_str());
            }

            tracing::debug!(
                "{} at {} resolves to version {}",
                source.display(),
                revision.commit.short_hash(),
                version
            );
            table.insert(version, document);
        }

        if !self.keep_unversioned && table.remove(UNVERSIONED).is_some() {
            tracing::debug!("Dropped unversioned snapshot of {}", source.display());
        }

        Ok(table)
    }

    /// Store the working copy as the `latest` snapshot
    pub fn add_working_copy(
        &self,
        table: &mut VersionTable,
        mut document: Document,
        date: &str,
        author: Option<&str>,
    ) {
        document.set("date", date);
        if let Some(author) = author {
            document.set_default("author", author);
        }
        table.insert(LATEST, document);
    }
}
