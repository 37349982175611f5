use super::index::{DocumentIndex, IndexRow, render_document_index};
use super::layout::{OutputLayout, PathRegistry};
use super::resolver::VersionTable;
use super::writer::OutputWriter;
use crate::error::SnapshotError;
use crate::paths::to_slash;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Title forced onto snapshots of the project's top-level index document
pub const TOP_INDEX_TITLE: &str = "Snapshots";
/// Added to the top-level index document's `order`
pub const TOP_INDEX_ORDER_OFFSET: i64 = 10;

/// Everything written for one source document
#[derive(Debug, Clone)]
pub struct MaterializedDocument {
    pub source: PathBuf,
    /// Snapshot files, newest first
    pub written: Vec<PathBuf>,
    pub index: DocumentIndex,
}

/// Writes one output document per retained version of a source document
pub struct SnapshotMaterializer<'a> {
    layout: &'a OutputLayout,
}

impl<'a> SnapshotMaterializer<'a> {
    pub fn new(layout: &'a OutputLayout) -> Self {
        Self { layout }
    }

    /// Write every snapshot in `table` plus the document's own index page
    ///
    /// `source` is relative to the project root. Every output path, the index page
    /// included, is claimed in `registry` before the first write, so a collision
    /// leaves nothing of this document on disk.
    pub fn materialize(
        &self,
        source: &Path,
        table: VersionTable,
        writer: &mut dyn OutputWriter,
        registry: &mut PathRegistry,
    ) -> Result<MaterializedDocument, SnapshotError> {
        let source_name = to_slash(source);
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let top_level_index = OutputLayout::is_top_level_index(source);

        // Earliest date among retained snapshots, not the first-inserted slot
        let oldest_date = table
            .iter()
            .filter_map(|s| s.document.get_str("date"))
            .min();

        let snapshots: Vec<_> = table
            .into_newest_first()
            .map(|snapshot| {
                let path = self.layout.snapshot_path(source, &snapshot.version);
                (snapshot, path)
            })
            .collect();
        let index_path = self.layout.document_index_path(source);

        for (snapshot, path) in &snapshots {
            registry.claim(path, format!("{}@{}", source_name, snapshot.version))?;
        }
        if let Some(index_path) = &index_path {
            registry.claim(index_path, format!("{} (index)", source_name))?;
        }

        let mut written = Vec::with_capacity(snapshots.len());
        let mut rows = Vec::with_capacity(snapshots.len());

        for (snapshot, path) in snapshots {
            let version = snapshot.version;
            let mut document = snapshot.document;

            let title = if top_level_index {
                let order = bump_order(document.get("order"));
                document.set("order", order);
                TOP_INDEX_TITLE.to_string()
            } else {
                format!("{} ({})", document.get_str_or("title", &stem), version)
            };
            document.set("title", title.as_str());

            writer.write_file(&path, &document.serialize()?)?;
            tracing::info!("Wrote {}", path.display());

            let description = document
                .get_str("description")
                .or_else(|| document.get_str("date"))
                .unwrap_or_default();
            rows.push(IndexRow {
                version,
                title,
                description,
                target: path.clone(),
            });
            written.push(path);
        }

        let index = DocumentIndex {
            source: source.to_path_buf(),
            title: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source_name.clone()),
            date: oldest_date,
            path: index_path,
            rows,
        };

        if let Some(index_path) = &index.path
            && let Some(page) = render_document_index(&index)?
        {
            writer.write_file(index_path, page.as_bytes())?;
            tracing::info!("Wrote {}", index_path.display());
        }

        Ok(MaterializedDocument {
            source: source.to_path_buf(),
            written,
            index,
        })
    }
}

/// Shift an existing `order` value by the top-level offset (absent counts as 0)
fn bump_order(existing: Option<&Value>) -> Value {
    match existing {
        Some(Value::Number(n)) if n.is_i64() => {
            Value::from(n.as_i64().unwrap_or(0) + TOP_INDEX_ORDER_OFFSET)
        }
        Some(Value::Number(n)) => {
            Value::from(n.as_f64().unwrap_or(0.0) + TOP_INDEX_ORDER_OFFSET as f64)
        }
        Some(Value::String(s)) => {
            if let Ok(i) = s.trim().parse::<i64>() {
                Value::from(i + TOP_INDEX_ORDER_OFFSET)
            } else if let Ok(f) = s.trim().parse::<f64>() {
                Value::from(f + TOP_INDEX_ORDER_OFFSET as f64)
            } else {
                Value::from(TOP_INDEX_ORDER_OFFSET)
            }
        }
        _ => Value::from(TOP_INDEX_ORDER_OFFSET),
    }
}
