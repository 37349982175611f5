//! Markdown index pages linking the snapshots of each document
//!
//! Every document with snapshots gets a small table (newest version first) in its
//! own `index.qmd`, and the project-wide page repeats all tables under one heading
//! per document. Links point at the rendered pages, not at the sources.

use super::layout::RENDERED_EXTENSION;
use crate::document::{FlatDocument, Metadata};
use crate::error::DocumentError;
use crate::paths::{rendered_link, to_slash};
use std::path::{Path, PathBuf};

/// Title of the project-wide index page
pub const PROJECT_INDEX_TITLE: &str = "All snapshots";

const TABLE_HEADER: &str = "| Version | Title | Description |\n|---|---|---|\n";

/// One snapshot as listed in an index table
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub version: String,
    pub title: String,
    /// `description` of the snapshot, or its date when it has none
    pub description: String,
    /// Written snapshot file
    pub target: PathBuf,
}

/// Index summary of one source document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentIndex {
    /// Source path relative to the project root
    pub source: PathBuf,
    pub title: String,
    /// Date of the oldest retained snapshot
    pub date: Option<String>,
    /// Where the per-document page goes; `None` for the top-level index document
    pub path: Option<PathBuf>,
    /// Newest first
    pub rows: Vec<IndexRow>,
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace('\n', " ")
}

/// Link to the rendered page of `target`, escaped for a markdown link destination
///
/// Sanitized version labels can put `%XX` sequences in file names, so a literal `%`
/// must itself be encoded for the link to resolve.
fn link_to(from_dir: &Path, target: &Path) -> String {
    rendered_link(from_dir, target, RENDERED_EXTENSION)
        .replace('%', "%25")
        .replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}

/// Render the version table with links relative to `from_dir`
pub fn render_table(rows: &[IndexRow], from_dir: &Path) -> String {
    let mut out = String::from(TABLE_HEADER);
    for row in rows {
        let link = link_to(from_dir, &row.target);
        out.push_str(&format!(
            "| [{}]({}) | [{}]({}) | [{}]({}) |\n",
            escape_cell(&row.version),
            link,
            escape_cell(&row.title),
            link,
            escape_cell(&row.description),
            link
        ));
    }
    out
}

fn page(title: &str, date: Option<&str>, body: String) -> Result<String, DocumentError> {
    let mut metadata = Metadata::new();
    metadata.set("title", title);
    if let Some(date) = date {
        metadata.set("date", date);
    }
    FlatDocument::new(metadata, body).serialize()
}

/// Render the per-document index page, if the document has one
pub fn render_document_index(index: &DocumentIndex) -> Result<Option<String>, DocumentError> {
    let Some(path) = &index.path else {
        return Ok(None);
    };
    let from_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let body = format!("\n{}", render_table(&index.rows, from_dir));
    page(&index.title, index.date.as_deref(), body).map(Some)
}

/// Render the project-wide page collecting every document's table
///
/// `snapshots_root` is the directory the page is written to; documents appear in
/// the given order.
pub fn render_project_index(
    snapshots_root: &Path,
    documents: &[DocumentIndex],
) -> Result<String, DocumentError> {
    let mut body = String::new();
    for document in documents {
        let name = escape_cell(&to_slash(&document.source));
        body.push('\n');
        match &document.path {
            Some(path) => body.push_str(&format!(
                "## [{}]({})\n\n",
                name,
                link_to(snapshots_root, path)
            )),
            None => body.push_str(&format!("## {}\n\n", name)),
        }
        body.push_str(&render_table(&document.rows, snapshots_root));
    }
    page(PROJECT_INDEX_TITLE, None, body)
}
