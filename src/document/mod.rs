//! Document model shared by plain markdown, Quarto markdown and Jupyter notebooks
//!
//! The format is chosen once from the file suffix. After that every caller works with
//! [`Document`] and its metadata accessors, whatever the encoding underneath.

/// Plain-text documents with a leading YAML front matter block
pub mod front_matter;
/// Ordered front matter mapping
pub mod metadata;
/// Jupyter notebooks carrying front matter in their first cell
pub mod notebook;

#[cfg(test)]
mod tests;

pub use front_matter::FlatDocument;
pub use metadata::Metadata;
pub use notebook::NotebookDocument;

use crate::error::DocumentError;
use serde_yaml::Value;
use std::path::Path;

/// Source encodings recognized by the snapshot pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Markdown,
    Quarto,
    Notebook,
}

impl DocumentFormat {
    /// Every recognized suffix, without the leading dot
    pub const EXTENSIONS: [&'static str; 3] = ["md", "qmd", "ipynb"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" => Some(Self::Markdown),
            "qmd" => Some(Self::Quarto),
            "ipynb" => Some(Self::Notebook),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| DocumentError::UnsupportedFormat(path.display().to_string()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Quarto => "qmd",
            Self::Notebook => "ipynb",
        }
    }

    /// Whether the front matter is nested inside a cell container
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Notebook)
    }
}

/// A parsed document: its metadata block plus everything else, kept opaque
#[derive(Debug, Clone)]
pub enum Document {
    Flat(FlatDocument),
    Notebook(NotebookDocument),
}

impl Document {
    pub fn parse(bytes: &[u8], format: DocumentFormat) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8)?;
        if format.is_structured() {
            Ok(Self::Notebook(NotebookDocument::parse(text)?))
        } else {
            Ok(Self::Flat(FlatDocument::parse(text)?))
        }
    }

    /// Parse `bytes`, picking the format from `path`'s suffix
    pub fn from_path_bytes(path: &Path, bytes: &[u8]) -> Result<Self, DocumentError> {
        Self::parse(bytes, DocumentFormat::from_path(path)?)
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Flat(doc) => &doc.metadata,
            Self::Notebook(nb) => &nb.header().metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Self::Flat(doc) => &mut doc.metadata,
            Self::Notebook(nb) => &mut nb.header_mut().metadata,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata().get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.metadata().get_str(key)
    }

    /// A header field's text as written in the source, see [`FlatDocument::raw_value`]
    pub fn raw_str(&self, key: &str) -> Option<String> {
        match self {
            Self::Flat(doc) => doc.raw_value(key),
            Self::Notebook(nb) => nb.header().raw_value(key),
        }
    }

    pub fn get_str_or(&self, key: &str, default: &str) -> String {
        self.metadata().get_str_or(key, default)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata_mut().set(key, value);
    }

    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        self.metadata_mut().set_default(key, value)
    }

    pub fn serialize(&self) -> Result<Vec<u8>, DocumentError> {
        let text = match self {
            Self::Flat(doc) => doc.serialize()?,
            Self::Notebook(nb) => nb.serialize()?,
        };
        Ok(text.into_bytes())
    }
}
