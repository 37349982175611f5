use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Destination for generated snapshot and index files
pub trait OutputWriter {
    /// Write `contents` to `path`, creating parent directories as needed
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Writes straight to the filesystem, overwriting existing files
#[derive(Debug, Default)]
pub struct DiskWriter;

impl OutputWriter for DiskWriter {
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Collects output in memory; used to inspect a run without touching disk
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// File contents as UTF-8, if present
    pub fn text(&self, path: &Path) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl OutputWriter for MemoryWriter {
    fn write_file(&mut self, path: &Path, contents: &[u8]) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
