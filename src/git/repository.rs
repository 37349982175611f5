use anyhow::Result;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::path::Path;

/// Information about a git commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit SHA hash (40 characters)
    pub hash: String,
    /// First line of the commit message
    pub summary: String,
    /// Author's name
    pub author_name: String,
    /// Author's email address
    pub author_email: String,
    /// Commit timestamp (Unix epoch seconds)
    pub commit_date: i64,
    /// Committer's UTC offset in minutes
    pub offset_minutes: i32,
}

impl CommitInfo {
    /// Commit date as `YYYY-MM-DD` in the committer's own time zone
    pub fn date(&self) -> String {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        DateTime::from_timestamp(self.commit_date, 0)
            .map(|utc| utc.with_timezone(&offset).format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "1970-01-01".to_string())
    }

    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(7)]
    }
}

/// Read-only access to a version-controlled history
///
/// Paths are relative to the repository root.
pub trait RepositoryHandle {
    /// Commits that modified `path`, oldest first
    fn commits_touching(&self, path: &Path) -> Result<Vec<CommitInfo>>;

    /// Contents of `path` as of `commit`, `None` when the path is absent from that tree
    fn read_at(&self, commit: &CommitInfo, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Author name to use for content that has not been committed yet
    fn default_author(&self) -> Option<String> {
        None
    }
}
