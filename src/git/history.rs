use super::repository::{CommitInfo, RepositoryHandle};
use anyhow::{Context, Result};
use std::path::Path;

/// One committed revision of a file
#[derive(Debug, Clone)]
pub struct Revision {
    pub commit: CommitInfo,
    pub content: Vec<u8>,
}

/// Every committed revision of `path`, oldest first
///
/// Commits where the path is absent (it was deleted there) are skipped with a warning.
pub fn history(repo: &dyn RepositoryHandle, path: &Path) -> Result<Vec<Revision>> {
    let commits = repo
        .commits_touching(path)
        .with_context(|| format!("Failed to list commits touching {}", path.display()))?;

    let mut revisions = Vec::with_capacity(commits.len());
    for commit in commits {
        match repo.read_at(&commit, path)? {
            Some(content) => revisions.push(Revision { commit, content }),
            None => tracing::warn!(
                "{} does not exist at commit {}, skipping",
                path.display(),
                commit.short_hash()
            ),
        }
    }

    Ok(revisions)
}
