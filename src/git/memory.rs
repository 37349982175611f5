use super::repository::{CommitInfo, RepositoryHandle};
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct MemoryCommit {
    info: CommitInfo,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

/// Linear in-memory history, for exercising the pipeline without a real repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    commits: Vec<MemoryCommit>,
    author: Option<String>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Record a commit on top of the previous tree
    ///
    /// A `None` content deletes the path.
    pub fn commit<P, I>(&mut self, author: &str, commit_date: i64, changes: I) -> CommitInfo
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = (P, Option<Vec<u8>>)>,
    {
        let mut files = self
            .commits
            .last()
            .map(|c| c.files.clone())
            .unwrap_or_default();

        for (path, content) in changes {
            let path = path.into();
            match content {
                Some(bytes) => {
                    files.insert(path, bytes);
                }
                None => {
                    files.remove(&path);
                }
            }
        }

        let info = CommitInfo {
            hash: format!("{:040x}", self.commits.len() + 1),
            summary: format!("commit {}", self.commits.len() + 1),
            author_name: author.to_string(),
            author_email: format!("{}@example.com", author.to_lowercase()),
            commit_date,
            offset_minutes: 0,
        };
        self.commits.push(MemoryCommit {
            info: info.clone(),
            files,
        });
        info
    }

    /// Convenience for committing a single text file
    pub fn commit_text(
        &mut self,
        author: &str,
        commit_date: i64,
        path: &str,
        text: &str,
    ) -> CommitInfo {
        self.commit(
            author,
            commit_date,
            [(PathBuf::from(path), Some(text.as_bytes().to_vec()))],
        )
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl RepositoryHandle for InMemoryRepository {
    fn commits_touching(&self, path: &Path) -> Result<Vec<CommitInfo>> {
        let mut previous: Option<&Vec<u8>> = None;
        let mut touching = Vec::new();

        for commit in &self.commits {
            let current = commit.files.get(path);
            if current != previous {
                touching.push(commit.info.clone());
            }
            previous = current;
        }
        Ok(touching)
    }

    fn read_at(&self, commit: &CommitInfo, path: &Path) -> Result<Option<Vec<u8>>> {
        match self.commits.iter().find(|c| c.info.hash == commit.hash) {
            Some(found) => Ok(found.files.get(path).cloned()),
            None => bail!("Unknown commit {}", commit.hash),
        }
    }

    fn default_author(&self) -> Option<String> {
        self.author.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commits_touching_skips_unrelated() {
        let mut repo = InMemoryRepository::new();
        repo.commit_text("Ada", 100, "a.qmd", "one");
        repo.commit_text("Ada", 200, "b.qmd", "other");
        repo.commit_text("Ada", 300, "a.qmd", "two");
        repo.commit_text("Ada", 400, "a.qmd", "two");

        let commits = repo.commits_touching(Path::new("a.qmd")).unwrap();
        let dates: Vec<_> = commits.iter().map(|c| c.commit_date).collect();
        assert_eq!(dates, vec![100, 300]);
        assert_eq!(repo.len(), 4);
    }

    #[test]
    fn test_deletion_is_a_touch() {
        let mut repo = InMemoryRepository::new();
        repo.commit_text("Ada", 100, "a.qmd", "one");
        let deleted = repo.commit("Ada", 200, [("a.qmd", None)]);

        let commits = repo.commits_touching(Path::new("a.qmd")).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(repo.read_at(&deleted, Path::new("a.qmd")).unwrap(), None);
    }

    #[test]
    fn test_read_at_unknown_commit() {
        let mut other = InMemoryRepository::new();
        let foreign = other.commit_text("Ada", 1, "a.qmd", "x");

        let repo = InMemoryRepository::new();
        assert!(repo.read_at(&foreign, Path::new("a.qmd")).is_err());
    }
}
