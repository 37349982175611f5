use super::repository::{CommitInfo, RepositoryHandle};
use anyhow::{Context, Result};
use git2::{ErrorCode, ObjectType, Oid, Repository, Sort, Tree};
use std::path::{Path, PathBuf};

/// Git repository walker backed by libgit2
pub struct GitWalker {
    repo: Repository,
    repo_path: PathBuf,
}

impl GitWalker {
    /// Discover and open a git repository from any path within it
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Discover the repository (walks up directory tree)
        let repo = Repository::discover(path).context("Failed to discover git repository")?;
        let repo_path = repo
            .workdir()
            .context("Repository has no working directory (bare repository?)")?
            .to_path_buf();

        tracing::info!("Opened git repository at: {}", repo_path.display());

        Ok(Self { repo, repo_path })
    }

    /// Get the repository root path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Check if repository has any commits
    pub fn has_commits(&self) -> bool {
        self.repo.head().is_ok()
    }

    /// Express a working-tree path relative to the repository root
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let root = self
            .repo_path
            .canonicalize()
            .context("Failed to resolve repository root")?;
        let full = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;

        full.strip_prefix(&root)
            .map(Path::to_path_buf)
            .with_context(|| {
                format!(
                    "{} is outside repository {}",
                    path.display(),
                    root.display()
                )
            })
    }

    fn commit_info(commit: &git2::Commit) -> CommitInfo {
        let author = commit.author();
        CommitInfo {
            hash: format!("{}", commit.id()),
            summary: commit.summary().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("Unknown").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            commit_date: commit.time().seconds(),
            offset_minutes: commit.time().offset_minutes(),
        }
    }

    /// A commit touches a path when its blob differs from every parent's
    fn touches(commit: &git2::Commit, path: &Path) -> Result<bool> {
        let current = entry_id(&commit.tree()?, path)?;
        if commit.parent_count() == 0 {
            return Ok(current.is_some());
        }

        for parent in commit.parents() {
            if entry_id(&parent.tree()?, path)? == current {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn entry_id(tree: &Tree, path: &Path) -> Result<Option<Oid>> {
    match tree.get_path(path) {
        Ok(entry) => Ok(Some(entry.id())),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl RepositoryHandle for GitWalker {
    fn commits_touching(&self, path: &Path) -> Result<Vec<CommitInfo>> {
        if !self.has_commits() {
            tracing::debug!("Repository has no commits yet");
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            if Self::touches(&commit, path)? {
                commits.push(Self::commit_info(&commit));
            }
        }

        tracing::debug!(
            "Found {} commits touching {}",
            commits.len(),
            path.display()
        );
        Ok(commits)
    }

    fn read_at(&self, commit: &CommitInfo, path: &Path) -> Result<Option<Vec<u8>>> {
        let oid = Oid::from_str(&commit.hash).context("Invalid commit hash")?;
        let tree = self.repo.find_commit(oid)?.tree()?;

        let entry = match tree.get_path(path) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to look up {} at {}", path.display(), commit.hash)
                });
            }
        };

        if entry.kind() != Some(ObjectType::Blob) {
            return Ok(None);
        }

        let blob = self.repo.find_blob(entry.id())?;
        Ok(Some(blob.content().to_vec()))
    }

    fn default_author(&self) -> Option<String> {
        let signature = self.repo.signature().ok()?;
        signature.name().map(|s| s.to_string())
    }
}
