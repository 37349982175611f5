//! Temporary git repositories with a Quarto project inside

#![allow(dead_code)]

use git2::{IndexAddOption, Repository, Signature, Time};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DAY: i64 = 86_400;
/// 2024-01-01T00:00:00Z
pub const JAN_1: i64 = 1_704_067_200;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        let mut config = repo.config().expect("repository config");
        config.set_str("user.name", "Ada").expect("set user.name");
        config
            .set_str("user.email", "ada@example.com")
            .expect("set user.email");
        Self {
            dir,
            repo,
            clock: JAN_1,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn project(&self) -> PathBuf {
        self.root().join("quarto")
    }

    pub fn snapshots(&self) -> PathBuf {
        self.project().join("snapshots")
    }

    /// Write a working-tree file without committing it
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, contents).expect("write file");
    }

    /// Write `rel` and commit it one day after the previous commit
    pub fn commit(&mut self, author: &str, rel: &str, contents: &str) {
        self.write(rel, contents);

        let mut index = self.repo.index().expect("index");
        index.add_path(Path::new(rel)).expect("add path");
        self.commit_index(author, index, &format!("Update {}", rel));
    }

    /// Stage every working-tree file and commit
    pub fn commit_everything(&mut self, author: &str) {
        let mut index = self.repo.index().expect("index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("add all");
        self.commit_index(author, index, "Commit everything");
    }

    fn commit_index(&mut self, author: &str, mut index: git2::Index, message: &str) {
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");

        let signature = Signature::new(
            author,
            &format!("{}@example.com", author.to_lowercase()),
            &Time::new(self.clock, 0),
        )
        .expect("signature");
        self.clock += DAY;

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .expect("commit");
    }

    /// Read a generated file relative to the snapshots directory
    pub fn snapshot(&self, rel: &str) -> String {
        let path = self.snapshots().join(rel);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
    }
}

/// Every file under `dir` with its contents, keyed by relative path
pub fn tree_contents(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let rel = entry
                .path()
                .strip_prefix(dir)
                .expect("inside dir")
                .to_path_buf();
            let bytes = fs::read(entry.path()).expect("read file");
            (rel, bytes)
        })
        .collect();
    files.sort();
    files
}
