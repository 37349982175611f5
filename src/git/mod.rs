//! Git history access for snapshot extraction
//!
//! Provides a small repository abstraction ("which commits touched this path" and
//! "what did the path contain at that commit"), a libgit2 implementation, and an
//! in-memory implementation for tests.

/// Per-path revision history
pub mod history;
/// In-memory repository for tests and embedding
pub mod memory;
/// Repository abstraction and commit metadata
pub mod repository;
/// Git repository walking backed by libgit2
pub mod walker;

pub use history::{Revision, history};
pub use memory::InMemoryRepository;
pub use repository::{CommitInfo, RepositoryHandle};
pub use walker::GitWalker;
