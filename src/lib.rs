//! # quarto-snapshots - Versioned document snapshots from git history
//!
//! Walks the commit history of every markdown, Quarto and Jupyter document in a
//! Quarto project, keeps one revision per declared `version`, and writes each one
//! out as a standalone document next to an index page linking all versions.
//!
//! ## Overview
//!
//! A document opts in by carrying a `version` field in its front matter (for
//! notebooks, in the first cell). Later commits that keep the same version
//! overwrite earlier ones, `version: auto` gets sequential `0.1.N` labels, and
//! documents without a version are skipped unless asked otherwise.
//!
//! ## Pipeline
//!
//! ```text
//! ProjectWalker ──► history() ──► VersionResolver ──► SnapshotMaterializer
//!  (documents)      (revisions)    (VersionTable)      (snapshots + index)
//!                                                              │
//!                                     project index ◄──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`document`]: front matter and notebook parsing with metadata access
//! - [`git`]: repository abstraction and per-file history
//! - [`snapshot`]: version resolution, output layout, materialization, index pages
//! - [`project`]: document discovery inside the project tree
//! - [`generator`]: the whole pipeline over one project
//! - [`cli`]: command line steps (init, commit, generate, render, publish)
//! - [`runner`]: external command execution
//! - [`config`]: configuration with environment variable overrides
//! - [`error`]: error types
//!
//! ## Usage Example
//!
//! ```no_run
//! use quarto_snapshots::generator::SnapshotGenerator;
//! use quarto_snapshots::git::GitWalker;
//! use quarto_snapshots::snapshot::DiskWriter;
//!
//! fn main() -> anyhow::Result<()> {
//!     let walker = GitWalker::discover(".")?;
//!     let report = SnapshotGenerator::new(&walker, "quarto", "snapshots")
//!         .with_repo_prefix("quarto")
//!         .generate(&mut DiskWriter)?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

/// Command line interface and step sequencing
pub mod cli;

/// Configuration management with environment variable overrides
pub mod config;

/// Document formats and front matter metadata
pub mod document;

/// Error types and utilities
pub mod error;

/// Snapshot generation over a whole project
pub mod generator;

/// Git history access
pub mod git;

/// Glob matching for exclude patterns
pub mod glob_utils;

/// Path utilities and config locations
pub mod paths;

/// Project document discovery
pub mod project;

/// External command execution
pub mod runner;

/// Version tables, output layout and index pages
pub mod snapshot;
