use crate::config::Config;
use crate::error::{ConfigError, SnapshotError};
use crate::generator::{GenerationReport, SnapshotGenerator};
use crate::git::GitWalker;
use crate::runner::CommandRunner;
use crate::snapshot::DiskWriter;
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Extract versioned snapshots of Quarto documents from git history
#[derive(Parser, Debug)]
#[command(name = "quarto-snapshots", version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Run the environment bootstrap command
    #[arg(short, long)]
    pub init: bool,

    /// Stage everything, commit and push
    #[arg(short, long)]
    pub commit: bool,

    /// Commit message used with --commit
    #[arg(short = 'm', long, default_value = "autocommit")]
    pub commit_message: String,

    /// Generate snapshots and index pages
    #[arg(short, long)]
    pub generate: bool,

    /// Render the project with the external renderer
    #[arg(short, long)]
    pub render: bool,

    /// Publish the project with the external publisher
    #[arg(short, long)]
    pub publish: bool,

    /// Repository root
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Project directory, relative to the repository root
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Snapshots output subdirectory inside the project
    #[arg(long)]
    pub snapshots_dir: Option<String>,

    /// Keep revisions without an explicit version
    #[arg(long)]
    pub keep_unversioned: bool,

    /// Add the working copy of each document as the `latest` snapshot
    #[arg(long)]
    pub include_working_copy: bool,

    /// Configuration file
    #[arg(long, env = "QUARTO_SNAPSHOTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve configuration: flags over environment over file over defaults
    pub fn load_config(&self) -> Result<Config, SnapshotError> {
        let lookup_root = self.repo.clone().unwrap_or_else(|| PathBuf::from("."));
        let mut config = Config::load(self.config.as_deref(), &lookup_root)?;

        if let Some(repo) = &self.repo {
            config.project.repo_root = repo.clone();
        }
        if let Some(project) = &self.project {
            config.project.project_dir = project.clone();
        }
        if let Some(dir) = &self.snapshots_dir {
            config.snapshots.dir = dir.clone();
        }
        if self.keep_unversioned {
            config.snapshots.keep_unversioned = true;
        }
        if self.include_working_copy {
            config.snapshots.include_working_copy = true;
        }

        config.validate()?;
        Ok(config)
    }

    fn needs_project(&self) -> bool {
        self.generate || self.render || self.publish
    }

    fn has_steps(&self) -> bool {
        self.init || self.commit || self.needs_project()
    }
}

/// Run the requested steps in order: init, commit, generate, render, publish
///
/// The first failing step aborts the rest.
pub fn run(cli: &Cli, runner: &mut dyn CommandRunner) -> Result<Option<GenerationReport>> {
    let config = cli.load_config()?;
    let repo_root = config.project.repo_root.clone();

    if !cli.has_steps() {
        tracing::info!("Nothing to do; pass --generate, --render or --publish");
        return Ok(None);
    }

    if cli.needs_project() && !config.project_root().is_dir() {
        return Err(ConfigError::ProjectNotFound(config.project_root().display().to_string()).into());
    }

    if cli.init {
        tracing::info!("Bootstrapping environment");
        runner.run(&config.expand_command(&config.commands.init), &repo_root)?;
    }

    if cli.commit {
        commit_all(runner, &repo_root, &cli.commit_message)?;
    }

    let mut report = None;
    if cli.generate {
        let walker = GitWalker::discover(&repo_root)?;
        let generator = SnapshotGenerator::for_git(&walker, &config)?;
        let result = generator.generate(&mut DiskWriter)?;
        println!("{}", result.summary());
        for (path, reason) in &result.failures {
            eprintln!("  failed: {}: {}", path.display(), reason);
        }
        report = Some(result);
    }

    if cli.render {
        tracing::info!("Rendering {}", config.project_root().display());
        runner.run(&config.expand_command(&config.commands.render), &repo_root)?;
    }

    if cli.publish {
        tracing::info!("Publishing {}", config.project_root().display());
        runner.run(&config.expand_command(&config.commands.publish), &repo_root)?;
    }

    Ok(report)
}

fn commit_all(runner: &mut dyn CommandRunner, repo_root: &Path, message: &str) -> Result<()> {
    tracing::info!("Committing all changes");
    let git = |args: &[&str]| -> Vec<String> {
        std::iter::once("git")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    };

    runner.run(&git(&["add", "."]), repo_root)?;
    runner.run(&git(&["status"]), repo_root)?;
    runner.run(&git(&["commit", "-m", message]), repo_root)?;
    runner.run(&git(&["push"]), repo_root)?;
    Ok(())
}
