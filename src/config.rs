/// Configuration system for quarto-snapshots
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, SnapshotError};
use crate::paths::{PROJECT_CONFIG_FILE, PlatformPaths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the repository and the documentation project live
    #[serde(default)]
    pub project: ProjectConfig,

    /// Snapshot generation behaviour
    #[serde(default)]
    pub snapshots: SnapshotConfig,

    /// External commands for bootstrap, render and publish steps
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Repository and project locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Repository root (any path inside the repository works)
    #[serde(default = "default_repo_root")]
    pub repo_root: PathBuf,

    /// Documentation project directory, relative to the repository root
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Glob patterns (relative to the project) of documents never snapshotted
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Snapshot generation behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Name of the output subdirectory inside the project
    #[serde(default = "default_snapshots_dir")]
    pub dir: String,

    /// Keep revisions without an explicit `version` as the `unversioned` snapshot
    #[serde(default)]
    pub keep_unversioned: bool,

    /// Add the working copy of each document as the `latest` snapshot
    #[serde(default)]
    pub include_working_copy: bool,
}

/// External commands, as argument vectors
///
/// `{project}` in any argument is replaced by the project directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_init_command")]
    pub init: Vec<String>,

    #[serde(default = "default_render_command")]
    pub render: Vec<String>,

    #[serde(default = "default_publish_command")]
    pub publish: Vec<String>,
}

// Default value functions
fn default_repo_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_project_dir() -> PathBuf {
    PathBuf::from("quarto")
}

fn default_snapshots_dir() -> String {
    "snapshots".to_string()
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn default_init_command() -> Vec<String> {
    argv(&["python3", "-m", "pip", "install", "-r", "requirements.txt"])
}

fn default_render_command() -> Vec<String> {
    argv(&["quarto", "render", "{project}"])
}

fn default_publish_command() -> Vec<String> {
    argv(&[
        "quarto",
        "publish",
        "gh-pages",
        "{project}",
        "--no-prompt",
        "--no-browser",
    ])
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            repo_root: default_repo_root(),
            project_dir: default_project_dir(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            dir: default_snapshots_dir(),
            keep_unversioned: false,
            include_working_copy: false,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            init: default_init_command(),
            render: default_render_command(),
            publish: default_publish_command(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the first config found: `<repo_root>/quarto-snapshots.toml`, then the
    /// user config directory, else defaults
    pub fn load_or_default(repo_root: &Path) -> Result<Self, SnapshotError> {
        let candidates = [
            repo_root.join(PROJECT_CONFIG_FILE),
            PlatformPaths::default_config_path(),
        ];

        for path in candidates {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let dir = self.snapshots.dir.as_str();
        if dir.is_empty() || dir == "." || dir == ".." {
            return Err(ConfigError::InvalidValue {
                key: "snapshots.dir".to_string(),
                reason: format!("must be a directory name, got '{}'", dir),
            }
            .into());
        }
        if dir.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                key: "snapshots.dir".to_string(),
                reason: format!("must be a single directory name, got '{}'", dir),
            }
            .into());
        }

        if self.project.project_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "project.project_dir".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if let Err(e) = crate::glob_utils::compile_patterns(&self.project.exclude_patterns) {
            return Err(ConfigError::InvalidValue {
                key: "project.exclude_patterns".to_string(),
                reason: format!("{:#}", e),
            }
            .into());
        }

        for (key, command) in [
            ("commands.init", &self.commands.init),
            ("commands.render", &self.commands.render),
            ("commands.publish", &self.commands.publish),
        ] {
            if command.first().is_none_or(|program| program.is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "must name a program to run".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, which maps a `QUARTO_SNAPSHOTS_*` name to its value
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup("QUARTO_SNAPSHOTS_REPO") {
            self.project.repo_root = PathBuf::from(root);
        }

        if let Some(dir) = lookup("QUARTO_SNAPSHOTS_PROJECT_DIR") {
            self.project.project_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("QUARTO_SNAPSHOTS_SNAPSHOTS_DIR") {
            self.snapshots.dir = dir;
        }

        if let Some(keep) = lookup("QUARTO_SNAPSHOTS_KEEP_UNVERSIONED")
            && let Some(keep) = parse_flag(&keep)
        {
            self.snapshots.keep_unversioned = keep;
        }

        if let Some(include) = lookup("QUARTO_SNAPSHOTS_INCLUDE_WORKING_COPY")
            && let Some(include) = parse_flag(&include)
        {
            self.snapshots.include_working_copy = include;
        }
    }

    /// Load from `explicit` (or the default locations) and apply environment overrides
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<Self, SnapshotError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::load_or_default(repo_root)?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// The project directory as a filesystem path
    pub fn project_root(&self) -> PathBuf {
        self.project.repo_root.join(&self.project.project_dir)
    }

    /// Substitute `{project}` in a configured command
    pub fn expand_command(&self, command: &[String]) -> Vec<String> {
        let project = self.project.project_dir.to_string_lossy();
        command
            .iter()
            .map(|arg| arg.replace("{project}", &project))
            .collect()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
