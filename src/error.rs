/// Centralized error types for quarto-snapshots using thiserror
///
/// Per-document failures (malformed headers, unreadable notebooks) are kept apart from
/// run-level failures (configuration, path collisions, external tools) so the generator
/// can decide which ones abort a run.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for snapshot generation
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Output path collision at '{}': claimed by {first} and {second}",
        path.display()
    )]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("External command `{command}` failed with {status}")]
    ExternalTool { command: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while reading or writing a single document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Unterminated front matter block")]
    UnterminatedFrontMatter,

    #[error("Invalid front matter: {0}")]
    InvalidFrontMatter(String),

    #[error("Front matter must be a mapping, got {0}")]
    FrontMatterNotMapping(String),

    #[error("Invalid notebook: {0}")]
    InvalidNotebook(String),

    #[error("Document is not valid UTF-8")]
    InvalidUtf8,

    #[error("Failed to serialize document: {0}")]
    SerializeFailed(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Project directory not found: {0}")]
    ProjectNotFound(String),
}

impl From<anyhow::Error> for SnapshotError {
    fn from(err: anyhow::Error) -> Self {
        SnapshotError::Other(format!("{:#}", err))
    }
}

impl SnapshotError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        SnapshotError::Other(msg.into())
    }

    /// Whether this error must stop the whole run rather than a single document
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SnapshotError::Config(_)
                | SnapshotError::PathCollision { .. }
                | SnapshotError::ExternalTool { .. }
        )
    }
}
