//! Subprocess seam for the external steps (bootstrap, git, render, publish)

use crate::error::SnapshotError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs external commands to completion
pub trait CommandRunner {
    /// Run `argv` in `cwd`; a non-zero exit is an error
    fn run(&mut self, argv: &[String], cwd: &Path) -> Result<(), SnapshotError>;
}

/// Runs commands as blocking child processes sharing this process's stdio
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, argv: &[String], cwd: &Path) -> Result<(), SnapshotError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(SnapshotError::other("Empty command"));
        };
        let command = argv.join(" ");
        tracing::info!("Running `{}` in {}", command, cwd.display());

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|e| SnapshotError::ExternalTool {
                command: command.clone(),
                status: format!("launch error: {}", e),
            })?;

        if !status.success() {
            return Err(SnapshotError::ExternalTool {
                command,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Records commands instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<(Vec<String>, PathBuf)>,
    /// Index into `calls` of a command to report as failed
    pub fail_at: Option<usize>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Vec::new(),
            fail_at: Some(index),
        }
    }

    /// Recorded commands joined with spaces
    pub fn commands(&self) -> Vec<String> {
        self.calls.iter().map(|(argv, _)| argv.join(" ")).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, argv: &[String], cwd: &Path) -> Result<(), SnapshotError> {
        let index = self.calls.len();
        self.calls.push((argv.to_vec(), cwd.to_path_buf()));
        if self.fail_at == Some(index) {
            return Err(SnapshotError::ExternalTool {
                command: argv.join(" "),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_command_rejected() {
        let result = SystemRunner.run(&[], Path::new("."));
        assert!(matches!(result, Err(SnapshotError::Other(_))));
    }

    #[test]
    fn test_missing_program_is_external_failure() {
        let result = SystemRunner.run(&argv(&["quarto-snapshots-no-such-program"]), Path::new("."));
        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("quarto-snapshots-no-such-program"));
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_status_is_checked() {
        assert!(SystemRunner.run(&argv(&["true"]), Path::new(".")).is_ok());
        let err = SystemRunner
            .run(&argv(&["false"]), Path::new("."))
            .unwrap_err();
        assert!(matches!(err, SnapshotError::ExternalTool { .. }));
    }

    #[test]
    fn test_recording_runner() {
        let mut runner = RecordingRunner::failing_at(1);
        runner.run(&argv(&["git", "status"]), Path::new("repo")).unwrap();
        assert!(runner.run(&argv(&["git", "push"]), Path::new("repo")).is_err());
        assert_eq!(runner.commands(), vec!["git status", "git push"]);
        assert_eq!(runner.calls[0].1, PathBuf::from("repo"));
    }
}
