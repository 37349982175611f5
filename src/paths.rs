/// Path helpers shared by configuration loading and snapshot layout
///
/// Config lookup follows the XDG Base Directory specification on Unix-like systems.
use std::path::{Component, Path, PathBuf};

/// File name of the per-repository configuration file
pub const PROJECT_CONFIG_FILE: &str = "quarto-snapshots.toml";

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Get the appropriate config directory for the current platform
    ///
    /// - Windows: %APPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_CONFIG_HOME or ~/.config
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            std::env::var("APPDATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        } else if cfg!(target_os = "macos") {
            std::env::var("HOME")
                .map(|home| PathBuf::from(home).join("Library/Application Support"))
                .unwrap_or_else(|_| PathBuf::from("."))
        } else {
            std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                .unwrap_or_else(|_| PathBuf::from("."))
        }
    }

    /// Returns: {config_dir}/quarto-snapshots
    pub fn project_config_dir() -> PathBuf {
        Self::config_dir().join("quarto-snapshots")
    }

    /// Returns: {config_dir}/quarto-snapshots/config.toml
    pub fn default_config_path() -> PathBuf {
        Self::project_config_dir().join("config.toml")
    }
}

/// Join a relative path's components with `/`, whatever the platform separator
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Link from a page in `from_dir` to `target` once rendered with `extension`
///
/// `target` must live under `from_dir`; otherwise the target's file name is used.
pub fn rendered_link(from_dir: &Path, target: &Path, extension: &str) -> String {
    let rendered = target.with_extension(extension);
    match rendered.strip_prefix(from_dir) {
        Ok(relative) => to_slash(relative),
        Err(_) => rendered
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_dir_not_empty() {
        let dir = PlatformPaths::config_dir();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_default_config_path() {
        let path = PlatformPaths::default_config_path();
        assert!(path.to_string_lossy().contains("quarto-snapshots"));
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_config_dir_with_xdg_config_home() {
        let original = env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = PlatformPaths::config_dir();
        assert_eq!(dir, PathBuf::from("/custom/config"));

        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    fn test_to_slash() {
        let path: PathBuf = ["notes", "deep", "a.qmd"].iter().collect();
        assert_eq!(to_slash(&path), "notes/deep/a.qmd");
        assert_eq!(to_slash(Path::new("./a.qmd")), "a.qmd");
    }

    #[test]
    fn test_rendered_link_relative_to_index_dir() {
        let from = Path::new("quarto/snapshots");
        let target = Path::new("quarto/snapshots/notes/a/a_1.0.qmd");
        assert_eq!(rendered_link(from, target, "html"), "notes/a/a_1.0.html");
    }

    #[test]
    fn test_rendered_link_same_dir() {
        let from = Path::new("quarto/snapshots/notes/a");
        let target = Path::new("quarto/snapshots/notes/a/a_0.1.0.ipynb");
        assert_eq!(rendered_link(from, target, "html"), "a_0.1.0.html");
    }
}
