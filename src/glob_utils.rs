//! Glob pattern matching for excluding project documents

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

/// Compile exclude patterns into matchers for efficient repeated matching
///
/// Fails on the first pattern that does not compile.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<GlobMatcher>> {
    patterns
        .iter()
        .map(|pattern| {
            Glob::new(pattern)
                .map(|g| g.compile_matcher())
                .with_context(|| format!("Invalid glob pattern '{}'", pattern))
        })
        .collect()
}

/// Check if a `/`-separated relative path matches any of the matchers
///
/// Patterns also match against every path suffix, so `drafts/**` excludes
/// `notes/drafts/a.qmd` as well as `drafts/a.qmd`. No matchers means nothing matches.
pub fn matches_any_matcher(path: &str, matchers: &[GlobMatcher]) -> bool {
    if matchers.is_empty() {
        return false;
    }

    let path = path.trim_start_matches('/');
    let parts: Vec<&str> = path.split('/').collect();

    matchers.iter().any(|matcher| {
        (0..parts.len()).any(|i| matcher.is_match(parts[i..].join("/")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchers(patterns: &[&str]) -> Vec<GlobMatcher> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        compile_patterns(&patterns).unwrap()
    }

    #[test]
    fn test_matches_directory_glob() {
        let m = matchers(&["drafts/**"]);
        assert!(matches_any_matcher("drafts/a.qmd", &m));
        assert!(matches_any_matcher("notes/drafts/a.qmd", &m));
        assert!(!matches_any_matcher("notes/a.qmd", &m));
    }

    #[test]
    fn test_matches_extension_glob() {
        let m = matchers(&["**/*.ipynb"]);
        assert!(matches_any_matcher("nb/fit.ipynb", &m));
        assert!(!matches_any_matcher("nb/fit.qmd", &m));
    }

    #[test]
    fn test_specific_file_pattern() {
        let m = matchers(&["README.md"]);
        assert!(matches_any_matcher("README.md", &m));
        assert!(matches_any_matcher("sub/README.md", &m));
        assert!(!matches_any_matcher("notes.md", &m));
    }

    #[test]
    fn test_leading_slash_ignored() {
        let m = matchers(&["drafts/**"]);
        assert!(matches_any_matcher("/drafts/a.qmd", &m));
    }

    #[test]
    fn test_empty_matchers_match_nothing() {
        assert!(!matches_any_matcher("anything.qmd", &[]));
    }

    #[test]
    fn test_compile_invalid_patterns() {
        let patterns = vec!["drafts/**".to_string(), "[invalid".to_string()];
        let err = compile_patterns(&patterns).unwrap_err();
        assert!(err.to_string().contains("[invalid"));
    }
}
