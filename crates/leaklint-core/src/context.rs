//! Context types for rule execution.

use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
///
/// Contains metadata about the file being analyzed that rules can use
/// to make context-aware decisions (e.g., skip checks in test files).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Whether this is a Go test file (`*_test.go`).
    pub is_test: bool,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            is_test: Self::detect_test_file(path),
            relative_path,
        }
    }

    /// Creates a context for in-memory source, e.g. from tests or stdin.
    #[must_use]
    pub fn for_source(path: &'a Path, content: &'a str) -> Self {
        Self {
            path,
            content,
            is_test: Self::detect_test_file(path),
            relative_path: path.to_path_buf(),
        }
    }

    /// Go only treats `_test.go` files as tests.
    fn detect_test_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with("_test.go"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_test_file() {
        assert!(FileContext::detect_test_file(Path::new("pkg/store_test.go")));
        assert!(FileContext::detect_test_file(Path::new("main_test.go")));
        assert!(!FileContext::detect_test_file(Path::new("pkg/store.go")));
        assert!(!FileContext::detect_test_file(Path::new("test/store.go")));
        assert!(!FileContext::detect_test_file(Path::new("pkg/test_store.go")));
    }

    #[test]
    fn relative_path_strips_root() {
        let ctx = FileContext::new(
            Path::new("/repo/pkg/store.go"),
            "package pkg",
            Path::new("/repo"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("pkg/store.go"));
        assert!(!ctx.is_test);
    }

    #[test]
    fn path_outside_root_is_kept() {
        let ctx = FileContext::new(
            Path::new("/elsewhere/a_test.go"),
            "package a",
            Path::new("/repo"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/a_test.go"));
        assert!(ctx.is_test);
    }
}
