//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `leaklint.toml` or `.leaklint.toml` in the checked directory or one of
//!    its ancestors, up to and including the Go module root (`go.mod`)
//! 3. `~/.leaklint/config.toml` (global fallback)
//! 4. No config found → defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory or above it.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.leaklint/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["leaklint.toml", ".leaklint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Marks the root of a Go module; the upward search stops there.
const MODULE_MARKER: &str = "go.mod";

/// Resolves the configuration file for checking `target`.
///
/// `target` may be a directory or a single `.go` file. See module-level docs
/// for resolution order.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(target, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(target: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(target) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.is_file() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

fn find_project_config(target: &Path) -> Option<PathBuf> {
    let start = if target.is_file() {
        target.parent()?
    } else {
        target
    };

    for dir in start.ancestors() {
        let found = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if dir.join(MODULE_MARKER).is_file() {
            break;
        }
    }
    None
}

/// Returns the global config directory path.
///
/// Resolution: `$LEAKLINT_CONFIG_DIR` > `~/.leaklint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("LEAKLINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".leaklint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// A module root with a nested package directory.
    fn module() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("go.mod"), "module example.com/svc\n").unwrap();
        let pkg = tmp.path().join("internal/store");
        fs::create_dir_all(&pkg).unwrap();
        (tmp, pkg)
    }

    #[test]
    fn explicit_takes_priority_over_project() {
        let (tmp, pkg) = module();
        fs::write(pkg.join("leaklint.toml"), "").unwrap();
        let explicit = tmp.path().join("custom.toml");

        let result = resolve_inner(&pkg, Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve_inner(
            Path::new("/tmp"),
            Some(Path::new("/nonexistent.toml")),
            None,
        );
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn leaklint_toml_preferred_over_dot_prefix() {
        let (_tmp, pkg) = module();
        fs::write(pkg.join("leaklint.toml"), "").unwrap();
        fs::write(pkg.join(".leaklint.toml"), "").unwrap();

        let result = resolve_inner(&pkg, None, None);
        assert_eq!(result, ConfigSource::Project(pkg.join("leaklint.toml")));
    }

    #[test]
    fn module_root_config_found_from_package() {
        let (tmp, pkg) = module();
        fs::write(tmp.path().join(".leaklint.toml"), "").unwrap();

        let result = resolve_inner(&pkg, None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join(".leaklint.toml"))
        );
    }

    #[test]
    fn single_file_target_uses_its_directory() {
        let (_tmp, pkg) = module();
        fs::write(pkg.join("leaklint.toml"), "").unwrap();
        let file = pkg.join("store.go");
        fs::write(&file, "package store\n").unwrap();

        let result = resolve_inner(&file, None, None);
        assert_eq!(result, ConfigSource::Project(pkg.join("leaklint.toml")));
    }

    #[test]
    fn search_stops_at_module_root() {
        let outer = TempDir::new().unwrap();
        fs::write(outer.path().join("leaklint.toml"), "").unwrap();
        let module_root = outer.path().join("svc");
        fs::create_dir(&module_root).unwrap();
        fs::write(module_root.join("go.mod"), "module svc\n").unwrap();

        let result = resolve_inner(&module_root, None, None);
        assert_eq!(result, ConfigSource::Default);
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let (_tmp, pkg) = module();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(&pkg, None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
        assert!(result.is_global());
    }

    #[test]
    fn global_dir_missing_config_file_returns_default() {
        let (_tmp, pkg) = module();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(&pkg, None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }

    #[test]
    fn config_source_path_returns_some_for_all_others() {
        let p = PathBuf::from("/tmp/test.toml");
        assert_eq!(ConfigSource::Explicit(p.clone()).path(), Some(p.as_path()));
        assert_eq!(ConfigSource::Project(p.clone()).path(), Some(p.as_path()));
        assert_eq!(ConfigSource::Global(p.clone()).path(), Some(p.as_path()));
        assert!(!ConfigSource::Project(p).is_global());
    }
}
