//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# leaklint configuration

# Preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Findings at or above this severity fail the run
# fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./services"

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
    "**/testdata/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.resource-leak]
enabled = true
# severity = "warning"  # Override default severity
exempt_test_files = true
exempt_main_package = false
# openers = { redis = ["NewClient"] }
# closers = ["Close", "Stop", "Shutdown"]

[rules.shared-logger]
enabled = true
allowedPackage = "github.com/devrev/shared/log"
# ignored_qualifiers = ["zap", "mlRunLog"]
"#;

/// File name written by `leaklint init`.
const CONFIG_FILE: &str = "leaklint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: leaklint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
