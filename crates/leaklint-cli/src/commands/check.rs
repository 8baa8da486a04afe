//! Check command implementation.

use anyhow::{Context, Result};
use leaklint_core::{Analyzer, Config, RuleBox};
use leaklint_rules::{all_rules, rules_from_config};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of `leaklint check` besides the path.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules_filter: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Abort on the first file that fails to parse.
    pub fail_on_parse_error: bool,
}

/// Runs the check command.
///
/// Returns `true` when a finding reaches the configured `fail_on` severity.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let threshold = config.fail_threshold();

    let mut rules = rules_from_config(&config).context("Invalid rule configuration")?;
    if let Some(filter) = &options.rules_filter {
        rules = select_rules(rules, filter);
    }

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude.iter().cloned())
        .fail_on_parse_error(options.fail_on_parse_error);

    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    let base = if analyzer.root().is_file() {
        analyzer.root().parent().unwrap_or(analyzer.root())
    } else {
        analyzer.root()
    };
    super::output::print(&result, options.format, base)?;

    Ok(result.has_findings_at(threshold))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

/// Keeps the configured rules named in `filter`.
///
/// A rule the preset left out is added back with its defaults.
fn select_rules(configured: Vec<RuleBox>, filter: &str) -> Vec<RuleBox> {
    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let is_wanted = |rule: &RuleBox| {
        wanted
            .iter()
            .any(|w| *w == rule.name() || w.eq_ignore_ascii_case(rule.code()))
    };

    let available = all_rules();
    for name in &wanted {
        if !available
            .iter()
            .any(|r| r.name() == *name || name.eq_ignore_ascii_case(r.code()))
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    let mut selected: Vec<RuleBox> = configured.into_iter().filter(|r| is_wanted(r)).collect();
    for rule in available {
        if is_wanted(&rule) && !selected.iter().any(|s| s.name() == rule.name()) {
            selected.push(rule);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn filter_accepts_names_and_codes() {
        let configured = rules_from_config(&Config::default()).unwrap();
        assert_eq!(
            names(&select_rules(configured, "GL002")),
            vec!["shared-logger"]
        );

        let configured = rules_from_config(&Config::default()).unwrap();
        assert_eq!(
            names(&select_rules(configured, "resource-leak, gl002, nope")),
            vec!["resource-leak", "shared-logger"]
        );
    }

    #[test]
    fn filter_restores_rules_left_out_by_preset() {
        let config = Config::parse("preset = \"minimal\"\n").unwrap();
        let configured = rules_from_config(&config).unwrap();
        assert_eq!(names(&configured), vec!["resource-leak"]);
        assert_eq!(
            names(&select_rules(configured, "shared-logger")),
            vec!["shared-logger"]
        );
    }

    #[test]
    fn default_source_uses_default_config() {
        let config = load_config(&ConfigSource::Default).unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/leaklint.toml"));
        assert!(load_config(&source).is_err());
    }

    #[test]
    fn exit_code_follows_fail_threshold() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("handler.go"),
            "package svc\n\nfunc f() {\n\tlogger.Info(1)\n}\n",
        )
        .unwrap();
        let options = CheckOptions {
            format: OutputFormat::Compact,
            ..CheckOptions::default()
        };

        let failed = run(tmp.path(), &options, &ConfigSource::Default).unwrap();
        assert!(!failed);

        let config = tmp.path().join("leaklint.toml");
        fs::write(&config, "fail_on = \"warning\"\n").unwrap();
        let failed = run(tmp.path(), &options, &ConfigSource::Project(config)).unwrap();
        assert!(failed);
    }
}
