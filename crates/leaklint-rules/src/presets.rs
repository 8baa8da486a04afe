//! Rule presets and config-driven rule construction.

use std::str::FromStr;

use leaklint_core::{Config, ConfigError, RuleBox, Severity};
use tracing::{debug, warn};

use crate::{resource_leak, shared_logger, ResourceLeak, SharedLogger};

/// Preset configurations for leaklint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Both rules; test files are exempt from resource-leak.
    #[default]
    Recommended,
    /// Both rules, no exemptions, shared-logger as error.
    Strict,
    /// Only resource-leak, exempting tests and `package main`.
    Minimal,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(ConfigError::Parse {
                message: format!(
                    "unknown preset '{other}' (expected recommended, strict or minimal)"
                ),
            }),
        }
    }
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        let (leak, logger) = self.base();
        let mut rules: Vec<RuleBox> = vec![Box::new(leak)];
        if let Some(logger) = logger {
            rules.push(Box::new(logger));
        }
        rules
    }

    fn base(self) -> (ResourceLeak, Option<SharedLogger>) {
        match self {
            Self::Recommended => (
                ResourceLeak::new().exempt_test_files(true),
                Some(SharedLogger::new()),
            ),
            Self::Strict => (
                ResourceLeak::new(),
                Some(SharedLogger::new().severity(Severity::Error)),
            ),
            Self::Minimal => (
                ResourceLeak::new()
                    .exempt_test_files(true)
                    .exempt_main_package(true),
                None,
            ),
        }
    }
}

/// Returns the recommended set of rules.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns every available rule with its own defaults.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(ResourceLeak::new()), Box::new(SharedLogger::new())]
}

/// Builds the rule set described by `config`.
///
/// Starts from the configured preset (default: recommended) and applies
/// each `[rules.<name>]` section on top. A rule left out by the preset is
/// added back when its section sets `enabled = true`. Rules disabled with
/// `enabled = false` are still returned; the analyzer skips them.
///
/// # Errors
///
/// Returns an error for an unknown preset or a wrongly-typed rule option.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = config
        .preset
        .as_deref()
        .map(Preset::from_str)
        .transpose()?
        .unwrap_or_default();
    debug!("Building rules from preset {preset:?}");

    let (mut leak, logger) = preset.base();
    let mut logger = logger.or_else(|| {
        config
            .rules
            .get(shared_logger::NAME)
            .and_then(|c| c.enabled)
            .unwrap_or(false)
            .then(SharedLogger::new)
    });

    for name in config.rules.keys() {
        if name != resource_leak::NAME && name != shared_logger::NAME {
            warn!("Ignoring configuration for unknown rule '{name}'");
        }
    }

    if let Some(section) = config.rules.get(resource_leak::NAME) {
        leak = leak.configure(section)?;
    }
    if let Some(section) = config.rules.get(shared_logger::NAME) {
        logger = logger.map(|rule| rule.configure(section)).transpose()?;
    }

    let mut rules: Vec<RuleBox> = vec![Box::new(leak)];
    if let Some(logger) = logger {
        rules.push(Box::new(logger));
    }
    Ok(rules)
}
