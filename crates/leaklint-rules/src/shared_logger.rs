//! Rule to require the shared logger package instead of ad-hoc loggers.
//!
//! # Rationale
//!
//! Services are expected to log through one shared package so that output
//! format, levels and sinks stay uniform. Importing the standard `log`
//! package, or calling logging-shaped methods on other identifiers, bypasses
//! it.
//!
//! # Configuration
//!
//! - `allowedPackage`: import path of the shared logger
//!   (default: `github.com/devrev/shared/log`)
//! - `ignored_qualifiers`: identifiers never treated as loggers
//!   (default: `["zap", "mlRunLog"]`)
//!
//! # Suppression
//!
//! - `// leaklint: allow(shared-logger)` comment
//!
//! In test files (`_test.go`) only the `log` import is checked; logging-shaped
//! calls are not.

use leaklint_core::syntax::{collect, import_specs};
use leaklint_core::utils::check_allow_with_reason;
use leaklint_core::{
    ConfigError, FileContext, Finding, Rule, RuleConfig, Severity, SourceTree, MAX_CONFIDENCE,
};
use tree_sitter::Node;

/// Rule code for shared-logger.
pub const CODE: &str = "GL002";

/// Rule name for shared-logger.
pub const NAME: &str = "shared-logger";

/// Import path of the shared logger unless configured otherwise.
pub const DEFAULT_ALLOWED_PACKAGE: &str = "github.com/devrev/shared/log";

/// Qualifiers never treated as loggers unless configured otherwise.
pub const DEFAULT_IGNORED_QUALIFIERS: &[&str] = &["zap", "mlRunLog"];

const STDLIB_LOG: &str = "log";

const LEVEL_PREFIXES: &[&str] = &["Debug", "Info", "Warn"];
const FAILURE_PREFIXES: &[&str] = &["Error", "Fatal", "Panic"];
const ERROR_LIKE_QUALIFIERS: &[&str] = &["err", "status", "api"];
const FORMATTING_QUALIFIERS: &[&str] = &["fmt", "t", "e2e"];
const FORMATTING_METHODS: &[&str] = &["Errorf", "Fatalf", "FatalIfError"];

/// Flags the standard `log` package and calls on non-shared loggers.
#[derive(Debug, Clone)]
pub struct SharedLogger {
    /// Import path of the shared logger.
    pub allowed_package: String,
    /// Qualifiers that are never flagged.
    pub ignored_qualifiers: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for SharedLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedLogger {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed_package: DEFAULT_ALLOWED_PACKAGE.to_string(),
            ignored_qualifiers: DEFAULT_IGNORED_QUALIFIERS
                .iter()
                .map(|q| (*q).to_string())
                .collect(),
            severity: Severity::Warning,
        }
    }

    /// Builds the rule from its `[rules.shared-logger]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for wrongly-typed options.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Self::new().configure(config)
    }

    /// Applies the options present in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for wrongly-typed options.
    pub fn configure(mut self, config: &RuleConfig) -> Result<Self, ConfigError> {
        if let Some(package) = config.try_option::<String>(NAME, "allowedPackage")? {
            if !package.is_empty() {
                self.allowed_package = package;
            }
        }
        if let Some(ignored) = config.try_option(NAME, "ignored_qualifiers")? {
            self.ignored_qualifiers = ignored;
        }
        Ok(self)
    }

    /// Sets the shared logger import path.
    #[must_use]
    pub fn allowed_package(mut self, package: impl Into<String>) -> Self {
        self.allowed_package = package.into();
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn finding(
        &self,
        ctx: &FileContext,
        tree: &SourceTree<'_>,
        node: Node<'_>,
        message: String,
    ) -> Finding {
        Finding::new(
            CODE,
            NAME,
            self.severity,
            tree.location(ctx.relative_path.clone(), node),
            message,
        )
        .with_confidence(MAX_CONFIDENCE)
    }
}

/// Local names the file uses for the shared and the standard logger.
#[derive(Debug, Default)]
struct LoggerAliases<'src> {
    shared: Option<&'src str>,
    stdlib: Option<&'src str>,
}

enum Verdict {
    Allowed,
    Flagged,
}

impl LoggerAliases<'_> {
    fn judge(&self, rule: &SharedLogger, qualifier: &str, method: &str) -> Verdict {
        if self.shared == Some(qualifier) {
            return Verdict::Allowed;
        }
        if self.stdlib == Some(qualifier) {
            return Verdict::Flagged;
        }
        if rule.ignored_qualifiers.iter().any(|q| q == qualifier) {
            return Verdict::Allowed;
        }
        if FORMATTING_QUALIFIERS.contains(&qualifier) && FORMATTING_METHODS.contains(&method) {
            return Verdict::Allowed;
        }
        if is_logger_method(qualifier, method) {
            Verdict::Flagged
        } else {
            Verdict::Allowed
        }
    }
}

/// Whether `qualifier.method` looks like a logging call.
///
/// Error/Fatal/Panic methods are excused on error-like receivers
/// (`err.Error()`, `status.Errorf`).
fn is_logger_method(qualifier: &str, method: &str) -> bool {
    if LEVEL_PREFIXES.iter().any(|p| method.starts_with(p)) {
        return true;
    }
    if !FAILURE_PREFIXES.iter().any(|p| method.starts_with(p)) {
        return false;
    }
    let lower = qualifier.to_lowercase();
    !ERROR_LIKE_QUALIFIERS.iter().any(|s| lower.contains(s))
}

impl Rule for SharedLogger {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the shared logger instead of the log package or other loggers"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Finding> {
        let mut aliases = LoggerAliases::default();
        let mut findings = Vec::new();

        for spec in import_specs(tree) {
            if spec.path == self.allowed_package {
                aliases.shared = Some(spec.local_name());
            } else if spec.path == STDLIB_LOG {
                findings.push(self.finding(
                    ctx,
                    tree,
                    spec.node,
                    format!(
                        "direct import of 'log' package is not allowed. Use {} instead",
                        self.allowed_package
                    ),
                ));
                if !matches!(spec.name, Some("_" | ".")) {
                    aliases.stdlib = Some(spec.local_name());
                }
            }
        }

        if ctx.is_test {
            return findings;
        }

        findings.extend(collect(tree.root(), |node| {
            if node.kind() != "selector_expression" {
                return None;
            }
            let operand = node.child_by_field_name("operand")?;
            if operand.kind() != "identifier" {
                return None;
            }
            let field = node.child_by_field_name("field")?;
            let (qualifier, method) = (tree.text(operand), tree.text(field));

            match aliases.judge(self, qualifier, method) {
                Verdict::Allowed => None,
                Verdict::Flagged => Some(node),
            }
        })
        .into_iter()
        .filter(|node| {
            let line = node.start_position().row + 1;
            !check_allow_with_reason(ctx.content, line, NAME).is_allowed()
        })
        .map(|node| {
            self.finding(
                ctx,
                tree,
                node,
                format!("use of non-{} logger detected", self.allowed_package),
            )
        }));

        findings
    }
}
