//! Rule to detect resources that are acquired but never released.
//!
//! # Rationale
//!
//! Files, network connections, database handles and buffered streams hold
//! operating-system resources until they are closed. A function that opens
//! one and never closes it leaks that resource on every call.
//!
//! # Detection
//!
//! Purely syntactic and best-effort. Inside each function or method (including
//! nested function literals), every assignment whose right-hand side is an
//! opener call is an acquisition site. A site is fine when a closer call,
//! deferred or direct, appears after it and before the same variable is
//! bound to another opener. See [`reachability`] for the exact window.
//!
//! # Configuration
//!
//! - `openers`: table of `qualifier = ["Method", ...]` added to the known openers
//! - `generic_openers`: method-name fragments for the fallback (replaces defaults)
//! - `closers`: closer method names (replaces defaults)
//! - `exempt_test_files`: skip `_test.go` files (default: false)
//! - `exempt_main_package`: skip `package main` files (default: false)
//!
//! # Suppression
//!
//! - `// leaklint: allow(resource-leak) reason="..."` on or above the acquisition

pub mod opener;
pub mod patterns;
pub mod reachability;
mod report;

use std::collections::BTreeMap;

use leaklint_core::utils::{check_allow_with_reason, missing_reason_finding};
use leaklint_core::{ConfigError, FileContext, Finding, Rule, RuleConfig, Severity, SourceTree};
use tracing::{debug, trace};

use patterns::PatternTables;
use reachability::{function_declarations, FunctionScope};

/// Rule code for resource-leak.
pub const CODE: &str = "GL001";

/// Rule name for resource-leak.
pub const NAME: &str = "resource-leak";

/// Category attached to every resource-leak finding.
pub const CATEGORY: &str = "resource-management";

/// Reports opener calls without a release in the same function.
#[derive(Debug, Clone)]
pub struct ResourceLeak {
    tables: PatternTables,
    /// Skip `_test.go` files.
    pub exempt_test_files: bool,
    /// Skip files of `package main`.
    pub exempt_main_package: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ResourceLeak {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLeak {
    /// Creates a new rule with default tables and no exemptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: PatternTables::new(),
            exempt_test_files: false,
            exempt_main_package: false,
            severity: Severity::Error,
        }
    }

    /// Builds the rule from its `[rules.resource-leak]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for wrongly-typed options.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Self::new().configure(config)
    }

    /// Applies the options present in `config` on top of the current settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for wrongly-typed options.
    pub fn configure(mut self, config: &RuleConfig) -> Result<Self, ConfigError> {
        if let Some(openers) = config.try_option::<BTreeMap<String, Vec<String>>>(NAME, "openers")? {
            for (qualifier, methods) in openers {
                self.tables = self.tables.with_openers(qualifier, methods);
            }
        }
        if let Some(fragments) = config.try_option::<Vec<String>>(NAME, "generic_openers")? {
            self.tables = self.tables.with_generic_openers(fragments);
        }
        if let Some(closers) = config.try_option::<Vec<String>>(NAME, "closers")? {
            self.tables = self.tables.with_closers(closers);
        }
        if let Some(exempt) = config.try_option(NAME, "exempt_test_files")? {
            self.exempt_test_files = exempt;
        }
        if let Some(exempt) = config.try_option(NAME, "exempt_main_package")? {
            self.exempt_main_package = exempt;
        }
        Ok(self)
    }

    /// Replaces the pattern tables.
    #[must_use]
    pub fn tables(mut self, tables: PatternTables) -> Self {
        self.tables = tables;
        self
    }

    /// Sets whether `_test.go` files are skipped.
    #[must_use]
    pub fn exempt_test_files(mut self, exempt: bool) -> Self {
        self.exempt_test_files = exempt;
        self
    }

    /// Sets whether `package main` files are skipped.
    #[must_use]
    pub fn exempt_main_package(mut self, exempt: bool) -> Self {
        self.exempt_main_package = exempt;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn is_exempt(&self, ctx: &FileContext, tree: &SourceTree<'_>) -> bool {
        (self.exempt_test_files && ctx.is_test)
            || (self.exempt_main_package && tree.package_name() == Some("main"))
    }
}

impl Rule for ResourceLeak {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects opened resources without a deferred or later close"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Finding> {
        if self.is_exempt(ctx, tree) {
            debug!("{}: exempt from {NAME}", ctx.relative_path.display());
            return Vec::new();
        }

        let mut findings = Vec::new();
        for decl in function_declarations(tree) {
            let scope = FunctionScope::build(tree, decl, &self.tables);

            for site in scope.unreleased() {
                let line = site.statement.start_position().row + 1;
                trace!(
                    "{}:{line}: {}.{} ({:?}) has no release",
                    ctx.relative_path.display(),
                    site.qualifier,
                    site.method,
                    site.matched
                );

                let allow = check_allow_with_reason(ctx.content, line, NAME);
                if allow.is_allowed() {
                    if self.requires_allow_reason() && allow.reason().is_none() {
                        findings.push(missing_reason_finding(
                            CODE,
                            NAME,
                            tree.location(ctx.relative_path.clone(), site.statement),
                        ));
                    }
                    continue;
                }

                findings.push(report::leak_finding(ctx, tree, site, self.severity));
            }
        }

        findings
    }
}
