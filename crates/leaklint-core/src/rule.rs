//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::syntax::SourceTree;
use crate::types::{Finding, Severity};

/// A per-file lint rule over a Go syntax tree.
///
/// Rules are configured once, before analysis starts, and are then shared
/// read-only across worker threads. `check` must not keep state between
/// calls: it receives one file and returns that file's findings by value,
/// in source order.
///
/// # Example
///
/// ```ignore
/// use leaklint_core::{FileContext, Finding, Rule, SourceTree};
/// use leaklint_core::syntax::{collect, selector_call};
///
/// pub struct NoPanicCalls;
///
/// impl Rule for NoPanicCalls {
///     fn name(&self) -> &'static str { "no-panic-calls" }
///     fn code(&self) -> &'static str { "GL900" }
///
///     fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Finding> {
///         collect(tree.root(), |node| {
///             let call = selector_call(tree, node)?;
///             (call.method == "Panic").then(|| {
///                 Finding::new(
///                     self.code(),
///                     self.name(),
///                     self.default_severity(),
///                     tree.location(ctx.relative_path.clone(), node),
///                     "panic call",
///                 )
///             })
///         })
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "resource-leak").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "GL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for findings from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any findings.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `tree` - The parsed syntax tree of the file
    fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Finding>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
