//! Comment-based allowance directives.
//!
//! Supports Go line comments like:
//! ```text
//! // leaklint: allow(resource-leak) reason="handed to the connection pool"
//! ```
//!
//! A directive applies to the line it is on and to the line below it.

use std::collections::HashSet;

use crate::types::{Finding, Location, Severity, Suggestion};

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source code for allowance comments with reason.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `rule_name` - Name of the rule to check for
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Builds the warning emitted when an allow directive lacks its reason.
#[must_use]
pub fn missing_reason_finding(code: &str, rule_name: &str, location: Location) -> Finding {
    Finding::new(
        code,
        rule_name,
        Severity::Warning,
        location,
        format!("Allow directive for '{rule_name}' is missing required reason"),
    )
    .with_suggestion(Suggestion::new(
        "Add reason=\"...\" to explain why this exception is necessary",
    ))
}

/// Parses an allowance directive from a source line.
///
/// The directive may trail code on the same line (`f, _ := os.Open(p) // leaklint: ...`).
/// Any `//` not followed by `leaklint:` is skipped, so `//` inside string
/// literals such as URLs does not hide a trailing directive.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let directive = line
        .match_indices("//")
        .find_map(|(start, _)| line[start + 2..].trim_start().strip_prefix("leaklint:"))?
        .trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules_str = &allow_content[..paren_end];

    let rules: HashSet<String> = rules_str
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest.strip_prefix("reason=").and_then(|reason_part| {
        let quoted = reason_part.trim().strip_prefix('"')?;
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    });

    Some(AllowDirective { rules, reason })
}
