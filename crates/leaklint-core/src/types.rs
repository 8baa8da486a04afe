//! Core types for lint findings and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Confidence attached to findings the rule is certain about.
pub const MAX_CONFIDENCE: f64 = 1.0;

/// Severity level for lint findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a syntax node.
    #[must_use]
    pub fn from_node(file: PathBuf, node: tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        Self {
            file,
            line: start.row + 1,
            column: start.column + 1,
            offset: node.start_byte(),
            length: node.end_byte().saturating_sub(node.start_byte()),
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A suspected defect reported by a rule.
///
/// Findings are plain values: a rule builds them and hands ownership to the
/// analyzer, which only sorts and renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Rule code (e.g., "GL001").
    pub code: String,
    /// Rule name (e.g., "resource-leak").
    pub rule: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Defect category (e.g., "resource-management").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// How sure the rule is, in `[0, 1]`.
    pub confidence: f64,
    /// Primary location of the finding.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
}

impl Finding {
    /// Creates a new finding with maximal confidence and no category.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            category: None,
            confidence: MAX_CONFIDENCE,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Sets the defect category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the confidence, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, MAX_CONFIDENCE);
        self
    }

    /// Adds a suggestion to this finding.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the finding for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(category) = &self.category {
            let _ = writeln!(output, "  = category: {category}");
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Finding to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct FindingDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Finding> for FindingDiagnostic {
    fn from(f: &Finding) -> Self {
        Self {
            message: format!("[{}] {}", f.code, f.message),
            help: f.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((f.location.offset, f.location.length)),
            label_message: f.rule.clone(),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All findings.
    pub findings: Vec<Finding>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.findings.iter().any(|f| f.severity >= Severity::Warning)
    }

    /// Returns findings filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }

    /// Counts findings by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| self.findings.iter().filter(|f| f.severity == severity).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Checks if any findings meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_findings_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// Adds findings from another result.
    pub fn extend(&mut self, other: Self) {
        self.findings.extend(other.findings);
        self.files_checked += other.files_checked;
    }

    /// Sorts findings by file, then line, then column.
    ///
    /// The sort is stable, so findings sharing a position keep the order the
    /// rule emitted them in.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_finding(severity: Severity) -> Finding {
        Finding::new(
            "GL001",
            "resource-leak",
            severity,
            Location::new(PathBuf::from("pkg/store.go"), 42, 10),
            "check if the resource is closed: f, err := os.Open(path)",
        )
    }

    #[test]
    fn finding_new_has_max_confidence() {
        let f = make_finding(Severity::Error);
        assert!((f.confidence - MAX_CONFIDENCE).abs() < f64::EPSILON);
        assert!(f.category.is_none());
    }

    #[test]
    fn confidence_is_clamped() {
        let f = make_finding(Severity::Error).with_confidence(3.5);
        assert!((f.confidence - 1.0).abs() < f64::EPSILON);
        let f = make_finding(Severity::Error).with_confidence(-1.0);
        assert!(f.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn format_includes_category_and_help() {
        let f = make_finding(Severity::Error)
            .with_category("resource-management")
            .with_suggestion(Suggestion::new("add 'defer f.Close()'"));
        let formatted = f.format();
        assert!(formatted.contains("= category: resource-management"));
        assert!(formatted.contains("= help: add 'defer f.Close()'"));
    }

    #[test]
    fn display_is_file_line_col() {
        let display = format!("{}", make_finding(Severity::Error));
        assert!(display.starts_with("pkg/store.go:42:10: error [GL001]"));
    }

    #[test]
    fn has_findings_at_error_only() {
        let mut result = LintResult::new();
        result.findings.push(make_finding(Severity::Warning));
        assert!(!result.has_findings_at(Severity::Error));
        assert!(result.has_findings_at(Severity::Warning));
        assert!(!result.has_errors());
        assert!(result.has_warnings());
    }

    #[test]
    fn sort_is_stable_for_same_position() {
        let mut result = LintResult::new();
        let mut first = make_finding(Severity::Error);
        first.message = "first".into();
        let mut second = make_finding(Severity::Error);
        second.message = "second".into();
        let mut earlier = make_finding(Severity::Error);
        earlier.location.line = 3;
        result.findings = vec![first, second, earlier];

        result.sort();

        let lines: Vec<_> = result.findings.iter().map(|f| f.location.line).collect();
        assert_eq!(lines, vec![3, 42, 42]);
        assert_eq!(result.findings[1].message, "first");
        assert_eq!(result.findings[2].message, "second");
    }

    #[test]
    fn count_by_severity_counts_each_level() {
        let mut result = LintResult::new();
        result.findings.push(make_finding(Severity::Error));
        result.findings.push(make_finding(Severity::Error));
        result.findings.push(make_finding(Severity::Info));
        assert_eq!(result.count_by_severity(), (2, 0, 1));
        assert_eq!(result.by_severity(Severity::Info).len(), 1);
    }
}
