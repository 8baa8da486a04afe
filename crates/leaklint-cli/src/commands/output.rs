//! Shared output formatting for lint results.

use anyhow::Result;
use leaklint_core::{Finding, FindingDiagnostic, LintResult, Severity};
use miette::{NamedSource, Report};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `base` is the directory finding paths are relative to; the `pretty`
/// format reads sources from there.
pub fn print(result: &LintResult, format: OutputFormat, base: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, base),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for finding in &result.findings {
        let severity_indicator = match finding.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            finding.code,
            finding.rule,
            finding.location.file.display(),
            finding.location.line,
            finding.location.column,
        );
        println!("  {}: {}", severity_indicator, finding.message);
        if let Some(suggestion) = &finding.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
    findings: &'a [Finding],
}

impl<'a> From<&'a LintResult> for JsonReport<'a> {
    fn from(result: &'a LintResult) -> Self {
        let (errors, warnings, infos) = result.count_by_severity();
        Self {
            files_checked: result.files_checked,
            errors,
            warnings,
            infos,
            findings: &result.findings,
        }
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from(result))?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for finding in &result.findings {
        println!("{finding}");
    }
}

fn print_pretty(result: &LintResult, base: &Path) {
    let mut sources: HashMap<&Path, Option<String>> = HashMap::new();

    for finding in &result.findings {
        let file = finding.location.file.as_path();
        let source = sources
            .entry(file)
            .or_insert_with(|| std::fs::read_to_string(base.join(file)).ok());

        match source {
            Some(content) => {
                let report = Report::new(FindingDiagnostic::from(finding)).with_source_code(
                    NamedSource::new(file.display().to_string(), content.clone()),
                );
                println!("{report:?}");
            }
            None => println!("{finding}"),
        }
    }

    print_summary(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaklint_core::Location;

    #[test]
    fn json_report_carries_counts() {
        let mut result = LintResult::new();
        result.files_checked = 3;
        result.findings.push(Finding::new(
            "GL001",
            "resource-leak",
            Severity::Error,
            Location::new("a.go".into(), 4, 2),
            "check if the resource is closed: f, _ := os.Open(p)",
        ));
        result.findings.push(Finding::new(
            "GL002",
            "shared-logger",
            Severity::Warning,
            Location::new("b.go".into(), 7, 2),
            "use of non-github.com/devrev/shared/log logger detected",
        ));

        let value = serde_json::to_value(JsonReport::from(&result)).unwrap();
        assert_eq!(value["files_checked"], 3);
        assert_eq!(value["errors"], 1);
        assert_eq!(value["warnings"], 1);
        assert_eq!(value["infos"], 0);
        assert_eq!(value["findings"][0]["code"], "GL001");
        assert_eq!(value["findings"][1]["severity"], "warning");
        assert_eq!(value["findings"][1]["location"]["line"], 7);
    }
}
