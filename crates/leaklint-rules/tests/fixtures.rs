//! Integration test: built-in rules end-to-end via Analyzer.
//!
//! Fixture files under `tests/fixtures/` mark every expected finding with a
//! trailing `// MATCH /message/` comment (slashes inside the message are
//! escaped as `\/`). Lines without a marker must stay clean.

use leaklint_core::{Analyzer, Finding, Rule};
use leaklint_rules::{ResourceLeak, SharedLogger};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run<R: Rule + 'static>(name: &str, rule: R) -> Vec<Finding> {
    let analyzer = Analyzer::builder()
        .root(fixture(name))
        .rule(rule)
        .fail_on_parse_error(true)
        .build()
        .expect("analyzer should build");
    let result = analyzer.analyze().expect("analysis should succeed");
    assert_eq!(result.files_checked, 1);
    result.findings
}

fn expectations(name: &str) -> Vec<(usize, String)> {
    let content = std::fs::read_to_string(fixture(name)).expect("fixture should exist");
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let start = line.find("// MATCH /")?;
            let body = line[start + "// MATCH /".len()..]
                .trim_end()
                .strip_suffix('/')?;
            Some((idx + 1, body.replace("\\/", "/")))
        })
        .collect()
}

fn assert_matches(name: &str, findings: &[Finding]) {
    let actual: Vec<(usize, String)> = findings
        .iter()
        .map(|f| (f.location.line, f.message.clone()))
        .collect();
    assert_eq!(actual, expectations(name), "findings for {name}");
}

// ── resource-leak ──

#[test]
fn resource_leak_fixture() {
    let findings = run("resource_leak.go", ResourceLeak::new());
    assert_matches("resource_leak.go", &findings);
    assert!(findings
        .iter()
        .all(|f| f.category.as_deref() == Some("resource-management")));
}

#[test]
fn resource_leak_rendered_lines() {
    let findings = run("resource_leak.go", ResourceLeak::new());
    let rendered = findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(rendered, @r#"
    resource_leak.go:22:2: error [GL001] check if the resource is closed: f, err := os.Open("file.txt")
    resource_leak.go:31:2: error [GL001] check if the resource is closed: conn, err := net.Dial("tcp", "example.com:80")
    resource_leak.go:62:2: error [GL001] check if the resource is closed: f, err = os.Create("copy.txt")
    resource_leak.go:64:2: error [GL001] check if the resource is closed: conn, err := net.Dial("tcp", "example.com:80")
    resource_leak.go:76:3: error [GL001] check if the resource is closed: db, err = sql.Open("mysql", "user:password@/dbname")
    resource_leak.go:119:5: error [GL001] check if the resource is closed: f, err := os.Open("file.txt")
    resource_leak.go:128:2: error [GL001] check if the resource is closed: w, _ := os.Create("a.txt")
    resource_leak.go:134:2: error [GL001] check if the resource is closed: bw := bufio.NewWriter(f)
    resource_leak.go:144:2: error [GL001] check if the resource is closed: s.ln, err = net.Listen("tcp", addr)
    "#);
}

#[test]
fn resource_leak_is_deterministic() {
    let first = run("resource_leak.go", ResourceLeak::new());
    let second = run("resource_leak.go", ResourceLeak::new());
    assert_eq!(first, second);
}

#[test]
fn resource_leak_main_package_exemption() {
    // The fixture is not `package main`, so the exemption changes nothing.
    let findings = run(
        "resource_leak.go",
        ResourceLeak::new().exempt_main_package(true),
    );
    assert_eq!(findings.len(), expectations("resource_leak.go").len());
}

// ── shared-logger ──

#[test]
fn shared_logger_fixture() {
    let findings = run("shared_logger.go", SharedLogger::new());
    assert_matches("shared_logger.go", &findings);
}

#[test]
fn shared_logger_alias_fixture() {
    let findings = run("shared_logger_alias.go", SharedLogger::new());
    assert_matches("shared_logger_alias.go", &findings);
}
