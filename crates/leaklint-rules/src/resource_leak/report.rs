//! Findings for unreleased acquisition sites.

use leaklint_core::syntax::squash_whitespace;
use leaklint_core::{FileContext, Finding, Severity, SourceTree, Suggestion, MAX_CONFIDENCE};

use super::opener::AcquisitionSite;
use super::{CATEGORY, CODE, NAME};

/// Builds the finding for one site, echoing the acquiring statement.
#[must_use]
pub fn leak_finding(
    ctx: &FileContext,
    tree: &SourceTree<'_>,
    site: &AcquisitionSite<'_>,
    severity: Severity,
) -> Finding {
    let statement = squash_whitespace(tree.text(site.statement));
    let location = tree.location(ctx.relative_path.clone(), site.statement);

    let finding = Finding::new(
        CODE,
        NAME,
        severity,
        location,
        format!("check if the resource is closed: {statement}"),
    )
    .with_category(CATEGORY)
    .with_confidence(MAX_CONFIDENCE);

    match site.binding {
        Some(var) => finding.with_suggestion(Suggestion::new(format!(
            "add 'defer {var}.Close()' once the acquisition has succeeded"
        ))),
        None => finding,
    }
}
