//! JSON output formatter.
//!
//! Produces a pretty-printed JSON document containing the bundle name, the
//! verdict, a severity summary and the ordered diagnostics. The document has
//! no timestamps, so repeated runs over an unchanged bundle are identical.

use crate::diagnostic::{Diagnostic, ValidationReport, Verdict};

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    skill: &'a str,
    tool_version: &'a str,
    verdict: Verdict,
    passed: bool,
    summary: Summary,
    scanners: Vec<ScannerSummary<'a>>,
    diagnostics: &'a [Diagnostic],
}

#[derive(serde::Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
    files_scanned: usize,
}

#[derive(serde::Serialize)]
struct ScannerSummary<'a> {
    name: &'a str,
    diagnostics: usize,
    files_scanned: usize,
}

/// Formats a [`ValidationReport`] as pretty-printed JSON.
pub fn format(report: &ValidationReport) -> serde_json::Result<String> {
    let (errors, warnings) = report.count_by_severity();
    let output = JsonOutput {
        skill: &report.bundle,
        tool_version: env!("CARGO_PKG_VERSION"),
        verdict: report.verdict,
        passed: report.passed,
        summary: Summary {
            errors,
            warnings,
            files_scanned: report.files_scanned,
        },
        scanners: report
            .scanner_results
            .iter()
            .map(|r| ScannerSummary {
                name: &r.scanner_name,
                diagnostics: r.diagnostics.len(),
                files_scanned: r.files_scanned,
            })
            .collect(),
        diagnostics: &report.diagnostics,
    };

    serde_json::to_string_pretty(&output)
}
