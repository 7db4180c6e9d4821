//! Line-oriented text formatter.
//!
//! Every warning is written to stdout as `warn: ...`, then every error to
//! stderr as `error: ...`. A run without blocking diagnostics ends with
//! `ok: skill validation passed` and, if there were warnings,
//! `warn_count=<n>`.

use super::Rendered;
use crate::diagnostic::{ValidationReport, Verdict};
use colored::Colorize;

pub fn format(report: &ValidationReport, color: bool) -> Rendered {
    let mut out = Rendered::default();
    let (errors, warnings) = report.count_by_severity();

    let warn_tag = tag("warn", color, |s| s.yellow().bold().to_string());
    let error_tag = tag("error", color, |s| s.red().bold().to_string());

    for diagnostic in report.warnings() {
        out.stdout.push_str(&format!("{warn_tag}: {diagnostic}\n"));
    }
    for diagnostic in report.errors() {
        out.stderr.push_str(&format!("{error_tag}: {diagnostic}\n"));
    }

    match report.verdict {
        Verdict::Failed if errors == 0 => {
            out.stderr.push_str(&format!(
                "{error_tag}: strict mode: {warnings} warning(s) treated as errors\n"
            ));
        }
        Verdict::Failed => {}
        Verdict::Passed | Verdict::Warning => {
            let ok = tag("ok", color, |s| s.green().bold().to_string());
            out.stdout.push_str(&format!("{ok}: skill validation passed\n"));
            if warnings > 0 {
                out.stdout.push_str(&format!("warn_count={warnings}\n"));
            }
        }
    }

    out
}

fn tag(label: &str, color: bool, paint: impl Fn(&str) -> String) -> String {
    if color {
        paint(label)
    } else {
        label.to_string()
    }
}
