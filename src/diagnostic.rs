//! Diagnostic and report types shared by every scanner.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks a passing verdict.
    Error,
    /// Advisory only.
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single policy violation or style hint.
///
/// `file` is always relative to the bundle root so that output does not
/// depend on where the bundle lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub scanner: String,
    pub remediation: Option<String>,
}

impl Diagnostic {
    pub fn error(scanner: &str, rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(scanner, rule_id, Severity::Error, message)
    }

    pub fn warning(scanner: &str, rule_id: &str, message: impl Into<String>) -> Self {
        Self::new(scanner, rule_id, Severity::Warning, message)
    }

    fn new(scanner: &str, rule_id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            rule_id: rule_id.to_string(),
            severity,
            message: message.into(),
            file: None,
            line: None,
            scanner: scanner.to_string(),
            remediation: None,
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: Option<usize>) -> Self {
        self.file = Some(file.into());
        self.line = line;
        self
    }

    pub fn with_remediation(mut self, remediation: &str) -> Self {
        self.remediation = Some(remediation.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Location prefix used by the text reporter (`SKILL.md:12`).
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(f), Some(l)) => Some(format!("{}:{}", f.display(), l)),
            (Some(f), None) => Some(f.display().to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(loc) => write!(f, "{loc}: {} [{}]", self.message, self.rule_id),
            None => write!(f, "{} [{}]", self.message, self.rule_id),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanResult {
    pub scanner_name: String,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
}

impl ScanResult {
    pub fn new(name: &str, diagnostics: Vec<Diagnostic>, files_scanned: usize) -> Self {
        ScanResult {
            scanner_name: name.to_string(),
            diagnostics,
            files_scanned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Warning,
    Failed,
}

/// Outcome of one validation run over one bundle.
///
/// Diagnostics keep scanner execution order, and within a scanner the order
/// in which the scanner emitted them, so repeated runs over an unchanged
/// bundle produce identical output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationReport {
    pub bundle: String,
    pub verdict: Verdict,
    pub passed: bool,
    pub files_scanned: usize,
    pub scanner_results: Vec<ScanResult>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn from_results(bundle: &str, results: Vec<ScanResult>, strict: bool) -> Self {
        let files_scanned = results.iter().map(|r| r.files_scanned).sum();
        let diagnostics: Vec<Diagnostic> = results
            .iter()
            .flat_map(|r| r.diagnostics.iter().cloned())
            .collect();

        let verdict = compute_verdict(&diagnostics, strict);
        ValidationReport {
            bundle: bundle.to_string(),
            verdict,
            passed: verdict != Verdict::Failed,
            files_scanned,
            scanner_results: results,
            diagnostics,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Returns `(errors, warnings)` in a single pass.
    pub fn count_by_severity(&self) -> (usize, usize) {
        self.diagnostics
            .iter()
            .fold((0, 0), |(e, w), d| match d.severity {
                Severity::Error => (e + 1, w),
                Severity::Warning => (e, w + 1),
            })
    }

    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.diagnostics.iter().any(|d| d.rule_id == rule_id)
    }
}

fn compute_verdict(diagnostics: &[Diagnostic], strict: bool) -> Verdict {
    let (has_errors, has_warnings) =
        diagnostics
            .iter()
            .fold((false, false), |(e, w), d| match d.severity {
                Severity::Error => (true, w),
                Severity::Warning => (e, true),
            });

    if has_errors {
        Verdict::Failed
    } else if has_warnings {
        if strict {
            Verdict::Failed
        } else {
            Verdict::Warning
        }
    } else {
        Verdict::Passed
    }
}
