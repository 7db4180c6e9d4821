//! Bundle policy scanners.
//!
//! Every scanner implements the [`Scanner`] trait and reads the same loaded
//! [`Bundle`]. Scanners are independent: none of them consults another's
//! output, and each reports every violation it finds instead of stopping at
//! the first.
//!
//! Each scanner module declares its rules as [`RuleInfo`] constants (id,
//! severity, message, remediation) and exposes them through `rules()`.
//! Diagnostics are always produced from one of those rows via
//! [`RuleInfo::emit`], so the catalogue printed by `list-rules` is the
//! complete set of things a run can report.
//!
//! Use [`all_scanners`] to obtain the scanners in execution order and
//! [`all_rules`] to list every rule they define.

pub mod contract;
pub mod coupling;
pub mod frontmatter;
pub mod naming;
pub mod path_literals;
pub mod payload;
pub mod sections;
pub mod structure;

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{Diagnostic, ScanResult, Severity};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A bundle policy scanner.
///
/// # Implementing a custom scanner
///
/// ```rust,ignore
/// use bagakit_skill_maker::scanners::Scanner;
///
/// pub struct MyScanner;
///
/// impl Scanner for MyScanner {
///     fn name(&self) -> &'static str { "my_scanner" }
///     fn description(&self) -> &'static str { "My custom scanner" }
///     fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
///         // ... scanning logic ...
///         # todo!()
///     }
/// }
/// ```
pub trait Scanner {
    /// Returns the scanner's unique identifier (e.g., `"payload"`, `"coupling"`).
    fn name(&self) -> &'static str;

    /// Returns a short, human-readable description of the scanner.
    fn description(&self) -> &'static str;

    /// Executes the scanner against a loaded bundle.
    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult;
}

/// Returns every registered [`Scanner`] in execution order.
///
/// The order is the order diagnostics appear in the report.
pub fn all_scanners() -> Vec<Box<dyn Scanner>> {
    vec![
        Box::new(frontmatter::FrontmatterScanner),
        Box::new(payload::PayloadScanner),
        Box::new(structure::StructureScanner),
        Box::new(sections::SectionScanner),
        Box::new(naming::NamingScanner),
        Box::new(path_literals::PathLiteralScanner),
        Box::new(coupling::CouplingScanner),
        Box::new(contract::ContractScanner),
    ]
}

/// Metadata for a single validation rule.
///
/// Returned by [`all_rules`] and used by the `list-rules` and `explain`
/// CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., `"payload/duplicate-include"`).
    pub id: &'static str,
    pub severity: Severity,
    /// Scanner that detects this rule.
    pub scanner: &'static str,
    /// Short description of what the rule checks.
    pub message: &'static str,
    /// Guidance on how to fix a violation.
    pub remediation: &'static str,
}

impl RuleInfo {
    /// Builds a diagnostic for this rule with a run-specific message.
    pub fn emit(&self, message: impl Into<String>) -> Diagnostic {
        let diagnostic = match self.severity {
            Severity::Error => Diagnostic::error(self.scanner, self.id, message),
            Severity::Warning => Diagnostic::warning(self.scanner, self.id, message),
        };
        diagnostic.with_remediation(self.remediation)
    }
}

/// Aggregates [`RuleInfo`] from every scanner module.
pub fn all_rules() -> Vec<RuleInfo> {
    let mut rules = vec![crate::bundle::MISSING_FILE, crate::bundle::UNREADABLE_DESCRIPTOR];
    rules.extend(frontmatter::rules());
    rules.extend(payload::rules());
    rules.extend(structure::rules());
    rules.extend(sections::rules());
    rules.extend(naming::rules());
    rules.extend(path_literals::rules());
    rules.extend(coupling::rules());
    rules.extend(contract::rules());
    rules
}

/// Recursively collects regular files under `path`, sorted by path.
///
/// Entries are visited in file-name order so the result does not depend on
/// filesystem iteration order. A missing `path` yields an empty list; a
/// regular file yields itself.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

/// Returns `true` if the lowercased extension of `path` is in `extensions`.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

/// Renders `path` relative to the bundle root with forward slashes.
pub fn relative(root: &Path, path: &Path) -> PathBuf {
    let rel = path.strip_prefix(root).unwrap_or(path);
    PathBuf::from(rel.to_string_lossy().replace('\\', "/"))
}
