//! Validation orchestration.
//!
//! The [`run_validation`] function is the main entry-point for validating a
//! skill bundle. It loads the bundle once, runs every registered
//! [`Scanner`](crate::scanners::Scanner) against it in a fixed order, and
//! produces a [`ValidationReport`].

use crate::bundle::{bundle_label, Bundle};
use crate::config::Config;
use crate::diagnostic::{ScanResult, ValidationReport};
use crate::scanners;
use std::path::Path;

/// Validates the skill bundle rooted at `path`.
///
/// # Pipeline
///
/// 1. Checks that SKILL.md and SKILL_PAYLOAD.json exist. If either is
///    missing the report holds only those errors; this is the one fail-fast
///    path.
/// 2. Runs every scanner from [`scanners::all_scanners`] sequentially and
///    keeps their diagnostics in scanner order.
/// 3. Computes the verdict; with [`StrictConfig`](crate::config::StrictConfig)
///    enabled, warnings fail the run as well.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use bagakit_skill_maker::{config::Config, validate};
///
/// let config = Config::load(None).unwrap();
/// let report = validate::run_validation(Path::new("./my-skill"), &config);
///
/// std::process::exit(if report.passed { 0 } else { 1 });
/// ```
pub fn run_validation(path: &Path, config: &Config) -> ValidationReport {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let label = bundle_label(&resolved);
    let strict = config.strict.enabled;

    let bundle = match Bundle::load(&resolved, config) {
        Ok(bundle) => bundle,
        Err(blocking) => {
            return ValidationReport::from_results(
                &label,
                vec![ScanResult::new("bundle", blocking, 0)],
                strict,
            );
        }
    };

    let mut results: Vec<ScanResult> = Vec::new();
    if !bundle.diagnostics.is_empty() {
        results.push(ScanResult::new("bundle", bundle.diagnostics.clone(), 0));
    }
    results.extend(scanners::all_scanners().iter().map(|scanner| {
        let result = scanner.scan(&bundle, config);
        tracing::debug!(
            scanner = scanner.name(),
            diagnostics = result.diagnostics.len(),
            files = result.files_scanned,
            "scanner finished"
        );
        result
    }));

    ValidationReport::from_results(&label, results, strict)
}
