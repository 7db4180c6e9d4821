//! File naming rules for the runtime directories.
//!
//! Every file below `scripts/`, `references/`, a legacy reference directory
//! and `agents/` is checked on its own. A file can fail several rules at
//! once; each rule reports at most one diagnostic per file.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `naming/extension-not-allowed` | Warning | Extension is allowed for the directory |
//! | `naming/invalid-characters` | Error | Stem uses lowercase letters, digits, `-`, `_`, `.` |
//! | `naming/generic-stem` | Error | No token of the stem is a generic name (`misc`, `helper`, ...) |
//! | `naming/legacy-term` | Error | No token of the stem marks it as legacy (`legacy`, `old`, ...) |
//! | `naming/underscore` | Warning | Stem prefers hyphens over underscores |

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{ScanResult, Severity};
use crate::scanners::{collect_files, has_extension, relative, RuleInfo, Scanner};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

const SCANNER: &str = "naming";

static RE_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").unwrap());

const EXTENSION_NOT_ALLOWED: RuleInfo = RuleInfo {
    id: "naming/extension-not-allowed",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "File extension is not in the allow-list for its directory",
    remediation: "Use a script extension under scripts/ and a document/data extension elsewhere",
};

const INVALID_CHARACTERS: RuleInfo = RuleInfo {
    id: "naming/invalid-characters",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "File name uses characters outside lowercase letters, digits, '-', '_' and '.'",
    remediation: "Rename the file using lowercase-kebab-case",
};

const GENERIC_STEM: RuleInfo = RuleInfo {
    id: "naming/generic-stem",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "File name is too generic to say what the file contains",
    remediation: "Name the file after its content, e.g. 'release-checklist.md' instead of 'misc.md'",
};

const LEGACY_TERM: RuleInfo = RuleInfo {
    id: "naming/legacy-term",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "File name marks the file as legacy or deprecated",
    remediation: "Delete superseded files instead of shipping them under a legacy name",
};

const UNDERSCORE: RuleInfo = RuleInfo {
    id: "naming/underscore",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "File name uses underscores; hyphens are preferred",
    remediation: "Rename e.g. 'build_index.sh' to 'build-index.sh'",
};

/// Audits file names under every runtime directory that exists.
pub struct NamingScanner;

impl Scanner for NamingScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "File names and extensions under scripts/, references/ and agents/"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let layout = &config.layout;
        let mut diagnostics = Vec::new();
        let mut files_scanned = 0;

        for dir in config.runtime_dirs() {
            let extensions = if dir == layout.scripts_dir {
                &layout.script_extensions
            } else if dir == layout.agents_dir {
                &layout.agent_extensions
            } else {
                &layout.reference_extensions
            };

            let dir_path = bundle.root.join(dir);
            if !dir_path.is_dir() {
                continue;
            }

            for file in collect_files(&dir_path) {
                let shown = relative(&bundle.root, &file);
                let Some(name) = file.file_name().map(|n| n.to_string_lossy().to_string()) else {
                    continue;
                };
                if name.starts_with('.') {
                    continue;
                }
                files_scanned += 1;
                tracing::trace!(file = %shown.display(), "checking file name");

                for (rule, message) in check_file(&file, &name, extensions, config) {
                    diagnostics.push(rule.emit(message).at(shown.as_path(), None));
                }
            }
        }

        ScanResult::new(SCANNER, diagnostics, files_scanned)
    }
}

fn check_file(
    path: &Path,
    name: &str,
    extensions: &[String],
    config: &Config,
) -> Vec<(RuleInfo, String)> {
    let layout = &config.layout;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let mut found = Vec::new();

    if !has_extension(path, extensions) {
        found.push((
            EXTENSION_NOT_ALLOWED,
            format!("file extension not allowed here: {name}"),
        ));
    }

    if !RE_STEM.is_match(&stem) {
        found.push((
            INVALID_CHARACTERS,
            format!("file name has invalid characters: {name}"),
        ));
    }

    let tokens = stem_tokens(&stem);
    if let Some(token) = tokens.iter().find(|t| layout.generic_stems.contains(t)) {
        found.push((
            GENERIC_STEM,
            format!("file name is too generic ('{token}'): {name}"),
        ));
    }
    if let Some(token) = tokens.iter().find(|t| layout.legacy_terms.contains(t)) {
        found.push((
            LEGACY_TERM,
            format!("file name contains legacy term ('{token}'): {name}"),
        ));
    }

    if stem.contains('_') {
        found.push((
            UNDERSCORE,
            format!("prefer hyphens over underscores in file name: {name}"),
        ));
    }

    found
}

/// Splits a stem into lowercase tokens on `-`, `_` and `.`.
///
/// ```
/// use bagakit_skill_maker::scanners::naming::stem_tokens;
///
/// assert_eq!(stem_tokens("Legacy-helper_v2"), vec!["legacy", "helper", "v2"]);
/// ```
pub fn stem_tokens(stem: &str) -> Vec<String> {
    stem.split(['-', '_', '.'])
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Returns the [`RuleInfo`] catalogue for every naming rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![
        EXTENSION_NOT_ALLOWED,
        INVALID_CHARACTERS,
        GENERIC_STEM,
        LEGACY_TERM,
        UNDERSCORE,
    ]
}
