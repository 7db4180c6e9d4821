//! SKILL_PAYLOAD.json manifest rules.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `payload/invalid-manifest` | Error | Manifest is readable JSON with an object root |
//! | `payload/include-not-string-array` | Error | `include` is an array of strings |
//! | `payload/version-invalid` | Error | `version` is a positive integer |
//! | `payload/version-missing` | Warning | `version` is declared |
//! | `payload/duplicate-include` | Error | `include` entries are unique |
//! | `payload/missing-descriptor` | Error | `include` lists SKILL.md |
//! | `payload/forbidden-include` | Error | `include` never lists README.md |
//! | `payload/empty-entry` | Error | No empty `include` entries |
//! | `payload/escapes-bundle` | Error | Entries are relative and stay inside the bundle |
//! | `payload/path-missing` | Error | Every entry exists on disk |
//! | `payload/dir-not-included` | Warning | Runtime directories on disk are listed |
//! | `payload/dir-missing` | Error | Listed runtime directories exist |
//! | `payload/legacy-reference-dir` | Warning | Reference material uses the canonical directory name |

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{Diagnostic, ScanResult, Severity};
use crate::manifest::ManifestIssue;
use crate::scanners::{RuleInfo, Scanner};

const SCANNER: &str = "payload";

const INVALID_MANIFEST: RuleInfo = RuleInfo {
    id: "payload/invalid-manifest",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json is missing, unreadable, not JSON, or not a JSON object",
    remediation: "Write SKILL_PAYLOAD.json as {\"version\": 1, \"include\": [\"SKILL.md\", ...]}",
};

const INCLUDE_NOT_STRING_ARRAY: RuleInfo = RuleInfo {
    id: "payload/include-not-string-array",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json include must be an array of strings",
    remediation: "Set include to a JSON array of relative path strings",
};

const VERSION_INVALID: RuleInfo = RuleInfo {
    id: "payload/version-invalid",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json version must be a positive integer",
    remediation: "Set \"version\": 1",
};

const VERSION_MISSING: RuleInfo = RuleInfo {
    id: "payload/version-missing",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json does not declare a version",
    remediation: "Add \"version\": 1 to the manifest",
};

const DUPLICATE_INCLUDE: RuleInfo = RuleInfo {
    id: "payload/duplicate-include",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json include has duplicate entries",
    remediation: "List each shipped path once",
};

const MISSING_DESCRIPTOR: RuleInfo = RuleInfo {
    id: "payload/missing-descriptor",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json include must contain SKILL.md",
    remediation: "Add \"SKILL.md\" to include",
};

const FORBIDDEN_INCLUDE: RuleInfo = RuleInfo {
    id: "payload/forbidden-include",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json include lists a forbidden legacy file (README.md)",
    remediation: "Remove README.md from include; the description belongs in SKILL.md",
};

const EMPTY_ENTRY: RuleInfo = RuleInfo {
    id: "payload/empty-entry",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL_PAYLOAD.json include has an empty entry",
    remediation: "Remove empty strings from include",
};

const ESCAPES_BUNDLE: RuleInfo = RuleInfo {
    id: "payload/escapes-bundle",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Payload path must stay inside the bundle (no absolute paths or '..')",
    remediation: "Use paths relative to the bundle root without '..' segments",
};

const PATH_MISSING: RuleInfo = RuleInfo {
    id: "payload/path-missing",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Payload path is missing on disk",
    remediation: "Create the file or remove it from include",
};

const DIR_NOT_INCLUDED: RuleInfo = RuleInfo {
    id: "payload/dir-not-included",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "Runtime directory exists but is not included in the payload",
    remediation: "Add the directory to include, or delete it if it should not ship",
};

const DIR_MISSING: RuleInfo = RuleInfo {
    id: "payload/dir-missing",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Payload includes a runtime directory that does not exist",
    remediation: "Create the directory or remove it from include",
};

const LEGACY_REFERENCE_DIR: RuleInfo = RuleInfo {
    id: "payload/legacy-reference-dir",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "Reference material lives under a legacy directory name",
    remediation: "Move the files to references/ and update include",
};

/// Cross-checks the manifest against itself and the files on disk.
pub struct PayloadScanner;

impl Scanner for PayloadScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "SKILL_PAYLOAD.json schema and include entries vs. files on disk"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let manifest_name = config.files.manifest.as_str();
        let mut diagnostics = Vec::new();

        match &bundle.manifest {
            Err(e) => diagnostics.push(INVALID_MANIFEST.emit(e.to_string()).at(manifest_name, None)),
            Ok(loaded) => {
                for issue in &loaded.issues {
                    diagnostics.push(issue_diagnostic(issue, manifest_name));
                }
                if let Some(include) = &loaded.manifest.include {
                    check_include(&mut diagnostics, bundle, config, include);
                }
            }
        }

        for legacy in &config.layout.legacy_reference_dirs {
            if bundle.root.join(legacy).is_dir() {
                diagnostics.push(
                    LEGACY_REFERENCE_DIR
                        .emit(format!(
                            "legacy reference directory '{legacy}/' found; rename it to '{}/'",
                            config.layout.reference_dir
                        ))
                        .at(legacy.as_str(), None),
                );
            }
        }

        ScanResult::new(SCANNER, diagnostics, 1)
    }
}

fn issue_diagnostic(issue: &ManifestIssue, manifest_name: &str) -> Diagnostic {
    let diagnostic = match issue {
        ManifestIssue::IncludeNotStringArray => INCLUDE_NOT_STRING_ARRAY
            .emit(format!("{manifest_name} include must be an array of strings")),
        ManifestIssue::InvalidVersion(raw) => VERSION_INVALID.emit(format!(
            "{manifest_name} version must be a positive integer, found {raw}"
        )),
        ManifestIssue::MissingVersion => {
            VERSION_MISSING.emit(format!("{manifest_name} does not declare a version"))
        }
    };
    diagnostic.at(manifest_name, None)
}

fn check_include(
    diagnostics: &mut Vec<Diagnostic>,
    bundle: &Bundle,
    config: &Config,
    include: &[String],
) {
    let manifest_name = config.files.manifest.as_str();
    let normalized: Vec<String> = include.iter().map(|e| normalize_entry(e)).collect();

    // Unique entries in first-seen order, plus the ones that repeat.
    let mut unique: Vec<&str> = Vec::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for entry in &normalized {
        if unique.contains(&entry.as_str()) {
            if !duplicates.contains(&entry.as_str()) {
                duplicates.push(entry);
            }
        } else {
            unique.push(entry);
        }
    }

    if !duplicates.is_empty() {
        diagnostics.push(
            DUPLICATE_INCLUDE
                .emit(format!(
                    "{manifest_name} include has duplicate entries: {}",
                    duplicates.join(", ")
                ))
                .at(manifest_name, None),
        );
    }

    let descriptor = config.files.descriptor.as_str();
    if !unique.contains(&descriptor) {
        diagnostics.push(
            MISSING_DESCRIPTOR
                .emit(format!("{manifest_name} include must contain {descriptor}"))
                .at(manifest_name, None),
        );
    }

    for forbidden in &config.files.forbidden_includes {
        if unique.contains(&forbidden.as_str()) {
            diagnostics.push(
                FORBIDDEN_INCLUDE
                    .emit(format!("{manifest_name} include must not contain {forbidden}"))
                    .at(manifest_name, None),
            );
        }
    }

    let runtime_dirs = config.runtime_dirs();
    for entry in &unique {
        if entry.is_empty() {
            diagnostics.push(
                EMPTY_ENTRY
                    .emit(format!("{manifest_name} include has an empty entry"))
                    .at(manifest_name, None),
            );
            continue;
        }
        if escapes_bundle(entry) {
            diagnostics.push(
                ESCAPES_BUNDLE
                    .emit(format!("payload path must stay inside the bundle: {entry}"))
                    .at(manifest_name, None),
            );
            continue;
        }
        if runtime_dirs.contains(entry) {
            continue;
        }
        if !bundle.root.join(entry).exists() {
            diagnostics.push(
                PATH_MISSING
                    .emit(format!("payload path missing on disk: {entry}"))
                    .at(manifest_name, None),
            );
        }
    }

    for dir in runtime_dirs {
        let exists = bundle.root.join(dir).exists();
        let listed = unique.contains(&dir);
        if exists && !listed {
            diagnostics.push(
                DIR_NOT_INCLUDED
                    .emit(format!("directory exists but not included in payload: {dir}"))
                    .at(manifest_name, None),
            );
        }
        if listed && !exists {
            diagnostics.push(
                DIR_MISSING
                    .emit(format!("payload includes missing directory: {dir}"))
                    .at(manifest_name, None),
            );
        }
    }
}

/// Strips a leading `./` and trailing separators so `./scripts/` and
/// `scripts` compare equal. A bare root (`/`, `\`) is kept as is.
///
/// ```
/// use bagakit_skill_maker::scanners::payload::normalize_entry;
///
/// assert_eq!(normalize_entry("./scripts/"), "scripts");
/// assert_eq!(normalize_entry("/"), "/");
/// ```
pub fn normalize_entry(entry: &str) -> String {
    let mut e = entry.trim();
    while let Some(rest) = e.strip_prefix("./") {
        e = rest;
    }
    match e.trim_end_matches(['/', '\\']) {
        "" => e.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Returns `true` for absolute paths (POSIX root, UNC/backslash root, drive
/// letter) and for any path with a `..` segment.
///
/// ```
/// use bagakit_skill_maker::scanners::payload::escapes_bundle;
///
/// assert!(escapes_bundle("../shared/SKILL.md"));
/// assert!(escapes_bundle("scripts/../../etc"));
/// assert!(escapes_bundle("/etc/passwd"));
/// assert!(escapes_bundle("C:\\tools"));
/// assert!(!escapes_bundle("references/..notes.md"));
/// ```
pub fn escapes_bundle(entry: &str) -> bool {
    let bytes = entry.as_bytes();
    let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    entry.starts_with('/')
        || entry.starts_with('\\')
        || drive
        || entry.split(['/', '\\']).any(|seg| seg == "..")
}

/// Returns the [`RuleInfo`] catalogue for every manifest rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![
        INVALID_MANIFEST,
        INCLUDE_NOT_STRING_ARRAY,
        VERSION_INVALID,
        VERSION_MISSING,
        DUPLICATE_INCLUDE,
        MISSING_DESCRIPTOR,
        FORBIDDEN_INCLUDE,
        EMPTY_ENTRY,
        ESCAPES_BUNDLE,
        PATH_MISSING,
        DIR_NOT_INCLUDED,
        DIR_MISSING,
        LEGACY_REFERENCE_DIR,
    ]
}
