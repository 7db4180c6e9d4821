//! Machine-specific absolute path literals.
//!
//! Targets are SKILL.md plus every file the manifest ships. When the
//! manifest could not be loaded, the runtime directories are scanned instead.
//! Only text-like extensions are read, and files that are not valid UTF-8
//! are skipped silently.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `paths/absolute-path` | Error | No POSIX (`/home/...`) or Windows (`C:\...`) absolute path literals |

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{ScanResult, Severity};
use crate::scanners::payload::{escapes_bundle, normalize_entry};
use crate::scanners::{collect_files, has_extension, relative, RuleInfo, Scanner};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

const SCANNER: &str = "paths";

const ABSOLUTE_PATH: RuleInfo = RuleInfo {
    id: "paths/absolute-path",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Absolute machine-specific path literal",
    remediation: "Use a path relative to the bundle root, or a placeholder such as <skill-dir>/",
};

struct PathPattern {
    kind: &'static str,
    regex: &'static LazyLock<Regex>,
}

// POSIX roots that only exist on a particular machine.
static RE_POSIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:^|[\s"'`(=:,\[<])(/(?:home|Users|tmp|var|etc|opt|usr|mnt|media|root|private|Volumes|srv)/[^\s"'`)\]>,;]*)"#,
    )
    .unwrap()
});

// Drive-letter paths; `scheme://` URLs do not match because of the second slash.
static RE_WINDOWS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^A-Za-z0-9_])([A-Za-z]:(?:\\|/[^/\s])[^\s"'`)\]>,;]*)"#).unwrap()
});

static PATH_PATTERNS: &[PathPattern] = &[
    PathPattern {
        kind: "posix",
        regex: &RE_POSIX,
    },
    PathPattern {
        kind: "windows",
        regex: &RE_WINDOWS,
    },
];

/// Flags lines that embed an absolute path from one particular machine.
pub struct PathLiteralScanner;

impl Scanner for PathLiteralScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "Absolute POSIX and Windows path literals in shipped text files"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let mut diagnostics = Vec::new();
        let targets = scan_targets(bundle, config);

        for path in &targets {
            let Ok(content) = std::fs::read_to_string(path) else {
                tracing::trace!(file = %path.display(), "skipping non-text file");
                continue;
            };
            let shown = relative(&bundle.root, path);

            for (idx, line) in content.lines().enumerate() {
                if let Some((kind, literal)) = find_absolute_path(line) {
                    diagnostics.push(
                        ABSOLUTE_PATH
                            .emit(format!("absolute {kind} path literal: {literal}"))
                            .at(shown.clone(), Some(idx + 1)),
                    );
                }
            }
        }

        ScanResult::new(SCANNER, diagnostics, targets.len())
    }
}

/// Returns the first absolute path literal in `line` with its kind
/// (`"posix"` or `"windows"`).
///
/// ```
/// use bagakit_skill_maker::scanners::path_literals::find_absolute_path;
///
/// assert_eq!(
///     find_absolute_path("see /home/alice/project/file.md"),
///     Some(("posix", "/home/alice/project/file.md"))
/// );
/// assert_eq!(find_absolute_path("see ./relative/file.md"), None);
/// assert_eq!(find_absolute_path("https://example.com/home/x"), None);
/// ```
pub fn find_absolute_path(line: &str) -> Option<(&'static str, &str)> {
    PATH_PATTERNS.iter().find_map(|pattern| {
        pattern
            .regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| (pattern.kind, m.as_str()))
    })
}

/// SKILL.md followed by the shipped files, de-duplicated, text-like only.
fn scan_targets(bundle: &Bundle, config: &Config) -> Vec<PathBuf> {
    let mut roots = vec![bundle.root.join(&config.files.descriptor)];
    match bundle.include() {
        Some(include) => roots.extend(
            include
                .iter()
                .map(|e| normalize_entry(e))
                .filter(|e| !e.is_empty() && !escapes_bundle(e))
                .map(|e| bundle.root.join(e)),
        ),
        None => roots.extend(config.runtime_dirs().into_iter().map(|d| bundle.root.join(d))),
    }

    let mut targets: Vec<PathBuf> = Vec::new();
    for root in roots {
        for file in collect_files(&root) {
            if has_extension(&file, &config.layout.text_extensions) && !targets.contains(&file) {
                targets.push(file);
            }
        }
    }
    targets
}

/// Returns the [`RuleInfo`] catalogue for every path-literal rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![ABSOLUTE_PATH]
}
