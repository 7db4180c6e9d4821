//! SKILL.md header validation.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `frontmatter/missing-opening` | Error | Document opens with a `---` header block |
//! | `frontmatter/unclosed` | Error | Header block is closed with `---` |
//! | `frontmatter/malformed-line` | Error | Every header line is `key: value` |
//! | `frontmatter/unsupported-keys` | Error | Only `name` and `description` are allowed |
//! | `frontmatter/name-missing` | Error | `name` is present |
//! | `frontmatter/name-invalid` | Error | `name` is lowercase-kebab-case, ≤ 64 chars |
//! | `frontmatter/description-missing` | Error | `description` is present |
//! | `frontmatter/description-placeholder` | Error | `description` is not template text |
//! | `frontmatter/description-no-trigger` | Warning | `description` says when to use the skill |
//! | `frontmatter/description-too-short` | Warning | `description` reaches a minimum length |

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{Diagnostic, ScanResult, Severity};
use crate::header::HeaderIssue;
use crate::scanners::{RuleInfo, Scanner};
use regex::Regex;
use std::sync::LazyLock;

const SCANNER: &str = "frontmatter";

/// Lowercase letters, digits and inner hyphens; 1 to 64 characters.
pub static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,62}[a-z0-9])?$").unwrap());

const MISSING_OPENING: RuleInfo = RuleInfo {
    id: "frontmatter/missing-opening",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL.md must start with YAML frontmatter ('---')",
    remediation: "Open SKILL.md with a '---' line, the name/description keys, and a closing '---'",
};

const UNCLOSED: RuleInfo = RuleInfo {
    id: "frontmatter/unclosed",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL.md frontmatter is not closed with '---'",
    remediation: "Add a '---' line after the last frontmatter key",
};

const MALFORMED_LINE: RuleInfo = RuleInfo {
    id: "frontmatter/malformed-line",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Frontmatter line has no 'key: value' separator",
    remediation: "Write each frontmatter line as 'key: value'",
};

const UNSUPPORTED_KEYS: RuleInfo = RuleInfo {
    id: "frontmatter/unsupported-keys",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Frontmatter has keys outside the allowed set",
    remediation: "Keep only 'name' and 'description' in the frontmatter",
};

const NAME_MISSING: RuleInfo = RuleInfo {
    id: "frontmatter/name-missing",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Frontmatter is missing the 'name' key",
    remediation: "Add 'name: <hyphen-case-name>' to the frontmatter",
};

const NAME_INVALID: RuleInfo = RuleInfo {
    id: "frontmatter/name-invalid",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Frontmatter name is not lowercase letters/digits/hyphens (max 64 chars)",
    remediation: "Rename to lowercase-kebab-case, e.g. 'bagakit-release-notes'",
};

const DESCRIPTION_MISSING: RuleInfo = RuleInfo {
    id: "frontmatter/description-missing",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Frontmatter is missing the 'description' key",
    remediation: "Add a description of what the skill does and when to use it",
};

const DESCRIPTION_PLACEHOLDER: RuleInfo = RuleInfo {
    id: "frontmatter/description-placeholder",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Frontmatter description still looks like placeholder text",
    remediation: "Replace the scaffolded TODO description with real content",
};

const DESCRIPTION_NO_TRIGGER: RuleInfo = RuleInfo {
    id: "frontmatter/description-no-trigger",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "Description does not say when to use the skill",
    remediation: "Append 'Use when <specific trigger condition>.' to the description",
};

const DESCRIPTION_TOO_SHORT: RuleInfo = RuleInfo {
    id: "frontmatter/description-too-short",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "Description is too short to select the skill reliably",
    remediation: "Describe both what the skill does and the situations that should trigger it",
};

/// Validates the parsed header of the descriptor document.
pub struct FrontmatterScanner;

impl Scanner for FrontmatterScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "SKILL.md frontmatter keys, name and description"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let descriptor = config.files.descriptor.as_str();
        let parsed = &bundle.header;
        let header = &parsed.header;
        let mut diagnostics = Vec::new();

        for issue in &parsed.issues {
            diagnostics.push(match issue {
                HeaderIssue::MissingOpening => MISSING_OPENING
                    .emit(format!("{descriptor} must start with YAML frontmatter ('---')"))
                    .at(descriptor, Some(1)),
                HeaderIssue::Unclosed => UNCLOSED
                    .emit(format!("{descriptor} frontmatter is not closed with '---'"))
                    .at(descriptor, Some(1)),
                HeaderIssue::MalformedLine { line, text } => MALFORMED_LINE
                    .emit(format!("invalid frontmatter line: {text}"))
                    .at(descriptor, Some(*line)),
            });
        }

        let unknown = header.unknown_keys(&config.header.allowed_keys);
        if !unknown.is_empty() {
            diagnostics.push(
                UNSUPPORTED_KEYS
                    .emit(format!(
                        "frontmatter has unsupported keys: {}",
                        unknown.join(", ")
                    ))
                    .at(descriptor, Some(1)),
            );
        }

        check_name(&mut diagnostics, bundle, descriptor);
        check_description(&mut diagnostics, bundle, config, descriptor);

        ScanResult::new(SCANNER, diagnostics, 1)
    }
}

fn check_name(diagnostics: &mut Vec<Diagnostic>, bundle: &Bundle, descriptor: &str) {
    match bundle.header.header.get("name") {
        Some(entry) if !entry.value.is_empty() => {
            if !RE_NAME.is_match(&entry.value) {
                diagnostics.push(
                    NAME_INVALID
                        .emit(format!(
                            "frontmatter name '{}' is invalid; expected lowercase letters/digits/hyphens, max 64 chars",
                            entry.value
                        ))
                        .at(descriptor, Some(entry.line)),
                );
            }
        }
        other => diagnostics.push(
            NAME_MISSING
                .emit("frontmatter missing required key: name")
                .at(descriptor, other.map(|e| e.line)),
        ),
    }
}

fn check_description(
    diagnostics: &mut Vec<Diagnostic>,
    bundle: &Bundle,
    config: &Config,
    descriptor: &str,
) {
    let (value, line) = match bundle.header.header.get("description") {
        Some(entry) if !entry.value.is_empty() => (entry.value.as_str(), entry.line),
        other => {
            diagnostics.push(
                DESCRIPTION_MISSING
                    .emit("frontmatter missing required key: description")
                    .at(descriptor, other.map(|e| e.line)),
            );
            return;
        }
    };

    // Placeholder text skips the quality hints.
    if config
        .header
        .placeholder_hints
        .iter()
        .any(|hint| value.contains(hint.as_str()))
    {
        diagnostics.push(
            DESCRIPTION_PLACEHOLDER
                .emit("frontmatter description still looks like placeholder text")
                .at(descriptor, Some(line)),
        );
        return;
    }

    if !config.header.trigger_hints.matches(value) {
        diagnostics.push(
            DESCRIPTION_NO_TRIGGER
                .emit("frontmatter description has no trigger wording (e.g. 'Use when ...')")
                .at(descriptor, Some(line)),
        );
    }

    let length = value.chars().count();
    if length < config.header.min_description_chars {
        diagnostics.push(
            DESCRIPTION_TOO_SHORT
                .emit(format!(
                    "frontmatter description is {length} chars; aim for at least {}",
                    config.header.min_description_chars
                ))
                .at(descriptor, Some(line)),
        );
    }
}

/// Returns the [`RuleInfo`] catalogue for every header rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![
        MISSING_OPENING,
        UNCLOSED,
        MALFORMED_LINE,
        UNSUPPORTED_KEYS,
        NAME_MISSING,
        NAME_INVALID,
        DESCRIPTION_MISSING,
        DESCRIPTION_PLACEHOLDER,
        DESCRIPTION_NO_TRIGGER,
        DESCRIPTION_TOO_SHORT,
    ]
}
