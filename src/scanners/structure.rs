//! Document-level structure rules.
//!
//! Each rule is a row in [`STRUCTURE_RULES`]: the rule metadata plus a
//! predicate over the loaded bundle that returns one `(message, line)` per
//! violation. Rows are evaluated independently and in table order.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `structure/too-long` | Error | SKILL.md stays under the line ceiling |
//! | `structure/missing-footer` | Error | A `[[BAGAKIT]]` status footer is present |
//! | `structure/footer-no-entries` | Error | The footer lists at least one entry |
//! | `structure/footer-malformed-entry` | Error | Footer entries read `key: field=value; ...` |
//! | `structure/footer-not-last` | Warning | No heading follows the footer |
//! | `structure/missing-standalone` | Error | The skill states it works standalone |
//! | `structure/missing-optional-contract` | Error | Cross-skill interaction is declared as an optional contract |

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{ScanResult, Severity};
use crate::scanners::{RuleInfo, Scanner};
use crate::sections::{is_bullet, SectionIndex, SectionLine};
use regex::Regex;
use std::sync::LazyLock;

const SCANNER: &str = "structure";

/// `- key: field=value; field=value`
static RE_FOOTER_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*+]\s+[\w.-]+\s*:\s*[\w.-]+\s*=[^;]*(?:;\s*[\w.-]+\s*=[^;]*)*;?\s*$")
        .unwrap()
});

type Violation = (String, Option<usize>);

struct StructureRule {
    info: RuleInfo,
    check: fn(&Bundle, &SectionIndex<'_>, &Config) -> Vec<Violation>,
}

static STRUCTURE_RULES: &[StructureRule] = &[
    StructureRule {
        info: RuleInfo {
            id: "structure/too-long",
            severity: Severity::Error,
            scanner: SCANNER,
            message: "SKILL.md exceeds the line ceiling",
            remediation: "Move detail into references/ and keep SKILL.md under the ceiling",
        },
        check: check_length,
    },
    StructureRule {
        info: RuleInfo {
            id: "structure/missing-footer",
            severity: Severity::Error,
            scanner: SCANNER,
            message: "SKILL.md has no status footer anchor",
            remediation: "End SKILL.md with the footer anchor followed by '- key: field=value' lines",
        },
        check: check_footer_present,
    },
    StructureRule {
        info: RuleInfo {
            id: "structure/footer-no-entries",
            severity: Severity::Error,
            scanner: SCANNER,
            message: "Status footer has no entries",
            remediation: "Add at least one '- key: field=value; field=value' line under the anchor",
        },
        check: check_footer_entries,
    },
    StructureRule {
        info: RuleInfo {
            id: "structure/footer-malformed-entry",
            severity: Severity::Error,
            scanner: SCANNER,
            message: "Status footer entry is not in 'key: field=value; ...' form",
            remediation: "Rewrite the entry as '- key: field=value; field=value'",
        },
        check: check_footer_format,
    },
    StructureRule {
        info: RuleInfo {
            id: "structure/footer-not-last",
            severity: Severity::Warning,
            scanner: SCANNER,
            message: "A heading follows the status footer",
            remediation: "Move the status footer to the end of SKILL.md",
        },
        check: check_footer_last,
    },
    StructureRule {
        info: RuleInfo {
            id: "structure/missing-standalone",
            severity: Severity::Error,
            scanner: SCANNER,
            message: "SKILL.md does not state that the skill works standalone",
            remediation: "Add a line such as 'This skill is standalone: it works without other skills installed.'",
        },
        check: check_standalone,
    },
    StructureRule {
        info: RuleInfo {
            id: "structure/missing-optional-contract",
            severity: Severity::Error,
            scanner: SCANNER,
            message: "SKILL.md does not declare cross-skill interaction as an optional contract",
            remediation: "State how other skills may interact through an optional contract (schema or signal), never a hard call",
        },
        check: check_optional_contract,
    },
];

/// Evaluates the [`STRUCTURE_RULES`] table.
pub struct StructureScanner;

impl Scanner for StructureScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "SKILL.md length, status footer, standalone and optional-contract statements"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let descriptor = config.files.descriptor.as_str();
        let index = bundle.sections();
        let diagnostics = STRUCTURE_RULES
            .iter()
            .flat_map(|rule| {
                (rule.check)(bundle, &index, config)
                    .into_iter()
                    .map(move |(message, line)| rule.info.emit(message).at(descriptor, line))
            })
            .collect();
        ScanResult::new(SCANNER, diagnostics, 1)
    }
}

fn check_length(bundle: &Bundle, _: &SectionIndex<'_>, config: &Config) -> Vec<Violation> {
    let count = bundle.descriptor.lines().count();
    let max = config.sections.max_lines;
    if count > max {
        vec![(
            format!("{} is {count} lines; maximum is {max}", config.files.descriptor),
            None,
        )]
    } else {
        vec![]
    }
}

/// The last unfenced line carrying the footer anchor.
fn footer_anchor<'a>(index: &SectionIndex<'a>, config: &Config) -> Option<SectionLine<'a>> {
    let anchor = config.sections.footer_anchor.as_str();
    index
        .body_lines()
        .filter(|l| !l.fenced && l.text.trim_start().starts_with(anchor))
        .last()
}

/// Bullet lines directly under the anchor; blank lines are skipped and the
/// first other line ends the footer.
fn footer_entries<'a>(index: &SectionIndex<'a>, anchor: &SectionLine<'a>) -> Vec<SectionLine<'a>> {
    index
        .body_lines()
        .skip_while(|l| l.number <= anchor.number)
        .filter(|l| !l.text.trim().is_empty())
        .take_while(|l| !l.fenced && is_bullet(l.text))
        .collect()
}

fn check_footer_present(_: &Bundle, index: &SectionIndex<'_>, config: &Config) -> Vec<Violation> {
    match footer_anchor(index, config) {
        Some(_) => vec![],
        None => vec![(
            format!(
                "missing status footer: expected '{}' followed by '- key: field=value; ...' lines",
                config.sections.footer_anchor
            ),
            None,
        )],
    }
}

fn check_footer_entries(_: &Bundle, index: &SectionIndex<'_>, config: &Config) -> Vec<Violation> {
    let Some(anchor) = footer_anchor(index, config) else {
        return vec![];
    };
    if footer_entries(index, &anchor).is_empty() {
        vec![(
            format!("status footer '{}' has no entries", config.sections.footer_anchor),
            Some(anchor.number),
        )]
    } else {
        vec![]
    }
}

fn check_footer_format(_: &Bundle, index: &SectionIndex<'_>, config: &Config) -> Vec<Violation> {
    let Some(anchor) = footer_anchor(index, config) else {
        return vec![];
    };
    footer_entries(index, &anchor)
        .into_iter()
        .filter(|l| !RE_FOOTER_ENTRY.is_match(l.text))
        .map(|l| {
            (
                format!("status footer entry is not 'key: field=value; ...': {}", l.text.trim()),
                Some(l.number),
            )
        })
        .collect()
}

fn check_footer_last(_: &Bundle, index: &SectionIndex<'_>, config: &Config) -> Vec<Violation> {
    let Some(anchor) = footer_anchor(index, config) else {
        return vec![];
    };
    index
        .headings()
        .iter()
        .find(|h| h.index + 1 > anchor.number)
        .map(|h| {
            vec![(
                format!("heading '{}' follows the status footer", h.text),
                Some(h.index + 1),
            )]
        })
        .unwrap_or_default()
}

fn check_standalone(bundle: &Bundle, _: &SectionIndex<'_>, config: &Config) -> Vec<Violation> {
    let hints = &config.sections.standalone_hints;
    if bundle.body_lines().any(|(_, l)| hints.matches(l)) {
        vec![]
    } else {
        vec![(
            "missing explicit standalone design statement".to_string(),
            None,
        )]
    }
}

fn check_optional_contract(
    bundle: &Bundle,
    _: &SectionIndex<'_>,
    config: &Config,
) -> Vec<Violation> {
    let sections = &config.sections;
    let declared = bundle.body_lines().any(|(_, l)| {
        let lower = l.to_lowercase();
        sections.optional_hints.matches_lower(&lower) && sections.contract_hints.matches_lower(&lower)
    });
    if declared {
        vec![]
    } else {
        vec![(
            "missing explicit optional cross-skill contract statement".to_string(),
            None,
        )]
    }
}

/// Returns the [`RuleInfo`] catalogue for every structure rule.
pub fn rules() -> Vec<RuleInfo> {
    STRUCTURE_RULES.iter().map(|r| r.info).collect()
}
