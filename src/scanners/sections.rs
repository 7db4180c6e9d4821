//! Required-section rules for the SKILL.md body.
//!
//! Sections are located through [`SectionIndex`], so headings inside fenced
//! code blocks are ignored. Presence and bullet-count checks run for every
//! configured section; the output-routes and archive-gate sections are also
//! checked for internal consistency when present.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `sections/missing-section` | Error | Each required section has a heading |
//! | `sections/too-few-bullets` | Error | Each section reaches its minimum bullet count |
//! | `sections/routes-missing-default` | Error | Output routes name a default route |
//! | `sections/routes-missing-adapter-policy` | Error | Output routes state an adapter policy |
//! | `sections/routes-missing-action-handoff` | Error | Output routes name an action handoff |
//! | `sections/routes-missing-memory-handoff` | Error | Output routes name a memory handoff |
//! | `sections/routes-memory-none-without-rationale` | Error | A `none` memory handoff says why |
//! | `sections/archive-missing-destination` | Error | The archive gate names a destination or evidence |
//! | `sections/archive-missing-action-handoff` | Error | The archive gate names an action-handoff destination |
//! | `sections/archive-missing-memory-handoff` | Error | The archive gate names a memory-handoff destination |
//! | `sections/archive-memory-none-without-rationale` | Error | A `none` memory handoff says why |

use crate::bundle::Bundle;
use crate::config::{Config, HandoffConfig, Keywords, SectionRule};
use crate::diagnostic::{Diagnostic, ScanResult, Severity};
use crate::scanners::{RuleInfo, Scanner};
use crate::sections::Section;

const SCANNER: &str = "sections";

const MISSING_SECTION: RuleInfo = RuleInfo {
    id: "sections/missing-section",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL.md is missing a required section",
    remediation: "Add the section heading (see `init` for the full template)",
};

const TOO_FEW_BULLETS: RuleInfo = RuleInfo {
    id: "sections/too-few-bullets",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Required section has fewer bullet points than required",
    remediation: "Add concrete '- ' bullet items to the section",
};

const ROUTES_MISSING_DEFAULT: RuleInfo = RuleInfo {
    id: "sections/routes-missing-default",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Output routes do not declare a default route",
    remediation: "Add a bullet such as '- Default route: write results to references/'",
};

const ROUTES_MISSING_ADAPTER_POLICY: RuleInfo = RuleInfo {
    id: "sections/routes-missing-adapter-policy",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Output routes do not state an adapter policy",
    remediation: "Name the optional adapters, or state 'Adapters: none'",
};

const ROUTES_MISSING_ACTION_HANDOFF: RuleInfo = RuleInfo {
    id: "sections/routes-missing-action-handoff",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Output routes do not declare an action-handoff output",
    remediation: "Add a bullet such as '- Action handoff: <where follow-up actions go>'",
};

const ROUTES_MISSING_MEMORY_HANDOFF: RuleInfo = RuleInfo {
    id: "sections/routes-missing-memory-handoff",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Output routes do not declare a memory-handoff output",
    remediation: "Add '- Memory handoff: <destination>' or '- Memory handoff: none, because <reason>'",
};

const ROUTES_MEMORY_NONE_WITHOUT_RATIONALE: RuleInfo = RuleInfo {
    id: "sections/routes-memory-none-without-rationale",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Output routes declare no memory handoff without a rationale",
    remediation: "Explain why, e.g. '- Memory handoff: none, because results are ephemeral'",
};

const ARCHIVE_MISSING_DESTINATION: RuleInfo = RuleInfo {
    id: "sections/archive-missing-destination",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Archive gate does not name a destination or evidence",
    remediation: "Add a bullet such as '- Destination: <path or system that keeps the evidence>'",
};

const ARCHIVE_MISSING_ACTION_HANDOFF: RuleInfo = RuleInfo {
    id: "sections/archive-missing-action-handoff",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Archive gate does not name an action-handoff destination",
    remediation: "Add a bullet such as '- Action handoff: <destination>'",
};

const ARCHIVE_MISSING_MEMORY_HANDOFF: RuleInfo = RuleInfo {
    id: "sections/archive-missing-memory-handoff",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Archive gate does not name a memory-handoff destination",
    remediation: "Add '- Memory handoff: <destination>' or '- Memory handoff: none, because <reason>'",
};

const ARCHIVE_MEMORY_NONE_WITHOUT_RATIONALE: RuleInfo = RuleInfo {
    id: "sections/archive-memory-none-without-rationale",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Archive gate declares no memory handoff without a rationale",
    remediation: "Explain why, e.g. '- Memory handoff: none, because nothing outlives the run'",
};

/// Checks required sections and the consistency of the routing sections.
pub struct SectionScanner;

impl Scanner for SectionScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "Required SKILL.md sections, bullet counts, output routes and archive gate"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let descriptor = config.files.descriptor.as_str();
        let index = bundle.sections();
        let s = &config.sections;
        let mut diagnostics = Vec::new();

        let required = [
            &s.workflow,
            &s.when_to_use,
            &s.when_not_to_use,
            &s.fallback,
            &s.output_routes,
            &s.archive_gate,
        ];
        for rule in required {
            match index.find(&rule.headings) {
                None => diagnostics.push(
                    MISSING_SECTION
                        .emit(format!(
                            "{descriptor} missing required section: {}",
                            rule.title
                        ))
                        .at(descriptor, None),
                ),
                Some(section) => check_bullets(&mut diagnostics, &section, rule, descriptor),
            }
        }

        if let Some(section) = index.find(&s.output_routes.headings) {
            check_routes(&mut diagnostics, &section, &config.handoff, descriptor);
        }
        if let Some(section) = index.find(&s.archive_gate.headings) {
            check_archive(&mut diagnostics, &section, &config.handoff, descriptor);
        }

        ScanResult::new(SCANNER, diagnostics, 1)
    }
}

fn check_bullets(
    diagnostics: &mut Vec<Diagnostic>,
    section: &Section<'_>,
    rule: &SectionRule,
    descriptor: &str,
) {
    if rule.min_bullets == 0 || section.has_bullets(rule.min_bullets) {
        return;
    }
    diagnostics.push(
        TOO_FEW_BULLETS
            .emit(format!(
                "section '{}' needs at least {} bullet points, found {}",
                rule.title,
                rule.min_bullets,
                section.bullet_count()
            ))
            .at(descriptor, Some(section.line())),
    );
}

/// Lowercased unfenced lines of a section.
fn section_text(section: &Section<'_>) -> Vec<String> {
    section
        .lines
        .iter()
        .filter(|l| !l.fenced)
        .map(|l| l.text.to_lowercase())
        .collect()
}

fn any_line(lines: &[String], keywords: &Keywords) -> bool {
    lines.iter().any(|l| keywords.matches_lower(l))
}

enum MemoryHandoff {
    Missing,
    NoneWithoutRationale,
    Declared,
}

/// A memory handoff is declared when some memory line names a real
/// destination, or when a `none` line gives a rationale.
fn memory_handoff(lines: &[String], handoff: &HandoffConfig) -> MemoryHandoff {
    let memory: Vec<&String> = lines
        .iter()
        .filter(|l| handoff.memory_handoff_hints.matches_lower(l))
        .collect();
    if memory.is_empty() {
        return MemoryHandoff::Missing;
    }
    let declared = memory.iter().any(|l| {
        !handoff.none_hints.matches_lower(l) || handoff.rationale_hints.matches_lower(l)
    });
    if declared {
        MemoryHandoff::Declared
    } else {
        MemoryHandoff::NoneWithoutRationale
    }
}

fn check_routes(
    diagnostics: &mut Vec<Diagnostic>,
    section: &Section<'_>,
    handoff: &HandoffConfig,
    descriptor: &str,
) {
    let lines = section_text(section);
    let line = Some(section.line());

    if !any_line(&lines, &handoff.default_route_hints) {
        diagnostics.push(
            ROUTES_MISSING_DEFAULT
                .emit("output routes section must declare a default route")
                .at(descriptor, line),
        );
    }

    let adapter_policy = lines.iter().any(|l| {
        handoff.adapter_hints.matches_lower(l)
            && (handoff.optional_hints.matches_lower(l) || handoff.none_hints.matches_lower(l))
    });
    if !adapter_policy {
        diagnostics.push(
            ROUTES_MISSING_ADAPTER_POLICY
                .emit("output routes section must name optional adapters or state that there are none")
                .at(descriptor, line),
        );
    }

    if !any_line(&lines, &handoff.action_handoff_hints) {
        diagnostics.push(
            ROUTES_MISSING_ACTION_HANDOFF
                .emit("output routes section must declare an action-handoff output")
                .at(descriptor, line),
        );
    }

    match memory_handoff(&lines, handoff) {
        MemoryHandoff::Declared => {}
        MemoryHandoff::Missing => diagnostics.push(
            ROUTES_MISSING_MEMORY_HANDOFF
                .emit("output routes section must declare a memory-handoff output or an explicit none with rationale")
                .at(descriptor, line),
        ),
        MemoryHandoff::NoneWithoutRationale => diagnostics.push(
            ROUTES_MEMORY_NONE_WITHOUT_RATIONALE
                .emit("output routes memory handoff is none but gives no rationale")
                .at(descriptor, line),
        ),
    }
}

fn check_archive(
    diagnostics: &mut Vec<Diagnostic>,
    section: &Section<'_>,
    handoff: &HandoffConfig,
    descriptor: &str,
) {
    let lines = section_text(section);
    let line = Some(section.line());

    if !any_line(&lines, &handoff.destination_hints) {
        diagnostics.push(
            ARCHIVE_MISSING_DESTINATION
                .emit("archive gate must name a destination or evidence location")
                .at(descriptor, line),
        );
    }

    if !any_line(&lines, &handoff.action_handoff_hints) {
        diagnostics.push(
            ARCHIVE_MISSING_ACTION_HANDOFF
                .emit("archive gate must name an action-handoff destination")
                .at(descriptor, line),
        );
    }

    match memory_handoff(&lines, handoff) {
        MemoryHandoff::Declared => {}
        MemoryHandoff::Missing => diagnostics.push(
            ARCHIVE_MISSING_MEMORY_HANDOFF
                .emit("archive gate must name a memory-handoff destination or an explicit none with rationale")
                .at(descriptor, line),
        ),
        MemoryHandoff::NoneWithoutRationale => diagnostics.push(
            ARCHIVE_MEMORY_NONE_WITHOUT_RATIONALE
                .emit("archive gate memory handoff is none but gives no rationale")
                .at(descriptor, line),
        ),
    }
}

/// Returns the [`RuleInfo`] catalogue for every section rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![
        MISSING_SECTION,
        TOO_FEW_BULLETS,
        ROUTES_MISSING_DEFAULT,
        ROUTES_MISSING_ADAPTER_POLICY,
        ROUTES_MISSING_ACTION_HANDOFF,
        ROUTES_MISSING_MEMORY_HANDOFF,
        ROUTES_MEMORY_NONE_WITHOUT_RATIONALE,
        ARCHIVE_MISSING_DESTINATION,
        ARCHIVE_MISSING_ACTION_HANDOFF,
        ARCHIVE_MISSING_MEMORY_HANDOFF,
        ARCHIVE_MEMORY_NONE_WITHOUT_RATIONALE,
    ]
}
