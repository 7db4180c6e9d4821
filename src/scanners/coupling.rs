//! Cross-skill coupling rules.
//!
//! Skills may mention each other descriptively or through a declared
//! optional contract. What they must not do is encode a mandatory invocation
//! of another skill. Every SKILL.md line is checked on its own:
//!
//! - a line naming another `bagakit-*` skill together with a coupling word
//!   (`requires`, `depends`, `must`, `bash`, ...) is a hard dependency;
//! - a line naming another skill's runtime path (`.bagakit/...` or
//!   `bagakit-x/scripts/...`) together with an execution verb is a hard call.
//!
//! Either rule is waived when the same line carries an optional-contract
//! word (`optional`, `schema`, `contract`, `signal`, ...). The skill's own
//! name and the configured non-skill tokens are never treated as references.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `coupling/hard-dependency` | Error | No mandatory dependency on another skill |
//! | `coupling/hard-call` | Error | No direct execution of another skill's runtime files |

use crate::bundle::Bundle;
use crate::config::{Config, CouplingConfig};
use crate::diagnostic::{ScanResult, Severity};
use crate::scanners::{RuleInfo, Scanner};
use regex::Regex;

const SCANNER: &str = "coupling";

const HARD_DEPENDENCY: RuleInfo = RuleInfo {
    id: "coupling/hard-dependency",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Line makes another skill a mandatory dependency",
    remediation: "Describe the interaction as an optional contract (schema or signal) the other skill may honor",
};

const HARD_CALL: RuleInfo = RuleInfo {
    id: "coupling/hard-call",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "Line directly executes another skill's runtime files",
    remediation: "Exchange data through an optional contract instead of running another skill's scripts",
};

/// Runtime directories that identify a path into another skill.
const RUNTIME_SUBDIRS: &str = "scripts|references|docs|agents";

/// Detects hard dependencies and hard calls into other skills.
pub struct CouplingScanner;

impl Scanner for CouplingScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "Mandatory dependencies on, and direct calls into, other skills"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let descriptor = config.files.descriptor.as_str();
        let coupling = &config.coupling;
        let (token_re, path_re) = match build_patterns(coupling) {
            Ok(patterns) => patterns,
            Err(e) => {
                tracing::warn!(prefix = %coupling.prefix, error = %e, "invalid skill prefix, coupling scan skipped");
                return ScanResult::new(SCANNER, Vec::new(), 0);
            }
        };
        let own = bundle.own_name();
        let mut diagnostics = Vec::new();

        for (idx, line) in bundle.descriptor.lines().enumerate() {
            let lower = line.to_lowercase();
            if coupling.optional_hints.matches_lower(&lower) {
                continue;
            }
            let number = Some(idx + 1);

            let others = other_skills(&token_re, &lower, &own, coupling);
            if !others.is_empty() && coupling.coupling_hints.matches_lower(&lower) {
                diagnostics.push(
                    HARD_DEPENDENCY
                        .emit(format!(
                            "hard dependency on other skill(s): {}; declare an optional contract instead",
                            others.join(", ")
                        ))
                        .at(descriptor, number),
                );
            }

            if let Some(path) = foreign_runtime_path(&path_re, &lower, &own, coupling) {
                if coupling.exec_verbs.matches_lower(&lower) {
                    diagnostics.push(
                        HARD_CALL
                            .emit(format!("direct hard call into another skill's runtime path: {path}"))
                            .at(descriptor, number),
                    );
                }
            }
        }

        ScanResult::new(SCANNER, diagnostics, 1)
    }
}

fn build_patterns(coupling: &CouplingConfig) -> Result<(Regex, Regex), regex::Error> {
    let prefix = regex::escape(&coupling.prefix);
    let token = Regex::new(&format!(
        r"(?:^|[^a-z0-9_.-])({prefix}[a-z0-9]+(?:-[a-z0-9]+)*)"
    ))?;
    let path = Regex::new(&format!(
        r"(?:^|[^a-z0-9_.-])({prefix}[a-z0-9]+(?:-[a-z0-9]+)*)/(?:{RUNTIME_SUBDIRS})/"
    ))?;
    Ok((token, path))
}

fn is_exempt(token: &str, own: &str, coupling: &CouplingConfig) -> bool {
    token == own || coupling.non_bundle_tokens.iter().any(|t| t == token)
}

/// Distinct references to other skills on a lowercased line, in order.
fn other_skills(token_re: &Regex, lower: &str, own: &str, coupling: &CouplingConfig) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for caps in token_re.captures_iter(lower) {
        let token = &caps[1];
        if !is_exempt(token, own, coupling) && !found.iter().any(|f| f == token) {
            found.push(token.to_string());
        }
    }
    found
}

/// The first path on the line that points into another skill's files.
fn foreign_runtime_path(
    path_re: &Regex,
    lower: &str,
    own: &str,
    coupling: &CouplingConfig,
) -> Option<String> {
    if !coupling.shared_runtime_dir.is_empty() && lower.contains(&coupling.shared_runtime_dir) {
        return Some(coupling.shared_runtime_dir.clone());
    }
    path_re
        .captures_iter(lower)
        .filter_map(|caps| caps.get(1))
        .find(|m| !is_exempt(m.as_str(), own, coupling))
        .map(|m| format!("{}/", m.as_str()))
}

/// Returns the [`RuleInfo`] catalogue for every coupling rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![HARD_DEPENDENCY, HARD_CALL]
}
