//! Metadata contract guidance. Warnings only.
//!
//! # Rules
//!
//! | ID | Sev | What it checks |
//! |----|-----|----------------|
//! | `contract/adapter-metadata-key` | Warning | No per-integration metadata keys (`openai_metadata`, ...) outside avoid examples |
//! | `contract/missing-generic-metadata` | Warning | When adapter keys appear, the generic `metadata` + parseable pattern is documented |
//! | `contract/missing-structured-delimiter` | Warning | A "machine-readable" claim names a ```` ```json ```` / ```` ```yaml ```` block |

use crate::bundle::Bundle;
use crate::config::Config;
use crate::diagnostic::{ScanResult, Severity};
use crate::scanners::{RuleInfo, Scanner};

const SCANNER: &str = "contract";

const ADAPTER_METADATA_KEY: RuleInfo = RuleInfo {
    id: "contract/adapter-metadata-key",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "Adapter-specific metadata key used instead of a generic one",
    remediation: "Use one generic 'metadata' key with a parseable (JSON/YAML) value",
};

const MISSING_GENERIC_METADATA: RuleInfo = RuleInfo {
    id: "contract/missing-generic-metadata",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "The generic metadata key with parseable content is not documented",
    remediation: "Document a 'metadata' key whose value is JSON or YAML",
};

const MISSING_STRUCTURED_DELIMITER: RuleInfo = RuleInfo {
    id: "contract/missing-structured-delimiter",
    severity: Severity::Warning,
    scanner: SCANNER,
    message: "Machine-readable output is claimed without a structured block delimiter",
    remediation: "Show the block inside a ```json or ```yaml fence",
};

/// Warns about metadata conventions that do not travel across integrations.
pub struct ContractScanner;

impl Scanner for ContractScanner {
    fn name(&self) -> &'static str {
        SCANNER
    }

    fn description(&self) -> &'static str {
        "Generic metadata keys and structured-block conventions"
    }

    fn scan(&self, bundle: &Bundle, config: &Config) -> ScanResult {
        let descriptor = config.files.descriptor.as_str();
        let contract = &config.contract;
        let lines: Vec<String> = bundle
            .descriptor
            .lines()
            .map(str::to_lowercase)
            .collect();
        let mut diagnostics = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if contract.avoid_hints.matches_lower(line) {
                continue;
            }
            let keys: Vec<&str> = contract
                .adapter_metadata_keys
                .iter()
                .filter(|key| line.contains(key.as_str()))
                .map(String::as_str)
                .collect();
            if !keys.is_empty() {
                diagnostics.push(
                    ADAPTER_METADATA_KEY
                        .emit(format!(
                            "adapter-specific metadata key(s) {}; prefer a generic 'metadata' key",
                            keys.join(", ")
                        ))
                        .at(descriptor, Some(idx + 1)),
                );
            }
        }

        let generic_documented = lines.iter().any(|l| {
            contract.generic_key_hints.matches_lower(l) && contract.parseable_hints.matches_lower(l)
        });
        if !diagnostics.is_empty() && !generic_documented {
            diagnostics.push(
                MISSING_GENERIC_METADATA
                    .emit("adapter metadata keys found but the generic 'metadata' key with parseable JSON/YAML is not documented")
                    .at(descriptor, None),
            );
        }

        let claims_machine_readable = lines
            .iter()
            .any(|l| contract.machine_readable_hints.matches_lower(l));
        let has_delimiter = lines
            .iter()
            .any(|l| contract.structured_delimiters.matches_lower(l));
        if claims_machine_readable && !has_delimiter {
            diagnostics.push(
                MISSING_STRUCTURED_DELIMITER
                    .emit("machine-readable block claimed but no ```json or ```yaml fence is shown")
                    .at(descriptor, None),
            );
        }

        ScanResult::new(SCANNER, diagnostics, 1)
    }
}

/// Returns the [`RuleInfo`] catalogue for every contract rule.
pub fn rules() -> Vec<RuleInfo> {
    vec![
        ADAPTER_METADATA_KEY,
        MISSING_GENERIC_METADATA,
        MISSING_STRUCTURED_DELIMITER,
    ]
}
