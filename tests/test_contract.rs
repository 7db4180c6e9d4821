mod common;

use bagakit_skill_maker::diagnostic::Severity;
use bagakit_skill_maker::scanners::contract::ContractScanner;
use common::*;

const ANCHOR: &str = "## Fallback\n";

fn scan_with_block(block: &str) -> bagakit_skill_maker::diagnostic::ScanResult {
    let skill_md = skill_md_replacing(ANCHOR, &format!("## Metadata\n\n{block}\n{ANCHOR}"));
    let dir = bundle_with(&skill_md, VALID_PAYLOAD);
    scan(&ContractScanner, dir.path())
}

#[test]
fn valid_document_passes() {
    let dir = valid_bundle();
    let result = scan(&ContractScanner, dir.path());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn adapter_key_without_generic_pattern_warns_twice() {
    let result = scan_with_block("- Put the routing hints in openai_metadata.\n");
    assert_eq!(
        rule_ids(&result),
        vec![
            "contract/adapter-metadata-key",
            "contract/missing-generic-metadata"
        ]
    );
    assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Warning));
}

#[test]
fn adapter_key_with_generic_pattern_warns_once() {
    let result = scan_with_block(
        "- Put the routing hints in claude_metadata.\n- The generic metadata key holds parseable JSON.\n",
    );
    assert_eq!(rule_ids(&result), vec!["contract/adapter-metadata-key"]);
}

#[test]
fn avoid_examples_are_not_flagged() {
    let result = scan_with_block("- Avoid adapter keys such as openai_metadata or codex_metadata.\n");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn machine_readable_claim_needs_a_fence() {
    let result = scan_with_block("- The skill prints a machine-readable summary.\n");
    assert_eq!(
        rule_ids(&result),
        vec!["contract/missing-structured-delimiter"]
    );
}

#[test]
fn machine_readable_claim_with_json_fence_passes() {
    let result = scan_with_block(
        "- The skill prints a machine-readable summary:\n\n```json\n{\"status\": \"ok\"}\n```\n",
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}
