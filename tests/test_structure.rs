mod common;

use bagakit_skill_maker::config::Config;
use bagakit_skill_maker::diagnostic::Severity;
use bagakit_skill_maker::scanners::structure::StructureScanner;
use common::*;

fn scan_skill_md(skill_md: &str) -> bagakit_skill_maker::diagnostic::ScanResult {
    let dir = bundle_with(skill_md, VALID_PAYLOAD);
    scan(&StructureScanner, dir.path())
}

const FOOTER: &str = "[[BAGAKIT]]\n- skill: name=bagakit-demo; stage=stable; version=1\n";

#[test]
fn valid_document_passes() {
    let result = scan_skill_md(VALID_SKILL_MD);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn line_ceiling_is_enforced() {
    let padding = "filler line\n".repeat(500);
    let skill_md = skill_md_replacing("## Status\n", &format!("{padding}## Status\n"));
    let result = scan_skill_md(&skill_md);
    assert_eq!(rule_ids(&result), vec!["structure/too-long"]);
}

#[test]
fn line_ceiling_is_configurable() {
    let dir = valid_bundle();
    let mut config = Config::default();
    config.sections.max_lines = 10;
    let result = scan_with(&StructureScanner, dir.path(), &config);
    assert_eq!(rule_ids(&result), vec!["structure/too-long"]);
}

#[test]
fn missing_footer_is_an_error() {
    let skill_md = skill_md_replacing(FOOTER, "");
    let result = scan_skill_md(&skill_md);
    assert_eq!(rule_ids(&result), vec!["structure/missing-footer"]);
}

#[test]
fn footer_inside_code_fence_does_not_count() {
    let skill_md = skill_md_replacing(FOOTER, &format!("```text\n{FOOTER}```\n"));
    let result = scan_skill_md(&skill_md);
    assert_eq!(rule_ids(&result), vec!["structure/missing-footer"]);
}

#[test]
fn footer_without_entries_is_an_error() {
    let skill_md = skill_md_replacing(FOOTER, "[[BAGAKIT]]\n\nThanks for reading.\n");
    let result = scan_skill_md(&skill_md);
    assert_eq!(rule_ids(&result), vec!["structure/footer-no-entries"]);
}

#[test]
fn malformed_footer_entries_are_reported_per_line() {
    let skill_md = skill_md_replacing(
        FOOTER,
        "[[BAGAKIT]]\n- skill: name=bagakit-demo; stage=stable\n- just a note\n- state: ready\n",
    );
    let result = scan_skill_md(&skill_md);
    let found = with_rule(&result, "structure/footer-malformed-entry");
    assert_eq!(found.len(), 2);
    assert!(found[0].message.ends_with("- just a note"));
    assert!(found[1].message.ends_with("- state: ready"));
    assert!(found[0].line < found[1].line);
}

#[test]
fn heading_after_footer_warns() {
    let skill_md = format!("{VALID_SKILL_MD}\n## Appendix\n\nMore text.\n");
    let result = scan_skill_md(&skill_md);
    let found = with_rule(&result, "structure/footer-not-last");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].severity, Severity::Warning);
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn missing_standalone_statement() {
    let skill_md = skill_md_replacing(
        "This skill is standalone: it works without any other skill installed.\n",
        "",
    );
    let result = scan_skill_md(&skill_md);
    assert_eq!(rule_ids(&result), vec!["structure/missing-standalone"]);
}

#[test]
fn chinese_standalone_statement_is_accepted() {
    let skill_md = skill_md_replacing(
        "This skill is standalone: it works without any other skill installed.",
        "本技能可独立运行。",
    );
    let result = scan_skill_md(&skill_md);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn optional_contract_needs_both_words_on_one_line() {
    let skill_md = skill_md_replacing(
        "Other skills may interact with it only through an optional contract (a documented schema or signal).",
        "Other skills may interact with it only through a contract.\nThat is optional.",
    );
    let result = scan_skill_md(&skill_md);
    assert_eq!(rule_ids(&result), vec!["structure/missing-optional-contract"]);
}
