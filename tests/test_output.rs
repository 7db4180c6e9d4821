mod common;

use bagakit_skill_maker::config::Config;
use bagakit_skill_maker::diagnostic::{Diagnostic, ScanResult, ValidationReport};
use bagakit_skill_maker::output::{format_report, OutputFormat};
use bagakit_skill_maker::validate::run_validation;
use common::*;

fn report(diagnostics: Vec<Diagnostic>, strict: bool) -> ValidationReport {
    ValidationReport::from_results("bagakit-demo", vec![ScanResult::new("test", diagnostics, 1)], strict)
}

fn mixed() -> Vec<Diagnostic> {
    vec![
        Diagnostic::error("payload", "payload/path-missing", "payload path missing on disk: LICENSE")
            .at("SKILL_PAYLOAD.json", None),
        Diagnostic::warning("naming", "naming/underscore", "prefer hyphens over underscores in file name: a_b.sh")
            .at("scripts/a_b.sh", None),
        Diagnostic::error("paths", "paths/absolute-path", "absolute posix path literal: /tmp/x/")
            .at("SKILL.md", Some(12)),
    ]
}

#[test]
fn text_splits_warnings_and_errors() {
    let rendered = format_report(&report(mixed(), false), OutputFormat::Text, false).unwrap();
    assert_eq!(
        rendered.stdout,
        "warn: scripts/a_b.sh: prefer hyphens over underscores in file name: a_b.sh [naming/underscore]\n"
    );
    assert_eq!(
        rendered.stderr,
        "error: SKILL_PAYLOAD.json: payload path missing on disk: LICENSE [payload/path-missing]\n\
         error: SKILL.md:12: absolute posix path literal: /tmp/x/ [paths/absolute-path]\n"
    );
}

#[test]
fn text_success_prints_ok_and_warn_count() {
    let warnings: Vec<_> = mixed().into_iter().filter(|d| !d.is_error()).collect();
    let rendered = format_report(&report(warnings, false), OutputFormat::Text, false).unwrap();
    assert!(rendered.stdout.ends_with("ok: skill validation passed\nwarn_count=1\n"));
    assert!(rendered.stderr.is_empty());

    let clean = format_report(&report(vec![], false), OutputFormat::Text, false).unwrap();
    assert_eq!(clean.stdout, "ok: skill validation passed\n");
}

#[test]
fn text_strict_failure_explains_itself() {
    let warnings: Vec<_> = mixed().into_iter().filter(|d| !d.is_error()).collect();
    let rendered = format_report(&report(warnings, true), OutputFormat::Text, false).unwrap();
    assert!(!rendered.stdout.contains("ok:"));
    assert_eq!(
        rendered.stderr,
        "error: strict mode: 1 warning(s) treated as errors\n"
    );
}

#[test]
fn json_has_summary_and_no_timestamp() {
    let rendered = format_report(&report(mixed(), false), OutputFormat::Json, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered.stdout).unwrap();
    assert_eq!(value["skill"], "bagakit-demo");
    assert_eq!(value["passed"], false);
    assert_eq!(value["verdict"], "failed");
    assert_eq!(value["summary"]["errors"], 2);
    assert_eq!(value["summary"]["warnings"], 1);
    assert_eq!(value["diagnostics"][0]["rule_id"], "payload/path-missing");
    assert_eq!(value["diagnostics"][2]["line"], 12);
    assert!(!rendered.stdout.contains("timestamp"));
    assert!(rendered.stderr.is_empty());
}

#[test]
fn sarif_lists_fired_rules_with_help() {
    let rendered = format_report(&report(mixed(), false), OutputFormat::Sarif, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered.stdout).unwrap();
    assert_eq!(value["version"], "2.1.0");
    let run = &value["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "bagakit-skill-maker");
    let rules = run["tool"]["driver"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0]["id"], "naming/underscore");
    assert!(rules[0]["help"]["text"].as_str().unwrap().contains("build-index.sh"));
    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[2]["level"], "error");
    assert_eq!(
        results[2]["locations"][0]["physicalLocation"]["region"]["startLine"],
        12
    );
}

#[test]
fn json_output_of_a_real_run_is_stable() {
    let dir = bundle_with(VALID_SKILL_MD, r#"{"include": ["SKILL.md", "references", "scripts"]}"#);
    let config = Config::default();
    let first = format_report(&run_validation(dir.path(), &config), OutputFormat::Json, false).unwrap();
    let second = format_report(&run_validation(dir.path(), &config), OutputFormat::Json, false).unwrap();
    assert_eq!(first, second);
}
