mod common;

use std::path::Path;

use bagakit_skill_maker::diagnostic::Severity;
use bagakit_skill_maker::manifest::{parse_manifest, ManifestError, ManifestIssue};
use bagakit_skill_maker::scanners::payload::{escapes_bundle, normalize_entry, PayloadScanner};
use common::*;

fn scan_payload(payload: &str) -> bagakit_skill_maker::diagnostic::ScanResult {
    let dir = bundle_with(VALID_SKILL_MD, payload);
    scan(&PayloadScanner, dir.path())
}

// ---------------------------------------------------------------------------
// Manifest parser
// ---------------------------------------------------------------------------

#[test]
fn parses_valid_manifest() {
    let loaded = parse_manifest(VALID_PAYLOAD, Path::new("SKILL_PAYLOAD.json")).unwrap();
    assert!(loaded.issues.is_empty());
    assert_eq!(loaded.manifest.version, Some(1));
    assert_eq!(
        loaded.manifest.include.as_deref(),
        Some(&["SKILL.md".to_string(), "references".to_string(), "scripts".to_string()][..])
    );
}

#[test]
fn invalid_json_includes_reason() {
    let err = parse_manifest("{\"include\": [", Path::new("SKILL_PAYLOAD.json")).unwrap_err();
    assert!(matches!(err, ManifestError::InvalidJson { .. }));
    assert!(err.to_string().starts_with("invalid json in SKILL_PAYLOAD.json: "));
}

#[test]
fn non_object_root_is_rejected() {
    let err = parse_manifest("[\"SKILL.md\"]", Path::new("SKILL_PAYLOAD.json")).unwrap_err();
    assert_eq!(err.to_string(), "payload root must be object: SKILL_PAYLOAD.json");
}

#[test]
fn schema_issues_are_collected_together() {
    let loaded = parse_manifest(
        r#"{"version": "one", "include": ["SKILL.md", 3]}"#,
        Path::new("SKILL_PAYLOAD.json"),
    )
    .unwrap();
    assert_eq!(
        loaded.issues,
        vec![
            ManifestIssue::InvalidVersion("\"one\"".to_string()),
            ManifestIssue::IncludeNotStringArray
        ]
    );
    assert_eq!(loaded.manifest.include, None);
}

#[test]
fn entry_helpers() {
    assert_eq!(normalize_entry("./scripts/"), "scripts");
    assert_eq!(normalize_entry("references"), "references");
    assert_eq!(normalize_entry("/"), "/");
    assert_eq!(normalize_entry("\\"), "\\");
    assert!(escapes_bundle("../other/SKILL.md"));
    assert!(escapes_bundle("/abs/path"));
    assert!(escapes_bundle("references/../../x"));
    assert!(!escapes_bundle("references/a..b.md"));
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[test]
fn valid_manifest_has_no_diagnostics() {
    let dir = valid_bundle();
    let result = scan(&PayloadScanner, dir.path());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn invalid_json_becomes_a_diagnostic() {
    let result = scan_payload("{not json");
    let found = with_rule(&result, "payload/invalid-manifest");
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("invalid json"));
}

#[test]
fn duplicate_entries_are_reported_once() {
    let result = scan_payload(
        r#"{"version": 1, "include": ["SKILL.md", "references", "./references/", "scripts", "SKILL.md"]}"#,
    );
    let found = with_rule(&result, "payload/duplicate-include");
    assert_eq!(found.len(), 1);
    assert!(found[0].message.ends_with("duplicate entries: references, SKILL.md"), "{}", found[0].message);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
}

#[test]
fn descriptor_must_be_listed_and_readme_must_not() {
    let dir = bundle_with(
        VALID_SKILL_MD,
        r#"{"version": 1, "include": ["README.md", "references", "scripts"]}"#,
    );
    write(dir.path(), "README.md", "# Readme\n");
    let result = scan(&PayloadScanner, dir.path());
    assert_eq!(
        rule_ids(&result),
        vec!["payload/missing-descriptor", "payload/forbidden-include"]
    );
}

#[test]
fn escaping_entries_skip_the_existence_check() {
    let result = scan_payload(
        r#"{"version": 1, "include": ["SKILL.md", "references", "scripts", "../shared/tool.sh", "/etc/passwd", "/"]}"#,
    );
    assert_eq!(with_rule(&result, "payload/escapes-bundle").len(), 3);
    assert!(with_rule(&result, "payload/path-missing").is_empty());
    assert!(with_rule(&result, "payload/empty-entry").is_empty());
}

#[test]
fn missing_file_entry_is_an_error() {
    let result = scan_payload(
        r#"{"version": 1, "include": ["SKILL.md", "references", "scripts", "LICENSE"]}"#,
    );
    let found = with_rule(&result, "payload/path-missing");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "payload path missing on disk: LICENSE");
}

#[test]
fn empty_entry_is_an_error() {
    let result = scan_payload(r#"{"version": 1, "include": ["SKILL.md", "", "references", "scripts"]}"#);
    assert_eq!(rule_ids(&result), vec!["payload/empty-entry"]);
}

#[test]
fn unlisted_runtime_dir_warns() {
    let result = scan_payload(r#"{"version": 1, "include": ["SKILL.md", "references"]}"#);
    let found = with_rule(&result, "payload/dir-not-included");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].severity, Severity::Warning);
    assert!(found[0].message.ends_with(": scripts"));
}

#[test]
fn listed_runtime_dir_must_exist_and_is_not_double_reported() {
    let result = scan_payload(
        r#"{"version": 1, "include": ["SKILL.md", "references", "scripts", "agents"]}"#,
    );
    assert_eq!(rule_ids(&result), vec!["payload/dir-missing"]);
}

#[test]
fn legacy_reference_dir_warns() {
    let dir = bundle_with(
        VALID_SKILL_MD,
        r#"{"version": 1, "include": ["SKILL.md", "references", "scripts", "docs"]}"#,
    );
    write(dir.path(), "docs/guide.md", "# Guide\n");
    let result = scan(&PayloadScanner, dir.path());
    assert_eq!(rule_ids(&result), vec!["payload/legacy-reference-dir"]);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn version_rules() {
    let missing = scan_payload(r#"{"include": ["SKILL.md", "references", "scripts"]}"#);
    assert_eq!(rule_ids(&missing), vec!["payload/version-missing"]);
    assert_eq!(missing.diagnostics[0].severity, Severity::Warning);

    let zero = scan_payload(r#"{"version": 0, "include": ["SKILL.md", "references", "scripts"]}"#);
    assert_eq!(rule_ids(&zero), vec!["payload/version-invalid"]);
    assert_eq!(zero.diagnostics[0].severity, Severity::Error);
}

#[test]
fn include_not_array_is_reported_and_entry_rules_are_skipped() {
    let result = scan_payload(r#"{"version": 1, "include": "SKILL.md"}"#);
    let ids = rule_ids(&result);
    assert!(ids.contains(&"payload/include-not-string-array"));
    assert!(!ids.contains(&"payload/missing-descriptor"));
}
