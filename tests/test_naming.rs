mod common;

use bagakit_skill_maker::diagnostic::Severity;
use bagakit_skill_maker::scanners::naming::NamingScanner;
use common::*;
use std::path::PathBuf;

#[test]
fn valid_names_pass() {
    let dir = valid_bundle();
    let result = scan(&NamingScanner, dir.path());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.files_scanned, 2);
}

#[test]
fn generic_and_legacy_tokens_both_fire() {
    let dir = valid_bundle();
    write(dir.path(), "references/legacy-helper.md", "# Old\n");
    let result = scan(&NamingScanner, dir.path());
    assert_eq!(
        rule_ids(&result),
        vec!["naming/generic-stem", "naming/legacy-term"]
    );
    assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Error));
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.file == Some(PathBuf::from("references/legacy-helper.md"))));
}

#[test]
fn extension_allow_list_differs_per_directory() {
    let dir = valid_bundle();
    write(dir.path(), "scripts/notes.md", "# Notes\n");
    write(dir.path(), "references/render.py", "print('x')\n");
    write(dir.path(), "references/table.csv", "a,b\n");
    let result = scan(&NamingScanner, dir.path());
    let found = with_rule(&result, "naming/extension-not-allowed");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|d| d.severity == Severity::Warning));
    let files: Vec<_> = found.iter().filter_map(|d| d.file.clone()).collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("scripts/notes.md"),
            PathBuf::from("references/render.py")
        ]
    );
}

#[test]
fn underscore_warns_and_uppercase_errors() {
    let dir = valid_bundle();
    write(dir.path(), "scripts/build_index.sh", "echo\n");
    write(dir.path(), "references/Guide.md", "# Guide\n");
    let result = scan(&NamingScanner, dir.path());
    let underscore = with_rule(&result, "naming/underscore");
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].severity, Severity::Warning);
    let invalid = with_rule(&result, "naming/invalid-characters");
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].file, Some(PathBuf::from("references/Guide.md")));
}

#[test]
fn nested_files_and_agents_are_checked() {
    let dir = valid_bundle();
    write(dir.path(), "references/deep/misc.md", "# Misc\n");
    write(dir.path(), "agents/openai.yaml", "interface: {}\n");
    let result = scan(&NamingScanner, dir.path());
    assert_eq!(rule_ids(&result), vec!["naming/generic-stem"]);
    assert_eq!(result.files_scanned, 4);
}

#[test]
fn dotfiles_are_skipped() {
    let dir = valid_bundle();
    write(dir.path(), "scripts/.gitkeep", "");
    let result = scan(&NamingScanner, dir.path());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}

#[test]
fn output_order_is_stable() {
    let dir = valid_bundle();
    for name in ["zeta_old.md", "alpha_old.md", "mid_old.md"] {
        write(dir.path(), &format!("references/{name}"), "x\n");
    }
    let first = scan(&NamingScanner, dir.path());
    let second = scan(&NamingScanner, dir.path());
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(
        first.diagnostics[0].file,
        Some(PathBuf::from("references/alpha_old.md"))
    );
}
