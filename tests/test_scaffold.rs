use bagakit_skill_maker::config::Config;
use bagakit_skill_maker::scaffold::{init, normalize_name, ScaffoldError};
use bagakit_skill_maker::validate::run_validation;

#[test]
fn normalizes_names() {
    assert_eq!(normalize_name("My Cool Skill").unwrap(), "my-cool-skill");
    assert_eq!(normalize_name("--bagakit__x--").unwrap(), "bagakit-x");
    assert!(matches!(normalize_name("  ***  "), Err(ScaffoldError::EmptyName)));
    assert!(matches!(
        normalize_name(&"a".repeat(65)),
        Err(ScaffoldError::InvalidName(_))
    ));
}

#[test]
fn scaffold_writes_expected_tree() {
    let parent = tempfile::tempdir().unwrap();
    let dir = init("Bagakit Demo", parent.path(), false, &Config::default()).unwrap();

    assert_eq!(dir, parent.path().join("bagakit-demo"));
    assert!(dir.join("SKILL.md").is_file());
    assert!(dir.join("references/start-here.md").is_file());
    assert!(dir.join("scripts").is_dir());
    assert!(!dir.join("agents").exists());

    let payload: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("SKILL_PAYLOAD.json")).unwrap())
            .unwrap();
    assert_eq!(
        payload,
        serde_json::json!({"version": 1, "include": ["SKILL.md", "references", "scripts"]})
    );
}

#[test]
fn scaffold_fails_only_on_placeholder_description() {
    let parent = tempfile::tempdir().unwrap();
    let dir = init("bagakit-demo", parent.path(), true, &Config::default()).unwrap();
    assert!(dir.join("agents/openai.yaml").is_file());

    let report = run_validation(&dir, &Config::default());
    let ids: Vec<_> = report.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["frontmatter/description-placeholder"]);
}

#[test]
fn scaffold_with_real_description_passes() {
    let parent = tempfile::tempdir().unwrap();
    let dir = init("bagakit-demo", parent.path(), false, &Config::default()).unwrap();
    let skill_md = std::fs::read_to_string(dir.join("SKILL.md")).unwrap().replace(
        "TODO: describe what this skill does and exactly when to use it.",
        "Drafts release notes from merged changes. Use when a release tag is about to be cut.",
    );
    std::fs::write(dir.join("SKILL.md"), skill_md).unwrap();

    let report = run_validation(&dir, &Config::default());
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn existing_target_is_refused() {
    let parent = tempfile::tempdir().unwrap();
    std::fs::create_dir(parent.path().join("bagakit-demo")).unwrap();
    let err = init("bagakit-demo", parent.path(), false, &Config::default()).unwrap_err();
    assert!(matches!(err, ScaffoldError::AlreadyExists(_)));
}
