#![allow(dead_code)]

use std::path::Path;

use bagakit_skill_maker::bundle::Bundle;
use bagakit_skill_maker::config::Config;
use bagakit_skill_maker::diagnostic::{Diagnostic, ScanResult};
use bagakit_skill_maker::scanners::Scanner;
use tempfile::TempDir;

pub const VALID_SKILL_MD: &str = "---
name: bagakit-demo
description: Drafts release notes from merged changes. Use when a release tag is about to be cut.
---

# Bagakit Demo

This skill is standalone: it works without any other skill installed.
Other skills may interact with it only through an optional contract (a documented schema or signal).

## Workflow

1. Collect merged changes since the last tag.
2. Group them by area and draft the notes.

## When to Use

- A release tag is about to be cut.
- The user asks for a changelog of recent merges.

## When NOT to Use

- The user wants a full project history.
- No tag or release is planned.

## Fallback

- If the change list is empty, report that and stop.

## Output Routes

- Default route: return the drafted notes in the final response.
- Adapters: none; this skill ships no adapters.
- Action handoff: list follow-up actions at the end of the response.
- Memory handoff: none, because the notes are regenerated on every run.

## Archive Gate

- Destination: the drafted notes are the evidence of completion.
- Action handoff: open follow-ups are listed for the user.
- Memory handoff: none, because nothing outlives the run.

## Status

[[BAGAKIT]]
- skill: name=bagakit-demo; stage=stable; version=1
";

pub const VALID_PAYLOAD: &str =
    r#"{"version": 1, "include": ["SKILL.md", "references", "scripts"]}"#;

/// A bundle that passes every rule: SKILL.md, manifest, one reference and
/// one script.
pub fn valid_bundle() -> TempDir {
    bundle_with(VALID_SKILL_MD, VALID_PAYLOAD)
}

pub fn bundle_with(skill_md: &str, payload: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "SKILL.md", skill_md);
    write(dir.path(), "SKILL_PAYLOAD.json", payload);
    write(
        dir.path(),
        "references/start-here.md",
        "# Start Here\n\nRelease note conventions.\n",
    );
    write(
        dir.path(),
        "scripts/draft-notes.sh",
        "set -euo pipefail\necho \"drafting notes\"\n",
    );
    dir
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// The valid SKILL.md with `from` replaced by `to`.
pub fn skill_md_replacing(from: &str, to: &str) -> String {
    assert!(VALID_SKILL_MD.contains(from), "fixture does not contain {from:?}");
    VALID_SKILL_MD.replace(from, to)
}

pub fn scan(scanner: &dyn Scanner, root: &Path) -> ScanResult {
    scan_with(scanner, root, &Config::default())
}

pub fn scan_with(scanner: &dyn Scanner, root: &Path, config: &Config) -> ScanResult {
    let bundle = Bundle::load(root, config).expect("bundle should load");
    scanner.scan(&bundle, config)
}

pub fn with_rule<'a>(result: &'a ScanResult, rule_id: &str) -> Vec<&'a Diagnostic> {
    result
        .diagnostics
        .iter()
        .filter(|d| d.rule_id == rule_id)
        .collect()
}

pub fn rule_ids(result: &ScanResult) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.rule_id.as_str()).collect()
}
