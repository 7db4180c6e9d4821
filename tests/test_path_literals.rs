mod common;

use bagakit_skill_maker::scanners::path_literals::{find_absolute_path, PathLiteralScanner};
use common::*;
use std::path::PathBuf;

#[test]
fn detects_posix_and_windows_paths() {
    assert_eq!(
        find_absolute_path("see /home/alice/project/file.md"),
        Some(("posix", "/home/alice/project/file.md"))
    );
    assert_eq!(
        find_absolute_path("cache in \"/tmp/build/out\""),
        Some(("posix", "/tmp/build/out"))
    );
    assert_eq!(
        find_absolute_path(r"open C:\Users\alice\notes.txt"),
        Some(("windows", r"C:\Users\alice\notes.txt"))
    );
    assert_eq!(
        find_absolute_path("path=D:/work/skill"),
        Some(("windows", "D:/work/skill"))
    );
}

#[test]
fn ignores_relative_paths_and_urls() {
    for line in [
        "see ./relative/file.md",
        "see references/home/notes.md",
        "https://example.com/home/alice",
        "file:///tmp is a URL scheme",
        "ratio 3:2 and key: value",
        "~/projects is home-relative",
    ] {
        assert_eq!(find_absolute_path(line), None, "{line}");
    }
}

#[test]
fn valid_bundle_is_clean() {
    let dir = valid_bundle();
    let result = scan(&PathLiteralScanner, dir.path());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.files_scanned, 3);
}

#[test]
fn reports_one_error_per_line_with_location() {
    let skill_md = skill_md_replacing(
        "1. Collect merged changes since the last tag.",
        "1. Collect merged changes from /home/alice/repo and /tmp/cache.",
    );
    let dir = bundle_with(&skill_md, VALID_PAYLOAD);
    write(
        dir.path(),
        "scripts/draft-notes.sh",
        "cd /Users/bob/work\necho ok\ncp out.md C:\\drafts\\\n",
    );
    let result = scan(&PathLiteralScanner, dir.path());
    let locations: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| (d.file.clone().unwrap(), d.line.unwrap()))
        .collect();
    assert_eq!(
        locations,
        vec![
            (PathBuf::from("SKILL.md"), 13),
            (PathBuf::from("scripts/draft-notes.sh"), 1),
            (PathBuf::from("scripts/draft-notes.sh"), 3),
        ]
    );
}

#[test]
fn only_shipped_files_are_scanned() {
    let dir = valid_bundle();
    write(dir.path(), "notes/scratch.md", "/home/alice/secret\n");
    let result = scan(&PathLiteralScanner, dir.path());
    assert!(result.diagnostics.is_empty());
}

#[test]
fn invalid_manifest_falls_back_to_runtime_dirs() {
    let dir = bundle_with(VALID_SKILL_MD, "{broken");
    write(dir.path(), "references/setup.md", "Install into /opt/tools/bin\n");
    let result = scan(&PathLiteralScanner, dir.path());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].file,
        Some(PathBuf::from("references/setup.md"))
    );
}

#[test]
fn binary_and_non_text_files_are_skipped() {
    let dir = valid_bundle();
    std::fs::write(dir.path().join("references/blob.md"), [0xff, 0xfe, 0x2f, 0x68]).unwrap();
    write(dir.path(), "references/logo.svg", "/home/alice/logo\n");
    let result = scan(&PathLiteralScanner, dir.path());
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
}
