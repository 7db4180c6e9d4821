//! Loading a skill bundle from disk.
//!
//! A [`Bundle`] is rebuilt from scratch on every validation run: the
//! descriptor text, its parsed header, and the manifest load outcome. It is
//! the single input every scanner reads from.

use crate::config::Config;
use crate::diagnostic::{Diagnostic, Severity};
use crate::header::{parse_header, ParsedHeader};
use crate::manifest::{load_manifest, LoadedManifest, ManifestError};
use crate::scanners::RuleInfo;
use crate::sections::SectionIndex;
use std::path::{Path, PathBuf};

const SCANNER: &str = "bundle";

pub const MISSING_FILE: RuleInfo = RuleInfo {
    id: "bundle/missing-file",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "A required top-level file is missing",
    remediation: "Create SKILL.md and SKILL_PAYLOAD.json in the bundle root (see `init`)",
};

pub const UNREADABLE_DESCRIPTOR: RuleInfo = RuleInfo {
    id: "bundle/unreadable-descriptor",
    severity: Severity::Error,
    scanner: SCANNER,
    message: "SKILL.md cannot be read as UTF-8 text",
    remediation: "Save SKILL.md as UTF-8",
};

#[derive(Debug)]
pub struct Bundle {
    pub root: PathBuf,
    /// Last component of the root path, used as the report label.
    pub label: String,
    pub descriptor: String,
    pub header: ParsedHeader,
    pub manifest: Result<LoadedManifest, ManifestError>,
    /// Non-blocking load problems (e.g. a descriptor that is not UTF-8).
    pub diagnostics: Vec<Diagnostic>,
}

impl Bundle {
    /// Loads the bundle rooted at `root`.
    ///
    /// Both required files must exist; otherwise the only result is the list
    /// of blocking diagnostics, since no other rule can be evaluated without
    /// them. A descriptor that is not valid UTF-8 is decoded lossily and
    /// reported in [`Bundle::diagnostics`].
    pub fn load(root: &Path, config: &Config) -> Result<Bundle, Vec<Diagnostic>> {
        let descriptor_name = config.files.descriptor.as_str();
        let manifest_name = config.files.manifest.as_str();

        let missing: Vec<Diagnostic> = [descriptor_name, manifest_name]
            .into_iter()
            .filter(|name| !root.join(name).is_file())
            .map(|name| MISSING_FILE.emit(format!("missing file: {name}")).at(name, None))
            .collect();
        if !missing.is_empty() {
            tracing::debug!(root = %root.display(), count = missing.len(), "required files missing");
            return Err(missing);
        }

        let mut diagnostics = Vec::new();
        let descriptor = match std::fs::read(root.join(descriptor_name)) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    diagnostics.push(
                        UNREADABLE_DESCRIPTOR
                            .emit(format!(
                                "{descriptor_name} is not valid UTF-8: {}",
                                e.utf8_error()
                            ))
                            .at(descriptor_name, None),
                    );
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            },
            Err(e) => {
                diagnostics.push(
                    UNREADABLE_DESCRIPTOR
                        .emit(format!("cannot read {descriptor_name}: {e}"))
                        .at(descriptor_name, None),
                );
                String::new()
            }
        };

        let header = parse_header(&descriptor);
        let manifest = load_manifest(root, manifest_name);
        tracing::debug!(
            root = %root.display(),
            header_entries = header.header.entries.len(),
            manifest_ok = manifest.is_ok(),
            "bundle loaded"
        );

        Ok(Bundle {
            root: root.to_path_buf(),
            label: bundle_label(root),
            descriptor,
            header,
            manifest,
            diagnostics,
        })
    }

    /// The manifest `include` list, when the manifest loaded and validated.
    pub fn include(&self) -> Option<&[String]> {
        self.manifest
            .as_ref()
            .ok()
            .and_then(|m| m.manifest.include.as_deref())
    }

    pub fn sections(&self) -> SectionIndex<'_> {
        SectionIndex::new(&self.descriptor, self.header.body_start)
    }

    /// Descriptor body lines with 1-indexed document line numbers.
    pub fn body_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.descriptor
            .lines()
            .enumerate()
            .skip(self.header.body_start)
            .map(|(i, l)| (i + 1, l))
    }

    /// Name the bundle calls itself: the header `name`, falling back to the
    /// directory name.
    pub fn own_name(&self) -> String {
        self.header
            .header
            .name()
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| self.label.to_lowercase())
    }
}

/// Returns the last path component or `"unknown"` when there is none.
pub fn bundle_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
