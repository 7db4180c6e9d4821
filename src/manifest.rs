//! Payload manifest loader.
//!
//! `SKILL_PAYLOAD.json` declares which files ship with a bundle:
//!
//! ```json
//! { "version": 1, "include": ["SKILL.md", "references", "scripts"] }
//! ```
//!
//! [`load_manifest`] turns the file into a typed [`Manifest`]. Failures that
//! make the file unusable (missing, unreadable, invalid JSON, non-object root)
//! are returned as [`ManifestError`]; schema problems inside an otherwise
//! valid object are collected as [`ManifestIssue`]s next to whatever could
//! still be extracted, so the caller can report them all.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("missing file: {0}")]
    Missing(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("payload root must be object: {0}")]
    NotObject(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestIssue {
    /// `include` is absent or is not an array of strings.
    IncludeNotStringArray,
    /// `version` is present but not a positive integer.
    InvalidVersion(String),
    MissingVersion,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub version: Option<u64>,
    /// `None` when `include` failed validation.
    pub include: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub issues: Vec<ManifestIssue>,
}

/// Loads `relative` (resolved against `root`) as a payload manifest.
///
/// Paths inside the returned errors are the `relative` form so messages do
/// not depend on where the bundle is checked out.
pub fn load_manifest(root: &Path, relative: &str) -> Result<LoadedManifest, ManifestError> {
    let path = root.join(relative);
    let shown = PathBuf::from(relative);

    let content = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ManifestError::Missing(shown.clone())
        } else {
            ManifestError::Read {
                path: shown.clone(),
                source,
            }
        }
    })?;

    parse_manifest(&content, &shown)
}

/// Parses manifest JSON text. `shown` is only used in error messages.
pub fn parse_manifest(content: &str, shown: &Path) -> Result<LoadedManifest, ManifestError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|source| ManifestError::InvalidJson {
            path: shown.to_path_buf(),
            source,
        })?;

    let serde_json::Value::Object(object) = value else {
        return Err(ManifestError::NotObject(shown.to_path_buf()));
    };

    let mut issues = Vec::new();

    let version = match object.get("version") {
        None => {
            issues.push(ManifestIssue::MissingVersion);
            None
        }
        Some(v) => match v.as_u64() {
            Some(n) if n > 0 => Some(n),
            _ => {
                issues.push(ManifestIssue::InvalidVersion(v.to_string()));
                None
            }
        },
    };

    let include = object
        .get("include")
        .and_then(|v| v.as_array())
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<String>>>()
        });
    if include.is_none() {
        issues.push(ManifestIssue::IncludeNotStringArray);
    }

    Ok(LoadedManifest {
        manifest: Manifest { version, include },
        issues,
    })
}
