//! Skill bundle scaffolding for the `init` command.
//!
//! A scaffolded bundle passes every validation rule except the placeholder
//! description, which the author is expected to replace.

use crate::config::Config;
use crate::scanners::frontmatter::RE_NAME;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_NON_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("normalized skill name is empty")]
    EmptyName,
    #[error("invalid skill name after normalization: {0}; use lowercase letters, digits, hyphens; max 64 chars")]
    InvalidName(String),
    #[error("target directory already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render payload manifest: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(serde::Serialize)]
struct PayloadTemplate<'a> {
    version: u32,
    include: Vec<&'a str>,
}

/// Lowercases `raw` and turns every run of other characters into one hyphen.
///
/// ```
/// use bagakit_skill_maker::scaffold::normalize_name;
///
/// assert_eq!(normalize_name("  Bagakit Release__Notes! ").unwrap(), "bagakit-release-notes");
/// assert!(normalize_name("!!!").is_err());
/// ```
pub fn normalize_name(raw: &str) -> Result<String, ScaffoldError> {
    let lower = raw.trim().to_lowercase();
    let name = RE_NON_NAME.replace_all(&lower, "-");
    let name = name.trim_matches('-').to_string();
    if name.is_empty() {
        return Err(ScaffoldError::EmptyName);
    }
    if !RE_NAME.is_match(&name) {
        return Err(ScaffoldError::InvalidName(name));
    }
    Ok(name)
}

/// Creates `<parent>/<name>/` with a starter SKILL.md, manifest and runtime
/// directories. Returns the new bundle directory.
pub fn init(
    raw_name: &str,
    parent: &Path,
    with_agents: bool,
    config: &Config,
) -> Result<PathBuf, ScaffoldError> {
    let name = normalize_name(raw_name)?;
    let skill_dir = parent.join(&name);
    if skill_dir.exists() {
        return Err(ScaffoldError::AlreadyExists(skill_dir));
    }

    let layout = &config.layout;
    let mut include = vec![
        config.files.descriptor.as_str(),
        layout.reference_dir.as_str(),
        layout.scripts_dir.as_str(),
    ];
    if with_agents {
        include.push(layout.agents_dir.as_str());
    }
    let payload = serde_json::to_string_pretty(&PayloadTemplate {
        version: 1,
        include,
    })?;

    create_dir(&skill_dir.join(&layout.reference_dir))?;
    create_dir(&skill_dir.join(&layout.scripts_dir))?;

    write(
        &skill_dir.join(&config.files.descriptor),
        &skill_md(&name, config),
    )?;
    write(&skill_dir.join(&config.files.manifest), &format!("{payload}\n"))?;
    write(
        &skill_dir.join(&layout.reference_dir).join("start-here.md"),
        "# Start Here\n\nAdd reference docs that are too detailed for SKILL.md.\n",
    )?;
    if with_agents {
        write(
            &skill_dir.join(&layout.agents_dir).join("openai.yaml"),
            &openai_yaml(&name),
        )?;
    }

    tracing::debug!(dir = %skill_dir.display(), with_agents, "scaffolded skill");
    Ok(skill_dir)
}

fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    std::fs::create_dir_all(path).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    std::fs::write(path, content).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `bagakit-release-notes` -> `Bagakit Release Notes`
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn skill_md(name: &str, config: &Config) -> String {
    let title = title_case(name);
    let references = &config.layout.reference_dir;
    let scripts = &config.layout.scripts_dir;
    let anchor = &config.sections.footer_anchor;
    format!(
        "---
name: {name}
description: TODO: describe what this skill does and exactly when to use it.
---

# {title}

This skill is standalone: it works without any other skill installed.
Other skills may interact with it only through an optional contract (a documented schema or signal).

## Purpose

- Keep this skill focused on one coherent operational job.
- Put \"when to use\" trigger details in the frontmatter description.

## Workflow

1. Capture concrete triggering and non-triggering examples.
2. Keep SKILL.md concise; move deep material to {references}/.
3. Put deterministic, repeatable steps into {scripts}/.
4. Validate and iterate based on over-trigger and under-trigger behavior.

## When to Use

- The user asks for the concrete task this skill performs.
- The request matches a second, clearly related trigger.

## When NOT to Use

- The task belongs to a different skill's scope.
- A one-off answer is enough and no repeatable workflow is needed.

## Fallback

- If a required input is missing, stop and ask for it instead of guessing.

## Output Routes

- Default route: return results in the final response.
- Adapters: none; this skill ships no adapters.
- Action handoff: list follow-up actions at the end of the response.
- Memory handoff: none, because the skill keeps no state between runs.

## Archive Gate

- Destination: evidence of completed work is recorded in the final response.
- Action handoff: follow-up actions are listed for the user.
- Memory handoff: none, because nothing outlives the run.

## Status

{anchor}
- skill: name={name}; stage=draft; version=1
"
    )
}

fn openai_yaml(name: &str) -> String {
    let display = title_case(name);
    format!(
        "interface:\n  display_name: \"{display}\"\n  short_description: \"TODO: short UI summary\"\n  default_prompt: \"TODO: one-line default instruction\"\n"
    )
}
