//! Validation policy loading and management.
//!
//! Every keyword list, allow-list, file name and threshold the scanners use
//! lives in [`Config`]. The value is built once at startup and passed by
//! shared reference to every scanner, so a deployment can tune the policy
//! with a TOML file instead of code changes.
//!
//! # Configuration file
//!
//! The default configuration file is `bagakit-skill.toml` in the current
//! working directory. Use [`Config::load`] to read it:
//!
//! ```rust,no_run
//! use bagakit_skill_maker::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert_eq!(config.files.descriptor, "SKILL.md");
//! ```
//!
//! Every table is optional and every field falls back to its default, so a
//! file only needs to name what it overrides:
//!
//! ```toml
//! [coupling]
//! non_bundle_tokens = ["bagakit-skills", "bagakit-profile", "bagakit-labs"]
//!
//! [sections]
//! max_lines = 400
//! ```

use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "bagakit-skill.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main validation policy.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// When strict mode is enabled, warnings are promoted to failures.
    pub strict: StrictConfig,
    pub files: FilesConfig,
    pub header: HeaderConfig,
    pub layout: LayoutConfig,
    pub sections: SectionsConfig,
    pub handoff: HandoffConfig,
    pub coupling: CouplingConfig,
    pub contract: ContractConfig,
}

#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct StrictConfig {
    /// Set to `true` to treat warnings as errors.
    pub enabled: bool,
}

/// Names of the two required top-level files.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct FilesConfig {
    pub descriptor: String,
    pub manifest: String,
    /// Entries that must never appear in the manifest `include` list.
    pub forbidden_includes: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub allowed_keys: Vec<String>,
    /// Case-sensitive substrings marking an unedited description.
    pub placeholder_hints: Vec<String>,
    pub trigger_hints: Keywords,
    pub min_description_chars: usize,
}

/// Runtime directory names and the file-naming vocabulary.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub scripts_dir: String,
    pub reference_dir: String,
    pub legacy_reference_dirs: Vec<String>,
    pub agents_dir: String,
    pub script_extensions: Vec<String>,
    pub reference_extensions: Vec<String>,
    pub agent_extensions: Vec<String>,
    /// Extensions the path-literal scanner treats as text.
    pub text_extensions: Vec<String>,
    pub generic_stems: Vec<String>,
    pub legacy_terms: Vec<String>,
}

/// One required section of the descriptor body.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SectionRule {
    /// Name used in diagnostics.
    pub title: String,
    /// Accepted heading texts, compared against the normalized heading.
    pub headings: Vec<String>,
    pub min_bullets: usize,
}

impl SectionRule {
    fn new(title: &str, headings: &[&str], min_bullets: usize) -> Self {
        SectionRule {
            title: title.to_string(),
            headings: strings(headings),
            min_bullets,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SectionsConfig {
    pub max_lines: usize,
    pub workflow: SectionRule,
    pub when_to_use: SectionRule,
    pub when_not_to_use: SectionRule,
    pub fallback: SectionRule,
    pub output_routes: SectionRule,
    pub archive_gate: SectionRule,
    pub footer_anchor: String,
    pub standalone_hints: Keywords,
    pub optional_hints: Keywords,
    pub contract_hints: Keywords,
}

/// Vocabulary for the output-routes and archive-gate consistency rules.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub default_route_hints: Keywords,
    pub adapter_hints: Keywords,
    pub optional_hints: Keywords,
    pub none_hints: Keywords,
    pub rationale_hints: Keywords,
    pub action_handoff_hints: Keywords,
    pub memory_handoff_hints: Keywords,
    pub destination_hints: Keywords,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CouplingConfig {
    /// Prefix shared by every bundle name (`bagakit-`).
    pub prefix: String,
    /// Shared runtime directory other bundles install into.
    pub shared_runtime_dir: String,
    /// Prefixed tokens that name umbrellas or profiles, not bundles.
    pub non_bundle_tokens: Vec<String>,
    pub coupling_hints: Keywords,
    pub optional_hints: Keywords,
    pub exec_verbs: Keywords,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ContractConfig {
    pub adapter_metadata_keys: Vec<String>,
    pub avoid_hints: Keywords,
    pub generic_key_hints: Keywords,
    pub parseable_hints: Keywords,
    pub machine_readable_hints: Keywords,
    pub structured_delimiters: Keywords,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            descriptor: "SKILL.md".to_string(),
            manifest: "SKILL_PAYLOAD.json".to_string(),
            forbidden_includes: strings(&["README.md"]),
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderConfig {
            allowed_keys: strings(&["name", "description"]),
            placeholder_hints: strings(&["TODO", "[TODO", "replace"]),
            trigger_hints: Keywords::new(&[
                "use when",
                "when to use",
                "when the user",
                "when asked",
                "when working with",
                "trigger*",
                "invoke when",
                "使用场景",
                "当用户",
                "适用于",
                "用于",
            ]),
            min_description_chars: 40,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            scripts_dir: "scripts".to_string(),
            reference_dir: "references".to_string(),
            legacy_reference_dirs: strings(&["docs"]),
            agents_dir: "agents".to_string(),
            script_extensions: strings(&["sh", "bash", "zsh", "py", "js", "mjs", "cjs", "ts", "rb"]),
            reference_extensions: strings(&[
                "md", "txt", "json", "yaml", "yml", "toml", "csv", "tsv",
            ]),
            agent_extensions: strings(&["yaml", "yml", "json", "toml", "md"]),
            text_extensions: strings(&[
                "md", "txt", "json", "yaml", "yml", "toml", "csv", "tsv", "sh", "bash", "zsh",
                "py", "js", "mjs", "cjs", "ts", "rb",
            ]),
            generic_stems: strings(&[
                "misc", "temp", "tmp", "helper", "helpers", "util", "utils", "stuff", "common",
                "general", "other", "untitled", "foo", "bar",
            ]),
            legacy_terms: strings(&["legacy", "deprecated", "obsolete", "old", "compat", "bak"]),
        }
    }
}

impl Default for SectionsConfig {
    fn default() -> Self {
        SectionsConfig {
            max_lines: 500,
            workflow: SectionRule::new("Workflow", &["workflow", "工作流"], 0),
            when_to_use: SectionRule::new(
                "When to Use",
                &["when to use", "使用场景", "何时使用"],
                2,
            ),
            when_not_to_use: SectionRule::new(
                "When NOT to Use",
                &["when not to use", "不适用场景", "何时不使用"],
                2,
            ),
            fallback: SectionRule::new("Fallback", &["fallback", "降级", "兜底"], 1),
            output_routes: SectionRule::new(
                "Output Routes",
                &["output routes", "output routing", "输出路由"],
                2,
            ),
            archive_gate: SectionRule::new(
                "Archive Gate",
                &["archive gate", "completion gate", "archive", "归档"],
                2,
            ),
            footer_anchor: "[[BAGAKIT]]".to_string(),
            standalone_hints: Keywords::new(&["standalone", "独立"]),
            optional_hints: Keywords::new(&["optional*", "可选"]),
            contract_hints: Keywords::new(&["contract*", "契约", "协议"]),
        }
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        HandoffConfig {
            default_route_hints: Keywords::new(&["default*", "默认"]),
            adapter_hints: Keywords::new(&["adapter*", "适配器"]),
            optional_hints: Keywords::new(&["optional*", "可选"]),
            none_hints: Keywords::new(&["none", "n/a", "无"]),
            rationale_hints: Keywords::new(&[
                "because",
                "since",
                "reason*",
                "rationale",
                "due to",
                "因为",
                "原因",
                "由于",
            ]),
            action_handoff_hints: Keywords::new(&[
                "action handoff",
                "action-handoff",
                "action_handoff",
                "行动交接",
            ]),
            memory_handoff_hints: Keywords::new(&[
                "memory handoff",
                "memory-handoff",
                "memory_handoff",
                "记忆交接",
            ]),
            destination_hints: Keywords::new(&[
                "destination*",
                "evidence",
                "archive path",
                "目的地",
                "证据",
                "归档位置",
            ]),
        }
    }
}

impl Default for CouplingConfig {
    fn default() -> Self {
        CouplingConfig {
            prefix: "bagakit-".to_string(),
            shared_runtime_dir: ".bagakit/".to_string(),
            non_bundle_tokens: strings(&[
                "bagakit-skills",
                "bagakit-profile",
                "bagakit-suite",
                "bagakit-standard",
            ]),
            coupling_hints: Keywords::new(&[
                "require*",
                "depend*",
                "must",
                "invok*",
                "bash",
                "python",
                "python3",
                "依赖",
                "必须",
                "需要",
                "调用",
            ]),
            optional_hints: Keywords::new(&[
                "optional*",
                "schema*",
                "contract*",
                "signal*",
                "可选",
                "契约",
                "协议",
                "信号",
            ]),
            exec_verbs: Keywords::new(&[
                "run",
                "runs",
                "execut*",
                "exec",
                "invok*",
                "call*",
                "bash",
                "sh",
                "python",
                "python3",
                "node",
                "source",
                "运行",
                "执行",
                "调用",
            ]),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        ContractConfig {
            adapter_metadata_keys: strings(&[
                "openai_metadata",
                "claude_metadata",
                "codex_metadata",
                "gemini_metadata",
                "cursor_metadata",
            ]),
            avoid_hints: Keywords::new(&[
                "avoid*",
                "anti-pattern*",
                "antipattern*",
                "do not",
                "don't",
                "never",
                "instead of",
                "discouraged",
                "避免",
                "反模式",
                "不要",
                "禁止",
            ]),
            generic_key_hints: Keywords::new(&["metadata"]),
            parseable_hints: Keywords::new(&["json", "yaml", "pars*", "可解析"]),
            machine_readable_hints: Keywords::new(&[
                "machine-readable",
                "machine readable",
                "机器可读",
            ]),
            structured_delimiters: Keywords::new(&["```json", "```yaml", "~~~json", "~~~yaml"]),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try [`DEFAULT_CONFIG_FILE`] in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// Keyword lists are lowercased after loading.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config_path = match path {
            Some(p) if p.exists() => Some(p.to_path_buf()),
            Some(p) => return Err(ConfigError::NotFound(p.to_path_buf())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        let Some(path) = config_path else {
            tracing::debug!("no config file found, using built-in policy");
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.normalize();
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Lowercases user-supplied vocabularies and heading synonyms so the
    /// scanners can compare against lowercased text.
    pub fn normalize(&mut self) {
        for keywords in [
            &mut self.header.trigger_hints,
            &mut self.sections.standalone_hints,
            &mut self.sections.optional_hints,
            &mut self.sections.contract_hints,
            &mut self.handoff.default_route_hints,
            &mut self.handoff.adapter_hints,
            &mut self.handoff.optional_hints,
            &mut self.handoff.none_hints,
            &mut self.handoff.rationale_hints,
            &mut self.handoff.action_handoff_hints,
            &mut self.handoff.memory_handoff_hints,
            &mut self.handoff.destination_hints,
            &mut self.coupling.coupling_hints,
            &mut self.coupling.optional_hints,
            &mut self.coupling.exec_verbs,
            &mut self.contract.avoid_hints,
            &mut self.contract.generic_key_hints,
            &mut self.contract.parseable_hints,
            &mut self.contract.machine_readable_hints,
            &mut self.contract.structured_delimiters,
        ] {
            keywords.normalize();
        }

        for rule in [
            &mut self.sections.workflow,
            &mut self.sections.when_to_use,
            &mut self.sections.when_not_to_use,
            &mut self.sections.fallback,
            &mut self.sections.output_routes,
            &mut self.sections.archive_gate,
        ] {
            lowercase_all(&mut rule.headings);
        }

        for list in [
            &mut self.layout.script_extensions,
            &mut self.layout.reference_extensions,
            &mut self.layout.agent_extensions,
            &mut self.layout.text_extensions,
            &mut self.layout.generic_stems,
            &mut self.layout.legacy_terms,
            &mut self.coupling.non_bundle_tokens,
            &mut self.contract.adapter_metadata_keys,
        ] {
            lowercase_all(list);
        }
        self.coupling.prefix = self.coupling.prefix.to_lowercase();
    }

    /// Runtime directories whose presence must agree with the manifest,
    /// in reporting order.
    pub fn runtime_dirs(&self) -> Vec<&str> {
        let mut dirs = vec![
            self.layout.scripts_dir.as_str(),
            self.layout.reference_dir.as_str(),
        ];
        dirs.extend(self.layout.legacy_reference_dirs.iter().map(String::as_str));
        dirs.push(self.layout.agents_dir.as_str());
        dirs
    }
}

/// A configurable keyword vocabulary.
///
/// Entries are matched against lowercased text:
///
/// - an entry ending in `*` matches any word starting with the entry;
/// - other ASCII entries must match on word boundaries;
/// - non-ASCII entries (e.g. Chinese) match as plain substrings, since
///   those scripts do not separate words with spaces.
///
/// ```
/// use bagakit_skill_maker::config::Keywords;
///
/// let kw = Keywords::new(&["depend*", "must", "必须"]);
/// assert!(kw.matches("This step depends on the archive"));
/// assert!(kw.matches("你必须先运行"));
/// assert!(!kw.matches("mustard is not a keyword"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Keywords(Vec<String>);

impl Keywords {
    pub fn new(entries: &[&str]) -> Self {
        Keywords(strings(entries))
    }

    pub fn normalize(&mut self) {
        lowercase_all(&mut self.0);
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` when any entry occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.matches_lower(&text.to_lowercase())
    }

    /// Like [`Keywords::matches`] for text that is already lowercased.
    pub fn matches_lower(&self, lower: &str) -> bool {
        self.0.iter().any(|entry| keyword_in(entry, lower))
    }
}

fn keyword_in(entry: &str, lower: &str) -> bool {
    let (core, prefix) = match entry.strip_suffix('*') {
        Some(core) => (core, true),
        None => (entry, false),
    };
    if core.is_empty() {
        return false;
    }
    if !core.is_ascii() {
        return lower.contains(core);
    }

    let starts_word = core.starts_with(is_word_char);
    let ends_word = core.ends_with(is_word_char);
    lower.match_indices(core).any(|(idx, _)| {
        let before_ok = !starts_word
            || lower[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| !is_word_char(c));
        let after_ok = prefix
            || !ends_word
            || lower[idx + core.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase_all(items: &mut [String]) {
    for s in items {
        *s = s.to_lowercase();
    }
}
