//! Metadata header parser for the descriptor document.
//!
//! The header is the `---` delimited block at the very top of `SKILL.md`:
//!
//! ```text
//! ---
//! name: bagakit-release-notes
//! description: Drafts release notes. Use when a tag is about to be cut.
//! ---
//! ```
//!
//! Parsing is partial-failure tolerant. A line without a `:` separator is
//! recorded as a [`HeaderIssue::MalformedLine`] and parsing continues with the
//! next line. A missing opening or closing delimiter yields an empty
//! [`Header`] so the remaining rules still run against defaults.

/// A `key: value` pair from the header with its 1-indexed line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub entries: Vec<HeaderEntry>,
}

impl Header {
    /// Returns the last entry for `key`; later lines override earlier ones.
    pub fn get(&self, key: &str) -> Option<&HeaderEntry> {
        self.entries.iter().rev().find(|e| e.key == key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").map(|e| e.value.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").map(|e| e.value.as_str())
    }

    /// Keys outside `allowed`, sorted and de-duplicated.
    pub fn unknown_keys(&self, allowed: &[String]) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !allowed.contains(&e.key))
            .map(|e| e.key.clone())
            .collect();
        unknown.sort();
        unknown.dedup();
        unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderIssue {
    /// The document does not open with `---` or is shorter than three lines.
    MissingOpening,
    /// No closing `---` after the opening delimiter.
    Unclosed,
    /// A content line without a `key: value` separator.
    MalformedLine { line: usize, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeader {
    pub header: Header,
    pub issues: Vec<HeaderIssue>,
    /// 0-indexed line where the body starts (just past the closing delimiter,
    /// or 0 when no well-formed header was found).
    pub body_start: usize,
}

/// Parses the leading metadata block of `text`.
///
/// ```
/// use bagakit_skill_maker::header::parse_header;
///
/// let parsed = parse_header("---\nname: 'demo'\ndescription: Demo skill\n---\n# Demo\n");
/// assert!(parsed.issues.is_empty());
/// assert_eq!(parsed.header.name(), Some("demo"));
/// assert_eq!(parsed.body_start, 4);
/// ```
pub fn parse_header(text: &str) -> ParsedHeader {
    let lines: Vec<&str> = text.lines().collect();

    if lines.len() < 3 || lines[0].trim() != "---" {
        return ParsedHeader {
            header: Header::default(),
            issues: vec![HeaderIssue::MissingOpening],
            body_start: 0,
        };
    }

    let Some(end) = lines
        .iter()
        .skip(1)
        .position(|l| l.trim_end() == "---")
        .map(|p| p + 1)
    else {
        return ParsedHeader {
            header: Header::default(),
            issues: vec![HeaderIssue::Unclosed],
            body_start: 0,
        };
    };

    let mut header = Header::default();
    let mut issues = Vec::new();

    for (idx, raw) in lines.iter().enumerate().take(end).skip(1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            issues.push(HeaderIssue::MalformedLine {
                line: idx + 1,
                text: raw.to_string(),
            });
            continue;
        };
        header.entries.push(HeaderEntry {
            key: key.trim().to_string(),
            value: unquote(value.trim()).to_string(),
            line: idx + 1,
        });
    }

    ParsedHeader {
        header,
        issues,
        body_start: end + 1,
    }
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"').trim_matches('\'')
}
