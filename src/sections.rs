//! Heading index over the descriptor body.
//!
//! Only ATX headings (`#` … `######`) are recognized, and only outside
//! fenced code blocks, so a `# comment` inside a shell example never opens a
//! section. A section runs from its heading up to, but not including, the
//! next heading of the same or a higher level. A single leading `#` heading
//! is the document title and never matches a section name.

use regex::Regex;
use std::sync::LazyLock;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").unwrap());

static RE_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+\S").unwrap());

/// Leading list numbering or decoration in a heading (`1. `, `2) `, emoji).
static RE_HEADING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+[.)]?\s*)?[^\p{L}\p{N}]*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
    /// Lowercased text with numbering, emphasis and trailing colons removed.
    pub normalized: String,
    /// 0-indexed line in the document.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLine<'a> {
    /// 1-indexed line number in the document.
    pub number: usize,
    pub text: &'a str,
    /// Inside a fenced code block.
    pub fenced: bool,
}

impl SectionLine<'_> {
    pub fn is_bullet(&self) -> bool {
        !self.fenced && is_bullet(self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub heading: Heading,
    /// Lines between the heading and the end of the section.
    pub lines: Vec<SectionLine<'a>>,
}

impl<'a> Section<'a> {
    /// 1-indexed line number of the heading.
    pub fn line(&self) -> usize {
        self.heading.index + 1
    }

    pub fn bullets(&self) -> impl Iterator<Item = &SectionLine<'a>> {
        self.lines.iter().filter(|l| l.is_bullet())
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets().count()
    }

    pub fn has_bullets(&self, min: usize) -> bool {
        self.bullet_count() >= min
    }
}

#[derive(Debug, Clone)]
pub struct SectionIndex<'a> {
    body_start: usize,
    lines: Vec<&'a str>,
    fenced: Vec<bool>,
    headings: Vec<Heading>,
    /// Position in `headings` of the document title, if any.
    title: Option<usize>,
}

impl<'a> SectionIndex<'a> {
    /// Indexes `text`, ignoring everything before `body_start` (the header).
    pub fn new(text: &'a str, body_start: usize) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut fenced = vec![false; lines.len()];
        let mut headings = Vec::new();
        let mut fence: Option<&str> = None;

        for (idx, line) in lines.iter().enumerate().skip(body_start) {
            let trimmed = line.trim_start();
            let marker = if trimmed.starts_with("```") {
                Some("```")
            } else if trimmed.starts_with("~~~") {
                Some("~~~")
            } else {
                None
            };

            match (fence, marker) {
                (None, Some(m)) => {
                    fence = Some(m);
                    fenced[idx] = true;
                    continue;
                }
                (Some(open), Some(m)) if open == m => {
                    fence = None;
                    fenced[idx] = true;
                    continue;
                }
                (Some(_), _) => {
                    fenced[idx] = true;
                    continue;
                }
                (None, None) => {}
            }

            if let Some(caps) = RE_HEADING.captures(line) {
                let text = caps[2].to_string();
                headings.push(Heading {
                    level: caps[1].len(),
                    normalized: normalize_heading(&text),
                    text,
                    index: idx,
                });
            }
        }

        // A lone leading H1 is the document title, not a section.
        let title = match headings.first() {
            Some(first) if first.level == 1 && headings[1..].iter().all(|h| h.level > 1) => {
                Some(0)
            }
            _ => None,
        };

        SectionIndex {
            body_start,
            lines,
            fenced,
            headings,
            title,
        }
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Every body line, tagged with whether it sits inside a code fence.
    pub fn body_lines(&self) -> impl Iterator<Item = SectionLine<'a>> + '_ {
        (self.body_start..self.lines.len()).map(|i| SectionLine {
            number: i + 1,
            text: self.lines[i],
            fenced: self.fenced[i],
        })
    }

    /// Returns the first section whose heading matches any of `synonyms`.
    /// The document title never matches.
    pub fn find(&self, synonyms: &[String]) -> Option<Section<'a>> {
        let pos = self
            .section_headings()
            .find(|(_, h)| synonyms.iter().any(|s| heading_matches(&h.normalized, s)))
            .map(|(pos, _)| pos)?;
        let heading = &self.headings[pos];

        let end = self.headings[pos + 1..]
            .iter()
            .find(|h| h.level <= heading.level)
            .map(|h| h.index)
            .unwrap_or(self.lines.len());

        let lines = (heading.index + 1..end)
            .map(|i| SectionLine {
                number: i + 1,
                text: self.lines[i],
                fenced: self.fenced[i],
            })
            .collect();

        Some(Section {
            heading: heading.clone(),
            lines,
        })
    }

    pub fn contains(&self, synonyms: &[String]) -> bool {
        self.section_headings()
            .any(|(_, h)| synonyms.iter().any(|s| heading_matches(&h.normalized, s)))
    }

    /// Headings with their positions, excluding the document title.
    fn section_headings(&self) -> impl Iterator<Item = (usize, &Heading)> + '_ {
        self.headings
            .iter()
            .enumerate()
            .filter(move |(pos, _)| Some(*pos) != self.title)
    }
}

/// Returns `true` when `line` is a list item (`- x`, `* x`, `+ x`, `1. x`).
pub fn is_bullet(line: &str) -> bool {
    RE_BULLET.is_match(line)
}

/// Normalizes heading text for synonym comparison.
///
/// ```
/// use bagakit_skill_maker::sections::normalize_heading;
///
/// assert_eq!(normalize_heading("2. When **NOT** to Use:"), "when not to use");
/// assert_eq!(normalize_heading("✅  Output   Routes"), "output routes");
/// ```
pub fn normalize_heading(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`'))
        .collect();
    let stripped = RE_HEADING_PREFIX.replace(stripped.trim(), "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches([':', '：'])
        .trim_end()
        .to_lowercase()
}

/// A normalized heading matches a synonym when it starts with it and the
/// synonym is not merely the prefix of a longer ASCII word.
fn heading_matches(normalized: &str, synonym: &str) -> bool {
    let Some(rest) = normalized.strip_prefix(synonym) else {
        return false;
    };
    let synonym_ends_word = synonym
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    !synonym_ends_word || !rest.starts_with(|c: char| c.is_ascii_alphanumeric())
}
