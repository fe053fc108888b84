//! Tolerant extraction of a fixed field set from `---` delimited metadata blocks.
//!
//! This is deliberately not a YAML parser. Each accessor looks for one field
//! shape (scalar, inline array, block array) and degrades to `None` or an empty
//! list when the shape is missing or malformed, so a half-written document is
//! still partially usable.

use crate::model::References;

const MARKER: &str = "---";

/// Maximum length of an extracted summary, in characters.
pub const SUMMARY_MAX_CHARS: usize = 120;

/// Where a key is allowed to appear on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPosition {
    /// `key:` at column 0.
    TopLevel,
    /// `key:` after some indentation (nested under a parent key).
    Indented,
    /// `key:` at any indentation.
    Anywhere,
}

/// The lines of a metadata block (or of a whole YAML-like file) with typed accessors.
#[derive(Debug, Clone)]
pub struct MetadataBlock<'a> {
    lines: Vec<&'a str>,
}

impl<'a> MetadataBlock<'a> {
    /// Treat the whole text as the block. Used for plain `.yaml` artifacts.
    pub fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.lines().collect(),
        }
    }

    /// Locate the leading `---` block of a markdown document.
    pub fn from_document(content: &'a str) -> Option<Self> {
        split_document(content).map(|(block, _body)| Self::new(block))
    }

    /// First `key: value` line with a non-empty value, quotes stripped.
    pub fn scalar(&self, key: &str) -> Option<String> {
        scalar_in(&self.lines, key, KeyPosition::TopLevel)
    }

    /// Like [`scalar`](Self::scalar), but the key may be indented at any depth.
    pub fn scalar_at_any_depth(&self, key: &str) -> Option<String> {
        scalar_in(&self.lines, key, KeyPosition::Anywhere)
    }

    /// `key: [a, b, c]`
    pub fn inline_array(&self, key: &str) -> Vec<String> {
        inline_array_in(&self.lines, key, KeyPosition::TopLevel)
    }

    /// `key:` followed by indented `- item` lines.
    pub fn block_array(&self, key: &str) -> Vec<String> {
        block_array_in(&self.lines, key, KeyPosition::TopLevel)
    }

    /// Inline form first; the block form only when the inline form yields nothing.
    pub fn array(&self, key: &str) -> Vec<String> {
        array_in(&self.lines, key, KeyPosition::TopLevel)
    }

    /// Scalar nested under `parent:`, falling back to a flush-left `key:`.
    pub fn nested_scalar(&self, parent: &str, key: &str) -> Option<String> {
        match self.section(parent) {
            Some(section) if has_key(section, key, KeyPosition::Indented) => {
                scalar_in(section, key, KeyPosition::Indented)
            }
            _ => self.scalar(key),
        }
    }

    /// Array nested under `parent:`, falling back to a flush-left `key:`.
    pub fn nested_array(&self, parent: &str, key: &str) -> Vec<String> {
        match self.section(parent) {
            Some(section) if has_key(section, key, KeyPosition::Indented) => {
                array_in(section, key, KeyPosition::Indented)
            }
            _ => self.array(key),
        }
    }

    /// Literal block scalar (`key: |` followed by indented text), dedented and
    /// trimmed. A plain `key: value` is returned as is.
    pub fn literal(&self, key: &str) -> Option<String> {
        let (index, rest) = key_lines(&self.lines, key, KeyPosition::TopLevel).next()?;
        let rest = rest.trim();
        if !(rest.starts_with('|') || rest.starts_with('>')) {
            return (!rest.is_empty()).then(|| strip_quotes(rest).to_string());
        }

        let text: Vec<&str> = self.lines[index + 1..]
            .iter()
            .take_while(|line| line.trim().is_empty() || indent_of(line) > 0)
            .map(|line| line.trim())
            .collect();
        let joined = text.join("\n");
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Lines belonging to `parent:` (blank or indented lines right after it).
    fn section(&self, parent: &str) -> Option<&[&'a str]> {
        let (index, _) = key_lines(&self.lines, parent, KeyPosition::TopLevel)
            .find(|(_, rest)| rest.trim().is_empty())?;
        let start = index + 1;
        let len = self.lines[start..]
            .iter()
            .take_while(|line| line.trim().is_empty() || indent_of(line) > 0)
            .count();
        Some(&self.lines[start..start + len])
    }
}

/// Typed view over the known fields of a guide or ADR metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub id: Option<String>,
    pub title: Option<String>,
    pub created: Option<String>,
    pub last_verified: Option<String>,
    pub status: Option<String>,
    pub topics: Vec<String>,
    pub watched_paths: Vec<String>,
    pub references: References,
    pub tags: Vec<String>,
}

impl Frontmatter {
    /// Parse the leading metadata block. `None` when the document has none.
    pub fn parse(content: &str) -> Option<Self> {
        MetadataBlock::from_document(content).map(|block| Self::from_block(&block))
    }

    pub fn from_block(block: &MetadataBlock<'_>) -> Self {
        Self {
            id: block.scalar("id"),
            title: block.scalar("title"),
            created: block.scalar("created"),
            last_verified: block.scalar("last_verified"),
            status: block.scalar("status"),
            topics: block.array("topics"),
            watched_paths: block.array("watched_paths"),
            references: References {
                conventions: block.nested_array("references", "conventions"),
                adrs: block.nested_array("references", "adrs"),
                features: block.nested_array("references", "features"),
            },
            tags: parse_tags(block),
        }
    }
}

/// Split a document into its metadata block and body.
///
/// The block opens with a `---` first line and closes at the next `---` line.
pub fn split_document(content: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    let mut block_start = None;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let is_marker = line.trim_end() == MARKER;

        match block_start {
            None if is_marker => block_start = Some(offset),
            None => return None,
            Some(start) if is_marker => {
                return Some((&content[start..line_start], &content[offset..]));
            }
            Some(_) => {}
        }
    }
    None
}

/// Everything after the metadata block, trimmed.
pub fn extract_body(content: &str) -> &str {
    match split_document(content) {
        Some((_block, body)) => body.trim(),
        None => content.trim(),
    }
}

/// First paragraph of the body, capped at [`SUMMARY_MAX_CHARS`].
pub fn extract_summary(content: &str) -> String {
    truncate(&first_paragraph(content), SUMMARY_MAX_CHARS)
}

/// First paragraph of the body, skipping leading headings, on one line.
pub fn first_paragraph(content: &str) -> String {
    let mut collected: Vec<&str> = Vec::new();

    for line in extract_body(content).lines() {
        let trimmed = line.trim();
        if collected.is_empty() && (trimmed.is_empty() || trimmed.starts_with('#')) {
            continue;
        }
        if trimmed.is_empty() {
            break;
        }
        collected.push(trimmed);
    }
    collected.join(" ")
}

/// First `# Heading` of the body.
pub fn extract_title(content: &str) -> Option<String> {
    extract_body(content).lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let title = rest.trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

/// Cap `text` at `max` characters, ending with `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Strip one leading and one trailing quote character.
pub fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    let value = value.strip_suffix(['"', '\'']).unwrap_or(value);
    value.trim()
}

/// Split a comma separated list, trimming and unquoting each entry.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(strip_quotes)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `tags` accepts array forms as well as a plain comma list.
fn parse_tags(block: &MetadataBlock<'_>) -> Vec<String> {
    let tags = block.array("tags");
    if !tags.is_empty() {
        return tags;
    }
    block
        .scalar("tags")
        .map(|raw| split_list(&raw))
        .unwrap_or_default()
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Lines declaring `key`, with the text after the colon.
fn key_lines<'b, 'a: 'b>(
    lines: &'b [&'a str],
    key: &'b str,
    position: KeyPosition,
) -> impl Iterator<Item = (usize, &'a str)> + 'b {
    lines.iter().copied().enumerate().filter_map(move |(index, line)| {
        let candidate = match position {
            KeyPosition::TopLevel => line,
            KeyPosition::Indented if indent_of(line) > 0 => line.trim_start(),
            KeyPosition::Indented => return None,
            KeyPosition::Anywhere => line.trim_start(),
        };
        let rest = candidate.strip_prefix(key)?.strip_prefix(':')?;
        Some((index, rest))
    })
}

fn has_key(lines: &[&str], key: &str, position: KeyPosition) -> bool {
    key_lines(lines, key, position).next().is_some()
}

fn scalar_in(lines: &[&str], key: &str, position: KeyPosition) -> Option<String> {
    key_lines(lines, key, position).find_map(|(_, rest)| {
        let value = strip_quotes(rest);
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn inline_array_in(lines: &[&str], key: &str, position: KeyPosition) -> Vec<String> {
    key_lines(lines, key, position)
        .find_map(|(_, rest)| {
            let inner = rest.trim_start().strip_prefix('[')?;
            let end = inner.find(']')?;
            Some(split_list(&inner[..end]))
        })
        .unwrap_or_default()
}

fn block_array_in(lines: &[&str], key: &str, position: KeyPosition) -> Vec<String> {
    let Some((index, _)) = key_lines(lines, key, position).find(|(_, rest)| rest.trim().is_empty())
    else {
        return Vec::new();
    };
    let key_indent = indent_of(lines[index]);

    lines[index + 1..]
        .iter()
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| indent_of(line) > key_indent && line.trim_start().starts_with('-'))
        .filter_map(|line| {
            let marker = line.trim_start();
            let item = strip_quotes(marker.strip_prefix('-').unwrap_or(marker));
            (!item.is_empty()).then(|| item.to_string())
        })
        .collect()
}

fn array_in(lines: &[&str], key: &str, position: KeyPosition) -> Vec<String> {
    let inline = inline_array_in(lines, key, position);
    if !inline.is_empty() {
        return inline;
    }
    block_array_in(lines, key, position)
}
