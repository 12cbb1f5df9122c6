//! Frontmatter block codec
//!
//! A note may start with a metadata block delimited by `---` lines. Inside the
//! block, `key: value` lines open an entry and indented lines continue it
//! (multi-line lists). Each entry's raw text is resolved to a typed
//! [`FrontmatterValue`] once, when the entry is closed:
//!
//! 1. `true` / `false` become booleans
//! 2. `[a, b]` becomes an inline list
//! 3. any `- item` line makes a multi-line list
//! 4. anything else is a string, with one layer of quotes removed
//!
//! The order matters: a bracketed value is never reread as a dash list.
//!
//! Parsing never fails. A missing or unterminated block leaves the whole input
//! as body with empty frontmatter.

use crate::core::front_matter::Frontmatter;
use crate::core::value::FrontmatterValue;
use regex::Regex;
use std::sync::OnceLock;

/// Block delimiter line
pub const DELIMITER: &str = "---";

/// Characters that force a serialized value into double quotes
const RESERVED_CHARS: &[char] = &[
    ':', '[', ']', '{', '}', '|', '>', '&', '*', '!', '@', '#', '%', '`', '\n',
];

fn key_line_re() -> &'static Regex {
    static KEY_LINE_RE: OnceLock<Regex> = OnceLock::new();
    KEY_LINE_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_\-][A-Za-z0-9_\- ]*?)\s*:\s*(.*)$").expect("valid key regex")
    })
}

fn list_item_re() -> &'static Regex {
    static LIST_ITEM_RE: OnceLock<Regex> = OnceLock::new();
    LIST_ITEM_RE.get_or_init(|| Regex::new(r"^\s*-\s+(.*)$").expect("valid list item regex"))
}

/// Split `content` into its frontmatter mapping and body text.
pub fn parse(content: &str) -> (Frontmatter, String) {
    match split_block(content) {
        Some((block, body)) => {
            let mut parser = BlockParser::new();
            for line in block.lines() {
                parser.feed(line);
            }
            (parser.finish(), body.to_string())
        }
        None => (Frontmatter::new(), content.to_string()),
    }
}

/// Render a mapping as a frontmatter block. An empty mapping renders as an
/// empty string so that the note is written without any block.
pub fn serialize(frontmatter: &Frontmatter) -> String {
    if frontmatter.is_empty() {
        return String::new();
    }

    let mut lines = vec![DELIMITER.to_string()];
    for (key, value) in frontmatter.iter() {
        match value {
            FrontmatterValue::Bool(b) => lines.push(format!("{key}: {b}")),
            FrontmatterValue::List(items) if items.is_empty() => {
                lines.push(format!("{key}: []"));
            }
            FrontmatterValue::List(items) => {
                lines.push(format!("{key}:"));
                for item in items {
                    lines.push(format!("  - {}", escape_value(item)));
                }
            }
            FrontmatterValue::String(s) => lines.push(format!("{key}: {}", escape_value(s))),
        }
    }
    lines.push(DELIMITER.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Returns `(block, body)` when the content opens with a delimiter line and a
/// second delimiter line closes the block.
fn split_block(content: &str) -> Option<(&str, &str)> {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = text.split_inclusive('\n');

    let first = lines.next()?;
    if !is_delimiter(first) || !first.ends_with('\n') {
        return None;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if is_delimiter(line) {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parser state: either between entries or collecting the raw text of one.
#[derive(Debug)]
enum ParserState {
    Idle,
    Accumulating { key: String, raw: String },
}

#[derive(Debug)]
struct BlockParser {
    state: ParserState,
    entries: Frontmatter,
}

impl BlockParser {
    fn new() -> Self {
        Self {
            state: ParserState::Idle,
            entries: Frontmatter::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.trim_end_matches('\r');

        if let Some(caps) = key_line_re().captures(line) {
            self.close_entry();
            self.state = ParserState::Accumulating {
                key: caps[1].trim().to_string(),
                raw: caps[2].to_string(),
            };
            return;
        }

        let continuation = line.starts_with(' ') || line.starts_with('\t');
        match &mut self.state {
            ParserState::Accumulating { raw, .. } if continuation => {
                raw.push('\n');
                raw.push_str(line);
            }
            // Blank or unrecognized line ends the current entry. Continuations
            // arriving while idle are dropped.
            _ => self.close_entry(),
        }
    }

    fn close_entry(&mut self) {
        if let ParserState::Accumulating { key, raw } =
            std::mem::replace(&mut self.state, ParserState::Idle)
        {
            self.entries.insert(key, resolve_value(&raw));
        }
    }

    fn finish(mut self) -> Frontmatter {
        self.close_entry();
        self.entries
    }
}

/// Resolve the raw text collected for one key into a typed value.
pub fn resolve_value(raw: &str) -> FrontmatterValue {
    let raw = raw.trim();

    match raw {
        "true" => return FrontmatterValue::Bool(true),
        "false" => return FrontmatterValue::Bool(false),
        _ => {}
    }

    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let inner = raw[1..raw.len() - 1].trim();
        if inner.is_empty() {
            return FrontmatterValue::List(Vec::new());
        }
        return FrontmatterValue::List(inner.split(',').map(clean_item).collect());
    }

    if is_double_quoted(raw) {
        return FrontmatterValue::String(unquote(raw));
    }

    let items: Vec<String> = raw
        .lines()
        .filter_map(|line| list_item_re().captures(line))
        .map(|caps| clean_item(&caps[1]))
        .collect();
    if !items.is_empty() {
        return FrontmatterValue::List(items);
    }

    FrontmatterValue::String(unquote(raw))
}

fn clean_item(item: &str) -> String {
    unquote(item.trim()).trim().to_string()
}

fn is_double_quoted(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}

/// Strip one layer of matching quotes. Inside double quotes only `\"` is
/// unescaped, and continuation lines lose their indentation; every other
/// backslash is kept as written.
fn unquote(s: &str) -> String {
    if is_double_quoted(s) {
        return unescape(&s[1..s.len() - 1]);
    }
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        return s[1..s.len() - 1].to_string();
    }
    s.to_string()
}

fn unescape(s: &str) -> String {
    let folded = s
        .split('\n')
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n");
    folded.replace("\\\"", "\"")
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.contains(RESERVED_CHARS)
        || s.trim() != s
        || s.starts_with(['-', '"', '\''])
        || s == "true"
        || s == "false"
}

/// Quote a scalar or list item if reading it back would change it. Embedded
/// newlines continue on indented lines.
pub fn escape_value(s: &str) -> String {
    if !needs_quoting(s) {
        return s.to_string();
    }
    let escaped = s.replace('"', "\\\"").replace('\n', "\n  ");
    format!("\"{escaped}\"")
}
