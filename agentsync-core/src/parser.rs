//! Forgiving parser for the `agentsync.yaml` document grammar.
//!
//! Two passes:
//!
//! 1. A strict whole-text parse through `serde_yaml`. Canonical (serialized)
//!    documents always take this path. Only a top-level mapping is accepted.
//! 2. A line-oriented scanner driven by [`ScanState`], used when the strict
//!    parse fails. It never fails: malformed input yields a partial tree and
//!    the [`crate::validate`] pass reports what was wrong.
//!
//! Grammar handled by the scanner: zero/two-space indentation, quoted scalars
//! (`''` escape in single quotes, JSON-style escapes in double quotes), `|` and
//! `>` block scalars, inline `{}` / `[]` collections and `#` comments outside
//! quotes.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;
use std::sync::LazyLock;

use regex::Regex;

use crate::value::Value;

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").expect("valid regex"));

/// Keys whose children are `- item` lines.
const LIST_SECTIONS: &[&str] = &["workflow", "done"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse document text into a value tree.
///
/// Tries the strict YAML parse first, then falls back to the line scanner.
pub fn parse(text: &str) -> Value {
    let text = text.replace("\r\n", "\n");
    match parse_strict(&text) {
        Some(tree) => tree,
        None => {
            log::debug!("strict parse rejected document, using line scanner");
            parse_lines(&text)
        }
    }
}

/// Strict parse. `None` unless the whole text is valid YAML whose root is a
/// mapping.
pub fn parse_strict(text: &str) -> Option<Value> {
    match serde_yaml::from_str::<serde_yaml::Value>(text) {
        Ok(root @ serde_yaml::Value::Mapping(_)) => Some(Value::from(root)),
        _ => None,
    }
}

/// Line-oriented scan only (no strict fast path).
pub fn parse_lines(text: &str) -> Value {
    ScanState::new(text).run().tree
}

/// Line-index ranges (0-based, end exclusive) covered by block scalar bodies.
pub fn block_scalar_spans(text: &str) -> Vec<Range<usize>> {
    ScanState::new(text).run().block_spans
}

// ---------------------------------------------------------------------------
// Scanner state
// ---------------------------------------------------------------------------

/// Which top-level key the following indented lines belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Section {
    None,
    /// `workflow` / `done`: `- item` lines.
    List(String),
    Commands,
    /// `notes_indent` is the secondary cursor for the nested `notes` list.
    Approvals { notes_indent: Option<usize> },
    /// `entry_indent` is fixed by the first target-id line.
    Targets {
        entry_indent: Option<usize>,
        current: Option<String>,
    },
    /// Unknown key with nested content; children are skipped.
    Other,
}

/// Output of a scan.
#[derive(Debug, Default)]
struct Scan {
    tree: Value,
    block_spans: Vec<Range<usize>>,
}

/// Explicit scanner state: all cursors live here, nothing is global.
#[derive(Debug)]
struct ScanState<'a> {
    lines: Vec<&'a str>,
    /// Index of the next line to read.
    line: usize,
    section: Section,
    tree: Value,
    block_spans: Vec<Range<usize>>,
}

impl<'a> ScanState<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            line: 0,
            section: Section::None,
            tree: Value::map(),
            block_spans: Vec::new(),
        }
    }

    fn run(mut self) -> Scan {
        while self.line < self.lines.len() {
            let raw = self.lines[self.line];
            self.line += 1;

            let content = strip_comment(raw).trim_end();
            if content.trim().is_empty() {
                continue;
            }
            let indent = indent_of(content);
            let body = &content[indent..];

            if indent == 0 && list_item(body).is_none() {
                self.top_level(body);
                continue;
            }

            let section = std::mem::replace(&mut self.section, Section::None);
            self.section = match section {
                Section::List(key) => self.list_line(key, body, indent),
                Section::Commands => self.commands_line(body, indent),
                Section::Approvals { notes_indent } => {
                    self.approvals_line(notes_indent, body, indent)
                }
                Section::Targets {
                    entry_indent,
                    current,
                } => self.targets_line(entry_indent, current, body, indent),
                other => other,
            };
        }
        Scan {
            tree: self.tree,
            block_spans: self.block_spans,
        }
    }

    fn top_level(&mut self, body: &str) {
        let Some((key, value)) = split_key_value(body) else {
            self.section = Section::None;
            return;
        };

        if let Some(style) = BlockStyle::from_indicator(value) {
            let text = self.block_scalar(0, style);
            self.tree.insert(key, Value::Str(text));
            self.section = Section::None;
            return;
        }

        if !value.is_empty() {
            self.tree.insert(key, parse_value(value));
            self.section = Section::None;
            return;
        }

        // Section headers start out null, like `key:` in YAML; the first
        // child line promotes them to a list or map.
        self.tree.insert(key.clone(), Value::Null);
        self.section = match key.as_str() {
            k if LIST_SECTIONS.contains(&k) => Section::List(key),
            "commands" => Section::Commands,
            "approvals" => Section::Approvals { notes_indent: None },
            "targets" => Section::Targets {
                entry_indent: None,
                current: None,
            },
            _ => Section::Other,
        };
    }

    fn list_line(&mut self, key: String, body: &str, indent: usize) -> Section {
        if let Some(item) = list_item(body) {
            let value = self.field_value(item, indent);
            if let Some(list) = self.tree.get_mut(&key) {
                list.push(value);
            }
        }
        Section::List(key)
    }

    fn commands_line(&mut self, body: &str, indent: usize) -> Section {
        if let Some((name, raw)) = split_key_value(body) {
            let value = self.field_value(raw, indent);
            if let Some(commands) = self.tree.get_mut("commands") {
                commands.insert(name, value);
            }
        }
        Section::Commands
    }

    fn approvals_line(&mut self, notes_indent: Option<usize>, body: &str, indent: usize) -> Section {
        if let Some(item) = list_item(body) {
            if notes_indent.is_some() {
                let value = self.field_value(item, indent);
                if let Some(notes) = self
                    .tree
                    .get_mut("approvals")
                    .and_then(|a| a.get_mut("notes"))
                {
                    notes.push(value);
                }
            }
            return Section::Approvals { notes_indent };
        }

        let Some((key, raw)) = split_key_value(body) else {
            return Section::Approvals { notes_indent };
        };
        let (value, notes_indent) = if key == "notes" && raw.is_empty() {
            (Value::Null, Some(indent))
        } else {
            (self.field_value(raw, indent), None)
        };
        if let Some(approvals) = self.tree.get_mut("approvals") {
            approvals.insert(key, value);
        }
        Section::Approvals { notes_indent }
    }

    fn targets_line(
        &mut self,
        entry_indent: Option<usize>,
        current: Option<String>,
        body: &str,
        indent: usize,
    ) -> Section {
        let entry = entry_indent.unwrap_or(indent);
        let Some((key, raw)) = split_key_value(body) else {
            return Section::Targets {
                entry_indent: Some(entry),
                current,
            };
        };

        if indent <= entry {
            let value = if raw.is_empty() {
                Value::Null
            } else {
                self.field_value(raw, indent)
            };
            let current = matches!(value, Value::Map(_) | Value::Null).then(|| key.clone());
            if let Some(targets) = self.tree.get_mut("targets") {
                targets.insert(key, value);
            }
            return Section::Targets {
                entry_indent: Some(entry),
                current,
            };
        }

        if let Some(id) = current.as_deref() {
            let value = self.field_value(raw, indent);
            if let Some(target) = self.tree.get_mut("targets").and_then(|t| t.get_mut(id)) {
                target.insert(key, value);
            }
        }
        Section::Targets {
            entry_indent: Some(entry),
            current,
        }
    }

    /// A nested value: either a block scalar owned by a key at `key_indent`,
    /// or an inline value.
    fn field_value(&mut self, raw: &str, key_indent: usize) -> Value {
        match BlockStyle::from_indicator(raw) {
            Some(style) => Value::Str(self.block_scalar(key_indent, style)),
            None => parse_value(raw),
        }
    }

    /// Consume the body of a block scalar whose key sits at `key_indent`.
    ///
    /// Body lines are raw (comments are content here) and must be strictly
    /// more indented than the key; blank lines are always part of the body.
    fn block_scalar(&mut self, key_indent: usize, style: BlockStyle) -> String {
        let start = self.line;
        while self.line < self.lines.len() {
            let raw = self.lines[self.line];
            if !raw.trim().is_empty() && indent_of(raw) <= key_indent {
                break;
            }
            self.line += 1;
        }
        if self.line > start {
            self.block_spans.push(start..self.line);
        }

        let body = &self.lines[start..self.line];
        let strip = body
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| indent_of(l))
            .min()
            .unwrap_or(0);
        let dedented: Vec<&str> = body
            .iter()
            .map(|l| if l.trim().is_empty() { "" } else { &l[strip..] })
            .collect();

        let text = match style {
            BlockStyle::Literal => dedented.join("\n"),
            BlockStyle::Folded => fold(&dedented),
        };
        text.trim_end().to_string()
    }
}

// ---------------------------------------------------------------------------
// Block scalars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockStyle {
    Literal,
    Folded,
}

impl BlockStyle {
    /// `|`, `|-`, `|+`, `>`, `>-`, `>+`.
    fn from_indicator(value: &str) -> Option<Self> {
        let style = match value.chars().next()? {
            '|' => BlockStyle::Literal,
            '>' => BlockStyle::Folded,
            _ => return None,
        };
        matches!(&value[1..], "" | "-" | "+").then_some(style)
    }
}

/// Join non-blank runs with a space; blank lines separate paragraphs.
fn fold(lines: &[&str]) -> String {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs.join("\n")
}

// ---------------------------------------------------------------------------
// Quote-aware character scanning
// ---------------------------------------------------------------------------

/// Walks a string tracking quote state.
///
/// Yields `(byte_offset, char, outside_quotes)`. Quote delimiters themselves
/// are reported as inside. A quote only opens at the start of a token, so the
/// apostrophe in `it's` is plain text.
struct QuoteScanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    quote: Option<char>,
    escaped: bool,
    prev: Option<char>,
}

impl<'a> QuoteScanner<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            chars: s.char_indices().peekable(),
            quote: None,
            escaped: false,
            prev: None,
        }
    }
}

impl Iterator for QuoteScanner<'_> {
    type Item = (usize, char, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (i, c) = self.chars.next()?;
        let prev = self.prev.replace(c);
        let item = match self.quote {
            None => {
                let at_token_start =
                    prev.map_or(true, |p| p.is_whitespace() || "[{(,:".contains(p));
                if (c == '"' || c == '\'') && at_token_start {
                    self.quote = Some(c);
                    (i, c, false)
                } else {
                    (i, c, true)
                }
            }
            Some('"') => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == '"' {
                    self.quote = None;
                }
                (i, c, false)
            }
            Some(_) => {
                if c == '\'' {
                    if matches!(self.chars.peek(), Some((_, '\''))) {
                        // `''` is a literal quote; swallow the second half.
                        self.chars.next();
                    } else {
                        self.quote = None;
                    }
                }
                (i, c, false)
            }
        };
        Some(item)
    }
}

/// Remove a trailing `# comment` that sits outside quotes and follows
/// whitespace (or starts the line).
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut prev: Option<char> = None;
    for (i, c, outside) in QuoteScanner::new(line) {
        if outside && c == '#' && prev.map_or(true, char::is_whitespace) {
            return &line[..i];
        }
        prev = Some(c);
    }
    line
}

/// Offset of the first unquoted `:` separating a key from its value.
///
/// Outside inline collections the colon must be followed by whitespace or the
/// end of the string (so `http://x` stays one scalar).
fn find_separator(s: &str, inline: bool) -> Option<usize> {
    QuoteScanner::new(s)
        .find(|&(i, c, outside)| {
            outside
                && c == ':'
                && (inline || s[i + 1..].chars().next().map_or(true, char::is_whitespace))
        })
        .map(|(i, _, _)| i)
}

/// Split `key: value` at the first separator. The key is unquoted; the value is
/// returned trimmed (possibly empty).
pub(crate) fn split_key_value(s: &str) -> Option<(String, &str)> {
    let idx = find_separator(s, false)?;
    let raw_key = s[..idx].trim();
    if raw_key.is_empty() || raw_key.starts_with("- ") || raw_key == "-" {
        return None;
    }
    Some((unquote(raw_key), s[idx + 1..].trim()))
}

/// Split on top-level commas, honouring `{}` / `[]` / `()` nesting and quotes.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c, outside) in QuoteScanner::new(s) {
        if !outside {
            continue;
        }
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// `- item` / `-` → the item text.
fn list_item(body: &str) -> Option<&str> {
    if body == "-" {
        Some("")
    } else {
        body.strip_prefix("- ").map(str::trim)
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

// ---------------------------------------------------------------------------
// Values and scalars
// ---------------------------------------------------------------------------

/// Parse an inline value: `{...}`, `[...]` or a scalar.
pub(crate) fn parse_value(raw: &str) -> Value {
    let v = raw.trim();
    if v.len() >= 2 && v.starts_with('{') && v.ends_with('}') {
        let mut map = Value::map();
        for part in split_top_level(&v[1..v.len() - 1]) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match find_separator(part, true) {
                Some(idx) => map.insert(unquote(part[..idx].trim()), parse_value(&part[idx + 1..])),
                None => map.insert(unquote(part), Value::Null),
            }
        }
        return map;
    }
    if v.len() >= 2 && v.starts_with('[') && v.ends_with(']') {
        let items = split_top_level(&v[1..v.len() - 1])
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(parse_value)
            .collect();
        return Value::List(items);
    }
    scalar(v)
}

/// Coerce a single scalar token.
fn scalar(v: &str) -> Value {
    if is_quoted(v, '"') || is_quoted(v, '\'') {
        return Value::Str(unquote(v));
    }
    let lower = v.to_ascii_lowercase();
    match lower.as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "~" => return Value::Null,
        _ => {}
    }
    if INTEGER.is_match(v) {
        if let Ok(i) = v.parse::<i64>() {
            return Value::Int(i);
        }
    }
    Value::Str(v.to_string())
}

fn is_quoted(v: &str, q: char) -> bool {
    v.len() >= 2 && v.starts_with(q) && v.ends_with(q)
}

/// Strip one level of quoting. Unquoted input is returned as-is.
pub(crate) fn unquote(v: &str) -> String {
    if is_quoted(v, '"') {
        return serde_json::from_str::<String>(v)
            .unwrap_or_else(|_| unescape_lenient(&v[1..v.len() - 1]));
    }
    if is_quoted(v, '\'') {
        return v[1..v.len() - 1].replace("''", "'");
    }
    v.to_string()
}

/// Fallback for double-quoted text JSON rejects (e.g. `\x41`, raw tabs).
fn unescape_lenient(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::Str(v.to_string())
    }

    #[test]
    fn comment_and_doubled_single_quote() {
        let tree = parse("version: 2 # note\nmission: 'It''s ok'");
        assert_eq!(tree.get("version"), Some(&Value::Int(2)));
        assert_eq!(tree.get("mission"), Some(&s("It's ok")));
    }

    #[test]
    fn scanner_handles_the_same_input() {
        let tree = parse_lines("version: 2 # note\nmission: 'It''s ok'");
        assert_eq!(tree.get("version"), Some(&Value::Int(2)));
        assert_eq!(tree.get("mission"), Some(&s("It's ok")));
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        assert_eq!(strip_comment(r#"a: "x # y" # z"#), r#"a: "x # y" "#);
        assert_eq!(strip_comment("a: b#c"), "a: b#c");
        assert_eq!(strip_comment("# full line"), "");
    }

    #[test]
    fn escaped_quote_does_not_close_double_quotes() {
        assert_eq!(strip_comment(r#"a: "say \" # hi" # c"#), r#"a: "say \" # hi" "#);
    }

    #[test]
    fn colon_without_space_stays_in_scalar() {
        let (k, v) = split_key_value("url: http://example.com").unwrap();
        assert_eq!(k, "url");
        assert_eq!(v, "http://example.com");
        assert!(split_key_value("no-separator-here").is_none());
    }

    #[test]
    fn quoted_key_with_colon() {
        let (k, v) = split_key_value(r#""a: b": c"#).unwrap();
        assert_eq!(k, "a: b");
        assert_eq!(v, "c");
    }

    #[test]
    fn scalar_coercion() {
        assert_eq!(scalar("TRUE"), Value::Bool(true));
        assert_eq!(scalar("False"), Value::Bool(false));
        assert_eq!(scalar("~"), Value::Null);
        assert_eq!(scalar("-12"), Value::Int(-12));
        assert_eq!(scalar("12a"), s("12a"));
        assert_eq!(scalar("'true'"), s("true"));
        assert_eq!(scalar(r#""a\nb""#), s("a\nb"));
    }

    #[test]
    fn inline_collections_respect_nesting_and_quotes() {
        let v = parse_value(r#"{a: 1, b: [x, "y, z"], c: {d: true}}"#);
        assert_eq!(v.get("a"), Some(&Value::Int(1)));
        assert_eq!(
            v.get("b"),
            Some(&Value::List(vec![s("x"), s("y, z")]))
        );
        assert_eq!(v.get("c").and_then(|c| c.get("d")), Some(&Value::Bool(true)));
    }

    #[test]
    fn inline_map_accepts_colon_without_space() {
        let v = parse_value("{enabled:false, path: x.md}");
        assert_eq!(v.get("enabled"), Some(&Value::Bool(false)));
        assert_eq!(v.get("path"), Some(&s("x.md")));
    }

    #[test]
    fn list_and_map_sections() {
        let text = "\
workflow:
  - read first   # comment
  - 'then: write'
commands:
  lint: npm run lint
  e2e: npx playwright test
approvals:
  mode: ask
  notes:
    - no force pushes
    - ask before deps
targets:
  claude:
    enabled: false
    path: docs/CLAUDE.md
  cursor: {enabled: true}
";
        let tree = parse_lines(text);
        assert_eq!(
            tree.get("workflow"),
            Some(&Value::List(vec![s("read first"), s("then: write")]))
        );
        let commands = tree.get("commands").unwrap();
        assert_eq!(commands.get("lint"), Some(&s("npm run lint")));
        assert_eq!(commands.get("e2e"), Some(&s("npx playwright test")));
        let approvals = tree.get("approvals").unwrap();
        assert_eq!(approvals.get("mode"), Some(&s("ask")));
        assert_eq!(
            approvals.get("notes"),
            Some(&Value::List(vec![s("no force pushes"), s("ask before deps")]))
        );
        let claude = tree.get("targets").and_then(|t| t.get("claude")).unwrap();
        assert_eq!(claude.get("enabled"), Some(&Value::Bool(false)));
        assert_eq!(claude.get("path"), Some(&s("docs/CLAUDE.md")));
        let cursor = tree.get("targets").and_then(|t| t.get("cursor")).unwrap();
        assert_eq!(cursor.get("enabled"), Some(&Value::Bool(true)));
    }

    #[test]
    fn approvals_key_after_notes_closes_the_notes_cursor() {
        let text = "approvals:\n  notes:\n    - one\n  mode: auto\n  - stray\n";
        let tree = parse_lines(text);
        let approvals = tree.get("approvals").unwrap();
        assert_eq!(approvals.get("notes"), Some(&Value::List(vec![s("one")])));
        assert_eq!(approvals.get("mode"), Some(&s("auto")));
    }

    #[test]
    fn empty_section_header_is_null() {
        let tree = parse_lines("workflow:\ncommands:\nversion: 1\n");
        assert_eq!(tree.get("workflow"), Some(&Value::Null));
        assert_eq!(tree.get("commands"), Some(&Value::Null));
        assert_eq!(tree, parse("workflow:\ncommands:\nversion: 1\n"));
    }

    #[test]
    fn zero_indent_list_items_belong_to_open_list() {
        let tree = parse_lines("done:\n- a\n- b\n");
        assert_eq!(tree.get("done"), Some(&Value::List(vec![s("a"), s("b")])));
    }

    #[test]
    fn literal_block_scalar_keeps_lines_and_comments() {
        let text = "mission: |\n  Ship it.\n    # not a comment\n  Done.\n\nversion: 1\n";
        let tree = parse_lines(text);
        assert_eq!(
            tree.get("mission"),
            Some(&s("Ship it.\n  # not a comment\nDone."))
        );
        assert_eq!(tree.get("version"), Some(&Value::Int(1)));
    }

    #[test]
    fn folded_block_scalar_joins_paragraphs() {
        let text = "mission: >-\n  one\n  two\n\n  three\nversion: 3\n";
        let tree = parse_lines(text);
        assert_eq!(tree.get("mission"), Some(&s("one two\nthree")));
        assert_eq!(tree.get("version"), Some(&Value::Int(3)));
    }

    #[test]
    fn nested_block_scalar_in_commands() {
        let text = "commands:\n  test: |\n    cargo test\n    cargo test --doc\n  lint: cargo clippy\n";
        let tree = parse_lines(text);
        let commands = tree.get("commands").unwrap();
        assert_eq!(commands.get("test"), Some(&s("cargo test\ncargo test --doc")));
        assert_eq!(commands.get("lint"), Some(&s("cargo clippy")));
    }

    #[test]
    fn block_spans_cover_body_lines() {
        let text = "mission: |\n  a\n  b\nversion: 1\n";
        assert_eq!(block_scalar_spans(text), vec![1..3]);
    }

    #[test]
    fn targets_entry_indent_is_taken_from_first_id() {
        let text = "targets:\n    claude:\n        path: A.md\n    gemini: G.md\n";
        let tree = parse_lines(text);
        let targets = tree.get("targets").unwrap();
        assert_eq!(
            targets.get("claude").and_then(|c| c.get("path")),
            Some(&s("A.md"))
        );
        assert_eq!(targets.get("gemini"), Some(&s("G.md")));
    }

    #[test]
    fn malformed_input_yields_partial_tree() {
        let text = "mission: keep going\n???\n  : nothing\nversion: x: y\n";
        let tree = parse(text);
        assert_eq!(tree.get("mission"), Some(&s("keep going")));
        assert_eq!(tree.get("version"), Some(&s("x: y")));
    }

    #[test]
    fn unterminated_quote_is_kept_verbatim() {
        let tree = parse_lines("mission: \"open\n");
        assert_eq!(tree.get("mission"), Some(&s("\"open")));
    }

    #[test]
    fn crlf_input_parses() {
        let tree = parse("version: 4\r\nmission: x\r\n");
        assert_eq!(tree.get("version"), Some(&Value::Int(4)));
        assert_eq!(tree.get("mission"), Some(&s("x")));
    }
}
