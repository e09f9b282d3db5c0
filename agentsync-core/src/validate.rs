//! Schema and heuristic checks over the raw (pre-normalization) tree.
//!
//! Produces two independent lists. Errors are fatal for the caller; warnings
//! describe defaults the normalizer will substitute, or lines the parser most
//! likely misread.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::{block_scalar_spans, strip_comment};
use crate::types::TOP_LEVEL_KEYS;
use crate::value::Value;

/// Maximum number of suspicious lines listed before truncating.
pub const SUSPICIOUS_LINE_CAP: usize = 8;

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"^(?:"(?:[^"\\]|\\.)*"|'(?:[^']|'')*'|[^\s'"#:][^:]*?)\s*:(?:\s|$)"##)
        .expect("valid regex")
});
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-(?:\s|$)").expect("valid regex"));

/// A single finding, anchored to a dotted key path (`targets.claude.path`) or
/// to a line (`line 12`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub key: String,
    pub message: String,
}

impl Diagnostic {
    fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.key, self.message)
        }
    }
}

/// Result of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.push(Diagnostic::new(key, message));
    }

    fn warn(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Diagnostic::new(key, message));
    }
}

/// Validate a parsed tree against the document schema. `raw` is the text the
/// tree came from; it is scanned for lines the parser could not place.
pub fn validate(tree: &Value, raw: &str) -> Report {
    let mut report = Report::default();

    let has_keys = tree.entries().is_some_and(|e| !e.is_empty());
    if !has_keys {
        if has_content(raw) {
            report.error("", "no parseable keys found in document");
        }
        return report;
    }

    for key in TOP_LEVEL_KEYS {
        if tree.get(key).is_none() {
            report.warn(*key, "missing; using default");
        }
    }
    for (key, _) in tree.entries().unwrap_or_default() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            report.warn(key.as_str(), "unknown key; ignored");
        }
    }

    check_version(tree.get("version"), &mut report);
    check_mission(tree.get("mission"), &mut report);
    check_string_list("workflow", tree.get("workflow"), &mut report);
    check_string_list("done", tree.get("done"), &mut report);
    check_commands(tree.get("commands"), &mut report);
    check_approvals(tree.get("approvals"), &mut report);
    check_targets(tree.get("targets"), &mut report);
    check_suspicious_lines(raw, &mut report);

    report
}

fn has_content(raw: &str) -> bool {
    raw.lines().any(|l| !strip_comment(l).trim().is_empty())
}

fn check_version(value: Option<&Value>, report: &mut Report) {
    match value {
        None => {}
        Some(v) if v.as_whole_number().is_some() => {}
        Some(other) => {
            report.error("version", format!("must be a whole number, found {}", other.kind()))
        }
    }
}

fn check_mission(value: Option<&Value>, report: &mut Report) {
    match value {
        None => {}
        Some(v) if v.is_blank() => report.error("mission", "must not be blank"),
        Some(Value::List(_) | Value::Map(_)) => {
            report.error("mission", "must be a string")
        }
        Some(_) => {}
    }
}

fn check_string_list(key: &str, value: Option<&Value>, report: &mut Report) {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::List(items)) => {
            if let Some((i, bad)) = items.iter().enumerate().find(|(_, v)| v.as_str().is_none()) {
                report.error(
                    format!("{key}[{i}]"),
                    format!("must be a string, found {}", bad.kind()),
                );
            }
        }
        Some(other) => report.error(
            key,
            format!("must be a list of strings, found {}", other.kind()),
        ),
    }
}

fn check_commands(value: Option<&Value>, report: &mut Report) {
    let entries = match value {
        None | Some(Value::Null) => return,
        Some(Value::Map(entries)) => entries,
        Some(other) => {
            report.error("commands", format!("must be a mapping, found {}", other.kind()));
            return;
        }
    };
    for (name, command) in entries {
        let key = format!("commands.{name}");
        match command {
            Value::Str(s) if !s.trim().is_empty() => {}
            Value::Str(_) | Value::Null => report.error(key, "must be a non-empty command"),
            other => report.error(key, format!("must be a string, found {}", other.kind())),
        }
    }
}

fn check_approvals(value: Option<&Value>, report: &mut Report) {
    let approvals = match value {
        None | Some(Value::Null) => return,
        Some(v @ Value::Map(_)) => v,
        Some(other) => {
            report.error("approvals", format!("must be a mapping, found {}", other.kind()));
            return;
        }
    };
    match approvals.get("mode") {
        None => report.warn("approvals.mode", "missing; using default"),
        Some(v) if v.is_blank() => report.error("approvals.mode", "must not be blank"),
        Some(Value::List(_) | Value::Map(_)) => report.error("approvals.mode", "must be a string"),
        Some(_) => {}
    }
    check_string_list("approvals.notes", approvals.get("notes"), report);
}

fn check_targets(value: Option<&Value>, report: &mut Report) {
    let entries = match value {
        None | Some(Value::Null) => return,
        Some(Value::Map(entries)) => entries,
        Some(other) => {
            report.error("targets", format!("must be a mapping, found {}", other.kind()));
            return;
        }
    };
    for (id, target) in entries {
        let key = format!("targets.{id}");
        match target {
            Value::Null => report.warn(format!("{key}.path"), "missing; using default path"),
            Value::Str(path) if path.trim().is_empty() => report.error(key, "path must not be blank"),
            Value::Str(_) => {}
            Value::Map(_) => {
                match target.get("enabled") {
                    None | Some(Value::Bool(_)) => {}
                    Some(other) => report.error(
                        format!("{key}.enabled"),
                        format!("must be true or false, found {}", other.kind()),
                    ),
                }
                match target.get("path") {
                    None => report.warn(format!("{key}.path"), "missing; using default path"),
                    Some(p) if p.is_blank() => {
                        report.error(format!("{key}.path"), "must not be blank")
                    }
                    Some(Value::Str(_)) => {}
                    Some(other) => report.error(
                        format!("{key}.path"),
                        format!("must be a string, found {}", other.kind()),
                    ),
                }
            }
            other => report.error(
                key,
                format!("must be a path or a mapping, found {}", other.kind()),
            ),
        }
    }
}

/// Lines outside block scalars that look like neither `key: value` nor
/// `- item`.
fn check_suspicious_lines(raw: &str, report: &mut Report) {
    let spans = block_scalar_spans(raw);
    let suspicious: Vec<String> = raw
        .lines()
        .enumerate()
        .filter(|(i, _)| !spans.iter().any(|s| s.contains(i)))
        .filter_map(|(i, line)| {
            let body = strip_comment(line).trim();
            if body.is_empty() || KEY_VALUE.is_match(body) || LIST_ITEM.is_match(body) {
                None
            } else {
                Some(format!("line {}: {}", i + 1, truncate(body, 60)))
            }
        })
        .collect();

    if suspicious.is_empty() {
        return;
    }
    let total = suspicious.len();
    let mut listed: Vec<String> = suspicious.into_iter().take(SUSPICIOUS_LINE_CAP).collect();
    if total > SUSPICIOUS_LINE_CAP {
        listed.push(format!("… and {} more", total - SUSPICIOUS_LINE_CAP));
    }
    report.warn(
        "",
        format!("{total} line(s) were not understood and ignored:\n  {}", listed.join("\n  ")),
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn check(text: &str) -> Report {
        validate(&parse(text), text)
    }

    fn error_keys(r: &Report) -> Vec<&str> {
        r.errors.iter().map(|d| d.key.as_str()).collect()
    }

    const VALID: &str = "\
version: 1
mission: Ship it
workflow:
  - read
commands:
  lint: a
  test: b
  build: c
done:
  - green
approvals:
  mode: ask
  notes: []
targets:
  claude:
    enabled: true
    path: CLAUDE.md
";

    #[test]
    fn valid_document_is_clean() {
        let r = check(VALID);
        assert!(r.errors.is_empty(), "{:?}", r.errors);
        assert!(r.warnings.is_empty(), "{:?}", r.warnings);
    }

    #[test]
    fn missing_keys_are_warnings() {
        let r = check("mission: x\n");
        assert!(r.is_ok());
        let keys: Vec<&str> = r.warnings.iter().map(|d| d.key.as_str()).collect();
        assert!(keys.contains(&"version"));
        assert!(keys.contains(&"targets"));
        assert!(!keys.contains(&"mission"));
    }

    #[test]
    fn type_errors_are_reported() {
        let text = "\
version: abc
mission: ''
workflow: nope
commands:
  lint: ''
  test: [a]
approvals:
  mode: ' '
  notes: text
targets:
  claude:
    enabled: yes
    path: ''
  cursor: 3
";
        let r = check(text);
        let keys = error_keys(&r);
        for expected in [
            "version",
            "mission",
            "workflow",
            "commands.lint",
            "commands.test",
            "approvals.mode",
            "approvals.notes",
            "targets.claude.enabled",
            "targets.claude.path",
            "targets.cursor",
        ] {
            assert!(keys.contains(&expected), "missing error for {expected}: {keys:?}");
        }
    }

    #[test]
    fn list_items_must_be_strings() {
        let r = check("done:\n  - ok\n  - 42\n");
        assert_eq!(error_keys(&r), vec!["done[1]"]);
    }

    #[test]
    fn target_without_path_warns() {
        let r = check("targets:\n  gemini:\n    enabled: false\n");
        assert!(r.is_ok());
        assert!(r
            .warnings
            .iter()
            .any(|d| d.key == "targets.gemini.path"));
    }

    #[test]
    fn prose_without_keys_is_an_error() {
        let r = check("This project is a web app.\nIt does things.\n");
        assert_eq!(r.errors.len(), 1);
        assert!(r.errors[0].message.contains("no parseable keys"));
    }

    #[test]
    fn blank_or_comment_only_input_is_not_an_error() {
        assert!(check("").is_ok());
        assert!(check("# just a comment\n\n").is_ok());
    }

    #[test]
    fn suspicious_lines_are_capped() {
        let mut text = String::from("mission: x\n");
        for i in 0..10 {
            text.push_str(&format!("garbage line {i}\n"));
        }
        let r = check(&text);
        let w = r
            .warnings
            .iter()
            .find(|d| d.message.contains("not understood"))
            .expect("suspicious warning");
        assert!(w.message.starts_with("10 line(s)"));
        assert!(w.message.contains("line 2: garbage line 0"));
        assert!(w.message.contains("… and 2 more"));
        assert!(!w.message.contains("garbage line 9"));
    }

    #[test]
    fn block_scalar_bodies_are_not_suspicious() {
        let text = "mission: |\n  free prose here\n  more prose\nversion: 1\n";
        let r = check(text);
        assert!(!r.warnings.iter().any(|d| d.message.contains("not understood")));
    }

    #[test]
    fn key_pattern_handles_quotes_and_hashes() {
        assert!(KEY_VALUE.is_match("lint: cargo clippy"));
        assert!(KEY_VALUE.is_match(r#""a # b": x"#));
        assert!(KEY_VALUE.is_match("'it''s': x"));
        assert!(!KEY_VALUE.is_match("#lint: x"));
        assert!(!KEY_VALUE.is_match("http://example.com"));
    }

    #[test]
    fn version_accepts_whole_numbers_only() {
        for ok in ["version: 1\n", "version: 1.0\n", "version: '2'\n"] {
            assert!(!error_keys(&check(ok)).contains(&"version"), "{ok}");
        }
        let r = check("version: 1.5\n");
        let err = r.errors.iter().find(|d| d.key == "version").expect("version error");
        assert!(err.message.starts_with("must be a whole number"));
    }

    #[test]
    fn unknown_top_level_key_warns() {
        let r = check("mission: x\nextras: 1\n");
        assert!(r.warnings.iter().any(|d| d.key == "extras"));
    }
}
