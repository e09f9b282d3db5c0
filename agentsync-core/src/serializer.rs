//! Canonical text form of a [`Document`].
//!
//! Output is stable: fixed key order, every string double-quoted with JSON
//! escapes, two-space indentation and a trailing newline. Canonical text is
//! always valid YAML, so re-parsing takes the strict path.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::parser::parse_value;
use crate::target::TargetKind;
use crate::types::{Document, TargetConfig};
use crate::value::Value;

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid regex"));

/// Booleans under YAML 1.1; older readers retype them even when ours won't.
const YAML11_WORDS: &[&str] = &["y", "n", "yes", "no", "on", "off"];

/// Serialize a normalized document.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "version: {}", doc.version);
    let _ = writeln!(out, "mission: {}", quote(&doc.mission));
    write_list(&mut out, "workflow", &doc.workflow, 0);

    out.push_str("commands:\n");
    for (name, command) in doc.ordered_commands() {
        let _ = writeln!(out, "  {}: {}", key(name), quote(command));
    }

    write_list(&mut out, "done", &doc.done, 0);

    out.push_str("approvals:\n");
    let _ = writeln!(out, "  mode: {}", quote(&doc.approvals.mode));
    write_list(&mut out, "notes", &doc.approvals.notes, 2);

    out.push_str("targets:\n");
    for (id, target) in ordered_targets(doc) {
        let _ = writeln!(out, "  {}:", key(id));
        let _ = writeln!(out, "    enabled: {}", target.enabled);
        let _ = writeln!(out, "    path: {}", quote(&target.path));
    }

    out
}

/// Built-in targets in registry order, then custom ids alphabetically.
fn ordered_targets(doc: &Document) -> Vec<(&str, &TargetConfig)> {
    let mut out: Vec<(&str, &TargetConfig)> = TargetKind::all()
        .iter()
        .filter_map(|kind| {
            doc.targets
                .get_key_value(kind.id())
                .map(|(k, v)| (k.as_str(), v))
        })
        .collect();
    out.extend(
        doc.targets
            .iter()
            .filter(|(id, _)| TargetKind::from_id(id).is_none())
            .map(|(id, t)| (id.as_str(), t)),
    );
    out
}

fn write_list(out: &mut String, name: &str, items: &[String], indent: usize) {
    let pad = " ".repeat(indent);
    if items.is_empty() {
        let _ = writeln!(out, "{pad}{name}: []");
        return;
    }
    let _ = writeln!(out, "{pad}{name}:");
    for item in items {
        let _ = writeln!(out, "{pad}  - {}", quote(item));
    }
}

/// Double-quoted scalar with JSON escaping.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.escape_default()))
}

/// Mapping key, bare only when YAML would read it back as the same string.
fn key(k: &str) -> String {
    if is_bare_key(k) {
        k.to_string()
    } else {
        quote(k)
    }
}

fn is_bare_key(k: &str) -> bool {
    let leads_with_letter = k.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_');
    leads_with_letter
        && BARE_KEY.is_match(k)
        && !YAML11_WORDS.contains(&k.to_ascii_lowercase().as_str())
        && matches!(parse_value(k), Value::Str(_))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Defaults;
    use crate::normalize::normalize;
    use crate::parser::{parse, parse_lines};

    fn doc() -> Document {
        let mut d = Defaults::default().document();
        d.mission = "Say \"hi\" # not a comment\nsecond line".into();
        d.commands.insert("e2e".into(), "playwright test".into());
        d.commands.insert("a weird: key".into(), "x".into());
        d.done.clear();
        d.targets.insert(
            "aider".into(),
            TargetConfig { enabled: false, path: ".agentsync/aider.md".into() },
        );
        d
    }

    #[test]
    fn key_order_is_fixed() {
        let text = serialize(&doc());
        let positions: Vec<usize> = crate::types::TOP_LEVEL_KEYS
            .iter()
            .map(|k| text.find(&format!("\n{k}:")).unwrap_or(0))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
        assert!(text.starts_with("version: 1\n"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn required_commands_first_and_empty_lists_inline() {
        let text = serialize(&doc());
        let lint = text.find("  lint:").unwrap();
        let e2e = text.find("  e2e:").unwrap();
        assert!(lint < e2e);
        assert!(text.contains("\"a weird: key\": \"x\""));
        assert!(text.contains("done: []\n"));
    }

    #[test]
    fn custom_targets_follow_builtins() {
        let text = serialize(&doc());
        let cline = text.find("  cline:").unwrap();
        let aider = text.find("  aider:").unwrap();
        assert!(cline < aider);
        assert!(text.contains("  aider:\n    enabled: false\n    path: \".agentsync/aider.md\"\n"));
    }

    #[test]
    fn keys_yaml_would_retype_are_quoted() {
        for k in ["True", "NULL", "~", "0x10", "1e3", "007", "-x", ".inf", "yes", "Off"] {
            assert_eq!(key(k), quote(k), "{k}");
        }
        for k in ["lint", "e2e", "my-tool", "node_modules.v2", "_private"] {
            assert_eq!(key(k), k);
        }
    }

    #[test]
    fn round_trips_through_both_parse_paths() {
        let defaults = Defaults::default();
        let original = normalize(&parse(&serialize(&doc())), &defaults);
        assert_eq!(original, doc());

        let text = serialize(&original);
        assert_eq!(normalize(&parse_lines(&text), &defaults), original);
    }
}
