//! Value tree + defaults → fully-populated [`Document`].
//!
//! Total: anything missing, blank or of the wrong shape is replaced by the
//! corresponding default. Run the validator first if the caller needs to
//! know what was replaced.

use std::collections::BTreeMap;

use crate::defaults::Defaults;
use crate::target::{custom_default_path, TargetKind};
use crate::types::{Approvals, Document, TargetConfig, CURRENT_VERSION, REQUIRED_COMMANDS};
use crate::value::Value;

/// Build a [`Document`] from a parsed tree, filling gaps from `defaults`.
pub fn normalize(tree: &Value, defaults: &Defaults) -> Document {
    Document {
        version: version(tree.get("version")),
        mission: tree
            .get("mission")
            .and_then(Value::as_text)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| defaults.mission.clone()),
        workflow: text_list(tree.get("workflow")).unwrap_or_else(|| defaults.workflow.clone()),
        commands: commands(tree.get("commands"), defaults),
        done: text_list(tree.get("done")).unwrap_or_else(|| defaults.done.clone()),
        approvals: approvals(tree.get("approvals"), defaults),
        targets: targets(tree.get("targets")),
    }
}

fn version(value: Option<&Value>) -> i64 {
    value.and_then(Value::as_whole_number).unwrap_or(CURRENT_VERSION)
}

/// A list of non-blank texts. A lone scalar counts as a one-item list.
/// `None` when the value is absent or not list-like.
fn text_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::List(items) => Some(
            items
                .iter()
                .filter_map(Value::as_text)
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        scalar => scalar.as_text().filter(|s| !s.is_empty()).map(|s| vec![s]),
    }
}

fn commands(value: Option<&Value>, defaults: &Defaults) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = value
        .and_then(Value::entries)
        .unwrap_or_default()
        .iter()
        .filter_map(|(name, cmd)| {
            let name = name.trim();
            let cmd = cmd.as_text()?;
            (!name.is_empty() && !cmd.is_empty()).then(|| (name.to_string(), cmd))
        })
        .collect();

    for name in REQUIRED_COMMANDS {
        if !out.contains_key(*name) {
            if let Some(fallback) = defaults.commands.get(*name) {
                out.insert((*name).to_string(), fallback.clone());
            }
        }
    }
    out
}

fn approvals(value: Option<&Value>, defaults: &Defaults) -> Approvals {
    let mode = value
        .and_then(|a| a.get("mode"))
        .and_then(Value::as_text)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| defaults.approvals.mode.clone());
    let notes = text_list(value.and_then(|a| a.get("notes")))
        .unwrap_or_else(|| defaults.approvals.notes.clone());
    Approvals { mode, notes }
}

fn targets(value: Option<&Value>) -> BTreeMap<String, TargetConfig> {
    let entries = value.and_then(Value::entries).unwrap_or_default();

    let mut out = BTreeMap::new();
    for kind in TargetKind::all() {
        let configured = entries
            .iter()
            .find(|(id, _)| id == kind.id())
            .map(|(_, v)| v);
        out.insert(
            kind.id().to_string(),
            target_config(configured, kind.default_path()),
        );
    }
    for (id, configured) in entries {
        let id = id.trim();
        if id.is_empty() || TargetKind::from_id(id).is_some() {
            continue;
        }
        out.insert(
            id.to_string(),
            target_config(Some(configured), &custom_default_path(id)),
        );
    }
    out
}

/// `{enabled, path}` map, a bare path string, or a bare boolean.
fn target_config(value: Option<&Value>, default_path: &str) -> TargetConfig {
    let (enabled, path) = match value {
        Some(v @ Value::Map(_)) => (
            v.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            v.get("path").and_then(Value::as_text),
        ),
        Some(Value::Str(path)) => (true, Some(path.trim().to_string())),
        Some(Value::Bool(enabled)) => (*enabled, None),
        _ => (true, None),
    };
    TargetConfig {
        enabled,
        path: path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| default_path.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn norm(text: &str) -> Document {
        normalize(&parse(text), &Defaults::default())
    }

    #[test]
    fn empty_input_yields_defaults() {
        let doc = norm("");
        let expected = Defaults::default().document();
        assert_eq!(doc, expected);
    }

    #[test]
    fn custom_commands_survive_and_required_are_filled() {
        let doc = norm("commands:\n  lint: eslint .\n  e2e: playwright test\n  blank: ''\n");
        assert_eq!(doc.commands["lint"], "eslint .");
        assert_eq!(doc.commands["e2e"], "playwright test");
        assert!(doc.commands.contains_key("test"));
        assert!(doc.commands.contains_key("build"));
        assert!(!doc.commands.contains_key("blank"));
    }

    #[test]
    fn unknown_target_gets_synthesized_path() {
        let doc = norm("targets:\n  aider:\n    enabled: true\n");
        assert_eq!(doc.targets["aider"].path, ".agentsync/aider.md");
        assert_eq!(doc.targets.len(), TargetKind::all().len() + 1);
    }

    #[test]
    fn target_shorthands() {
        let doc = norm("targets:\n  claude: docs/CLAUDE.md\n  cursor: false\n");
        assert_eq!(doc.targets["claude"].path, "docs/CLAUDE.md");
        assert!(doc.targets["claude"].enabled);
        assert!(!doc.targets["cursor"].enabled);
        assert_eq!(doc.targets["cursor"].path, ".cursor/rules/agentsync.mdc");
    }

    #[test]
    fn blank_target_path_falls_back_to_default() {
        let doc = norm("targets:\n  gemini:\n    path: ''\n");
        assert_eq!(doc.targets["gemini"].path, "GEMINI.md");
    }

    #[test]
    fn explicit_empty_list_is_kept() {
        let doc = norm("workflow: []\n");
        assert!(doc.workflow.is_empty());
    }

    #[test]
    fn float_spelled_version_is_read_as_integer() {
        assert_eq!(norm("version: 1.0\n").version, 1);
        assert_eq!(norm("version: 2.5\n").version, CURRENT_VERSION);
    }

    #[test]
    fn wrong_shapes_fall_back() {
        let doc = norm("version: many\nmission: [a]\napprovals: nope\n");
        assert_eq!(doc.version, CURRENT_VERSION);
        assert_eq!(doc.mission, Defaults::default().mission);
        assert_eq!(doc.approvals, Defaults::default().approvals);
    }
}
