//! Structured edits applied to a normalized [`Document`].
//!
//! Edits are validated against the document invariants before anything is
//! changed: a batch either applies completely or not at all.

use crate::error::DocumentError;
use crate::target::{custom_default_path, TargetKind};
use crate::types::{Document, TargetConfig, REQUIRED_COMMANDS};

/// One structured change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    SetMission(String),
    SetCommand { name: String, command: String },
    /// Not allowed for `lint`, `test` or `build`.
    RemoveCommand(String),
    AddWorkflow(String),
    AddDone(String),
    SetApprovalMode(String),
    AddApprovalNote(String),
    /// Unknown ids create a custom target at `.agentsync/<id>.md`.
    SetTargetEnabled { id: String, enabled: bool },
    SetTargetPath { id: String, path: String },
}

/// Apply `edits` in order. On error `doc` is left untouched.
pub fn apply(doc: &mut Document, edits: &[Edit]) -> Result<(), DocumentError> {
    let mut next = doc.clone();
    for edit in edits {
        apply_one(&mut next, edit)?;
    }
    *doc = next;
    Ok(())
}

fn apply_one(doc: &mut Document, edit: &Edit) -> Result<(), DocumentError> {
    match edit {
        Edit::SetMission(mission) => doc.mission = non_blank("mission", mission)?,
        Edit::SetCommand { name, command } => {
            let name = non_blank("command name", name)?;
            let command = non_blank(&format!("commands.{name}"), command)?;
            doc.commands.insert(name, command);
        }
        Edit::RemoveCommand(name) => {
            let name = name.trim();
            if REQUIRED_COMMANDS.contains(&name) {
                return Err(DocumentError::Edit(format!(
                    "commands.{name} is required and cannot be removed"
                )));
            }
            if doc.commands.remove(name).is_none() {
                return Err(DocumentError::Edit(format!("no command named '{name}'")));
            }
        }
        Edit::AddWorkflow(step) => doc.workflow.push(non_blank("workflow step", step)?),
        Edit::AddDone(item) => doc.done.push(non_blank("done item", item)?),
        Edit::SetApprovalMode(mode) => doc.approvals.mode = non_blank("approvals.mode", mode)?,
        Edit::AddApprovalNote(note) => doc.approvals.notes.push(non_blank("approval note", note)?),
        Edit::SetTargetEnabled { id, enabled } => target_entry(doc, id)?.enabled = *enabled,
        Edit::SetTargetPath { id, path } => {
            let path = non_blank(&format!("targets.{}.path", id.trim()), path)?;
            target_entry(doc, id)?.path = path;
        }
    }
    Ok(())
}

fn non_blank(what: &str, value: &str) -> Result<String, DocumentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DocumentError::Edit(format!("{what} must not be blank")));
    }
    Ok(value.to_string())
}

fn target_entry<'a>(doc: &'a mut Document, id: &str) -> Result<&'a mut TargetConfig, DocumentError> {
    let id = non_blank("target id", id)?;
    let default_path = match TargetKind::from_id(&id) {
        Some(kind) => kind.default_path().to_string(),
        None => custom_default_path(&id),
    };
    Ok(doc.targets.entry(id).or_insert(TargetConfig {
        enabled: true,
        path: default_path,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Defaults;

    fn doc() -> Document {
        Defaults::default().document()
    }

    #[test]
    fn edits_apply_in_order() {
        let mut d = doc();
        apply(
            &mut d,
            &[
                Edit::SetMission("  New mission ".into()),
                Edit::SetCommand { name: "e2e".into(), command: "playwright test".into() },
                Edit::AddWorkflow("Write a test first.".into()),
                Edit::SetApprovalMode("auto".into()),
                Edit::SetTargetEnabled { id: "cursor".into(), enabled: false },
                Edit::SetTargetPath { id: "claude".into(), path: "docs/CLAUDE.md".into() },
            ],
        )
        .expect("apply");
        assert_eq!(d.mission, "New mission");
        assert_eq!(d.commands["e2e"], "playwright test");
        assert_eq!(d.workflow.last().map(String::as_str), Some("Write a test first."));
        assert_eq!(d.approvals.mode, "auto");
        assert!(!d.targets["cursor"].enabled);
        assert_eq!(d.targets["claude"].path, "docs/CLAUDE.md");
    }

    #[test]
    fn required_command_cannot_be_removed() {
        let mut d = doc();
        let err = apply(&mut d, &[Edit::RemoveCommand("test".into())]).unwrap_err();
        assert!(err.to_string().contains("required"));
        assert!(d.commands.contains_key("test"));
    }

    #[test]
    fn failed_batch_leaves_document_untouched() {
        let mut d = doc();
        let before = d.clone();
        let result = apply(
            &mut d,
            &[
                Edit::SetMission("changed".into()),
                Edit::SetTargetPath { id: "gemini".into(), path: "  ".into() },
            ],
        );
        assert!(result.is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn unknown_target_is_created_with_default_path() {
        let mut d = doc();
        apply(&mut d, &[Edit::SetTargetEnabled { id: "aider".into(), enabled: true }]).unwrap();
        assert_eq!(d.targets["aider"].path, ".agentsync/aider.md");
    }

    #[test]
    fn custom_command_can_be_removed() {
        let mut d = doc();
        apply(
            &mut d,
            &[
                Edit::SetCommand { name: "e2e".into(), command: "x".into() },
                Edit::RemoveCommand("e2e".into()),
            ],
        )
        .unwrap();
        assert!(!d.commands.contains_key("e2e"));
    }
}
