//! `agentsync edit`: structured changes to agentsync.yaml.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use agentsync_core::{document, edit, Edit};

use super::load;

/// Arguments for `agentsync edit`. Edits apply in the order listed here and
/// are saved only if every one of them succeeds.
#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Replace the mission statement.
    #[arg(long, value_name = "TEXT")]
    pub mission: Option<String>,

    /// Add or replace a command (repeatable).
    #[arg(long = "command", value_name = "NAME=CMD", value_parser = parse_pair)]
    pub commands: Vec<(String, String)>,

    /// Remove a command. lint, test and build cannot be removed.
    #[arg(long = "remove-command", value_name = "NAME")]
    pub remove_commands: Vec<String>,

    /// Append a workflow step (repeatable).
    #[arg(long = "add-workflow", value_name = "TEXT")]
    pub workflow: Vec<String>,

    /// Append a definition-of-done item (repeatable).
    #[arg(long = "add-done", value_name = "TEXT")]
    pub done: Vec<String>,

    /// Set the approvals mode.
    #[arg(long = "approval-mode", value_name = "MODE")]
    pub approval_mode: Option<String>,

    /// Append an approvals note (repeatable).
    #[arg(long = "add-approval-note", value_name = "TEXT")]
    pub approval_notes: Vec<String>,

    /// Enable a target (repeatable).
    #[arg(long = "enable", value_name = "ID")]
    pub enable: Vec<String>,

    /// Disable a target (repeatable).
    #[arg(long = "disable", value_name = "ID")]
    pub disable: Vec<String>,

    /// Point a target at a different file (repeatable).
    #[arg(long = "target-path", value_name = "ID=PATH", value_parser = parse_pair)]
    pub target_paths: Vec<(String, String)>,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

impl EditArgs {
    fn edits(self) -> Vec<Edit> {
        let mut edits = Vec::new();
        edits.extend(self.mission.map(Edit::SetMission));
        edits.extend(
            self.commands
                .into_iter()
                .map(|(name, command)| Edit::SetCommand { name, command }),
        );
        edits.extend(self.remove_commands.into_iter().map(Edit::RemoveCommand));
        edits.extend(self.workflow.into_iter().map(Edit::AddWorkflow));
        edits.extend(self.done.into_iter().map(Edit::AddDone));
        edits.extend(self.approval_mode.map(Edit::SetApprovalMode));
        edits.extend(self.approval_notes.into_iter().map(Edit::AddApprovalNote));
        edits.extend(
            self.enable
                .into_iter()
                .map(|id| Edit::SetTargetEnabled { id, enabled: true }),
        );
        edits.extend(
            self.disable
                .into_iter()
                .map(|id| Edit::SetTargetEnabled { id, enabled: false }),
        );
        edits.extend(
            self.target_paths
                .into_iter()
                .map(|(id, path)| Edit::SetTargetPath { id, path }),
        );
        edits
    }

    pub fn run(self, root: &Path) -> Result<()> {
        let edits = self.edits();
        if edits.is_empty() {
            bail!("no edits given; see `agentsync edit --help`");
        }

        let mut doc = load(root)?.document;
        edit::apply(&mut doc, &edits).context("edit rejected, agentsync.yaml left unchanged")?;
        let path = document::save_at(root, &doc)?;
        println!("✓ Applied {} edit(s) to {}", edits.len(), path.display());
        println!("Run `agentsync sync --write` to update the target files.");
        Ok(())
    }
}
