//! Default values used by `init` and by the normalizer.
//!
//! Defaults are seeded from a [`Manifest`] (named scripts read from the
//! project's package manifest by `agentsync-detector`). Without a manifest the
//! required commands fall back to placeholders that tell the user what to set.

use std::collections::BTreeMap;

use crate::target::TargetKind;
use crate::types::{Approvals, Document, TargetConfig, CURRENT_VERSION, REQUIRED_COMMANDS};

/// Optional scripts copied into `commands` when the manifest defines them.
const OPTIONAL_SCRIPTS: &[&str] = &["typecheck", "format"];

/// Named scripts discovered in a project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    /// Package / crate name, when the manifest declares one.
    pub name: Option<String>,
    /// Manifest file the scripts came from (e.g. `package.json`).
    pub source: String,
    /// Script name → runnable shell command.
    pub scripts: BTreeMap<String, String>,
}

/// Computed defaults for every document field except `targets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub mission: String,
    pub workflow: Vec<String>,
    pub commands: BTreeMap<String, String>,
    pub done: Vec<String>,
    pub approvals: Approvals,
}

impl Defaults {
    /// Build defaults from an optional manifest.
    pub fn from_manifest(manifest: Option<&Manifest>) -> Self {
        let mut commands = BTreeMap::new();
        for name in REQUIRED_COMMANDS {
            let command = manifest
                .and_then(|m| m.scripts.get(*name))
                .filter(|c| !c.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| placeholder_command(name));
            commands.insert((*name).to_string(), command);
        }
        if let Some(m) = manifest {
            for name in OPTIONAL_SCRIPTS {
                if let Some(command) = m.scripts.get(*name).filter(|c| !c.trim().is_empty()) {
                    commands.insert((*name).to_string(), command.clone());
                }
            }
        }

        let mission = match manifest.and_then(|m| m.name.as_deref()) {
            Some(name) if !name.trim().is_empty() => format!(
                "Maintain and improve {}. Keep changes small, tested and easy to review.",
                name.trim()
            ),
            _ => "Describe what this project does and what agents should optimise for.".to_string(),
        };

        let done = vec![
            format!("`{}` passes", commands["lint"]),
            format!("`{}` passes", commands["test"]),
            format!("`{}` succeeds", commands["build"]),
        ];

        Defaults {
            mission,
            workflow: vec![
                "Read the relevant code and tests before editing.".to_string(),
                "Make the smallest change that solves the task.".to_string(),
                "Run lint, test and build before reporting completion.".to_string(),
            ],
            commands,
            done,
            approvals: Approvals {
                mode: "ask".to_string(),
                notes: vec![
                    "Ask before adding or upgrading dependencies.".to_string(),
                    "Ask before deleting files or rewriting history.".to_string(),
                ],
            },
        }
    }

    /// A complete document using these defaults and every built-in target.
    pub fn document(&self) -> Document {
        Document {
            version: CURRENT_VERSION,
            mission: self.mission.clone(),
            workflow: self.workflow.clone(),
            commands: self.commands.clone(),
            done: self.done.clone(),
            approvals: self.approvals.clone(),
            targets: default_targets(),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults::from_manifest(None)
    }
}

/// One enabled entry per built-in target at its canonical path.
pub fn default_targets() -> BTreeMap<String, TargetConfig> {
    TargetKind::all()
        .iter()
        .map(|k| {
            (
                k.id().to_string(),
                TargetConfig {
                    enabled: true,
                    path: k.default_path().to_string(),
                },
            )
        })
        .collect()
}

fn placeholder_command(name: &str) -> String {
    format!("echo \"set commands.{name} in agentsync.yaml\"")
}
