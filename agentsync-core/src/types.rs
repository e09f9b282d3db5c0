//! Domain types for the agentsync document.
//!
//! All types are serde-serializable; the renderer feeds them to templates as
//! JSON. The on-disk text form is produced by [`crate::serializer`], not serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Commands that every document must define.
pub const REQUIRED_COMMANDS: &[&str] = &["lint", "test", "build"];

/// Top-level keys, in canonical order.
pub const TOP_LEVEL_KEYS: &[&str] = &[
    "version",
    "mission",
    "workflow",
    "commands",
    "done",
    "approvals",
    "targets",
];

/// Current document format version.
pub const CURRENT_VERSION: i64 = 1;

/// Approval policy for agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approvals {
    pub mode: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Per-target output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub enabled: bool,
    /// Path relative to the project root.
    pub path: String,
}

/// The fully-populated document. Produced only by [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub version: i64,
    pub mission: String,
    pub workflow: Vec<String>,
    /// Name → shell command. Always contains `lint`, `test` and `build`.
    pub commands: BTreeMap<String, String>,
    pub done: Vec<String>,
    pub approvals: Approvals,
    /// Target id → config. Always contains every built-in target.
    pub targets: BTreeMap<String, TargetConfig>,
}

impl Document {
    /// Ids of enabled targets, in map order.
    pub fn enabled_targets(&self) -> impl Iterator<Item = (&str, &TargetConfig)> {
        self.targets
            .iter()
            .filter(|(_, t)| t.enabled)
            .map(|(id, t)| (id.as_str(), t))
    }

    /// Commands in display order: required ones first, then custom names.
    pub fn ordered_commands(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = REQUIRED_COMMANDS
            .iter()
            .filter_map(|name| {
                self.commands
                    .get_key_value(*name)
                    .map(|(k, v)| (k.as_str(), v.as_str()))
            })
            .collect();
        out.extend(
            self.commands
                .iter()
                .filter(|(k, _)| !REQUIRED_COMMANDS.contains(&k.as_str()))
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
