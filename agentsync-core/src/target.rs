//! Fixed registry of output targets (adapters).
//!
//! # Targets
//!
//! | Id         | Default path                        | Mode   |
//! |------------|-------------------------------------|--------|
//! | `agents`   | `AGENTS.md`                         | marker |
//! | `opencode` | `AGENTS.md`                         | marker |
//! | `claude`   | `CLAUDE.md`                         | marker |
//! | `gemini`   | `GEMINI.md`                         | marker |
//! | `copilot`  | `.github/copilot-instructions.md`   | marker |
//! | `cursor`   | `.cursor/rules/agentsync.mdc`       | full   |
//! | `windsurf` | `.windsurf/rules/agentsync.md`      | full   |
//! | `cline`    | `.clinerules/agentsync.md`          | full   |
//!
//! `agents` and `opencode` share both the file and the sentinel family, so by
//! default they produce identical text for the same path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How much of the output file the tool owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementMode {
    /// The whole file is rewritten.
    Full,
    /// Only the text between the begin/end sentinels is rewritten.
    Marker,
}

impl fmt::Display for ManagementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagementMode::Full => write!(f, "full"),
            ManagementMode::Marker => write!(f, "marker"),
        }
    }
}

/// A begin/end sentinel pair embedded verbatim in a host file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerPair {
    pub begin: &'static str,
    pub end: &'static str,
}

const AGENTS_MARKERS: MarkerPair = MarkerPair {
    begin: "<!-- agentsync:agents:begin -->",
    end: "<!-- agentsync:agents:end -->",
};
const CLAUDE_MARKERS: MarkerPair = MarkerPair {
    begin: "<!-- agentsync:claude:begin -->",
    end: "<!-- agentsync:claude:end -->",
};
const GEMINI_MARKERS: MarkerPair = MarkerPair {
    begin: "<!-- agentsync:gemini:begin -->",
    end: "<!-- agentsync:gemini:end -->",
};
const COPILOT_MARKERS: MarkerPair = MarkerPair {
    begin: "<!-- agentsync:copilot:begin -->",
    end: "<!-- agentsync:copilot:end -->",
};

/// All built-in targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    Agents,
    OpenCode,
    Claude,
    Gemini,
    Copilot,
    Cursor,
    Windsurf,
    Cline,
}

impl TargetKind {
    /// All targets in registry order. Serialization follows this order.
    pub fn all() -> &'static [TargetKind] {
        &[
            TargetKind::Agents,
            TargetKind::OpenCode,
            TargetKind::Claude,
            TargetKind::Gemini,
            TargetKind::Copilot,
            TargetKind::Cursor,
            TargetKind::Windsurf,
            TargetKind::Cline,
        ]
    }

    /// Stable id used as the key under `targets:`.
    pub fn id(&self) -> &'static str {
        match self {
            TargetKind::Agents   => "agents",
            TargetKind::OpenCode => "opencode",
            TargetKind::Claude   => "claude",
            TargetKind::Gemini   => "gemini",
            TargetKind::Copilot  => "copilot",
            TargetKind::Cursor   => "cursor",
            TargetKind::Windsurf => "windsurf",
            TargetKind::Cline    => "cline",
        }
    }

    /// Human-readable tool name, used in rendered headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetKind::Agents   => "Codex and other AGENTS.md readers",
            TargetKind::OpenCode => "OpenCode",
            TargetKind::Claude   => "Claude Code",
            TargetKind::Gemini   => "Gemini CLI",
            TargetKind::Copilot  => "GitHub Copilot",
            TargetKind::Cursor   => "Cursor",
            TargetKind::Windsurf => "Windsurf",
            TargetKind::Cline    => "Cline",
        }
    }

    /// Canonical output path, relative to the project root.
    pub fn default_path(&self) -> &'static str {
        match self {
            TargetKind::Agents | TargetKind::OpenCode => "AGENTS.md",
            TargetKind::Claude   => "CLAUDE.md",
            TargetKind::Gemini   => "GEMINI.md",
            TargetKind::Copilot  => ".github/copilot-instructions.md",
            TargetKind::Cursor   => ".cursor/rules/agentsync.mdc",
            TargetKind::Windsurf => ".windsurf/rules/agentsync.md",
            TargetKind::Cline    => ".clinerules/agentsync.md",
        }
    }

    pub fn mode(&self) -> ManagementMode {
        match self.markers() {
            Some(_) => ManagementMode::Marker,
            None => ManagementMode::Full,
        }
    }

    /// Sentinels for marker-managed targets; `None` for fully-managed ones.
    pub fn markers(&self) -> Option<MarkerPair> {
        match self {
            TargetKind::Agents | TargetKind::OpenCode => Some(AGENTS_MARKERS),
            TargetKind::Claude  => Some(CLAUDE_MARKERS),
            TargetKind::Gemini  => Some(GEMINI_MARKERS),
            TargetKind::Copilot => Some(COPILOT_MARKERS),
            TargetKind::Cursor | TargetKind::Windsurf | TargetKind::Cline => None,
        }
    }

    /// Look up a built-in target by id.
    pub fn from_id(id: &str) -> Option<TargetKind> {
        TargetKind::all().iter().copied().find(|k| k.id() == id)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetKind::from_id(s).ok_or_else(|| {
            let known: Vec<&str> = TargetKind::all().iter().map(|k| k.id()).collect();
            format!("unknown target '{s}'; expected one of: {}", known.join(", "))
        })
    }
}

/// Default path for a target id with no built-in adapter.
pub fn custom_default_path(id: &str) -> String {
    format!(".agentsync/{id}.md")
}
