//! Error types for agentsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use agentsync_renderer::RenderError;

use crate::plan::Conflict;

/// Reasons a configured target path is refused.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("absolute paths are not allowed: {path}")]
    Absolute { path: String },

    #[error("path escapes the project root: {path}")]
    Escapes { path: String },

    /// An existing component (intermediate or final) is a symlink.
    #[error("refusing to follow symlink at {component} (for {path})")]
    Symlink { path: String, component: PathBuf },

    #[error("cannot inspect {component}: {source}")]
    Inspect {
        component: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A target's path failed the safety check.
    #[error("target '{target}': {source}")]
    Path {
        target: String,
        #[source]
        source: PathError,
    },

    /// Two or more targets want different content at the same path.
    #[error("conflicting outputs, nothing was written:\n{}", format_conflicts(.conflicts))]
    Conflict { conflicts: Vec<Conflict> },

    /// `--target` named an id the document does not define.
    #[error("unknown target '{id}'")]
    UnknownTarget { id: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

fn format_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("  {}: {}", c.path, c.target_ids.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
