//! Error types for agentsync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Diagnostic;

/// All errors that can arise from loading, saving or editing the document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Underlying I/O failure, with the path it happened on.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document file does not exist at the expected path.
    #[error("no agentsync.yaml found at {path}; run `agentsync init` first")]
    NotFound { path: PathBuf },

    /// The document parsed but failed validation. Carries every error.
    #[error("{path} is invalid:\n{}", format_errors(.errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<Diagnostic>,
    },

    /// `init` found an existing document and `--force` was not given.
    #[error("{path} already exists; pass --force to overwrite")]
    AlreadyExists { path: PathBuf },

    /// A structured edit would break a document invariant.
    #[error("cannot apply edit: {0}")]
    Edit(String),
}

/// Build a `DocumentError::Io` from a path and an `io::Error`.
pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DocumentError {
    DocumentError::Io {
        path: path.into(),
        source,
    }
}

fn format_errors(errors: &[Diagnostic]) -> String {
    errors
        .iter()
        .map(|d| format!("  - {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}
