//! Error types for agentsync-renderer.

use thiserror::Error;

/// All errors that can arise from template rendering operations.
///
/// Context serialization goes through `tera::Context::from_serialize`, so its
/// failures arrive as [`tera::Error`] too.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),
}
