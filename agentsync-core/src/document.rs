//! Reading and writing `agentsync.yaml`.
//!
//! # API pattern
//!
//! Every function takes the project root explicitly (`_at(root, …)`); the CLI
//! passes `--root` or the current directory, tests pass a `TempDir`.

use std::path::{Path, PathBuf};

use crate::defaults::Defaults;
use crate::error::{io_err, DocumentError};
use crate::normalize::normalize;
use crate::parser::parse;
use crate::serializer::serialize;
use crate::types::Document;
use crate::validate::{validate, Diagnostic};

/// File name of the source document, relative to the project root.
pub const DOCUMENT_FILE: &str = "agentsync.yaml";

/// A successfully loaded document plus non-fatal validator findings.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub document: Document,
    pub warnings: Vec<Diagnostic>,
    /// Raw text as read from disk (LF-normalised).
    pub raw: String,
}

impl Loaded {
    /// `true` when the on-disk text is already in canonical form.
    pub fn is_canonical(&self) -> bool {
        serialize(&self.document) == self.raw
    }
}

// ---------------------------------------------------------------------------
// 1. Paths
// ---------------------------------------------------------------------------

/// `<root>/agentsync.yaml`. Pure, no I/O.
pub fn document_path_at(root: &Path) -> PathBuf {
    root.join(DOCUMENT_FILE)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load, validate and normalize `<root>/agentsync.yaml`.
///
/// Returns `DocumentError::NotFound` if absent and `DocumentError::Invalid`
/// (with every validator error) if the document fails validation.
pub fn load_at(root: &Path, defaults: &Defaults) -> Result<Loaded, DocumentError> {
    let path = document_path_at(root);
    if !path.exists() {
        return Err(DocumentError::NotFound { path });
    }
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| io_err(&path, e))?
        .replace("\r\n", "\n");
    load_str(&path, &raw, defaults)
}

/// Same as [`load_at`] for text already in memory. `path` is used only for
/// error messages.
pub fn load_str(path: &Path, raw: &str, defaults: &Defaults) -> Result<Loaded, DocumentError> {
    let tree = parse(raw);
    let report = validate(&tree, raw);
    if !report.errors.is_empty() {
        return Err(DocumentError::Invalid {
            path: path.to_path_buf(),
            errors: report.errors,
        });
    }
    for w in &report.warnings {
        log::debug!("{}: {w}", path.display());
    }
    Ok(Loaded {
        document: normalize(&tree, defaults),
        warnings: report.warnings,
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `doc` in canonical form to `<root>/agentsync.yaml`.
///
/// Write flow: serialize → `agentsync.yaml.tmp` sibling → `rename`.
pub fn save_at(root: &Path, doc: &Document) -> Result<PathBuf, DocumentError> {
    let path = document_path_at(root);
    let tmp_path = path.with_file_name(format!("{DOCUMENT_FILE}.tmp"));

    std::fs::write(&tmp_path, serialize(doc)).map_err(|e| io_err(&tmp_path, e))?;
    std::fs::rename(&tmp_path, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        io_err(&path, e)
    })?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Create `<root>/agentsync.yaml` from `defaults`.
///
/// Refuses to overwrite an existing document unless `force` is set.
pub fn init_at(root: &Path, defaults: &Defaults, force: bool) -> Result<Document, DocumentError> {
    let path = document_path_at(root);
    if path.exists() && !force {
        return Err(DocumentError::AlreadyExists { path });
    }
    let doc = defaults.document();
    save_at(root, &doc)?;
    Ok(doc)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
