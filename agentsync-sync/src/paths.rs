//! Root-confined path resolution.
//!
//! A configured target path is accepted only if it is relative, stays inside
//! the project root after lexical normalisation, and no existing component on
//! the way to it is a symlink. [`PathResolver::check`] repeats the symlink walk
//! and must be called immediately before every read and write.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;

/// A path that passed [`PathResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SafePath {
    /// Normalised root-relative form, `/`-separated.
    pub relative: String,
    /// `root.join(relative)`.
    pub absolute: PathBuf,
}

/// Resolves configured paths against one project root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate `configured` and return its location under the root.
    pub fn resolve(&self, configured: &str) -> Result<SafePath, PathError> {
        let relative = lexical_relative(configured)?;
        let safe = SafePath {
            relative: relative
                .iter()
                .map(|c| c.to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            absolute: self.root.join(&relative),
        };
        self.check(&safe)?;
        Ok(safe)
    }

    /// Walk every component below the root; fail if any existing one is a
    /// symlink. Components that do not exist yet end the walk.
    pub fn check(&self, safe: &SafePath) -> Result<(), PathError> {
        let mut current = self.root.clone();
        for component in Path::new(&safe.relative).components() {
            current.push(component);
            match std::fs::symlink_metadata(&current) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    return Err(PathError::Symlink {
                        path: safe.relative.clone(),
                        component: current,
                    });
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => break,
                Err(source) => {
                    return Err(PathError::Inspect { component: current, source });
                }
            }
        }
        Ok(())
    }
}

/// Lexically normalise `configured` into a root-relative path.
fn lexical_relative(configured: &str) -> Result<PathBuf, PathError> {
    let trimmed = configured.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }
    // Windows-style roots are refused on every platform.
    let drive = matches!(trimmed.as_bytes(), [d, b':', ..] if d.is_ascii_alphabetic());
    if drive || trimmed.starts_with(['/', '\\']) {
        return Err(PathError::Absolute { path: trimmed.to_string() });
    }

    let mut out = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return Err(PathError::Escapes { path: trimmed.to_string() });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::Absolute { path: trimmed.to_string() });
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
