//! Staged writer for a [`PlanSet`].
//!
//! ## Write protocol
//!
//! 1. Re-run the pre-flight conflict check.
//! 2. Deduplicate plans by path; unchanged paths are reported and skipped.
//! 3. For every changed path: re-check the path, create the parent
//!    directory, snapshot the old file to a `.bak` sibling if asked, and
//!    write the new content to `.<name>.agentsync.tmp` in the same directory.
//!    Both files are created with `create_new`; a stale temp entry is
//!    unlinked first, so a planted symlink is never written through.
//! 4. Only once every temp file exists: re-check each path again and rename
//!    its temp file over it. `rename` replaces a final symlink instead of
//!    following it.
//!
//! Any failure removes the temp files that have not been renamed yet.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{io_err, SyncError};
use crate::paths::{PathResolver, SafePath};
use crate::plan::PlanSet;

// ---------------------------------------------------------------------------
// Write result
// ---------------------------------------------------------------------------

/// Outcome for one output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written; `backup` holds the snapshot of its old content.
    Written { path: PathBuf, backup: Option<PathBuf> },
    /// Desired content already on disk.
    Unchanged { path: PathBuf },
    /// Dry run: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// Options for [`apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Report only; touch nothing.
    pub dry_run: bool,
    /// Snapshot existing files to `<name>.<YYYYMMDDTHHMMSS>.bak` first.
    pub backup: bool,
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

struct Staged<'a> {
    target: &'a str,
    path: &'a SafePath,
    tmp: PathBuf,
    backup: Option<PathBuf>,
}

/// Carry out `set` under `resolver`'s root.
pub fn apply(
    set: &PlanSet,
    resolver: &PathResolver,
    opts: WriteOptions,
) -> Result<Vec<WriteResult>, SyncError> {
    set.preflight()?;

    let unique = set.unique();
    let mut results = Vec::with_capacity(unique.len());

    if opts.dry_run {
        for plan in unique {
            let path = plan.path.absolute.clone();
            results.push(if plan.changed {
                tracing::info!("[dry-run] would write: {}", plan.path.relative);
                WriteResult::WouldWrite { path }
            } else {
                WriteResult::Unchanged { path }
            });
        }
        return Ok(results);
    }

    let stamp = Local::now().format("%Y%m%dT%H%M%S").to_string();
    let mut staged: Vec<Staged<'_>> = Vec::new();
    for plan in unique.iter().copied() {
        if !plan.changed {
            tracing::debug!("unchanged: {}", plan.path.relative);
            continue;
        }
        let backup = opts.backup && plan.exists;
        match stage(resolver, &plan.path, &plan.target_id, &plan.desired, backup, &stamp) {
            Ok(s) => staged.push(s),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    for (i, s) in staged.iter().enumerate() {
        let renamed = resolver
            .check(s.path)
            .map_err(|source| SyncError::Path { target: s.target.to_string(), source })
            .and_then(|()| {
                std::fs::rename(&s.tmp, &s.path.absolute).map_err(|e| io_err(&s.path.absolute, e))
            });
        if let Err(e) = renamed {
            discard(&staged[i..]);
            return Err(e);
        }
        tracing::info!("wrote: {}", s.path.relative);
    }

    for plan in unique {
        let path = plan.path.absolute.clone();
        results.push(if plan.changed {
            let backup = staged
                .iter()
                .find(|s| s.path.absolute == path)
                .and_then(|s| s.backup.clone());
            WriteResult::Written { path, backup }
        } else {
            WriteResult::Unchanged { path }
        });
    }
    Ok(results)
}

/// Write the temp file (and backup) for one path.
fn stage<'a>(
    resolver: &PathResolver,
    path: &'a SafePath,
    target: &'a str,
    content: &str,
    backup: bool,
    stamp: &str,
) -> Result<Staged<'a>, SyncError> {
    resolver
        .check(path)
        .map_err(|source| SyncError::Path { target: target.to_string(), source })?;

    let parent = path.absolute.parent().unwrap_or(resolver.root());
    std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    // Directories created just now must not have raced into symlinks.
    resolver
        .check(path)
        .map_err(|source| SyncError::Path { target: target.to_string(), source })?;

    let name = file_name(&path.absolute);
    let backup = if backup {
        let dest = backup_path(parent, &name, stamp);
        let previous = std::fs::read(&path.absolute).map_err(|e| io_err(&path.absolute, e))?;
        create_new(&dest, &previous)?;
        tracing::info!("backed up {} to {}", path.relative, dest.display());
        Some(dest)
    } else {
        None
    };

    let tmp = parent.join(format!(".{name}.agentsync.tmp"));
    // A leftover entry (possibly a planted symlink) is unlinked, never followed.
    match std::fs::remove_file(&tmp) {
        Ok(()) => tracing::debug!("removed stale {}", tmp.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(&tmp, e)),
    }
    if let Err(e) = create_new(&tmp, content.as_bytes()) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(Staged { target, path, tmp, backup })
}

/// Write `bytes` to a file that must not exist yet. Fails on any existing
/// entry, symlinks included, so the write cannot land elsewhere.
fn create_new(path: &Path, bytes: &[u8]) -> Result<(), SyncError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    file.write_all(bytes).map_err(|e| io_err(path, e))?;
    file.sync_all().map_err(|e| io_err(path, e))
}

fn discard(staged: &[Staged<'_>]) {
    for s in staged {
        let _ = std::fs::remove_file(&s.tmp);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<name>.<stamp>.bak`, with a counter if that name is already taken.
/// Dangling symlinks count as taken.
fn backup_path(dir: &Path, name: &str, stamp: &str) -> PathBuf {
    let free = |p: &PathBuf| std::fs::symlink_metadata(p).is_err();
    let first = dir.join(format!("{name}.{stamp}.bak"));
    if free(&first) {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{name}.{stamp}-{n}.bak")))
        .find(free)
        .unwrap_or(first)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
