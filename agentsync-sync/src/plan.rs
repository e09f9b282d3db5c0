//! Sync planning: desired content per target plus cross-target reconciliation.
//!
//! Planning reads but never writes. [`plan`] resolves each selected, enabled
//! target's path, renders its text, merges it into the current file (marker
//! targets) or replaces the file (full targets), and then groups the plans by
//! resolved path. Identical content at one path is a shared output; differing
//! content is a [`Conflict`], and [`PlanSet::preflight`] refuses to continue.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use agentsync_core::{Document, ManagementMode, TargetKind};
use agentsync_renderer::Renderer;

use crate::error::{io_err, SyncError};
use crate::marker::{self, MarkerState};
use crate::paths::{PathResolver, SafePath};

// ---------------------------------------------------------------------------
// Plan types
// ---------------------------------------------------------------------------

/// What one enabled target wants on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub target_id: String,
    pub kind: TargetKind,
    pub path: SafePath,
    pub exists: bool,
    /// Current file content (LF-normalised), empty when the file is absent.
    pub current: String,
    pub desired: String,
    pub changed: bool,
    /// Marker layout found in `current` (marker-managed targets only).
    pub marker_state: Option<MarkerState>,
}

/// Why a configured target produced no plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NoAdapter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTarget {
    pub target_id: String,
    pub reason: SkipReason,
}

/// Several targets rendering identical content to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedOutput {
    pub path: String,
    pub target_ids: Vec<String>,
}

/// Several targets rendering different content to one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub path: String,
    pub target_ids: Vec<String>,
}

/// Every plan for one invocation, plus the reconciliation results.
#[derive(Debug, Clone, Default)]
pub struct PlanSet {
    pub plans: Vec<SyncPlan>,
    pub skipped: Vec<SkippedTarget>,
    pub shared: Vec<SharedOutput>,
    pub conflicts: Vec<Conflict>,
    /// Human-readable advisories (repairs, shared outputs, unknown adapters).
    pub warnings: Vec<String>,
}

impl PlanSet {
    /// Fail with [`SyncError::Conflict`] if any path has competing content.
    pub fn preflight(&self) -> Result<(), SyncError> {
        if self.conflicts.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Conflict { conflicts: self.conflicts.clone() })
        }
    }

    /// One plan per distinct path, in plan order.
    pub fn unique(&self) -> Vec<&SyncPlan> {
        let mut seen: Vec<&PathBuf> = Vec::new();
        self.plans
            .iter()
            .filter(|p| {
                if seen.contains(&&p.path.absolute) {
                    false
                } else {
                    seen.push(&p.path.absolute);
                    true
                }
            })
            .collect()
    }

    /// `true` when any plan would change its file.
    pub fn has_drift(&self) -> bool {
        self.plans.iter().any(|p| p.changed)
    }
}

/// Which targets to plan. `None` means every configured target.
#[derive(Debug, Clone, Default)]
pub struct Selection(pub Option<Vec<String>>);

impl Selection {
    pub fn all() -> Self {
        Selection(None)
    }

    pub fn only(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Selection(Some(ids.into_iter().map(Into::into).collect()))
    }

    fn includes(&self, id: &str) -> bool {
        self.0.as_ref().map_or(true, |ids| ids.iter().any(|s| s == id))
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Build plans for `doc` against the files under `resolver.root()`.
pub fn plan(
    doc: &Document,
    renderer: &Renderer,
    resolver: &PathResolver,
    selection: &Selection,
) -> Result<PlanSet, SyncError> {
    if let Some(ids) = &selection.0 {
        if let Some(id) = ids.iter().find(|id| !doc.targets.contains_key(id.as_str())) {
            return Err(SyncError::UnknownTarget { id: id.clone() });
        }
    }

    let mut set = PlanSet::default();
    for (id, config) in doc.targets.iter().filter(|(id, _)| selection.includes(id)) {
        let Some(kind) = TargetKind::from_id(id) else {
            if config.enabled {
                set.warnings
                    .push(format!("target '{id}' has no adapter; nothing will be written for it"));
            }
            set.skipped.push(SkippedTarget { target_id: id.clone(), reason: SkipReason::NoAdapter });
            continue;
        };
        if !config.enabled {
            tracing::debug!("target {id} disabled");
            set.skipped.push(SkippedTarget { target_id: id.clone(), reason: SkipReason::Disabled });
            continue;
        }

        let path = resolver
            .resolve(&config.path)
            .map_err(|source| SyncError::Path { target: id.clone(), source })?;
        let current = read_current(resolver, &path, id)?;
        let rendered = renderer.render(doc, kind)?;

        let (desired, marker_state) = match (kind.mode(), kind.markers()) {
            (ManagementMode::Marker, Some(markers)) => {
                let outcome = marker::merge(current.as_deref().unwrap_or(""), markers, &rendered);
                if outcome.state.is_malformed() {
                    set.warnings.push(format!(
                        "{}: repaired damaged {} marker block ({:?})",
                        path.relative, id, outcome.state
                    ));
                }
                (outcome.text, Some(outcome.state))
            }
            _ => (rendered, None),
        };

        let exists = current.is_some();
        let current = current.unwrap_or_default();
        let changed = desired != current;
        tracing::debug!("planned {id} -> {} (changed: {changed})", path.relative);
        set.plans.push(SyncPlan {
            target_id: id.clone(),
            kind,
            path,
            exists,
            current,
            desired,
            changed,
            marker_state,
        });
    }

    reconcile(&mut set);
    for w in &set.warnings {
        tracing::warn!("{w}");
    }
    Ok(set)
}

/// Group plans by resolved path into shared outputs and conflicts.
fn reconcile(set: &mut PlanSet) {
    let mut by_path: BTreeMap<&PathBuf, Vec<&SyncPlan>> = BTreeMap::new();
    for p in &set.plans {
        by_path.entry(&p.path.absolute).or_default().push(p);
    }

    for group in by_path.values().filter(|g| g.len() > 1) {
        let path = group[0].path.relative.clone();
        let target_ids: Vec<String> = group.iter().map(|p| p.target_id.clone()).collect();
        if group.iter().all(|p| p.desired == group[0].desired) {
            set.warnings.push(format!(
                "{path}: shared by {} with identical content; written once",
                target_ids.join(", ")
            ));
            set.shared.push(SharedOutput { path, target_ids });
        } else {
            set.conflicts.push(Conflict { path, target_ids });
        }
    }
}

/// Re-check the path, then read it. `None` when the file does not exist.
fn read_current(
    resolver: &PathResolver,
    path: &SafePath,
    target: &str,
) -> Result<Option<String>, SyncError> {
    resolver
        .check(path)
        .map_err(|source| SyncError::Path { target: target.to_string(), source })?;
    match std::fs::read_to_string(&path.absolute) {
        Ok(content) => Ok(Some(content.replace("\r\n", "\n"))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_err(&path.absolute, err)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
