//! # agentsync-sync
//!
//! Path safety, marker merging, sync planning and the staged writer.
//!
//! Call [`plan`] to compute what every selected target wants on disk, then
//! [`apply`] to write it (or report it in dry-run mode). [`diff::preview`]
//! renders the pending changes for display.

pub mod diff;
pub mod error;
pub mod marker;
pub mod paths;
pub mod plan;
pub mod writer;

pub use diff::FileDiff;
pub use error::{PathError, SyncError};
pub use marker::{merge, MarkerState, MergeOutcome};
pub use paths::{PathResolver, SafePath};
pub use plan::{
    plan, Conflict, PlanSet, Selection, SharedOutput, SkipReason, SkippedTarget, SyncPlan,
};
pub use writer::{apply, WriteOptions, WriteResult};
