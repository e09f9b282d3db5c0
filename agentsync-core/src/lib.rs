//! agentsync core library: the document model and everything that turns
//! `agentsync.yaml` text into a [`Document`] and back.
//!
//! - [`parser`]: text → [`Value`] tree (never fails)
//! - [`validate`]: tree → errors / warnings
//! - [`normalize`]: tree + [`Defaults`] → [`Document`] (never fails)
//! - [`serializer`]: [`Document`] → canonical text
//! - [`target`]: the fixed registry of output targets
//! - [`document`]: load / save / init on disk
//! - [`edit`]: structured edits

pub mod defaults;
pub mod document;
pub mod edit;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod serializer;
pub mod target;
pub mod types;
pub mod validate;
pub mod value;

pub use defaults::{Defaults, Manifest};
pub use document::{Loaded, DOCUMENT_FILE};
pub use edit::Edit;
pub use error::DocumentError;
pub use target::{ManagementMode, MarkerPair, TargetKind};
pub use types::{Approvals, Document, TargetConfig};
pub use validate::{Diagnostic, Report};
pub use value::Value;
