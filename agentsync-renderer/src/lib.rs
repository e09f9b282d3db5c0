//! # agentsync-renderer
//!
//! Tera-based template engine that renders per-target instruction text from
//! a normalized agentsync [`Document`](agentsync_core::Document).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use agentsync_core::{Defaults, TargetKind};
//! use agentsync_renderer::Renderer;
//!
//! fn render_all() {
//!     let doc = Defaults::default().document();
//!     if let Ok(renderer) = Renderer::new() {
//!         for target in TargetKind::all() {
//!             if let Ok(text) = renderer.render(&doc, *target) {
//!                 println!("{}: {} bytes", target.default_path(), text.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::TemplateContext;
pub use engine::{template_name, Renderer};
pub use error::RenderError;
