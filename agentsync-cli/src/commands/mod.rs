//! Subcommand implementations and the helpers they share.

pub mod check;
pub mod diff;
pub mod edit;
pub mod fmt;
pub mod init;
pub mod status;
pub mod sync;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use agentsync_core::{document, Defaults, Diagnostic, Loaded};
use agentsync_detector::detect_manifest;
use agentsync_renderer::Renderer;
use agentsync_sync::{plan, PathResolver, PlanSet, Selection};

/// Defaults and the manifest file they were seeded from.
pub struct Seeded {
    pub defaults: Defaults,
    /// `None` when no package manifest was found.
    pub source: Option<String>,
}

/// Defaults seeded from whatever package manifest sits at `root`.
pub fn defaults_at(root: &Path) -> Result<Seeded> {
    let manifest = detect_manifest(root)
        .with_context(|| format!("failed to read package manifest in {}", root.display()))?;
    Ok(Seeded {
        defaults: Defaults::from_manifest(manifest.as_ref()),
        source: manifest.map(|m| m.source),
    })
}

/// Load `agentsync.yaml`, printing validator warnings to stderr.
pub fn load(root: &Path) -> Result<Loaded> {
    let Seeded { defaults, .. } = defaults_at(root)?;
    let loaded = document::load_at(root, &defaults)?;
    print_warnings(&loaded.warnings);
    Ok(loaded)
}

pub fn print_warnings(warnings: &[Diagnostic]) {
    for w in warnings {
        eprintln!("{} {w}", "warning:".yellow().bold());
    }
}

/// Load the document and plan the selected targets against the files on disk.
pub fn plan_at(root: &Path, targets: &[String]) -> Result<(PlanSet, PathResolver)> {
    let loaded = load(root)?;
    let renderer = Renderer::new().context("failed to load templates")?;
    let resolver = PathResolver::new(root);
    let selection = if targets.is_empty() {
        Selection::all()
    } else {
        Selection::only(targets.iter().cloned())
    };
    let set = plan(&loaded.document, &renderer, &resolver, &selection)?;
    Ok((set, resolver))
}
