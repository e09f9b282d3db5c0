//! `agentsync init [--force]`

use std::path::Path;

use anyhow::Result;
use clap::Args;

use agentsync_core::document;

use super::{defaults_at, Seeded};

/// Create agentsync.yaml at the project root.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing agentsync.yaml.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let Seeded { defaults, source } = defaults_at(root)?;
        let doc = document::init_at(root, &defaults, self.force)?;

        println!("✓ Created {}", document::document_path_at(root).display());
        match source {
            Some(source) => println!("  Commands seeded from {source}"),
            None => println!("  No package manifest found; commands are placeholders"),
        }
        println!("  {} targets enabled", doc.enabled_targets().count());
        println!("Next: edit agentsync.yaml, then run `agentsync sync --write`.");
        Ok(())
    }
}
