//! `agentsync fmt`: rewrite agentsync.yaml in canonical form.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use agentsync_core::document;

use super::load;

/// Arguments for `agentsync fmt`.
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Fail instead of rewriting when the file is not canonical.
    #[arg(long)]
    pub check: bool,
}

impl FmtArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let loaded = load(root)?;
        if loaded.is_canonical() {
            println!("✓ agentsync.yaml is already formatted");
            return Ok(());
        }
        if self.check {
            bail!("agentsync.yaml is not in canonical form; run `agentsync fmt`");
        }
        let path = document::save_at(root, &loaded.document)?;
        println!("✓ Formatted {}", path.display());
        Ok(())
    }
}
