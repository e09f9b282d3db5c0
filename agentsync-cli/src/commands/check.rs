//! `agentsync check`: fail when any target file is out of date.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use super::plan_at;

/// Arguments for `agentsync check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Only check these target ids (repeatable).
    #[arg(long = "target", value_name = "ID")]
    pub targets: Vec<String>,
}

impl CheckArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let (set, _) = plan_at(root, &self.targets)?;
        set.preflight()?;

        let stale: Vec<_> = set.unique().into_iter().filter(|p| p.changed).collect();
        if stale.is_empty() {
            println!("✓ all {} target files are up to date", set.unique().len());
            return Ok(());
        }
        for p in &stale {
            println!("  ✗  {} ({})", p.path.relative, p.target_id);
        }
        bail!(
            "{} target file(s) out of date; run `agentsync sync --write`",
            stale.len()
        )
    }
}
