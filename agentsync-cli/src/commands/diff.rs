//! `agentsync diff`: show what sync would change.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use agentsync_sync::diff;

use super::plan_at;

/// Arguments for `agentsync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Print unified diffs instead of the line-by-line comparison.
    #[arg(long)]
    pub unified: bool,

    /// Only diff these target ids (repeatable).
    #[arg(long = "target", value_name = "ID")]
    pub targets: Vec<String>,
}

impl DiffArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let (set, _) = plan_at(root, &self.targets)?;
        set.preflight()?;

        let diffs = diff::preview(&set, self.unified);
        if diffs.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for file in diffs {
            if !self.unified {
                println!("{} ({})", file.path, file.target_ids.join(", "));
            }
            print!("{}", file.diff);
            if !file.diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
