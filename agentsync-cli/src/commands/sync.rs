//! `agentsync sync`: report or write the per-target instruction files.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use agentsync_sync::{apply, diff, PlanSet, WriteOptions, WriteResult};

use super::plan_at;

/// Arguments for `agentsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Write the files. Without this flag nothing on disk changes.
    #[arg(long)]
    pub write: bool,

    /// Copy each existing file to `<name>.<timestamp>.bak` before replacing it.
    #[arg(long, requires = "write")]
    pub backup: bool,

    /// Only sync these target ids (repeatable).
    #[arg(long = "target", value_name = "ID")]
    pub targets: Vec<String>,
}

impl SyncArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let (set, resolver) = plan_at(root, &self.targets)?;
        let opts = WriteOptions { dry_run: !self.write, backup: self.backup };
        let writes = apply(&set, &resolver, opts).context("sync failed")?;

        if !self.write {
            print_preview(&set);
        }
        print_results(&writes, !self.write);
        Ok(())
    }
}

fn print_preview(set: &PlanSet) {
    for file in diff::preview(set, false) {
        println!("{} ({})", file.path.bold(), file.target_ids.join(", "));
        for line in file.diff.lines() {
            match line.chars().next() {
                Some('-') => println!("  {}", line.red()),
                Some('+') => println!("  {}", line.green()),
                _ => println!("  {}", line.bright_black()),
            }
        }
    }
}

fn print_results(writes: &[WriteResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = writes
        .iter()
        .filter(|r| matches!(r, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();
    let unchanged = writes.len() - changed;

    if changed == 0 {
        println!("{prefix}✓ nothing to do ({unchanged} up to date)");
        return;
    }

    for r in writes {
        match r {
            WriteResult::Written { path, backup } => {
                println!("  ✎  {}", path.display());
                if let Some(b) = backup {
                    println!("     backup: {}", b.display());
                }
            }
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }
    let verb = if dry_run { "would change" } else { "written" };
    println!("{prefix}✓ {changed} {verb}, {unchanged} unchanged");
    if dry_run {
        println!("Run `agentsync sync --write` to apply.");
    }
}
