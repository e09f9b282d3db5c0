//! agentsync: keep AI agent instruction files in step with `agentsync.yaml`.
//!
//! # Usage
//!
//! ```text
//! agentsync init [--force]
//! agentsync sync [--write] [--backup] [--target <id>]...
//! agentsync check
//! agentsync diff [--unified] [--target <id>]...
//! agentsync status [--json]
//! agentsync fmt [--check]
//! agentsync edit [--mission <text>] [--command name=cmd] [--enable <id>] ...
//! ```
//!
//! Every command accepts `--root <dir>` (default: the current directory).

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use commands::{
    check::CheckArgs, diff::DiffArgs, edit::EditArgs, fmt::FmtArgs, init::InitArgs,
    status::StatusArgs, sync::SyncArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "agentsync",
    version,
    about = "Sync AI coding agent instruction files from agentsync.yaml",
    long_about = None,
)]
struct Cli {
    /// Project root containing agentsync.yaml.
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `AGENTSYNC_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create agentsync.yaml, seeding commands from the package manifest.
    Init(InitArgs),

    /// Show (or with --write, apply) the changes each target needs.
    Sync(SyncArgs),

    /// Exit non-zero if any target is out of date or conflicting.
    Check(CheckArgs),

    /// Print diffs of what sync would write.
    Diff(DiffArgs),

    /// Show per-target state.
    Status(StatusArgs),

    /// Rewrite agentsync.yaml in canonical form.
    Fmt(FmtArgs),

    /// Change agentsync.yaml fields from the command line.
    Edit(EditArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("AGENTSYNC_LOG", default))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("could not determine current directory")?,
    };

    match cli.command {
        Commands::Init(args) => args.run(&root),
        Commands::Sync(args) => args.run(&root),
        Commands::Check(args) => args.run(&root),
        Commands::Diff(args) => args.run(&root),
        Commands::Status(args) => args.run(&root),
        Commands::Fmt(args) => args.run(&root),
        Commands::Edit(args) => args.run(&root),
    }
}
