//! `agentsync status`: per-target state at a glance.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use agentsync_core::TargetKind;
use agentsync_sync::{PlanSet, SkipReason, SyncPlan};

use super::plan_at;

/// Arguments for `agentsync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let (set, _) = plan_at(root, &[])?;
        let rows = build_rows(&set);
        if self.json {
            print_json(&set, rows)
        } else {
            print_table(&set, rows);
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum TargetState {
    Current,
    Drift,
    Missing,
    Damaged,
    Conflict,
    Disabled,
    NoAdapter,
}

#[derive(Debug, Clone, Serialize)]
struct TargetStatus {
    target: String,
    path: Option<String>,
    mode: Option<String>,
    state: TargetState,
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    targets: Vec<TargetStatus>,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    targets: usize,
    planned: usize,
    out_of_date: usize,
    conflicts: usize,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "target")]
    target: String,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "mode")]
    mode: String,
    #[tabled(rename = "state")]
    state: String,
}

fn plan_state(set: &PlanSet, plan: &SyncPlan) -> TargetState {
    if set.conflicts.iter().any(|c| c.target_ids.contains(&plan.target_id)) {
        TargetState::Conflict
    } else if !plan.exists {
        TargetState::Missing
    } else if plan.marker_state.is_some_and(|m| m.is_malformed()) {
        TargetState::Damaged
    } else if plan.changed {
        TargetState::Drift
    } else {
        TargetState::Current
    }
}

fn build_rows(set: &PlanSet) -> Vec<TargetStatus> {
    let mut rows: Vec<TargetStatus> = set
        .plans
        .iter()
        .map(|p| TargetStatus {
            target: p.target_id.clone(),
            path: Some(p.path.relative.clone()),
            mode: Some(p.kind.mode().to_string()),
            state: plan_state(set, p),
        })
        .collect();
    rows.extend(set.skipped.iter().map(|s| TargetStatus {
        target: s.target_id.clone(),
        path: None,
        mode: TargetKind::from_id(&s.target_id).map(|k| k.mode().to_string()),
        state: match s.reason {
            SkipReason::Disabled => TargetState::Disabled,
            SkipReason::NoAdapter => TargetState::NoAdapter,
        },
    }));
    rows.sort_by(|a, b| a.target.cmp(&b.target));
    rows
}

fn is_out_of_date(state: TargetState) -> bool {
    matches!(
        state,
        TargetState::Drift | TargetState::Missing | TargetState::Damaged | TargetState::Conflict
    )
}

fn print_json(set: &PlanSet, rows: Vec<TargetStatus>) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            targets: rows.len(),
            planned: set.plans.len(),
            out_of_date: rows.iter().filter(|r| is_out_of_date(r.state)).count(),
            conflicts: set.conflicts.len(),
        },
        targets: rows,
        warnings: set.warnings.clone(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(set: &PlanSet, rows: Vec<TargetStatus>) {
    let out_of_date = rows.iter().filter(|r| is_out_of_date(r.state)).count();
    println!(
        "agentsync v{} | {} targets | {} out of date | {} conflicts",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        out_of_date,
        set.conflicts.len(),
    );

    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|r| StatusTableRow {
            target: r.target,
            path: r.path.unwrap_or_else(|| "-".to_string()),
            mode: r.mode.unwrap_or_else(|| "-".to_string()),
            state: state_label(r.state),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if out_of_date > 0 {
        println!("Run 'agentsync sync --write' to update out-of-date targets.");
    }
}

fn state_label(state: TargetState) -> String {
    match state {
        TargetState::Current => "CURRENT".green().to_string(),
        TargetState::Drift => "DRIFT".yellow().to_string(),
        TargetState::Missing => "MISSING".yellow().to_string(),
        TargetState::Damaged => "DAMAGED".red().to_string(),
        TargetState::Conflict => "CONFLICT".red().bold().to_string(),
        TargetState::Disabled => "DISABLED".bright_black().to_string(),
        TargetState::NoAdapter => "NO ADAPTER".magenta().to_string(),
    }
}
