//! `dkt board` — the per-status column view.
//!
//! Non-interactive by default so the board is scriptable and testable; the
//! `--interactive` flag opens the full-screen TUI instead.

use crate::cmd::{load_demands, open_store};
use crate::output::{CliError, OutputMode, pretty_rule, render, render_error};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use docket_board::actions::offered_actions;
use docket_board::board::Board;
use docket_core::config::load_project_config;
use docket_core::duration::format_duration;
use docket_core::error::ErrorCode;
use docket_core::model::demand::{Demand, Status};
use docket_core::query::{DemandQuery, PriorityFilter, SortField, SortOrder};

#[derive(Args, Debug)]
pub struct BoardArgs {
    /// Open the interactive full-screen board.
    #[arg(short, long)]
    pub interactive: bool,

    /// Case-insensitive text filter over title, description, category, assignee.
    #[arg(short, long)]
    pub text: Option<String>,

    /// Filter by priority: all, low, medium, high.
    #[arg(short, long)]
    pub priority: Option<String>,
}

#[derive(Debug, Serialize)]
struct ColumnOutput {
    status: Status,
    count: usize,
    actions: Vec<&'static str>,
    demands: Vec<Demand>,
}

#[derive(Debug, Serialize)]
struct BoardOutput {
    columns: Vec<ColumnOutput>,
    total: usize,
}

pub fn run_board(args: &BoardArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    if args.interactive {
        return crate::tui::board::run_board_tui(project_root);
    }

    let store = open_store(output, project_root)?;
    let config = match load_project_config(project_root) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                output,
                &CliError::from_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            anyhow::bail!("{err}");
        }
    };
    let mut board = Board::new(load_demands(&store, output)?);
    board.set_query(DemandQuery {
        text: args.text.clone().unwrap_or_default(),
        priority: PriorityFilter::parse_lossy(args.priority.as_deref().unwrap_or("all")),
        status: None,
        sort_field: SortField::parse_lossy(&config.board.sort),
        sort_order: SortOrder::parse_lossy(&config.board.order),
    });

    let mut columns = Vec::new();
    let mut total = 0;
    for (status, demands) in board.group_by_status() {
        total += demands.len();
        columns.push(ColumnOutput {
            status,
            count: demands.len(),
            actions: offered_actions(status)
                .iter()
                .map(|action| action.label())
                .collect(),
            demands,
        });
    }
    let payload = BoardOutput { columns, total };
    let show_counts = config.board.show_counts;

    render(output, &payload, |p, w| {
        for column in &p.columns {
            let heading = column.status.as_str().to_ascii_uppercase();
            if show_counts {
                write!(w, "{heading} ({})", column.count)?;
            } else {
                write!(w, "{heading}")?;
            }
            if column.actions.is_empty() {
                writeln!(w)?;
            } else {
                writeln!(w, "  [{}]", column.actions.join(", "))?;
            }
            pretty_rule(w)?;
            if column.demands.is_empty() {
                writeln!(w, "  (empty)")?;
            }
            for demand in &column.demands {
                writeln!(
                    w,
                    "  {:<14}  {:<8}  {:<12}  {}",
                    demand.id,
                    demand.priority.as_str(),
                    format_duration(demand.processing_duration_ms),
                    demand.title
                )?;
            }
            writeln!(w)?;
        }
        writeln!(w, "{} demand(s)", p.total)
    })?;
    Ok(())
}
