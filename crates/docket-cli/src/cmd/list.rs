//! `dkt list` — list demands with filtering and sort order.

use crate::cmd::{load_demands, open_store};
use crate::output::{CliError, OutputMode, render, render_error};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use docket_core::config::load_project_config;
use docket_core::duration::format_duration;
use docket_core::error::ErrorCode;
use docket_core::model::demand::{Demand, Status};
use docket_core::query::{DemandQuery, PriorityFilter, SortField, SortOrder, select_and_order};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: pending, in-progress, forwarded, confirmed, finalized.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by priority: all, low, medium, high.
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Case-insensitive text filter over title, description, category, assignee.
    #[arg(short, long)]
    pub text: Option<String>,

    /// Sort field: priority, created, or duration.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order: asc or desc.
    #[arg(long)]
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    items: Vec<Demand>,
    total: usize,
}

pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let demands = load_demands(&store, output)?;
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

    // Status filters strictly; sort/priority options degrade to defaults so a
    // stale flag value cannot take the listing down.
    let status = match &args.status {
        Some(raw) => match Status::from_str(raw) {
            Ok(status) => Some(status),
            Err(err) => {
                render_error(
                    output,
                    &CliError::from_code(err.to_string(), ErrorCode::InvalidEnumValue),
                )?;
                anyhow::bail!("{err}");
            }
        },
        None => None,
    };

    let query = DemandQuery {
        text: args.text.clone().unwrap_or_default(),
        priority: PriorityFilter::parse_lossy(args.priority.as_deref().unwrap_or("all")),
        status,
        sort_field: SortField::parse_lossy(args.sort.as_deref().unwrap_or(&config.board.sort)),
        sort_order: SortOrder::parse_lossy(args.order.as_deref().unwrap_or(&config.board.order)),
    };

    let items = select_and_order(&demands, &query);
    let payload = ListOutput {
        total: items.len(),
        items,
    };

    render(output, &payload, |p, w| {
        if p.items.is_empty() {
            return writeln!(w, "No demands found");
        }
        writeln!(
            w,
            "{:<14}  {:<12}  {:<8}  {:<12}  TITLE",
            "ID", "STATUS", "PRI", "PROCESSING"
        )?;
        for demand in &p.items {
            writeln!(
                w,
                "{:<14}  {:<12}  {:<8}  {:<12}  {}",
                demand.id,
                demand.status.as_str(),
                demand.priority.as_str(),
                format_duration(demand.processing_duration_ms),
                demand.title
            )?;
        }
        writeln!(w, "{} demand(s)", p.total)
    })?;
    Ok(())
}
