//! `dkt show` — full details for a single demand.

use crate::cmd::{load_demands, open_store};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_rule, render, render_error};
use chrono::{DateTime, Local};
use clap::Args;
use std::io::Write;
use std::path::Path;

use docket_board::board::{Board, IdResolution};
use docket_core::duration::format_duration;
use docket_core::error::ErrorCode;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Demand ID (unique ID prefixes are accepted).
    pub id: String,
}

fn fmt_ts(ms: Option<i64>) -> String {
    ms.and_then(DateTime::from_timestamp_millis).map_or_else(
        || "-".to_string(),
        |dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Resolve a raw id against the board, rendering a structured error for
/// misses and ambiguous prefixes. Shared with `dkt edit`.
pub(crate) fn resolve_or_render(
    board: &Board,
    raw_id: &str,
    output: OutputMode,
) -> anyhow::Result<String> {
    match board.resolve_id(raw_id) {
        IdResolution::Unique(id) => Ok(id),
        IdResolution::None => {
            let message = format!("demand '{raw_id}' not found");
            render_error(output, &CliError::from_code(message.clone(), ErrorCode::DemandNotFound))?;
            anyhow::bail!("{message}");
        }
        IdResolution::Ambiguous(ids) => {
            let message = format!(
                "demand id '{raw_id}' is ambiguous: matches {}",
                ids.join(", ")
            );
            render_error(output, &CliError::from_code(message.clone(), ErrorCode::AmbiguousId))?;
            anyhow::bail!("{message}");
        }
    }
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let board = Board::new(load_demands(&store, output)?);

    let id = resolve_or_render(&board, &args.id, output)?;
    let Some(demand) = board.find(&id).cloned() else {
        anyhow::bail!("demand '{id}' not found");
    };

    render(output, &demand, |d, w| {
        writeln!(w, "{}  {}", d.id, d.title)?;
        pretty_rule(w)?;
        pretty_kv(w, "Status", d.status.as_str())?;
        pretty_kv(w, "Priority", d.priority.as_str())?;
        pretty_kv(w, "Category", d.category.as_deref().unwrap_or("-"))?;
        pretty_kv(w, "Assignee", d.assignee.as_deref().unwrap_or("-"))?;
        pretty_kv(w, "Created", fmt_ts(Some(d.created_at_ms)))?;
        pretty_kv(w, "Started", fmt_ts(d.processing_started_at_ms))?;
        pretty_kv(w, "Completed", fmt_ts(d.completed_at_ms))?;
        pretty_kv(w, "Processing", format_duration(d.processing_duration_ms))?;
        if let Some(description) = &d.description {
            pretty_rule(w)?;
            writeln!(w, "{description}")?;
        }
        Ok(())
    })?;
    Ok(())
}
