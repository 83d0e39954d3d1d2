//! `dkt create` — intake a new demand.
//!
//! Wraps the validated field payload into a demand with `pending` status and
//! a fresh id, then persists the grown collection.

use crate::cmd::{load_demands, open_store, save_demands};
use crate::output::{CliError, OutputMode, render, render_error};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use docket_core::error::ErrorCode;
use docket_core::model::demand::{Demand, DemandDraft, Priority, Status};
use docket_core::model::demand_id::generate_demand_id;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Title of the new demand.
    #[arg(short, long)]
    pub title: String,

    /// Description text.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority: low, medium, or high.
    #[arg(short, long, default_value = "medium")]
    pub priority: String,

    /// Category used for search and reporting.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Assignee responsible for the demand.
    #[arg(short, long)]
    pub assignee: Option<String>,
}

/// JSON output for a successful `dkt create`.
#[derive(Debug, Serialize)]
struct CreateOutput {
    id: String,
    title: String,
    status: Status,
    priority: Priority,
}

pub fn run_create(args: &CreateArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let priority = match Priority::from_str(&args.priority) {
        Ok(priority) => priority,
        Err(err) => {
            render_error(output, &CliError::from_code(err.to_string(), ErrorCode::InvalidEnumValue))?;
            anyhow::bail!("{err}");
        }
    };

    let store = open_store(output, project_root)?;
    let mut demands = load_demands(&store, output)?;

    let draft = DemandDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        priority,
        category: args.category.clone(),
        assignee: args.assignee.clone(),
    };
    let demand = Demand::create(
        generate_demand_id(),
        draft,
        chrono::Utc::now().timestamp_millis(),
    );

    let payload = CreateOutput {
        id: demand.id.clone(),
        title: demand.title.clone(),
        status: demand.status,
        priority: demand.priority,
    };

    demands.push(demand);
    save_demands(&store, &demands, output)?;

    render(output, &payload, |p, w| {
        writeln!(w, "Created demand {}: {}", p.id, p.title)
    })?;
    Ok(())
}
