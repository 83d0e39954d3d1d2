//! `dkt edit` — update a demand's descriptive fields.
//!
//! Status is deliberately not editable here; it moves through the
//! transition commands so timestamp capture stays in one place.

use crate::cmd::show::resolve_or_render;
use crate::cmd::{load_demands, open_store, save_demands};
use crate::output::{CliError, OutputMode, render, render_error};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use docket_board::board::Board;
use docket_core::error::ErrorCode;
use docket_core::model::demand::Priority;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Demand ID to edit (unique ID prefixes are accepted).
    pub id: String,

    /// New title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// New description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// New priority: low, medium, or high.
    #[arg(short, long)]
    pub priority: Option<String>,

    /// New category.
    #[arg(short, long)]
    pub category: Option<String>,

    /// New assignee.
    #[arg(short, long)]
    pub assignee: Option<String>,
}

#[derive(Debug, Serialize)]
struct EditOutput {
    id: String,
    updated: Vec<&'static str>,
}

pub fn run_edit(args: &EditArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let priority = match &args.priority {
        Some(raw) => match Priority::from_str(raw) {
            Ok(priority) => Some(priority),
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

    let store = open_store(output, project_root)?;
    let mut board = Board::new(load_demands(&store, output)?);
    let id = resolve_or_render(&board, &args.id, output)?;

    let Some(mut demand) = board.find(&id).cloned() else {
        anyhow::bail!("demand '{id}' not found");
    };

    let mut updated = Vec::new();
    if let Some(title) = &args.title {
        demand.title = title.clone();
        updated.push("title");
    }
    if let Some(description) = &args.description {
        demand.description = Some(description.clone());
        updated.push("description");
    }
    if let Some(priority) = priority {
        demand.priority = priority;
        updated.push("priority");
    }
    if let Some(category) = &args.category {
        demand.category = Some(category.clone());
        updated.push("category");
    }
    if let Some(assignee) = &args.assignee {
        demand.assignee = Some(assignee.clone());
        updated.push("assignee");
    }

    if updated.is_empty() {
        let error = CliError::with_details(
            "nothing to edit",
            "Pass at least one of --title, --description, --priority, --category, --assignee",
            "nothing_to_edit",
        );
        render_error(output, &error)?;
        anyhow::bail!("{}", error.message);
    }

    board.replace(&id, demand);
    save_demands(&store, &board.into_demands(), output)?;

    let payload = EditOutput { id, updated };
    render(output, &payload, |p, w| {
        writeln!(w, "Updated {} ({})", p.id, p.updated.join(", "))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{EditArgs, run_edit};
    use crate::output::OutputMode;
    use docket_core::model::demand::{Demand, DemandDraft, Priority};
    use docket_core::store::DemandStore;
    use tempfile::TempDir;

    fn setup_one() -> (TempDir, String) {
        let dir = TempDir::new().expect("temp dir");
        let store = DemandStore::init(dir.path()).expect("init");
        let demand = Demand::create(
            "dm-00aa00aa",
            DemandDraft {
                title: "Original".to_string(),
                ..DemandDraft::default()
            },
            1,
        );
        let id = demand.id.clone();
        store.save(&[demand]).expect("save");
        (dir, id)
    }

    fn no_edits(id: &str) -> EditArgs {
        EditArgs {
            id: id.to_string(),
            title: None,
            description: None,
            priority: None,
            category: None,
            assignee: None,
        }
    }

    #[test]
    fn edit_updates_named_fields_only() {
        let (dir, id) = setup_one();
        let args = EditArgs {
            title: Some("Renamed".to_string()),
            priority: Some("high".to_string()),
            ..no_edits(&id)
        };
        run_edit(&args, OutputMode::Json, dir.path()).expect("edit");

        let demands = DemandStore::open(dir.path())
            .expect("open")
            .load()
            .expect("load");
        assert_eq!(demands[0].title, "Renamed");
        assert_eq!(demands[0].priority, Priority::High);
        assert!(demands[0].description.is_none());
    }

    #[test]
    fn edit_with_no_flags_is_an_error() {
        let (dir, id) = setup_one();
        let err = run_edit(&no_edits(&id), OutputMode::Json, dir.path()).expect_err("no flags");
        assert!(err.to_string().contains("nothing to edit"));
    }

    #[test]
    fn edit_rejects_unknown_priority() {
        let (dir, id) = setup_one();
        let args = EditArgs {
            priority: Some("urgent".to_string()),
            ..no_edits(&id)
        };
        assert!(run_edit(&args, OutputMode::Json, dir.path()).is_err());
    }
}
