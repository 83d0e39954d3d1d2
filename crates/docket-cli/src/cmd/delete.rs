//! `dkt delete` — remove demands from the collection.
//!
//! Deletion is allowed at any status and keeps no archive.

use crate::cmd::{load_demands, open_store, save_demands};
use crate::output::{OutputMode, render};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use docket_board::board::{Board, IdResolution};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Demand ID to delete (unique ID prefixes are accepted).
    pub id: String,

    /// Additional demand IDs to delete in the same command.
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DeleteResult {
    id: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteBatchOutput {
    results: Vec<DeleteResult>,
}

fn delete_one(board: &mut Board, raw_id: &str) -> DeleteResult {
    match board.resolve_id(raw_id) {
        IdResolution::Unique(id) => {
            board.remove(&id);
            DeleteResult {
                id,
                ok: true,
                error: None,
            }
        }
        IdResolution::None => DeleteResult {
            id: raw_id.to_string(),
            ok: false,
            error: Some(format!("demand '{raw_id}' not found")),
        },
        IdResolution::Ambiguous(ids) => DeleteResult {
            id: raw_id.to_string(),
            ok: false,
            error: Some(format!(
                "demand id '{raw_id}' is ambiguous: matches {}",
                ids.join(", ")
            )),
        },
    }
}

pub fn run_delete(args: &DeleteArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let mut board = Board::new(load_demands(&store, output)?);

    let results: Vec<DeleteResult> = std::iter::once(args.id.as_str())
        .chain(args.ids.iter().map(String::as_str))
        .map(|raw_id| delete_one(&mut board, raw_id))
        .collect();

    save_demands(&store, &board.into_demands(), output)?;

    let failures = results.iter().filter(|result| !result.ok).count();
    let payload = DeleteBatchOutput { results };

    render(output, &payload, |p, w| {
        for result in &p.results {
            if result.ok {
                writeln!(w, "ok    {:<14}  deleted", result.id)?;
            } else {
                writeln!(
                    w,
                    "err   {:<14}  {}",
                    result.id,
                    result.error.as_deref().unwrap_or("unknown error")
                )?;
            }
        }
        Ok(())
    })?;

    if failures == 0 {
        Ok(())
    } else {
        anyhow::bail!("{failures} demand(s) failed");
    }
}

#[cfg(test)]
mod tests {
    use super::{DeleteArgs, run_delete};
    use crate::output::OutputMode;
    use docket_core::model::demand::{Demand, DemandDraft, Status};
    use docket_core::store::DemandStore;
    use docket_core::transition::apply_transition;
    use tempfile::TempDir;

    #[test]
    fn delete_removes_at_any_status() {
        let dir = TempDir::new().expect("temp dir");
        let store = DemandStore::init(dir.path()).expect("init");

        let pending = Demand::create("dm-00000001", DemandDraft::default(), 1);
        let finalized = {
            let demand = Demand::create("dm-00000002", DemandDraft::default(), 1);
            let started = apply_transition(&demand, Status::InProgress, 2);
            apply_transition(&started.demand, Status::Finalized, 3).demand
        };
        store.save(&[pending, finalized]).expect("save");

        let args = DeleteArgs {
            id: "dm-00000001".to_string(),
            ids: vec!["dm-00000002".to_string()],
        };
        run_delete(&args, OutputMode::Json, dir.path()).expect("delete");

        let remaining = DemandStore::open(dir.path())
            .expect("open")
            .load()
            .expect("load");
        assert!(remaining.is_empty());
    }

    #[test]
    fn delete_unknown_id_fails() {
        let dir = TempDir::new().expect("temp dir");
        DemandStore::init(dir.path()).expect("init");

        let args = DeleteArgs {
            id: "dm-missing".to_string(),
            ids: vec![],
        };
        assert!(run_delete(&args, OutputMode::Json, dir.path()).is_err());
    }
}
