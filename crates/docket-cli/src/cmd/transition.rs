//! Status transition commands: `dkt start|forward|confirm|finalize|move`.
//!
//! The named commands and the generic `move` share one runner: resolve each
//! id (unique prefixes accepted), hand it to the board controller, persist
//! the updated collection, and report per-id results. `move` accepts any
//! target status, matching the permissive engine; the named commands are the
//! forward affordances operators normally use.

use crate::cmd::{load_demands, open_store, save_demands};
use crate::output::{CliError, OutputMode, render, render_error};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use docket_board::board::{Board, IdResolution};
use docket_core::duration::format_duration;
use docket_core::error::ErrorCode;
use docket_core::model::demand::Status;

#[derive(Args, Debug)]
pub struct TransitionArgs {
    /// Demand ID to transition (unique ID prefixes are accepted).
    pub id: String,

    /// Additional demand IDs to transition in the same command.
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Demand ID to move (unique ID prefixes are accepted).
    pub id: String,

    /// Additional demand IDs to move in the same command.
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Target status: pending, in-progress, forwarded, confirmed, finalized.
    #[arg(short, long)]
    pub status: String,
}

#[derive(Debug, Serialize)]
struct TransitionResult {
    id: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_status: Option<Status>,
    /// Present when this call captured the processing-start timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_started_at_ms: Option<i64>,
    /// Present when this call captured completion; the formatted duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    processing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct TransitionBatchOutput {
    target: Status,
    results: Vec<TransitionResult>,
}

fn requested_ids<'a>(first: &'a str, rest: &'a [String]) -> impl Iterator<Item = &'a str> {
    std::iter::once(first).chain(rest.iter().map(String::as_str))
}

fn transition_one(board: &mut Board, raw_id: &str, target: Status) -> TransitionResult {
    let resolved = match board.resolve_id(raw_id) {
        IdResolution::Unique(id) => id,
        IdResolution::None => {
            return TransitionResult {
                id: raw_id.to_string(),
                ok: false,
                previous_status: None,
                new_status: None,
                processing_started_at_ms: None,
                processing: None,
                error: Some(format!("demand '{raw_id}' not found")),
            };
        }
        IdResolution::Ambiguous(ids) => {
            return TransitionResult {
                id: raw_id.to_string(),
                ok: false,
                previous_status: None,
                new_status: None,
                processing_started_at_ms: None,
                processing: None,
                error: Some(format!(
                    "demand id '{raw_id}' is ambiguous: matches {}",
                    ids.join(", ")
                )),
            };
        }
    };

    let now_ms = chrono::Utc::now().timestamp_millis();
    // Resolution guarantees the id exists, so the engine always runs.
    match board.request_transition(&resolved, target, now_ms) {
        Some(transition) => TransitionResult {
            id: resolved,
            ok: true,
            previous_status: Some(transition.previous_status),
            new_status: Some(transition.demand.status),
            processing_started_at_ms: transition
                .started_processing
                .then_some(transition.demand.processing_started_at_ms)
                .flatten(),
            processing: transition
                .completed
                .then(|| format_duration(transition.demand.processing_duration_ms)),
            error: None,
        },
        None => TransitionResult {
            id: resolved.clone(),
            ok: false,
            previous_status: None,
            new_status: None,
            processing_started_at_ms: None,
            processing: None,
            error: Some(format!("demand '{resolved}' not found")),
        },
    }
}

fn run_batch(
    first: &str,
    rest: &[String],
    target: Status,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let mut board = Board::new(load_demands(&store, output)?);

    let results: Vec<TransitionResult> = requested_ids(first, rest)
        .map(|raw_id| transition_one(&mut board, raw_id, target))
        .collect();

    save_demands(&store, &board.into_demands(), output)?;

    let failures: Vec<String> = results
        .iter()
        .filter_map(|result| result.error.clone())
        .collect();
    let payload = TransitionBatchOutput { target, results };

    render(output, &payload, |p, w| {
        for result in &p.results {
            if result.ok {
                let mut line = format!(
                    "ok    {:<14}  {} -> {}",
                    result.id,
                    result
                        .previous_status
                        .map_or("unknown", Status::as_str),
                    result.new_status.map_or("unknown", Status::as_str)
                );
                if let Some(processing) = &result.processing {
                    line.push_str(&format!("  (processing {processing})"));
                }
                writeln!(w, "{line}")?;
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

    if failures.is_empty() {
        Ok(())
    } else if failures.len() == 1 {
        anyhow::bail!("{}", failures[0]);
    } else {
        anyhow::bail!("{} demand(s) failed", failures.len());
    }
}

/// Runner for the named forward commands (`start`, `forward`, `confirm`,
/// `finalize`).
pub fn run_transition(
    args: &TransitionArgs,
    target: Status,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    run_batch(&args.id, &args.ids, target, output, project_root)
}

/// Runner for `dkt move --status <any>`, the permissive direct assignment.
pub fn run_move(args: &MoveArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let target = match Status::from_str(&args.status) {
        Ok(status) => status,
        Err(err) => {
            render_error(
                output,
                &CliError::from_code(err.to_string(), ErrorCode::InvalidEnumValue),
            )?;
            anyhow::bail!("{err}");
        }
    };

    run_batch(&args.id, &args.ids, target, output, project_root)
}

#[cfg(test)]
mod tests {
    use super::{MoveArgs, TransitionArgs, run_move, run_transition};
    use crate::output::OutputMode;
    use docket_core::model::demand::{Demand, DemandDraft, Status};
    use docket_core::store::DemandStore;
    use tempfile::TempDir;

    fn setup_project(titles: &[&str]) -> (TempDir, Vec<String>) {
        let dir = TempDir::new().expect("temp dir");
        let store = DemandStore::init(dir.path()).expect("init");

        let demands: Vec<Demand> = titles
            .iter()
            .enumerate()
            .map(|(index, title)| {
                Demand::create(
                    format!("dm-{index:08x}"),
                    DemandDraft {
                        title: (*title).to_string(),
                        ..DemandDraft::default()
                    },
                    i64::try_from(index).unwrap_or(0),
                )
            })
            .collect();
        let ids = demands.iter().map(|demand| demand.id.clone()).collect();
        store.save(&demands).expect("save");
        (dir, ids)
    }

    fn load(dir: &TempDir) -> Vec<Demand> {
        DemandStore::open(dir.path())
            .expect("open")
            .load()
            .expect("load")
    }

    #[test]
    fn transition_args_parse_batch_ids() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: TransitionArgs,
        }
        let w = Wrapper::parse_from(["test", "dm-1", "dm-2", "dm-3"]);
        assert_eq!(w.args.id, "dm-1");
        assert_eq!(w.args.ids, ["dm-2", "dm-3"]);
    }

    #[test]
    fn start_captures_processing_start() {
        let (dir, ids) = setup_project(&["Call debtor"]);
        let args = TransitionArgs {
            id: ids[0].clone(),
            ids: vec![],
        };
        run_transition(&args, Status::InProgress, OutputMode::Json, dir.path())
            .expect("start should succeed");

        let demands = load(&dir);
        assert_eq!(demands[0].status, Status::InProgress);
        assert!(demands[0].processing_started_at_ms.is_some());
    }

    #[test]
    fn unknown_id_fails_without_touching_known_ids() {
        let (dir, ids) = setup_project(&["Call debtor"]);
        let args = TransitionArgs {
            id: ids[0].clone(),
            ids: vec!["dm-ffffffff".to_string()],
        };
        let result = run_transition(&args, Status::Forwarded, OutputMode::Json, dir.path());
        assert!(result.is_err());

        // The known id still moved; only the stale one is reported.
        let demands = load(&dir);
        assert_eq!(demands[0].status, Status::Forwarded);
    }

    #[test]
    fn ambiguous_prefix_is_reported() {
        let (dir, _ids) = setup_project(&["One", "Two"]);
        let args = TransitionArgs {
            id: "dm-".to_string(),
            ids: vec![],
        };
        let err = run_transition(&args, Status::InProgress, OutputMode::Json, dir.path())
            .expect_err("ambiguous prefix");
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn move_rejects_unknown_status() {
        let (dir, ids) = setup_project(&["One"]);
        let args = MoveArgs {
            id: ids[0].clone(),
            ids: vec![],
            status: "archived".to_string(),
        };
        let err = run_move(&args, OutputMode::Json, dir.path()).expect_err("bad status");
        assert!(err.to_string().contains("invalid status"));
    }

    #[test]
    fn move_accepts_legacy_completed_synonym() {
        let (dir, ids) = setup_project(&["One"]);
        let args = MoveArgs {
            id: ids[0].clone(),
            ids: vec![],
            status: "completed".to_string(),
        };
        run_move(&args, OutputMode::Json, dir.path()).expect("move");

        let demands = load(&dir);
        assert_eq!(demands[0].status, Status::Finalized);
        // Jumped straight from pending: the safety net records nothing.
        assert!(demands[0].completed_at_ms.is_none());
        assert!(demands[0].processing_duration_ms.is_none());
    }
}
