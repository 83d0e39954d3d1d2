//! E2E tests for the non-interactive board view.
//!
//! The board must partition the collection exactly: every demand in one
//! column, counts matching bucket sizes, and the static action affordances
//! attached to each column.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn dkt_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dkt"));
    cmd.current_dir(dir);
    cmd.env("DOCKET_LOG", "error");
    cmd
}

fn init_project(dir: &Path) {
    dkt_cmd(dir).args(["init"]).assert().success();
}

fn create_demand(dir: &Path, title: &str) -> String {
    let output = dkt_cmd(dir)
        .args(["create", "--title", title, "--json"])
        .output()
        .expect("create should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json["id"].as_str().expect("id field").to_string()
}

fn board_json(dir: &Path, extra: &[&str]) -> Value {
    let mut args = vec!["board", "--json"];
    args.extend_from_slice(extra);
    let output = dkt_cmd(dir)
        .args(&args)
        .output()
        .expect("board should not crash");
    assert!(
        output.status.success(),
        "board failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("board --json should produce valid JSON")
}

#[test]
fn board_partitions_demands_exactly_once() {
    let dir = TempDir::new().expect("temp dir");
    init_project(dir.path());

    let a = create_demand(dir.path(), "Pending A");
    let b = create_demand(dir.path(), "Working B");
    let c = create_demand(dir.path(), "Forwarded C");
    let d = create_demand(dir.path(), "Done D");

    dkt_cmd(dir.path()).args(["start", &b]).assert().success();
    dkt_cmd(dir.path()).args(["forward", &c]).assert().success();
    dkt_cmd(dir.path()).args(["start", &d]).assert().success();
    dkt_cmd(dir.path())
        .args(["finalize", &d])
        .assert()
        .success();

    let board = board_json(dir.path(), &[]);
    let columns = board["columns"].as_array().expect("columns array");
    assert_eq!(columns.len(), 5);

    // Counts agree with bucket sizes and sum to the collection size.
    let mut seen_ids = Vec::new();
    let mut count_sum = 0;
    for column in columns {
        let demands = column["demands"].as_array().expect("demands array");
        let count = column["count"].as_u64().expect("count") as usize;
        assert_eq!(count, demands.len());
        count_sum += count;
        for demand in demands {
            assert_eq!(demand["status"], column["status"]);
            seen_ids.push(demand["id"].as_str().expect("id").to_string());
        }
    }
    assert_eq!(board["total"].as_u64(), Some(4));
    assert_eq!(count_sum, 4);

    seen_ids.sort();
    let mut expected = vec![a, b, c, d];
    expected.sort();
    assert_eq!(seen_ids, expected);
}

#[test]
fn board_columns_carry_static_affordances() {
    let dir = TempDir::new().expect("temp dir");
    init_project(dir.path());

    let board = board_json(dir.path(), &[]);
    let columns = board["columns"].as_array().expect("columns array");

    let actions_of = |status: &str| -> Vec<String> {
        columns
            .iter()
            .find(|column| column["status"] == status)
            .expect("column present")["actions"]
            .as_array()
            .expect("actions array")
            .iter()
            .map(|action| action.as_str().expect("action").to_string())
            .collect()
    };

    assert_eq!(actions_of("pending"), ["forward", "start"]);
    assert_eq!(actions_of("in-progress"), ["confirm"]);
    assert_eq!(actions_of("forwarded"), ["confirm"]);
    assert_eq!(actions_of("confirmed"), ["finalize"]);
    assert!(actions_of("finalized").is_empty());
}

#[test]
fn board_filters_follow_the_query_options() {
    let dir = TempDir::new().expect("temp dir");
    init_project(dir.path());

    create_demand(dir.path(), "Garnishment packet");
    create_demand(dir.path(), "Phone call");

    let board = board_json(dir.path(), &["--text", "garnish"]);
    assert_eq!(board["total"].as_u64(), Some(1));

    // An unknown priority filter degrades to all rather than failing.
    let board = board_json(dir.path(), &["--priority", "urgent"]);
    assert_eq!(board["total"].as_u64(), Some(2));
}

#[test]
fn empty_board_renders_all_five_columns() {
    let dir = TempDir::new().expect("temp dir");
    init_project(dir.path());

    let board = board_json(dir.path(), &[]);
    let columns = board["columns"].as_array().expect("columns array");
    assert_eq!(columns.len(), 5);
    assert!(columns.iter().all(|column| column["count"] == 0));
    assert_eq!(board["total"].as_u64(), Some(0));
}
