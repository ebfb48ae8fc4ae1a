use crate::cli::support::{dewey_at, json_output, small_kb};
use predicates::prelude::*;

#[test]
fn test_history_empty() {
    let dir = small_kb();

    dewey_at(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history recorded yet"));
    assert_eq!(json_output(dir.path(), &["history"]), serde_json::json!([]));
}

#[test]
fn test_history_limit_keeps_most_recent() {
    let dir = small_kb();

    json_output(dir.path(), &["check"]);
    json_output(dir.path(), &["prescreen"]);
    json_output(dir.path(), &["check"]);

    let history = json_output(dir.path(), &["history", "--limit", "2"]);
    let snapshots = history.as_array().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert!(snapshots[0]["tier1"].is_null());
    assert!(snapshots[0]["tier2"].is_object());
    assert!(snapshots[1]["tier1"].is_object());
    assert_eq!(
        snapshots[1]["file_list"],
        serde_json::json!(["paid/bidding.md", "paid/bidding.ref.md", "paid/overview.md"])
    );
}
