use crate::cli::support::{dewey_at, json_output, small_kb};
use predicates::prelude::*;

#[test]
fn test_report_runs_both_tiers() {
    let dir = small_kb();

    let report = json_output(dir.path(), &["report"]);
    assert_eq!(report["tier1"]["summary"]["total_files"], 3);
    assert_eq!(report["tier2"]["summary"]["total_files_scanned"], 3);
    assert!(report.get("recommendations").is_none());
}

#[test]
fn test_report_records_one_snapshot() {
    let dir = small_kb();

    json_output(dir.path(), &["report"]);

    let history = json_output(dir.path(), &["history"]);
    let snapshots = history.as_array().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0]["tier1"].is_object());
    assert!(snapshots[0]["tier2"].is_object());
}

#[test]
fn test_report_with_recommendations_and_no_reads_is_skipped() {
    let dir = small_kb();

    let report = json_output(dir.path(), &["report", "--recommendations"]);
    let recommendations = &report["recommendations"];
    assert_eq!(recommendations["recommendations"], serde_json::json!([]));
    assert!(recommendations["skipped"]
        .as_str()
        .unwrap()
        .starts_with("Insufficient data: 0 reads"));
}

#[test]
fn test_report_human_sections() {
    let dir = small_kb();

    dewey_at(dir.path())
        .args(["report", "--recommendations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== Tier 1: structure =="))
        .stdout(predicate::str::contains("== Tier 2: review queue =="))
        .stdout(predicate::str::contains("Recommendations skipped:"));
}
