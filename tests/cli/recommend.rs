use crate::cli::support::{dewey_at, json_output, small_kb};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_recommend_gated_by_default() {
    let dir = small_kb();

    let report = json_output(dir.path(), &["recommend"]);
    assert_eq!(
        report["skipped"],
        "Insufficient data: 0 reads (need 10 reads over 7 days)"
    );
    assert!(report.get("summary").is_none());
}

#[test]
fn test_recommend_low_utilization_after_recorded_reads() {
    let dir = small_kb();

    for _ in 0..10 {
        dewey_at(dir.path())
            .args(["--quiet", "record", "docs/paid/overview.md"])
            .assert()
            .success();
    }

    let report = json_output(
        dir.path(),
        &["recommend", "--min-reads", "0", "--min-days", "0"],
    );
    let recommendations = report["recommendations"].as_array().unwrap();
    let bidding = recommendations
        .iter()
        .find(|r| r["file"] == "docs/paid/bidding.md")
        .unwrap();
    assert_eq!(bidding["recommendation"], "low_utilization");
    assert_eq!(
        bidding["reason"],
        "Read 0 times vs 10 for paid overview -- consider demoting or merging"
    );
    assert_eq!(bidding["data"]["overview_reads"], 10);
    assert_eq!(bidding["data"]["area"], "paid");
    assert_eq!(report["summary"]["by_category"]["low_utilization"], 2);
}

#[test]
fn test_record_appends_to_utilization_log() {
    let dir = small_kb();

    dewey_at(dir.path())
        .args(["record", "./docs/paid/bidding.md", "--context", "agent"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Recorded read of docs/paid/bidding.md (agent)",
        ));

    let log = fs::read_to_string(dir.path().join(".dewey/utilization/log.jsonl")).unwrap();
    let event: serde_json::Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
    assert_eq!(event["file"], "docs/paid/bidding.md");
    assert_eq!(event["context"], "agent");
}

#[test]
fn test_recommend_is_not_recorded_in_history() {
    let dir = small_kb();

    json_output(dir.path(), &["recommend"]);

    assert!(!dir.path().join(".dewey/history/health-log.jsonl").exists());
}
