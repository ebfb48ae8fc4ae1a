use crate::cli::support::{dewey_at, json_output, small_kb};
use predicates::prelude::*;

#[test]
fn test_prescreen_queues_thin_rationale() {
    let dir = small_kb();

    let report = json_output(dir.path(), &["prescreen"]);
    assert_eq!(report["summary"]["total_files_scanned"], 3);

    let queue = report["queue"].as_array().unwrap();
    assert!(queue
        .iter()
        .any(|item| item["file"] == "docs/paid/bidding.md" && item["trigger"] == "why_quality"));
    assert!(queue.iter().all(|item| item["context"].is_object()));

    let counted: u64 = report["summary"]["trigger_counts"]
        .as_object()
        .unwrap()
        .values()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(counted as usize, queue.len());
}

#[test]
fn test_prescreen_human_output() {
    let dir = small_kb();

    dewey_at(dir.path())
        .arg("prescreen")
        .assert()
        .success()
        .stdout(predicate::str::contains("[why_quality] docs/paid/bidding.md"))
        .stdout(predicate::str::contains("Triggers:"));
}
