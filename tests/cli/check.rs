use crate::cli::support::{dewey_at, json_output, messages_for, small_kb, write};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_check_reports_missing_sections() {
    let dir = small_kb();

    let report = json_output(dir.path(), &["check"]);
    assert_eq!(report["summary"]["total_files"], 3);
    assert!(report.get("fixes").is_none());

    let messages = messages_for(&report, "docs/paid/bidding.md");
    assert!(messages.contains(&"Missing required section: Watch Out For".to_string()));
    assert!(messages.contains(&"Missing required section: Go Deeper".to_string()));
}

#[test]
fn test_check_summary_counts_match_issues() {
    let dir = small_kb();

    let report = json_output(dir.path(), &["check"]);
    let issues = report["issues"].as_array().unwrap();
    let fails = issues.iter().filter(|i| i["severity"] == "fail").count();
    let warns = issues.iter().filter(|i| i["severity"] == "warn").count();
    assert_eq!(report["summary"]["fail_count"], fails);
    assert_eq!(report["summary"]["warn_count"], warns);
}

#[test]
fn test_check_human_output() {
    let dir = small_kb();

    dewey_at(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "WARN docs/paid/bidding.md: Missing required section: Watch Out For",
        ))
        .stdout(predicate::str::contains("Summary:"));
}

#[test]
fn test_check_empty_knowledge_base_is_healthy() {
    let dir = tempdir().unwrap();
    write(dir.path(), "docs/index.md", "# Index\n");

    dewey_at(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Knowledge base is healthy (0 files checked)",
        ));
}

#[test]
fn test_fix_inserts_stubs_and_is_idempotent() {
    let dir = small_kb();

    let first = json_output(dir.path(), &["check", "--fix"]);
    let actions: Vec<&str> = first["fixes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec![
            "inserted_stub_section",
            "inserted_stub_section",
            "inserted_ref_link"
        ]
    );

    let bidding = fs::read_to_string(dir.path().join("docs/paid/bidding.md")).unwrap();
    assert!(bidding.contains("## Watch Out For\n\n<!-- TODO: Add content -->"));
    assert!(bidding.contains("- [Bidding Reference](bidding.ref.md) -- quick-lookup version"));

    let second = json_output(dir.path(), &["check", "--fix"]);
    assert_eq!(second["fixes"], serde_json::json!([]));
    assert_eq!(
        fs::read_to_string(dir.path().join("docs/paid/bidding.md")).unwrap(),
        bidding
    );
}

#[test]
fn test_dry_run_leaves_files_untouched() {
    let dir = small_kb();
    let before = fs::read_to_string(dir.path().join("docs/paid/bidding.md")).unwrap();

    let report = json_output(dir.path(), &["check", "--dry-run"]);
    let fixes = report["fixes"].as_array().unwrap();
    assert!(fixes
        .iter()
        .any(|f| f["action"] == "would_insert_stub_section" && f["section"] == "Watch Out For"));
    assert!(fixes
        .iter()
        .all(|f| f["action"].as_str().unwrap().starts_with("would_")));

    let after = fs::read_to_string(dir.path().join("docs/paid/bidding.md")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_fix_conflicts_with_dry_run() {
    let dir = small_kb();

    dewey_at(dir.path())
        .args(["check", "--fix", "--dry-run"])
        .assert()
        .code(2);
}
