use crate::cli::support::{dewey, dewey_at, small_kb, write};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_missing_root_is_a_data_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere");

    dewey_at(&missing)
        .arg("check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_missing_root_json_error_envelope() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere");

    let output = dewey_at(&missing)
        .args(["--format", "json", "check"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["type"], "root_not_found");
    assert_eq!(err["error"]["code"], 3);
}

#[test]
fn test_unknown_subcommand_json_is_usage_error() {
    let output = dewey()
        .args(["--format", "json", "frobnicate"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["type"], "usage_error");
}

#[test]
fn test_version_flag() {
    dewey()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dewey"));
}

#[test]
fn test_record_without_path_is_usage_error() {
    let dir = tempdir().unwrap();

    dewey_at(dir.path())
        .args(["record", "./"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("record needs a document path"));
}

#[test]
fn test_out_of_range_policy_is_a_data_error() {
    let dir = small_kb();
    write(
        dir.path(),
        ".dewey/config.json",
        r#"{"policy": {"shingle_size": 0}}"#,
    );

    let output = dewey_at(dir.path())
        .args(["--format", "json", "check"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"]["type"], "invalid_config");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap()
        .contains("shingle_size"));
}

#[test]
fn test_malformed_config_is_a_data_error() {
    let dir = small_kb();
    write(dir.path(), ".dewey/config.json", "{not json");

    dewey_at(dir.path())
        .arg("prescreen")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid config"));
}
