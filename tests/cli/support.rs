use assert_cmd::{cargo::cargo_bin_cmd, Command};
use chrono::Local;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Get a Command for dewey
pub fn dewey() -> Command {
    cargo_bin_cmd!("dewey")
}

/// Get a Command for dewey rooted at `root`
pub fn dewey_at(root: &Path) -> Command {
    let mut cmd = dewey();
    cmd.arg("--root").arg(root);
    cmd
}

/// Run with `--format json` and parse stdout
pub fn json_output(root: &Path, args: &[&str]) -> serde_json::Value {
    let output = dewey_at(root)
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "dewey {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Frontmatter validated today
pub fn header(depth: &str) -> String {
    format!(
        "---\nsources:\n  - https://example.com/doc\nlast_validated: {}\nrelevance: core\ndepth: {}\n---\n",
        Local::now().date_naive().format("%Y-%m-%d"),
        depth
    )
}

/// One area: an overview, a working topic missing two sections, and its
/// reference companion
pub fn small_kb() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "docs/paid/overview.md",
        &format!(
            "{}# Paid\n\n## What This Covers\nPaid search.\n\n## How It's Organized\n- [Bidding](bidding.md)\n",
            header("overview")
        ),
    );
    write(
        root,
        "docs/paid/bidding.md",
        &format!(
            "{}# Bidding\n\n## Why This Matters\nSpend.\n\n## In Practice\nSet targets.\n\n## Key Guidance\nBe patient.\n",
            header("working")
        ),
    );
    write(
        root,
        "docs/paid/bidding.ref.md",
        &format!(
            "{}# Bidding\n\nSee also [Bidding](bidding.md).\n",
            header("reference")
        ),
    );
    write(root, "docs/index.md", "# Index\n- [Bidding](paid/bidding.md)\n");
    dir
}

/// Messages of every issue reported for `file`
pub fn messages_for(report: &serde_json::Value, file: &str) -> Vec<String> {
    report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|issue| issue["file"] == file)
        .map(|issue| issue["message"].as_str().unwrap().to_string())
        .collect()
}
