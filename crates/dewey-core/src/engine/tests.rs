use super::*;
use crate::fix::{is_cross_link_issue, FixActionKind, MISSING_SECTION_PREFIX, PLAN_CHECK_MARKER};
use crate::utilization::{record_event, ReadEvent};
use chrono::Duration;
use std::fs;
use tempfile::{tempdir, TempDir};

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn header(depth: &str) -> String {
    format!(
        "---\nsources:\n  - https://example.com/doc\nlast_validated: {}\nrelevance: core\ndepth: {depth}\n---\n",
        today()
    )
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// One area with an overview, a working topic and its reference companion
fn small_kb() -> TempDir {
    let dir = tempdir().unwrap();
    write(
        &dir,
        "docs/paid/overview.md",
        &format!(
            "{}# Paid\n\n## What This Covers\nPaid search.\n\n## How It's Organized\n- [Bidding](bidding.md)\n",
            header("overview")
        ),
    );
    write(
        &dir,
        "docs/paid/bidding.md",
        &format!(
            "{}# Bidding\n\n## Why This Matters\nSpend.\n\n## In Practice\nSet targets.\n\n## Key Guidance\nBe patient.\n",
            header("working")
        ),
    );
    write(
        &dir,
        "docs/paid/bidding.ref.md",
        &format!("{}# Bidding\n\nSee also [Bidding](bidding.md).\n", header("reference")),
    );
    write(&dir, "docs/index.md", "# Index\n- [Bidding](paid/bidding.md)\n");
    dir
}

fn messages(report: &HealthReport) -> Vec<&str> {
    report.issues.iter().map(|i| i.message.as_str()).collect()
}

#[test]
fn test_health_check_records_snapshot() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();

    let report = run_health_check(&kb, &HealthOptions::default()).unwrap();
    assert_eq!(report.summary.total_files, 3);
    assert!(report.fixes.is_none());

    let snapshots = history::read_history(&kb, 10).unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].tier1.as_ref(), Some(&report.summary));
    assert!(snapshots[0].tier2.is_none());
    assert_eq!(
        snapshots[0].file_list,
        vec!["paid/bidding.md", "paid/bidding.ref.md", "paid/overview.md"]
    );
}

#[test]
fn test_unpersisted_run_leaves_history_alone() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();
    let options = HealthOptions {
        persist: false,
        ..HealthOptions::default()
    };
    run_health_check(&kb, &options).unwrap();
    assert!(history::read_history(&kb, 10).unwrap().is_empty());
}

#[test]
fn test_removed_file_is_reported_once() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();
    run_health_check(&kb, &HealthOptions::default()).unwrap();

    fs::remove_file(dir.path().join("docs/paid/bidding.ref.md")).unwrap();
    let report = run_health_check(&kb, &HealthOptions::default()).unwrap();
    let regressions: Vec<&str> = messages(&report)
        .into_iter()
        .filter(|m| m.starts_with("File was present"))
        .collect();
    assert_eq!(
        regressions,
        vec!["File was present in last health check but is now missing: paid/bidding.ref.md"]
    );
}

#[test]
fn test_failing_tree_still_reports() {
    let dir = tempdir().unwrap();
    write(&dir, "docs/a/one.md", "no header at all\n");
    write(&dir, "docs/a/two.md", "---\nbroken\n");
    let kb = KnowledgeBase::open(dir.path()).unwrap();

    let report = run_health_check(&kb, &HealthOptions::default()).unwrap();
    assert_eq!(report.summary.total_files, 2);
    assert_eq!(report.summary.pass_count, 0);
    assert!(report.summary.fail_count >= 2);
    assert_eq!(
        report.summary.fail_count + report.summary.warn_count,
        report.issues.len()
    );
}

#[test]
fn test_fix_then_recheck_is_clean_of_fixed_kinds() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();
    let options = HealthOptions {
        fix_mode: Some(FixMode::Apply),
        persist: false,
        ..HealthOptions::default()
    };

    let first = run_health_check(&kb, &options).unwrap();
    let applied: Vec<FixActionKind> = first.fixes.unwrap().iter().map(|f| f.action).collect();
    assert_eq!(
        applied,
        vec![
            FixActionKind::InsertedStubSection,
            FixActionKind::InsertedStubSection,
            FixActionKind::InsertedRefLink,
        ]
    );

    let second = run_health_check(&kb, &options).unwrap();
    assert_eq!(second.fixes, Some(Vec::new()));
    assert!(!messages(&second)
        .iter()
        .any(|m| m.starts_with("Missing required section")));
}

#[test]
fn test_dry_run_leaves_files() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();
    let before = fs::read_to_string(dir.path().join("docs/paid/bidding.md")).unwrap();
    let options = HealthOptions {
        fix_mode: Some(FixMode::DryRun),
        ..HealthOptions::default()
    };

    let report = run_health_check(&kb, &options).unwrap();
    let fixes = report.fixes.unwrap();
    assert_eq!(fixes.len(), 2);
    assert!(fixes
        .iter()
        .all(|f| f.action == FixActionKind::WouldInsertStubSection));
    assert_eq!(
        fs::read_to_string(dir.path().join("docs/paid/bidding.md")).unwrap(),
        before
    );
}

#[test]
fn test_prescreening_snapshot() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();

    let report = run_tier2_prescreening(&kb, true).unwrap();
    assert_eq!(report.summary.total_files_scanned, 3);
    assert_eq!(
        report.summary.trigger_counts.values().sum::<usize>(),
        report.queue.len()
    );

    let snapshots = history::read_history(&kb, 10).unwrap();
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].tier1.is_none());
    assert_eq!(snapshots[0].tier2.as_ref(), Some(&report.summary));
}

#[test]
fn test_combined_report_records_one_snapshot() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();

    let report = run_combined_report(&kb).unwrap();
    let snapshots = history::read_history(&kb, 10).unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].tier1.as_ref(), Some(&report.tier1.summary));
    assert_eq!(snapshots[0].tier2.as_ref(), Some(&report.tier2.summary));
    assert_eq!(snapshots[0].file_list.len(), 3);
}

fn log_reads(kb: &KnowledgeBase, file: &str, count: u32) {
    let start = Local::now().naive_local() - Duration::days(10);
    for i in 0..count {
        let event = ReadEvent {
            file: file.to_string(),
            timestamp: start + Duration::hours(i64::from(i) * 8),
            context: "test".to_string(),
        };
        record_event(kb, &event).unwrap();
    }
}

#[test]
fn test_recommendations_from_read_log() {
    let dir = small_kb();
    let kb = KnowledgeBase::open(dir.path()).unwrap();

    let skipped = generate_recommendations(&kb, Gate::default()).unwrap();
    assert!(skipped.is_skipped());

    log_reads(&kb, "docs/paid/overview.md", 30);
    log_reads(&kb, "docs/paid/bidding.md", 20);

    let report = generate_recommendations(&kb, Gate::default()).unwrap();
    assert!(!report.is_skipped());
    assert_eq!(report.recommendations.len(), 1);
    let rec = &report.recommendations[0];
    assert_eq!(rec.file, "docs/paid/bidding.ref.md");
    assert_eq!(rec.recommendation, recommend::RecommendationKind::LowUtilization);
    assert_eq!(
        rec.reason,
        "Read 0 times vs 30 for paid overview -- consider demoting or merging"
    );
    assert_eq!(rec.data.depth, "reference");
    assert_eq!(rec.data.area, "paid");
    assert_eq!(history::read_history(&kb, 10).unwrap().len(), 0);
}

#[test]
fn test_fixes_and_remaining_issues_partition_fixable_issues() {
    let dir = small_kb();
    write(
        &dir,
        "docs/paid/lonely.ref.md",
        &format!("{}# Lonely\n\nNo companion here.\n", header("reference")),
    );
    let kb = KnowledgeBase::open(dir.path()).unwrap();
    let check_only = HealthOptions {
        persist: false,
        ..HealthOptions::default()
    };
    let fixing = HealthOptions {
        fix_mode: Some(FixMode::Apply),
        ..check_only
    };

    let baseline = run_health_check(&kb, &check_only).unwrap();
    let fixes = run_health_check(&kb, &fixing).unwrap().fixes.unwrap();
    let after = run_health_check(&kb, &check_only).unwrap();

    let remaining: Vec<(&str, &str)> = after
        .issues
        .iter()
        .map(|i| (i.file.as_str(), i.message.as_str()))
        .collect();
    let fixable: Vec<_> = baseline
        .issues
        .iter()
        .filter(|i| {
            i.message.starts_with(MISSING_SECTION_PREFIX)
                || is_cross_link_issue(&i.message)
                || i.message.contains(PLAN_CHECK_MARKER)
        })
        .collect();
    assert!(fixable.len() >= 3);

    for issue in fixable {
        let section = issue.message.strip_prefix(MISSING_SECTION_PREFIX);
        let fixed = fixes
            .iter()
            .any(|f| f.file == issue.file && f.section.as_deref() == section);
        let left = remaining.contains(&(issue.file.as_str(), issue.message.as_str()));
        assert!(
            fixed != left,
            "{}: {} fixed={fixed} remaining={left}",
            issue.file,
            issue.message
        );
    }
}
