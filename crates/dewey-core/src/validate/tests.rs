use super::*;
use crate::config::Policy;
use chrono::{Duration, NaiveDate};
use std::path::Path;

fn ctx() -> CheckContext {
    CheckContext::new(
        Path::new("/kb"),
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        Policy::default(),
    )
}

#[test]
fn test_stale_working_document_missing_two_sections() {
    let ctx = ctx();
    let validated = ctx.today - Duration::days(120);
    let text = format!(
        "---\nsources: [https://x.com]\nlast_validated: {validated}\nrelevance: core\ndepth: working\n---\n\
         # Topic\n\n## Why This Matters\n\nIt matters a lot\n\n## In Practice\n\nDo the thing\n\n\
         ## Key Guidance\n\nFollow the rules\n"
    );
    let doc = Document::from_text(Path::new("/kb/docs/area/topic.md"), text);

    let issues = check_document(&doc, &ctx, None);
    let fails = issues.iter().filter(|i| i.severity == Severity::Fail).count();
    let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();

    assert_eq!(fails, 0, "{messages:?}");
    assert_eq!(
        messages,
        vec![
            "Content is 120 days old (max 90); needs re-validation",
            "Missing required section: Watch Out For",
            "Missing required section: Go Deeper",
        ]
    );
}

#[test]
fn test_document_without_frontmatter_reports_once() {
    let doc = Document::from_text(Path::new("/kb/docs/area/topic.md"), "# Topic\n".into());
    let issues = check_document(&doc, &ctx(), None);
    let fails: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == Severity::Fail)
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(fails, vec!["Missing frontmatter"]);
    // depth-dependent checks are silent without a depth
    assert!(issues.iter().all(|i| !i.message.starts_with("Missing required section")));
}

#[test]
fn test_clean_reference_document() {
    let text = "---\nsources:\n  - https://x.com\nlast_validated: 2026-05-20\nrelevance: supporting\ndepth: reference\n---\n# Bidding\n\n- bid high\n\n**See also:** [Bidding](bidding.md)\n";
    let doc = Document::from_text(Path::new("/kb/docs/area/bidding.ref.md"), text.into());
    let issues = check_document(&doc, &ctx(), None);
    // the companion link does not resolve on disk in this fixture
    let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(messages, vec!["Broken internal link: bidding.md"]);
}
