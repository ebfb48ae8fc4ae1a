//! Integrity of proposed topics in the private proposals area

use crate::document::{Document, WORKING_SECTIONS};
use crate::kb::KnowledgeBase;
use crate::markdown;
use crate::validate::frontmatter::{freshness, Freshness};
use crate::validate::{CheckContext, Issue};

pub fn check_proposal_integrity(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    kb.discover_proposals()
        .iter()
        .filter_map(|path| match Document::load(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable proposal");
                None
            }
        })
        .flat_map(|doc| check_proposal(&doc, ctx))
        .collect()
}

fn check_proposal(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let file = ctx.display(doc.path());
    let fm = doc.frontmatter();
    let mut issues = Vec::new();

    if fm.scalar("status") != Some("proposal") {
        issues.push(Issue::warn(
            file.clone(),
            "Proposal missing 'status: proposal' in frontmatter",
        ));
    }
    if fm.is_missing("proposed_by") {
        issues.push(Issue::warn(file.clone(), "Proposal missing 'proposed_by' field"));
    }
    if fm.is_missing("rationale") {
        issues.push(Issue::warn(file.clone(), "Proposal missing 'rationale' field"));
    }

    let max = ctx.policy.proposal_max_age_days;
    if let Freshness::Age(age) = freshness(fm, ctx.today) {
        if age > max {
            issues.push(Issue::warn(
                file.clone(),
                format!("Stale proposal: {age} days old (max {max})"),
            ));
        }
    }

    let headings = markdown::h2_headings(&doc.body());
    for section in WORKING_SECTIONS {
        if !markdown::has_section(&headings, section) {
            issues.push(Issue::warn(
                file.clone(),
                format!("Proposal missing required section: {section}"),
            ));
        }
    }

    issues
}
