//! Per-document validators
//!
//! Every check is a pure function of one [`Document`] and the shared
//! [`CheckContext`]. Findings are returned as [`Issue`] values; a document
//! that fails every check still yields a complete list.

pub mod frontmatter;
pub mod links;
pub mod naming;
pub mod reachability;
pub mod readability;
pub mod sections;
pub mod sources;
pub mod types;

pub use reachability::ReachabilityChecker;
pub use types::{CheckContext, HealthSummary, Issue, Severity};

use crate::document::Document;

type DocumentCheck = fn(&Document, &CheckContext) -> Vec<Issue>;

/// The fixed battery, in reporting order
const DOCUMENT_CHECKS: [DocumentCheck; 14] = [
    frontmatter::check_frontmatter,
    sections::check_section_ordering,
    links::check_cross_references,
    sections::check_size_bounds,
    frontmatter::check_source_urls,
    frontmatter::check_freshness,
    sections::check_section_completeness,
    sections::check_heading_hierarchy,
    links::check_go_deeper_links,
    links::check_ref_see_also,
    readability::check_readability,
    sources::check_placeholder_comments,
    sources::check_source_diversity,
    sources::check_citation_grounding,
];

/// Run every per-document check, plus the reachability check when given
pub fn check_document(
    doc: &Document,
    ctx: &CheckContext,
    checker: Option<&ReachabilityChecker>,
) -> Vec<Issue> {
    let mut issues: Vec<Issue> = DOCUMENT_CHECKS
        .iter()
        .flat_map(|check| check(doc, ctx))
        .collect();
    if let Some(checker) = checker {
        issues.extend(reachability::check_source_reachability(doc, ctx, checker));
    }
    issues
}

#[cfg(test)]
mod tests;
