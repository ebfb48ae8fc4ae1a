//! Cross-document validators
//!
//! These checks need the whole collection and run once per invocation.
//! Documents they cannot read are skipped with a warning instead of aborting
//! the run.

pub mod coverage;
pub mod duplicates;
pub mod graph;
pub mod manifest;
pub mod plan;
pub mod proposals;

use crate::kb::KnowledgeBase;
use crate::validate::naming::check_naming_conventions;
use crate::validate::{CheckContext, Issue};

pub use coverage::{check_coverage, check_index_sync, check_inventory_regression};
pub use duplicates::check_duplicate_content;
pub use graph::check_link_graph;
pub use manifest::check_manifest_sync;
pub use plan::check_curation_plan_sync;
pub use proposals::check_proposal_integrity;

/// Consistency checks over the collection, in reporting order. Structural
/// coverage, index and regression checks are run separately by the caller.
pub fn check_collection(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = check_manifest_sync(kb, ctx);
    issues.extend(check_curation_plan_sync(kb, ctx));
    issues.extend(check_proposal_integrity(kb, ctx));
    issues.extend(check_link_graph(kb, ctx));
    issues.extend(check_duplicate_content(kb, ctx));
    issues.extend(check_naming_conventions(kb, ctx));
    issues
}
