//! Structural coverage, index synchronisation and inventory regression

use std::collections::BTreeSet;
use std::fs;

use crate::kb::paths::{doc_stem, file_name, ref_companion, INDEX_FILE, OVERVIEW_FILE, REF_SUFFIX};
use crate::kb::KnowledgeBase;
use crate::validate::{CheckContext, Issue};

/// Every area needs an overview; every topic should have a reference companion
pub fn check_coverage(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    for area in kb.areas() {
        if !area.has_overview() {
            issues.push(Issue::fail(
                ctx.display(&area.path),
                format!("Area '{}' missing {OVERVIEW_FILE}", area.name),
            ));
        }

        for topic in &area.topics {
            if !ref_companion(topic).exists() {
                let stem = doc_stem(topic);
                issues.push(Issue::warn(
                    ctx.display(topic),
                    format!(
                        "Topic '{}' missing companion {stem}{REF_SUFFIX}",
                        file_name(topic)
                    ),
                ));
            }
        }
    }

    issues
}

/// Every topic must be mentioned as `<area>/<file>` somewhere in `index.md`
pub fn check_index_sync(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let index_path = kb.index_path();
    if !index_path.exists() {
        return vec![Issue::warn(
            ctx.display(&index_path),
            format!("Missing {INDEX_FILE} -- regenerate the structural index"),
        )];
    }

    let index_text = match fs::read_to_string(&index_path) {
        Ok(text) => text.replace('\\', "/"),
        Err(e) => {
            tracing::warn!(path = %index_path.display(), error = %e, "skipping unreadable index");
            return Vec::new();
        }
    };

    let mut issues = Vec::new();
    for area in kb.areas() {
        for topic in &area.topics {
            let rel = format!("{}/{}", area.name, file_name(topic));
            if !index_text.contains(&rel) {
                issues.push(Issue::warn(
                    ctx.display(topic),
                    format!("Topic not in {INDEX_FILE}: {rel}"),
                ));
            }
        }
    }
    issues
}

/// Documents listed in the previous snapshot but absent now. Paths are
/// relative to the knowledge directory. No baseline means no warnings.
pub fn check_inventory_regression(
    kb: &KnowledgeBase,
    ctx: &CheckContext,
    previous: Option<&[String]>,
    current: &[String],
) -> Vec<Issue> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    let current: BTreeSet<&str> = current.iter().map(String::as_str).collect();
    let previous: BTreeSet<&str> = previous.iter().map(String::as_str).collect();

    previous
        .difference(&current)
        .map(|missing| {
            Issue::warn(
                ctx.display(&kb.knowledge_dir().join(missing)),
                format!("File was present in last health check but is now missing: {missing}"),
            )
        })
        .collect()
}
