//! Link graph: orphaned documents and overview completeness

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::kb::paths::{file_name, lexical_clean, resolve_lexical, INDEX_FILE, OVERVIEW_FILE};
use crate::kb::KnowledgeBase;
use crate::markdown;
use crate::validate::{CheckContext, Issue};

/// Documents exempt from orphan detection
pub const ENTRY_POINTS: [&str; 2] = [OVERVIEW_FILE, INDEX_FILE];

pub fn is_entry_point(path: &Path) -> bool {
    let name = file_name(path);
    ENTRY_POINTS.iter().any(|entry| *entry == name)
}

/// Reverse link graph: target path to the set of documents linking to it.
/// Only links that resolve to an existing file are recorded; self-links
/// are ignored.
pub fn build_reverse_links(documents: &[(PathBuf, String)]) -> HashMap<PathBuf, HashSet<PathBuf>> {
    let mut linked_from: HashMap<PathBuf, HashSet<PathBuf>> = HashMap::new();

    for (path, text) in documents {
        let Some(dir) = path.parent() else {
            continue;
        };
        let source = lexical_clean(path);
        for target in markdown::link_targets(text) {
            let Some(local) = markdown::local_target(&target) else {
                continue;
            };
            let resolved = resolve_lexical(dir, local);
            if resolved != source && resolved.exists() {
                linked_from.entry(resolved).or_default().insert(source.clone());
            }
        }
    }

    linked_from
}

pub fn check_link_graph(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let documents: Vec<(PathBuf, String)> = kb
        .discover_documents()
        .into_iter()
        .filter_map(|path| match fs::read_to_string(&path) {
            Ok(text) => Some((path, text)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                None
            }
        })
        .collect();
    if documents.is_empty() {
        return Vec::new();
    }

    let linked_from = build_reverse_links(&documents);
    let mut issues: Vec<Issue> = documents
        .iter()
        .map(|(path, _)| path)
        .filter(|path| !is_entry_point(path))
        .filter(|path| !linked_from.contains_key(&lexical_clean(path)))
        .map(|path| {
            Issue::warn(
                ctx.display(path),
                format!(
                    "Orphaned file -- not linked from any other file: {}",
                    kb.rel(path)
                ),
            )
        })
        .collect();

    for area in kb.areas() {
        if area.topics.is_empty() || !area.has_overview() {
            continue;
        }
        issues.extend(check_overview_lists_topics(&area.overview(), &area.topics, ctx));
    }

    issues
}

/// Every topic of an area must be a link target in the overview's
/// "How It's Organized" section. Skipped when that section is absent or empty.
fn check_overview_lists_topics(overview: &Path, topics: &[PathBuf], ctx: &CheckContext) -> Vec<Issue> {
    let text = match fs::read_to_string(overview) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %overview.display(), error = %e, "skipping unreadable overview");
            return Vec::new();
        }
    };
    let body = markdown::body_without_frontmatter(&text);
    let section = markdown::extract_section_by(&body, |heading| {
        let heading = heading.to_lowercase();
        heading.contains("how it") && heading.contains("organized")
    });
    let Some(section) = section.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };
    let Some(dir) = overview.parent() else {
        return Vec::new();
    };

    let listed: HashSet<PathBuf> = markdown::link_targets(&section)
        .iter()
        .filter_map(|target| markdown::local_target(target))
        .map(|target| resolve_lexical(dir, target))
        .collect();

    topics
        .iter()
        .filter(|topic| !listed.contains(&lexical_clean(topic)))
        .map(|topic| {
            Issue::warn(
                ctx.display(overview),
                format!(
                    "Topic '{}' not listed in overview's How It's Organized section",
                    file_name(topic)
                ),
            )
        })
        .collect()
}
