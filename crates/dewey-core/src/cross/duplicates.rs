//! Duplicate content across area documents
//!
//! Two passes over every document in every area (overviews included):
//! exact paragraph duplication by fingerprint, then near duplication by
//! shingle Jaccard similarity. Companion pairs are expected to overlap and
//! are skipped by both passes.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use crate::kb::paths::{file_name, is_companion_pair, INDEX_FILE};
use crate::kb::KnowledgeBase;
use crate::markdown;
use crate::similarity::{jaccard, ContentProfile};
use crate::validate::{CheckContext, Issue};

/// Documents inside area directories, sorted, excluding `index.md`
fn area_documents(kb: &KnowledgeBase) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for area in kb.areas() {
        let Ok(entries) = fs::read_dir(&area.path) else {
            continue;
        };
        let mut in_area: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .filter(|p| file_name(p) != INDEX_FILE)
            .collect();
        in_area.sort();
        files.extend(in_area);
    }
    files
}

pub fn check_duplicate_content(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let policy = &ctx.policy;
    let profiles: Vec<(PathBuf, ContentProfile)> = area_documents(kb)
        .into_iter()
        .filter_map(|path| match fs::read_to_string(&path) {
            Ok(text) => {
                let body = markdown::strip_fenced_code_blocks(&markdown::body_without_frontmatter(&text));
                let profile =
                    ContentProfile::build(&body, policy.min_paragraph_chars, policy.shingle_size);
                Some((path, profile))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                None
            }
        })
        .collect();
    if profiles.len() < 2 {
        return Vec::new();
    }

    let mut issues = exact_duplicates(kb, ctx, &profiles);
    issues.extend(near_duplicates(kb, ctx, &profiles));
    issues
}

fn exact_duplicates(
    kb: &KnowledgeBase,
    ctx: &CheckContext,
    profiles: &[(PathBuf, ContentProfile)],
) -> Vec<Issue> {
    let mut holders: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
    for (idx, (_, profile)) in profiles.iter().enumerate() {
        for fp in &profile.fingerprints {
            holders.entry(fp.as_str()).or_default().insert(idx);
        }
    }

    let mut pairs: BTreeSet<(usize, usize)> = BTreeSet::new();
    for files in holders.values() {
        let files: Vec<usize> = files.iter().copied().collect();
        for (i, &a) in files.iter().enumerate() {
            for &b in &files[i + 1..] {
                if !is_companion_pair(&profiles[a].0, &profiles[b].0) {
                    pairs.insert((a, b));
                }
            }
        }
    }

    pairs
        .into_iter()
        .map(|(a, b)| {
            let (path_a, path_b) = (&profiles[a].0, &profiles[b].0);
            Issue::warn(
                ctx.display(path_a),
                format!(
                    "Exact duplicate paragraph found in {} and {}",
                    kb.rel(path_a),
                    kb.rel(path_b)
                ),
            )
        })
        .collect()
}

fn near_duplicates(
    kb: &KnowledgeBase,
    ctx: &CheckContext,
    profiles: &[(PathBuf, ContentProfile)],
) -> Vec<Issue> {
    let threshold = ctx.policy.similarity_threshold;
    let mut issues = Vec::new();

    for (i, (path_a, a)) in profiles.iter().enumerate() {
        for (path_b, b) in &profiles[i + 1..] {
            if is_companion_pair(path_a, path_b) || a.shingles.is_empty() || b.shingles.is_empty() {
                continue;
            }
            let similarity = jaccard(&a.shingles, &b.shingles);
            if similarity > threshold {
                issues.push(Issue::warn(
                    ctx.display(path_a),
                    format!(
                        "High similarity ({:.0}%) between {} and {} -- consider deduplicating",
                        similarity * 100.0,
                        kb.rel(path_a),
                        kb.rel(path_b)
                    ),
                ));
            }
        }
    }

    issues
}
