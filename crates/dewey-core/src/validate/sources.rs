//! Provenance checks: scaffolding leftovers, source diversity and whether
//! inline citations are backed by the header's `sources`

use std::collections::BTreeSet;

use super::frontmatter::source_urls;
use super::types::{CheckContext, Issue};
use crate::document::Document;
use crate::kb::paths::{MARKER_BEGIN, MARKER_END};
use crate::markdown;

/// Hosts of the header's http(s) sources, one per source, in order
pub fn source_hosts(doc: &Document) -> Vec<String> {
    source_urls(doc.frontmatter())
        .into_iter()
        .filter_map(markdown::url_host)
        .collect()
}

/// `host` equals `source` or is one of its subdomains
fn same_site(host: &str, source: &str) -> bool {
    host == source || host.ends_with(&format!(".{source}"))
}

pub fn check_placeholder_comments(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let text = markdown::strip_fenced_code_blocks(doc.text());
    let count = markdown::html_comments(&text)
        .into_iter()
        .filter(|comment| *comment != MARKER_BEGIN && *comment != MARKER_END)
        .count();
    if count == 0 {
        return Vec::new();
    }

    vec![Issue::warn(
        ctx.display(doc.path()),
        format!("Contains {count} unfilled placeholder comment(s)"),
    )]
}

pub fn check_source_diversity(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let hosts = source_hosts(doc);
    let distinct: BTreeSet<&str> = hosts.iter().map(String::as_str).collect();
    if hosts.len() < 2 || distinct.len() != 1 {
        return Vec::new();
    }

    let host = distinct.into_iter().next().unwrap_or_default();
    vec![Issue::warn(
        ctx.display(doc.path()),
        format!(
            "All {} sources come from {host}; add an independent source",
            hosts.len()
        ),
    )]
}

/// Inline links outside "Go Deeper" whose host is not among the sources.
/// Documents with no usable sources are left to the header checks.
pub fn check_citation_grounding(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let sources = source_hosts(doc);
    if sources.is_empty() {
        return Vec::new();
    }

    let body = markdown::strip_fenced_code_blocks(&doc.body());
    let body = markdown::without_section(&body, "Go Deeper");
    let ungrounded: BTreeSet<String> = markdown::link_targets(&body)
        .iter()
        .filter_map(|target| markdown::url_host(target))
        .filter(|host| !sources.iter().any(|source| same_site(host, source)))
        .collect();

    ungrounded
        .into_iter()
        .map(|host| {
            Issue::warn(
                ctx.display(doc.path()),
                format!("Inline citation to {host} is not listed in sources"),
            )
        })
        .collect()
}
