//! Structure checks: section ordering and completeness, heading hierarchy,
//! size bounds

use super::types::{CheckContext, Issue};
use crate::document::{Depth, Document};
use crate::markdown;

pub fn check_section_ordering(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    if doc.depth() != Some(Depth::Working) {
        return Vec::new();
    }

    let headings = markdown::h2_headings(doc.text());
    let in_practice = headings.iter().position(|h| h.contains("In Practice"));
    let key_guidance = headings.iter().position(|h| h.contains("Key Guidance"));

    match (in_practice, key_guidance) {
        (Some(practice), Some(guidance)) if guidance < practice => vec![Issue::warn(
            ctx.display(doc.path()),
            "'In Practice' must appear before 'Key Guidance' (concrete before abstract)",
        )],
        _ => Vec::new(),
    }
}

/// Canonical sections of `doc`'s depth that no `##` heading mentions
pub fn missing_sections(doc: &Document) -> Vec<&'static str> {
    let Some(depth) = doc.depth() else {
        return Vec::new();
    };
    let headings = markdown::h2_headings(doc.text());
    depth
        .required_sections()
        .iter()
        .copied()
        .filter(|section| !markdown::has_section(&headings, section))
        .collect()
}

pub fn check_section_completeness(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    if doc.depth() == Some(Depth::Reference) {
        if doc.body().trim().is_empty() {
            return vec![Issue::warn(
                ctx.display(doc.path()),
                "Reference file has no content after frontmatter",
            )];
        }
        return Vec::new();
    }

    missing_sections(doc)
        .into_iter()
        .map(|section| {
            Issue::warn(
                ctx.display(doc.path()),
                format!("Missing required section: {section}"),
            )
        })
        .collect()
}

pub fn check_heading_hierarchy(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let file = ctx.display(doc.path());
    let body = markdown::strip_fenced_code_blocks(&doc.body());
    let levels = markdown::heading_levels(&body);
    let mut issues = Vec::new();

    match levels.iter().filter(|&&level| level == 1).count() {
        0 => issues.push(Issue::warn(file.clone(), "No H1 heading found")),
        1 => {}
        n => issues.push(Issue::warn(
            file.clone(),
            format!("Multiple H1 headings found ({n}); expected exactly 1"),
        )),
    }

    for pair in levels.windows(2) {
        if pair[1] > pair[0] + 1 {
            issues.push(Issue::warn(
                file.clone(),
                format!("Skipped heading level: H{} to H{}", pair[0], pair[1]),
            ));
        }
    }

    issues
}

pub fn check_size_bounds(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let Some(depth) = doc.depth() else {
        return Vec::new();
    };
    let (lo, hi) = depth.size_bounds();
    let lines = doc.line_count();

    let message = if lines < lo {
        format!("File has {lines} lines; expected at least {lo} for depth '{depth}'")
    } else if lines > hi {
        format!("File has {lines} lines; expected at most {hi} for depth '{depth}'")
    } else {
        return Vec::new();
    };
    vec![Issue::warn(ctx.display(doc.path()), message)]
}
