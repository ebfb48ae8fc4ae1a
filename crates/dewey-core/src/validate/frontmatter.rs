//! Header checks: required fields, source URLs and freshness

use chrono::NaiveDate;

use super::types::{CheckContext, Issue};
use crate::document::{Depth, Document, FieldValue, Frontmatter};

/// Fields every document header must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["sources", "last_validated", "relevance", "depth"];

/// Outcome of reading `last_validated`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Field absent or empty
    Unknown,
    /// Field present but not an ISO calendar date
    Invalid(String),
    /// Whole days between the validation date and today
    Age(i64),
}

/// Age of a header's `last_validated` date as of `today`
pub fn freshness(frontmatter: &Frontmatter, today: NaiveDate) -> Freshness {
    let raw = match frontmatter.get("last_validated") {
        None | Some(FieldValue::Empty) => return Freshness::Unknown,
        Some(value) => value.to_string(),
    };
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Freshness::Age((today - date).num_days()),
        Err(_) => Freshness::Invalid(raw),
    }
}

pub fn check_frontmatter(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let file = ctx.display(doc.path());
    let fm = doc.frontmatter();

    if fm.is_empty() {
        return vec![Issue::fail(file, "Missing frontmatter")];
    }

    let mut issues: Vec<Issue> = REQUIRED_FIELDS
        .iter()
        .filter(|field| fm.is_missing(field))
        .map(|field| {
            Issue::fail(
                file.clone(),
                format!("Missing required frontmatter field: {field}"),
            )
        })
        .collect();

    if fm.list("sources").is_some_and(|items| items.is_empty()) {
        issues.push(Issue::fail(
            file.clone(),
            "Missing required frontmatter field: sources",
        ));
    }

    if let Some(depth) = fm.get("depth") {
        let valid = depth
            .as_scalar()
            .is_some_and(|d| d.parse::<Depth>().is_ok());
        if *depth != FieldValue::Empty && !valid {
            let allowed: Vec<String> = Depth::ALL
                .iter()
                .map(|d| format!("'{}'", d.as_str()))
                .collect();
            issues.push(Issue::fail(
                file,
                format!("Invalid depth '{depth}'; must be one of [{}]", allowed.join(", ")),
            ));
        }
    }

    issues
}

/// Source entry with an optional `url:` key prefix removed
pub fn source_url(entry: &str) -> &str {
    let entry = entry.trim();
    entry.strip_prefix("url:").map(str::trim).unwrap_or(entry)
}

/// Every real source URL of a document, skipping placeholder comments
pub fn source_urls(frontmatter: &Frontmatter) -> Vec<&str> {
    frontmatter
        .items("sources")
        .into_iter()
        .map(source_url)
        .filter(|url| !url.contains("<!--"))
        .collect()
}

pub fn check_source_urls(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let Some(entries) = doc.frontmatter().list("sources") else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| source_url(entry))
        .filter(|url| !url.contains("<!--"))
        .filter(|url| !(url.starts_with("http://") || url.starts_with("https://")))
        .map(|url| {
            Issue::fail(
                ctx.display(doc.path()),
                format!("Malformed source URL: {url}"),
            )
        })
        .collect()
}

pub fn check_freshness(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let max = ctx.policy.freshness_max_age_days;
    match freshness(doc.frontmatter(), ctx.today) {
        Freshness::Unknown => Vec::new(),
        Freshness::Invalid(raw) => vec![Issue::warn(
            ctx.display(doc.path()),
            format!("Invalid last_validated date: {raw}"),
        )],
        Freshness::Age(age) if age > max => vec![Issue::warn(
            ctx.display(doc.path()),
            format!("Content is {age} days old (max {max}); needs re-validation"),
        )],
        Freshness::Age(_) => Vec::new(),
    }
}
