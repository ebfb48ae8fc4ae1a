//! Tier-2 pre-screening: deterministic triggers that queue documents for a
//! later judgment-based review
//!
//! Triggers never produce issues. Each one inspects a single document and
//! emits queue items carrying a reason and a JSON context object for the
//! reviewer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::document::{Depth, Document};
use crate::markdown;
use crate::validate::frontmatter::{freshness, source_urls, Freshness};
use crate::validate::readability::prose;
use crate::validate::sources::source_hosts;
use crate::validate::CheckContext;

/// Minimum words in "Why This Matters"
pub const MIN_WHY_WORDS: usize = 15;

/// Inline citations of one URL at which it is flagged
pub const CITATION_REPEAT_LIMIT: usize = 3;

/// Minimum list items in "Key Guidance"
pub const MIN_GUIDANCE_ITEMS: usize = 2;

/// User-generated content hosts; a source here is a lead, not an authority
pub const COMMUNITY_HOSTS: [&str; 9] = [
    "medium.com",
    "reddit.com",
    "quora.com",
    "stackoverflow.com",
    "stackexchange.com",
    "dev.to",
    "substack.com",
    "wordpress.com",
    "blogspot.com",
];

fn concrete_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)```|`[^`\n]+`|\d|^\s*\|.*\||for example|e\.g\.")
            .expect("valid concrete-element pattern")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    SourceDrift,
    DepthAccuracy,
    SourcePrimacy,
    WhyQuality,
    ConcreteExamples,
    CitationQuality,
    SourceAuthority,
    ProvenanceCompleteness,
    RecommendationCoverage,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::SourceDrift => "source_drift",
            Trigger::DepthAccuracy => "depth_accuracy",
            Trigger::SourcePrimacy => "source_primacy",
            Trigger::WhyQuality => "why_quality",
            Trigger::ConcreteExamples => "concrete_examples",
            Trigger::CitationQuality => "citation_quality",
            Trigger::SourceAuthority => "source_authority",
            Trigger::ProvenanceCompleteness => "provenance_completeness",
            Trigger::RecommendationCoverage => "recommendation_coverage",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document queued for review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Root-relative path
    pub file: String,
    pub trigger: Trigger,
    pub reason: String,
    pub context: serde_json::Value,
}

impl QueueItem {
    fn new(
        doc: &Document,
        ctx: &CheckContext,
        trigger: Trigger,
        reason: String,
        context: serde_json::Value,
    ) -> Self {
        QueueItem {
            file: ctx.display(doc.path()),
            trigger,
            reason,
            context,
        }
    }
}

/// Tier-2 summary, persisted in history snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier2Summary {
    pub total_files_scanned: usize,
    pub files_with_triggers: usize,
    pub trigger_counts: BTreeMap<String, usize>,
}

impl Tier2Summary {
    pub fn from_queue(total_files_scanned: usize, queue: &[QueueItem]) -> Self {
        let mut trigger_counts: BTreeMap<String, usize> = BTreeMap::new();
        for item in queue {
            *trigger_counts.entry(item.trigger.to_string()).or_default() += 1;
        }
        let files: BTreeSet<&str> = queue.iter().map(|item| item.file.as_str()).collect();
        Tier2Summary {
            total_files_scanned,
            files_with_triggers: files.len(),
            trigger_counts,
        }
    }
}

type TriggerFn = fn(&Document, &CheckContext) -> Vec<QueueItem>;

const TRIGGERS: [TriggerFn; 9] = [
    source_drift,
    depth_accuracy,
    source_primacy,
    why_quality,
    concrete_examples,
    citation_quality,
    source_authority,
    provenance_completeness,
    recommendation_coverage,
];

/// Run every trigger over one document
pub fn prescreen_document(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    TRIGGERS.iter().flat_map(|trigger| trigger(doc, ctx)).collect()
}

fn is_working(doc: &Document) -> bool {
    !doc.is_reference() && doc.depth() == Some(Depth::Working)
}

/// Body text with fenced code removed
fn clean_body(doc: &Document) -> String {
    markdown::strip_fenced_code_blocks(&doc.body())
}

pub fn source_drift(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    let fm = doc.frontmatter();
    let max = ctx.policy.freshness_max_age_days;
    let Freshness::Age(age) = freshness(fm, ctx.today) else {
        return Vec::new();
    };
    if age <= max {
        return Vec::new();
    }

    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::SourceDrift,
        format!("Last validated {age} days ago (max {max}) -- re-check sources for drift"),
        json!({
            "last_validated": fm.scalar("last_validated"),
            "age_days": age,
            "sources": source_urls(fm),
        }),
    )]
}

pub fn depth_accuracy(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    let Some(depth) = doc.depth() else {
        return Vec::new();
    };
    let words = markdown::word_count(&prose(doc));
    let minimum = depth.min_words();
    if words >= minimum {
        return Vec::new();
    }

    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::DepthAccuracy,
        format!("{words} words is thin for {depth} depth (minimum {minimum})"),
        json!({"depth": depth.as_str(), "word_count": words, "minimum": minimum}),
    )]
}

pub fn source_primacy(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    if !is_working(doc) {
        return Vec::new();
    }
    let body = markdown::without_section(&clean_body(doc), "Go Deeper");
    if markdown::contains_external_url(&body) {
        return Vec::new();
    }

    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::SourcePrimacy,
        "No inline source links outside Go Deeper -- claims may be unsupported".to_string(),
        json!({"inline_sources": 0}),
    )]
}

pub fn why_quality(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    if !is_working(doc) {
        return Vec::new();
    }
    let section = markdown::extract_section(&clean_body(doc), "Why This Matters");
    let words = section
        .as_deref()
        .map_or(0, |s| markdown::word_count(&markdown::strip_formatting(s)));
    if section.is_some() && words >= MIN_WHY_WORDS {
        return Vec::new();
    }

    let reason = match section {
        None => "Missing 'Why This Matters' section".to_string(),
        Some(_) => format!("'Why This Matters' has only {words} words (minimum {MIN_WHY_WORDS})"),
    };
    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::WhyQuality,
        reason,
        json!({"word_count": words, "minimum": MIN_WHY_WORDS}),
    )]
}

pub fn concrete_examples(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    if !is_working(doc) {
        return Vec::new();
    }
    // Fences are concrete here, so search the raw body
    let section = markdown::extract_section(&doc.body(), "In Practice");
    if section.as_deref().is_some_and(|s| concrete_re().is_match(s)) {
        return Vec::new();
    }

    let reason = match section {
        None => "Missing 'In Practice' section",
        Some(_) => "'In Practice' has no concrete example, code, number or table",
    };
    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::ConcreteExamples,
        reason.to_string(),
        json!({"section": "In Practice"}),
    )]
}

pub fn citation_quality(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for target in markdown::link_targets(&clean_body(doc)) {
        if target.starts_with("http://") || target.starts_with("https://") {
            *counts.entry(target).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= CITATION_REPEAT_LIMIT)
        .map(|(url, count)| {
            QueueItem::new(
                doc,
                ctx,
                Trigger::CitationQuality,
                format!("{url} is cited {count} times -- check each claim has its own source"),
                json!({"url": url, "count": count}),
            )
        })
        .collect()
}

pub fn source_authority(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    if !is_working(doc) {
        return Vec::new();
    }
    let hosts = source_hosts(doc);
    let community = |host: &String| {
        COMMUNITY_HOSTS
            .iter()
            .any(|c| host.as_str() == *c || host.ends_with(&format!(".{c}")))
    };
    if hosts.is_empty() || !hosts.iter().all(community) {
        return Vec::new();
    }

    let distinct: BTreeSet<&str> = hosts.iter().map(String::as_str).collect();
    let listed: Vec<&str> = distinct.into_iter().collect();
    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::SourceAuthority,
        format!(
            "Every source is community content ({}) -- find an authoritative primary source",
            listed.join(", ")
        ),
        json!({"hosts": listed, "sources": source_urls(doc.frontmatter())}),
    )]
}

pub fn provenance_completeness(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    if !is_working(doc) {
        return Vec::new();
    }
    let section = markdown::extract_section(&doc.body(), "Source Evaluation");
    let rows = section
        .as_deref()
        .map_or(0, |s| markdown::table_rows(&markdown::strip_comments(s)));
    // header plus at least one scored source
    if rows >= 2 {
        return Vec::new();
    }

    let reason = match section {
        None => "Missing 'Source Evaluation' section",
        Some(_) => "'Source Evaluation' has no source scoring table",
    };
    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::ProvenanceCompleteness,
        reason.to_string(),
        json!({"section": "Source Evaluation", "table_rows": rows}),
    )]
}

pub fn recommendation_coverage(doc: &Document, ctx: &CheckContext) -> Vec<QueueItem> {
    if !is_working(doc) {
        return Vec::new();
    }
    let section = markdown::extract_section(&clean_body(doc), "Key Guidance");
    let items = section
        .as_deref()
        .map_or(0, |s| markdown::list_item_count(&markdown::strip_comments(s)));
    if items >= MIN_GUIDANCE_ITEMS {
        return Vec::new();
    }

    let reason = match section {
        None => "Missing 'Key Guidance' section".to_string(),
        Some(_) => format!(
            "'Key Guidance' has {items} actionable item(s) (minimum {MIN_GUIDANCE_ITEMS})"
        ),
    };
    vec![QueueItem::new(
        doc,
        ctx,
        Trigger::RecommendationCoverage,
        reason,
        json!({"items": items, "minimum": MIN_GUIDANCE_ITEMS}),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use chrono::NaiveDate;
    use std::path::Path;

    fn ctx() -> CheckContext {
        CheckContext::new(
            Path::new("/kb"),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            Policy::default(),
        )
    }

    fn doc(name: &str, text: &str) -> Document {
        Document::from_text(&Path::new("/kb/docs/area").join(name), text.to_string())
    }

    fn triggers(items: &[QueueItem]) -> Vec<Trigger> {
        items.iter().map(|i| i.trigger).collect()
    }

    const THIN_WORKING: &str = "---\nsources:\n  - https://example.com/doc\nlast_validated: 2020-01-01\nrelevance: core\ndepth: working\n---\n\n# Topic\n\n## Key Guidance\n- Do the thing\n- Do the other thing\n\n## In Practice\nJust some text without concrete elements.\n";

    #[test]
    fn test_thin_working_document() {
        let items = prescreen_document(&doc("topic.md", THIN_WORKING), &ctx());
        assert_eq!(
            triggers(&items),
            vec![
                Trigger::SourceDrift,
                Trigger::DepthAccuracy,
                Trigger::SourcePrimacy,
                Trigger::WhyQuality,
                Trigger::ConcreteExamples,
                Trigger::ProvenanceCompleteness,
            ]
        );
        assert!(items.iter().all(|i| i.file == "docs/area/topic.md"));
        assert!(items.iter().all(|i| i.context.is_object()));

        let drift = &items[0];
        assert_eq!(drift.context["last_validated"], "2020-01-01");
        assert_eq!(drift.context["sources"], json!(["https://example.com/doc"]));
        assert_eq!(items[3].reason, "Missing 'Why This Matters' section");
    }

    #[test]
    fn test_well_formed_working_document() {
        let filler = "Bidding well means reading auction signals before budgets move ".repeat(15);
        let text = format!(
            "---\nlast_validated: 2026-05-01\ndepth: working\n---\n# Topic\n\n## Why This Matters\nAutomated bidding reallocates spend every auction, so a wrong target compounds across thousands of daily decisions ([guide](https://example.com/guide)).\n\n## In Practice\nFor example, raise the target by `10%` after two stable weeks.\n\n## Key Guidance\n- {filler}\n- Revisit targets monthly.\n\n## Go Deeper\n- [Ref](topic.ref.md)\n\n## Source Evaluation\n| Source | Authority |\n|---|---|\n| Vendor guide | primary |\n"
        );
        let items = prescreen_document(&doc("topic.md", &text), &ctx());
        assert!(items.is_empty(), "{items:?}");
    }

    #[test]
    fn test_go_deeper_links_are_not_inline_sources() {
        let text = "---\ndepth: working\n---\n# T\n## Key Guidance\nNothing cited.\n## Go Deeper\n- [Docs](https://example.com)\n## After\nStill nothing.\n";
        let items = source_primacy(&doc("t.md", text), &ctx());
        assert_eq!(triggers(&items), vec![Trigger::SourcePrimacy]);
    }

    #[test]
    fn test_short_why_section() {
        let text = "---\ndepth: working\n---\n# T\n## Why This Matters\nIt **matters** a lot.\n";
        let items = why_quality(&doc("t.md", text), &ctx());
        assert_eq!(items[0].context["word_count"], 4);
        assert_eq!(
            items[0].reason,
            "'Why This Matters' has only 4 words (minimum 15)"
        );
    }

    #[test]
    fn test_concrete_elements() {
        let with_table = "---\ndepth: working\n---\n# T\n## In Practice\n| Setting | Value |\n";
        assert!(concrete_examples(&doc("t.md", with_table), &ctx()).is_empty());
        let with_fence = "---\ndepth: working\n---\n# T\n## In Practice\n```\nrun it\n```\n";
        assert!(concrete_examples(&doc("t.md", with_fence), &ctx()).is_empty());
        let vague = "---\ndepth: working\n---\n# T\n## In Practice\nDo it well.\n";
        assert_eq!(concrete_examples(&doc("t.md", vague), &ctx()).len(), 1);
    }

    #[test]
    fn test_repeated_citations() {
        let text = "# T\n- A [s](https://example.com/dup)\n- B [s](https://example.com/dup)\n- C [s](https://example.com/dup)\n- D [s](https://example.com/once)\n";
        let items = citation_quality(&doc("t.md", text), &ctx());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].context, json!({"url": "https://example.com/dup", "count": 3}));
    }

    #[test]
    fn test_summary_counts_match_queue() {
        let mut queue = prescreen_document(&doc("topic.md", THIN_WORKING), &ctx());
        queue.extend(prescreen_document(
            &doc("overview.md", "---\nlast_validated: 2019-01-01\ndepth: overview\n---\n# O\n"),
            &ctx(),
        ));
        let summary = Tier2Summary::from_queue(3, &queue);
        assert_eq!(summary.total_files_scanned, 3);
        assert_eq!(summary.files_with_triggers, 2);
        assert_eq!(summary.trigger_counts["source_drift"], 2);
        assert_eq!(summary.trigger_counts["depth_accuracy"], 2);
        assert_eq!(summary.trigger_counts.values().sum::<usize>(), queue.len());
    }

    #[test]
    fn test_reference_documents_skip_working_triggers() {
        let text = "---\ndepth: working\n---\n# T\n";
        let items = prescreen_document(&doc("t.ref.md", text), &ctx());
        assert_eq!(triggers(&items), vec![Trigger::DepthAccuracy]);
    }

    #[test]
    fn test_community_only_sources() {
        let forum = "---\nsources:\n  - https://www.reddit.com/r/PPC/1\n  - https://someone.medium.com/post\ndepth: working\n---\n# T\n";
        let items = source_authority(&doc("t.md", forum), &ctx());
        assert_eq!(triggers(&items), vec![Trigger::SourceAuthority]);
        assert_eq!(items[0].context["hosts"], json!(["reddit.com", "someone.medium.com"]));

        let mixed = "---\nsources:\n  - https://www.reddit.com/r/PPC/1\n  - https://support.google.com/ads\ndepth: working\n---\n# T\n";
        assert!(source_authority(&doc("t.md", mixed), &ctx()).is_empty());
    }

    #[test]
    fn test_source_evaluation_needs_a_table() {
        let placeholder = "---\ndepth: working\n---\n# T\n## Source Evaluation\n<!-- Complete during research step: source scoring table and provenance block -->\n";
        let items = provenance_completeness(&doc("t.md", placeholder), &ctx());
        assert_eq!(
            items[0].reason,
            "'Source Evaluation' has no source scoring table"
        );

        let scored = "---\ndepth: working\n---\n# T\n## Source Evaluation\n| Source | Score |\n|---|---|\n| Vendor docs | 5 |\n";
        assert!(provenance_completeness(&doc("t.md", scored), &ctx()).is_empty());
    }

    #[test]
    fn test_key_guidance_coverage() {
        let prose_only = "---\ndepth: working\n---\n# T\n## Key Guidance\nBe patient.\n<!-- Actionable recommendations -->\n";
        let items = recommendation_coverage(&doc("t.md", prose_only), &ctx());
        assert_eq!(triggers(&items), vec![Trigger::RecommendationCoverage]);
        assert_eq!(
            items[0].reason,
            "'Key Guidance' has 0 actionable item(s) (minimum 2)"
        );

        let missing = "---\ndepth: working\n---\n# T\n";
        assert_eq!(
            recommendation_coverage(&doc("t.md", missing), &ctx())[0].reason,
            "Missing 'Key Guidance' section"
        );

        let covered = "---\ndepth: working\n---\n# T\n## Key Guidance\n1. Set a target\n2. Wait two weeks\n";
        assert!(recommendation_coverage(&doc("t.md", covered), &ctx()).is_empty());
    }
}
