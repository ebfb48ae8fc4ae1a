//! Utilization-driven curation recommendations
//!
//! Documents are classified into at most one category each, in strict
//! priority order: stale and heavily read, overview read enough to deserve a
//! working document, rarely read relative to its area overview, never read.
//! Nothing is produced until the read log holds enough data.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::Policy;
use crate::kb::paths::OVERVIEW_FILE;
use crate::utilization::UtilizationEntry;

/// Default minimum total reads before recommending
pub const DEFAULT_MIN_READS: u64 = 10;

/// Default minimum days spanned by the read log
pub const DEFAULT_MIN_DAYS: i64 = 7;

/// Data sufficiency thresholds. Zero disables a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub min_reads: u64,
    pub min_days: i64,
}

impl Default for Gate {
    fn default() -> Self {
        Gate {
            min_reads: DEFAULT_MIN_READS,
            min_days: DEFAULT_MIN_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    StaleHighUse,
    ExpandDepth,
    LowUtilization,
    NeverReferenced,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationKind::StaleHighUse => "stale_high_use",
            RecommendationKind::ExpandDepth => "expand_depth",
            RecommendationKind::LowUtilization => "low_utilization",
            RecommendationKind::NeverReferenced => "never_referenced",
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationData {
    pub read_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview_reads: Option<u64>,
    pub depth: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Root-relative path
    pub file: String,
    pub recommendation: RecommendationKind,
    pub reason: String,
    pub data: RecommendationData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub total_files: usize,
    pub files_with_recommendations: usize,
    pub by_category: BTreeMap<String, usize>,
}

/// Either classified recommendations with a summary, or an empty list with
/// the reason classification was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RecommendationSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl RecommendationReport {
    fn skipped(reason: String) -> Self {
        RecommendationReport {
            recommendations: Vec::new(),
            summary: None,
            skipped: Some(reason),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// What the classifier needs to know about one discovered document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSignal {
    /// Root-relative path, the key of the read log
    pub file: String,
    /// Area directory name, empty for documents outside an area
    pub area: String,
    /// Raw `depth` header value, empty when absent
    pub depth: String,
    /// Flagged by the freshness check
    pub stale: bool,
}

impl DocumentSignal {
    fn is_overview(&self) -> bool {
        self.file.rsplit('/').next() == Some(OVERVIEW_FILE)
    }
}

/// `None` when there is enough data to classify
fn gate_reason(utilization: &BTreeMap<String, UtilizationEntry>, gate: Gate) -> Option<String> {
    let total: u64 = utilization.values().map(|e| e.count).sum();
    let need = format!("need {} reads over {} days", gate.min_reads, gate.min_days);

    if gate.min_reads > 0 && (utilization.is_empty() || total < gate.min_reads) {
        return Some(format!("Insufficient data: {total} reads ({need})"));
    }

    let earliest = utilization.values().map(|e| e.first_referenced).min();
    let latest = utilization.values().map(|e| e.last_referenced).max();
    let span = match (earliest, latest) {
        (Some(first), Some(last)) => (last - first).num_days(),
        _ => 0,
    };
    if gate.min_days > 0 && span < gate.min_days {
        return Some(format!(
            "Insufficient data: {total} reads over {span} day(s) ({need})"
        ));
    }
    None
}

/// Median of the counts, averaging the middle pair for even lengths
pub fn median(counts: &[u64]) -> f64 {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 0 => (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0,
        _ => sorted[mid] as f64,
    }
}

/// Classify `documents` against the read log
pub fn classify(
    documents: &[DocumentSignal],
    utilization: &BTreeMap<String, UtilizationEntry>,
    policy: &Policy,
    gate: Gate,
) -> RecommendationReport {
    if let Some(reason) = gate_reason(utilization, gate) {
        tracing::debug!(%reason, "recommendations skipped");
        return RecommendationReport::skipped(reason);
    }

    let mut docs: Vec<&DocumentSignal> = documents.iter().collect();
    docs.sort_by(|a, b| a.file.cmp(&b.file));
    let reads = |doc: &DocumentSignal| utilization.get(&doc.file).map_or(0, |e| e.count);
    let counts: Vec<u64> = docs.iter().map(|d| reads(d)).collect();
    let median = median(&counts);

    let mut recommendations = Vec::new();
    let mut classified: BTreeSet<String> = BTreeSet::new();
    let mut push = |doc: &DocumentSignal,
                    kind: RecommendationKind,
                    reason: String,
                    overview_reads: Option<u64>,
                    classified: &mut BTreeSet<String>| {
        recommendations.push(Recommendation {
            file: doc.file.clone(),
            recommendation: kind,
            reason,
            data: RecommendationData {
                read_count: reads(doc),
                overview_reads,
                depth: doc.depth.clone(),
                area: doc.area.clone(),
            },
        });
        classified.insert(doc.file.clone());
    };

    for doc in &docs {
        let n = reads(doc);
        if doc.stale && n as f64 > median {
            push(
                doc,
                RecommendationKind::StaleHighUse,
                format!("Read {n} times but content is stale -- prioritize freshening"),
                None,
                &mut classified,
            );
        }
    }

    for doc in &docs {
        let n = reads(doc);
        if classified.contains(doc.file.as_str()) || doc.depth != "overview" {
            continue;
        }
        if median > 0.0 && n as f64 > 2.0 * median {
            push(
                doc,
                RecommendationKind::ExpandDepth,
                format!(
                    "Read {n} times but only overview depth -- consider adding working-knowledge file"
                ),
                None,
                &mut classified,
            );
        }
    }

    let mut areas: BTreeMap<&str, Vec<&DocumentSignal>> = BTreeMap::new();
    for doc in docs.iter().filter(|d| !d.area.is_empty()) {
        areas.entry(doc.area.as_str()).or_default().push(doc);
    }
    for (area, members) in &areas {
        let overview_reads = members
            .iter()
            .filter(|d| d.is_overview())
            .map(|d| reads(d))
            .last()
            .unwrap_or(0);
        if overview_reads < policy.low_utilization_min_overview_reads {
            continue;
        }
        let threshold = overview_reads as f64 * policy.low_utilization_ratio;
        for doc in members {
            let n = reads(doc);
            if classified.contains(doc.file.as_str()) || doc.is_overview() {
                continue;
            }
            if (n as f64) < threshold {
                push(
                    doc,
                    RecommendationKind::LowUtilization,
                    format!(
                        "Read {n} times vs {overview_reads} for {area} overview -- consider demoting or merging"
                    ),
                    Some(overview_reads),
                    &mut classified,
                );
            }
        }
    }

    for doc in &docs {
        if !classified.contains(doc.file.as_str()) && reads(doc) == 0 {
            push(
                doc,
                RecommendationKind::NeverReferenced,
                "No reads recorded -- review relevance or discoverability".to_string(),
                None,
                &mut classified,
            );
        }
    }

    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    for rec in &recommendations {
        *by_category.entry(rec.recommendation.to_string()).or_default() += 1;
    }
    let summary = RecommendationSummary {
        total_files: docs.len(),
        files_with_recommendations: recommendations.len(),
        by_category,
    };

    RecommendationReport {
        recommendations,
        summary: Some(summary),
        skipped: None,
    }
}
