//! Orchestration of check runs
//!
//! Each entry point discovers documents once, runs its checks serially and
//! appends exactly one history snapshot (unless told not to). Findings are
//! never errors: only unreadable documents and failed writes are.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::cross::{
    check_collection, check_coverage, check_index_sync, check_inventory_regression,
};
use crate::document::Document;
use crate::error::Result;
use crate::fix::{apply_fixes, FixAction, FixMode};
use crate::history::{self, Snapshot};
use crate::kb::KnowledgeBase;
use crate::recommend::{self, DocumentSignal, Gate, RecommendationReport};
use crate::trace_time;
use crate::triggers::{prescreen_document, QueueItem, Tier2Summary};
use crate::utilization::read_utilization;
use crate::validate::frontmatter::check_freshness;
use crate::validate::{check_document, CheckContext, HealthSummary, Issue, ReachabilityChecker};

/// Options of a tier-1 run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthOptions {
    /// Apply or preview fixes after checking
    pub fix_mode: Option<FixMode>,
    /// Check source URLs over the network
    pub check_links: bool,
    /// Append a history snapshot
    pub persist: bool,
}

impl Default for HealthOptions {
    fn default() -> Self {
        HealthOptions {
            fix_mode: None,
            check_links: false,
            persist: true,
        }
    }
}

/// Tier-1 report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub issues: Vec<Issue>,
    pub summary: HealthSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixes: Option<Vec<FixAction>>,
}

/// Tier-2 report
#[derive(Debug, Clone, Serialize)]
pub struct Tier2Report {
    pub queue: Vec<QueueItem>,
    pub summary: Tier2Summary,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub tier1: HealthReport,
    pub tier2: Tier2Report,
}

/// Context dated today in local time
pub fn context(kb: &KnowledgeBase) -> CheckContext {
    context_on(kb, Local::now().date_naive())
}

pub fn context_on(kb: &KnowledgeBase, today: NaiveDate) -> CheckContext {
    CheckContext::new(kb.root(), today, kb.policy().clone())
}

/// Discovered documents and their knowledge-directory-relative paths
fn inventory(kb: &KnowledgeBase) -> (Vec<PathBuf>, Vec<String>) {
    let documents = kb.discover_documents();
    let file_list = documents.iter().map(|path| kb.rel(path)).collect();
    (documents, file_list)
}

/// Per-document checks, structural checks, regression against the last
/// snapshot, then collection-wide checks, in that order
#[tracing::instrument(skip(kb, options), fields(root = %kb.root().display(), fix = ?options.fix_mode, check_links = options.check_links))]
pub fn run_health_check(kb: &KnowledgeBase, options: &HealthOptions) -> Result<HealthReport> {
    let ctx = context(kb);
    let (documents, file_list) = inventory(kb);

    let start = Instant::now();
    let checker = options
        .check_links
        .then(|| ReachabilityChecker::new(kb.policy().reachability_timeout_secs));
    let mut issues = Vec::new();
    for path in &documents {
        let doc = Document::load(path)?;
        issues.extend(check_document(&doc, &ctx, checker.as_ref()));
    }
    trace_time!(start, "per_document_checks", documents = documents.len());

    let start = Instant::now();
    issues.extend(check_coverage(kb, &ctx));
    issues.extend(check_index_sync(kb, &ctx));
    let baseline = history::latest(kb)?;
    issues.extend(check_inventory_regression(
        kb,
        &ctx,
        baseline.as_ref().map(|s| s.file_list.as_slice()),
        &file_list,
    ));
    issues.extend(check_collection(kb, &ctx));
    trace_time!(start, "collection_checks");

    let summary = HealthSummary::from_issues(documents.len(), &issues);
    tracing::debug!(
        fails = summary.fail_count,
        warns = summary.warn_count,
        "tier 1 complete"
    );

    let fixes = match options.fix_mode {
        Some(mode) => Some(apply_fixes(kb, &ctx, &documents, &issues, mode)?),
        None => None,
    };

    if options.persist {
        history::record_snapshot(kb, &Snapshot::now(Some(summary.clone()), None, file_list))?;
    }

    Ok(HealthReport {
        issues,
        summary,
        fixes,
    })
}

#[tracing::instrument(skip(kb), fields(root = %kb.root().display()))]
pub fn run_tier2_prescreening(kb: &KnowledgeBase, persist: bool) -> Result<Tier2Report> {
    let ctx = context(kb);
    let (documents, file_list) = inventory(kb);

    let start = Instant::now();
    let mut queue = Vec::new();
    for path in &documents {
        let doc = Document::load(path)?;
        queue.extend(prescreen_document(&doc, &ctx));
    }
    trace_time!(start, "prescreening", documents = documents.len());

    let summary = Tier2Summary::from_queue(documents.len(), &queue);
    if persist {
        history::record_snapshot(kb, &Snapshot::now(None, Some(summary.clone()), file_list))?;
    }
    Ok(Tier2Report { queue, summary })
}

/// Both tiers, recorded as a single snapshot
#[tracing::instrument(skip(kb), fields(root = %kb.root().display()))]
pub fn run_combined_report(kb: &KnowledgeBase) -> Result<CombinedReport> {
    let options = HealthOptions {
        persist: false,
        ..HealthOptions::default()
    };
    let tier1 = run_health_check(kb, &options)?;
    let tier2 = run_tier2_prescreening(kb, false)?;

    let (_, file_list) = inventory(kb);
    history::record_snapshot(
        kb,
        &Snapshot::now(
            Some(tier1.summary.clone()),
            Some(tier2.summary.clone()),
            file_list,
        ),
    )?;
    Ok(CombinedReport { tier1, tier2 })
}

/// Curation recommendations from the read log. Independent of any prior
/// check run and never recorded in history.
#[tracing::instrument(skip(kb), fields(root = %kb.root().display(), min_reads = gate.min_reads, min_days = gate.min_days))]
pub fn generate_recommendations(kb: &KnowledgeBase, gate: Gate) -> Result<RecommendationReport> {
    let ctx = context(kb);
    let signals: Vec<DocumentSignal> = kb
        .discover_documents()
        .iter()
        .map(|path| {
            let (depth, stale) = match Document::load(path) {
                Ok(doc) => (
                    doc.frontmatter().scalar("depth").unwrap_or_default().to_string(),
                    !check_freshness(&doc, &ctx).is_empty(),
                ),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable document treated as undated");
                    (String::new(), false)
                }
            };
            DocumentSignal {
                file: kb.root_rel(path),
                area: kb.area_of(path).unwrap_or_default(),
                depth,
                stale,
            }
        })
        .collect();

    let utilization = read_utilization(kb)?;
    Ok(recommend::classify(&signals, &utilization, kb.policy(), gate))
}

#[cfg(test)]
mod tests;
