//! Health snapshot history
//!
//! Every check run appends one snapshot line to
//! `.dewey/history/health-log.jsonl`. The most recent snapshot's file list is
//! the baseline for inventory regression.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::jsonl;
use crate::kb::KnowledgeBase;
use crate::triggers::Tier2Summary;
use crate::validate::HealthSummary;

/// One persisted run. A tier that did not run is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,
    pub tier1: Option<HealthSummary>,
    pub tier2: Option<Tier2Summary>,
    /// Knowledge-directory-relative paths of the documents checked
    #[serde(default)]
    pub file_list: Vec<String>,
}

impl Snapshot {
    /// Snapshot stamped with the current local time, to the second
    pub fn now(
        tier1: Option<HealthSummary>,
        tier2: Option<Tier2Summary>,
        file_list: Vec<String>,
    ) -> Self {
        Snapshot {
            timestamp: Local::now().naive_local().trunc_subsecs(0),
            tier1,
            tier2,
            file_list,
        }
    }
}

pub fn record_snapshot(kb: &KnowledgeBase, snapshot: &Snapshot) -> Result<()> {
    let path = kb.history_path();
    jsonl::append(&path, snapshot)?;
    tracing::debug!(path = %path.display(), files = snapshot.file_list.len(), "recorded snapshot");
    Ok(())
}

/// The last `limit` snapshots, oldest first
pub fn read_history(kb: &KnowledgeBase, limit: usize) -> Result<Vec<Snapshot>> {
    let mut snapshots: Vec<Snapshot> = jsonl::read_all(&kb.history_path())?;
    let skip = snapshots.len().saturating_sub(limit);
    Ok(snapshots.split_off(skip))
}

/// Most recent snapshot, if any run has been recorded
pub fn latest(kb: &KnowledgeBase) -> Result<Option<Snapshot>> {
    Ok(read_history(kb, 1)?.pop())
}
