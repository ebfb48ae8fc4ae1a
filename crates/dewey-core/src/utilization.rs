//! Read-event log
//!
//! Each time a document is supplied to an agent, one event is appended to
//! `.dewey/utilization/log.jsonl`. Recommendations fold the log into
//! per-file statistics.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::jsonl;
use crate::kb::KnowledgeBase;

/// Context recorded when none is given
pub const DEFAULT_CONTEXT: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadEvent {
    /// Root-relative path, e.g. `docs/area/topic.md`
    pub file: String,
    pub timestamp: NaiveDateTime,
    pub context: String,
}

/// Aggregated reads of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilizationEntry {
    pub count: u64,
    pub first_referenced: NaiveDateTime,
    pub last_referenced: NaiveDateTime,
}

/// Append a read event stamped with the current local time
pub fn record_reference(kb: &KnowledgeBase, file: &str, context: Option<&str>) -> Result<()> {
    let event = ReadEvent {
        file: file.to_string(),
        timestamp: Local::now().naive_local().trunc_subsecs(0),
        context: context.unwrap_or(DEFAULT_CONTEXT).to_string(),
    };
    record_event(kb, &event)
}

pub fn record_event(kb: &KnowledgeBase, event: &ReadEvent) -> Result<()> {
    jsonl::append(&kb.utilization_path(), event)
}

/// Per-file read statistics keyed by the recorded path
pub fn read_utilization(kb: &KnowledgeBase) -> Result<BTreeMap<String, UtilizationEntry>> {
    let events: Vec<ReadEvent> = jsonl::read_all(&kb.utilization_path())?;
    Ok(aggregate(events))
}

pub fn aggregate(events: impl IntoIterator<Item = ReadEvent>) -> BTreeMap<String, UtilizationEntry> {
    let mut stats: BTreeMap<String, UtilizationEntry> = BTreeMap::new();
    for event in events {
        stats
            .entry(event.file)
            .and_modify(|entry| {
                entry.count += 1;
                entry.first_referenced = entry.first_referenced.min(event.timestamp);
                entry.last_referenced = entry.last_referenced.max(event.timestamp);
            })
            .or_insert(UtilizationEntry {
                count: 1,
                first_referenced: event.timestamp,
                last_referenced: event.timestamp,
            });
    }
    stats
}
