use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Policy;
use crate::kb::paths::rel_string;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural or contractual violation that should block acceptance
    Fail,
    /// Quality signal that should be surfaced without blocking
    Warn,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Fail => write!(f, "fail"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

/// A single validator finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Root-relative path of the affected file or directory
    pub file: String,
    pub message: String,
    pub severity: Severity,
}

impl Issue {
    pub fn fail(file: impl Into<String>, message: impl Into<String>) -> Self {
        Issue {
            file: file.into(),
            message: message.into(),
            severity: Severity::Fail,
        }
    }

    pub fn warn(file: impl Into<String>, message: impl Into<String>) -> Self {
        Issue {
            file: file.into(),
            message: message.into(),
            severity: Severity::Warn,
        }
    }
}

/// Tier-1 summary, persisted in history snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_files: usize,
    pub fail_count: usize,
    pub warn_count: usize,
    /// Documents with no `fail` issue
    pub pass_count: usize,
}

impl HealthSummary {
    /// Summarise `issues` over `total_files` discovered documents
    pub fn from_issues(total_files: usize, issues: &[Issue]) -> Self {
        let fail_count = issues
            .iter()
            .filter(|i| i.severity == Severity::Fail)
            .count();
        let warn_count = issues.len() - fail_count;
        let files_with_fails: BTreeSet<&str> = issues
            .iter()
            .filter(|i| i.severity == Severity::Fail)
            .map(|i| i.file.as_str())
            .collect();

        HealthSummary {
            total_files,
            fail_count,
            warn_count,
            pass_count: total_files.saturating_sub(files_with_fails.len()),
        }
    }
}

/// Shared inputs of every check: where paths are displayed from, what day it
/// is, and the thresholds in force
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub root: PathBuf,
    pub today: NaiveDate,
    pub policy: Policy,
}

impl CheckContext {
    pub fn new(root: &Path, today: NaiveDate, policy: Policy) -> Self {
        CheckContext {
            root: root.to_path_buf(),
            today,
            policy,
        }
    }

    /// Display form of a path used in [`Issue::file`]
    pub fn display(&self, path: &Path) -> String {
        rel_string(path, &self.root)
    }
}
