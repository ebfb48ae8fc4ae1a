//! Knowledge base configuration
//!
//! Configuration is stored in `.dewey/config.json`. The only required setting is
//! the knowledge directory name; an optional `policy` object overrides the
//! thresholds used by the validators and the recommendation classifier.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::error::{DeweyError, Result};
use crate::kb::paths::DEFAULT_KNOWLEDGE_DIR;

/// Tunable thresholds. None of these are part of any file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Documents whose `last_validated` is older than this are stale
    pub freshness_max_age_days: i64,
    /// Proposals older than this are stale
    pub proposal_max_age_days: i64,
    /// Jaccard similarity above which two documents are near-duplicates
    pub similarity_threshold: f64,
    /// Paragraphs shorter than this are ignored by exact-duplicate detection
    pub min_paragraph_chars: usize,
    /// Words per shingle for near-duplicate detection
    pub shingle_size: usize,
    /// An area overview needs this many reads before siblings are judged
    pub low_utilization_min_overview_reads: u64,
    /// Fraction of the overview's reads below which a sibling is under-used
    pub low_utilization_ratio: f64,
    /// Timeout for opt-in source reachability checks
    pub reachability_timeout_secs: u64,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            freshness_max_age_days: 90,
            proposal_max_age_days: 60,
            similarity_threshold: 0.4,
            min_paragraph_chars: 40,
            shingle_size: 5,
            low_utilization_min_overview_reads: 10,
            low_utilization_ratio: 0.1,
            reachability_timeout_secs: 10,
        }
    }
}

impl Policy {
    /// Reject values that would make a check meaningless
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            bail_invalid!("similarity_threshold", self.similarity_threshold);
        }
        if self.shingle_size == 0 {
            bail_invalid!("shingle_size", self.shingle_size);
        }
        if !(0.0..=1.0).contains(&self.low_utilization_ratio) {
            bail_invalid!("low_utilization_ratio", self.low_utilization_ratio);
        }
        Ok(())
    }
}

/// Contents of `.dewey/config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbConfig {
    #[serde(default = "default_knowledge_dir")]
    pub knowledge_dir: String,
    #[serde(default)]
    pub policy: Policy,
}

fn default_knowledge_dir() -> String {
    DEFAULT_KNOWLEDGE_DIR.to_string()
}

impl Default for KbConfig {
    fn default() -> Self {
        KbConfig {
            knowledge_dir: default_knowledge_dir(),
            policy: Policy::default(),
        }
    }
}

impl KbConfig {
    /// Load configuration, falling back to defaults when the file is absent.
    /// A file that cannot be read, does not parse, or carries an out-of-range
    /// policy is an [`InvalidConfig`](DeweyError::InvalidConfig) error.
    /// Surrounding slashes on the directory name are stripped.
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |reason: String| DeweyError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(KbConfig::default()),
            Err(e) => return Err(invalid(e.to_string())),
        };
        let mut config: KbConfig =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        config.policy.validate().map_err(|e| invalid(e.to_string()))?;

        config.knowledge_dir = normalize_knowledge_dir(&config.knowledge_dir);
        Ok(config)
    }
}

fn normalize_knowledge_dir(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_KNOWLEDGE_DIR.to_string()
    } else {
        trimmed.to_string()
    }
}
