//! Append-only JSON-lines logs under the configuration directory

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DeweyError, Result};

/// Append one record as a single line, creating parent directories
pub fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| DeweyError::io_operation("create directory", parent.display(), e))?;
    }

    let line = serde_json::to_string(record)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| DeweyError::io_operation("open", path.display(), e))?;
    writeln!(file, "{line}").map_err(|e| DeweyError::io_operation("append to", path.display(), e))
}

/// Every parseable record, in file order. A missing log reads as empty;
/// blank and malformed lines are skipped.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| DeweyError::io_operation("read", path.display(), e))?;

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), line = idx + 1, error = %e, "skipping malformed log line");
            }
        }
    }
    Ok(records)
}
