//! `dewey record`: append one read event to the utilization log

use serde_json::json;

use dewey_core::bail_usage;
use dewey_core::error::Result;
use dewey_core::kb::paths::normalize_rel;
use dewey_core::kb::KnowledgeBase;
use dewey_core::utilization::{record_reference, DEFAULT_CONTEXT};

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;

pub fn execute(cli: &Cli, kb: &KnowledgeBase, file: &str, context: Option<&str>) -> Result<()> {
    let file = normalize_rel(file);
    if file.is_empty() {
        bail_usage!("record needs a document path, e.g. docs/area/topic.md");
    }
    if !kb.root().join(&file).is_file() {
        tracing::warn!(file = %file, "recording a read of a file that does not exist");
    }

    record_reference(kb, &file, context)?;

    let context = context.unwrap_or(DEFAULT_CONTEXT);
    match cli.format {
        OutputFormat::Json => print_json(&json!({ "file": file, "context": context }))?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Recorded read of {} ({})", file, context);
            }
        }
    }
    Ok(())
}
