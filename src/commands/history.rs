//! `dewey history`: recent snapshots

use dewey_core::error::Result;
use dewey_core::history::{read_history, Snapshot};
use dewey_core::kb::KnowledgeBase;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;

pub fn execute(cli: &Cli, kb: &KnowledgeBase, limit: usize) -> Result<()> {
    let snapshots = read_history(kb, limit)?;

    match cli.format {
        OutputFormat::Json => print_json(&snapshots)?,
        OutputFormat::Human => {
            if snapshots.is_empty() {
                if !cli.quiet {
                    println!("No history recorded yet");
                }
                return Ok(());
            }
            for snapshot in &snapshots {
                println!("{}", format_snapshot(snapshot));
            }
        }
    }
    Ok(())
}

fn format_snapshot(snapshot: &Snapshot) -> String {
    let tier1 = snapshot
        .tier1
        .as_ref()
        .map(|s| {
            format!(
                "tier1 {} fail, {} warn, {}/{} passing",
                s.fail_count, s.warn_count, s.pass_count, s.total_files
            )
        })
        .unwrap_or_else(|| "tier1 -".to_string());
    let tier2 = snapshot
        .tier2
        .as_ref()
        .map(|s| {
            format!(
                "tier2 {}/{} queued",
                s.files_with_triggers, s.total_files_scanned
            )
        })
        .unwrap_or_else(|| "tier2 -".to_string());

    format!("{}  {}  {}", snapshot.timestamp, tier1, tier2)
}
