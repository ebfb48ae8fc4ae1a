//! `dewey prescreen`: tier-2 review queue

use dewey_core::engine::{run_tier2_prescreening, Tier2Report};
use dewey_core::error::Result;
use dewey_core::kb::KnowledgeBase;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;

pub fn execute(cli: &Cli, kb: &KnowledgeBase) -> Result<()> {
    let report = run_tier2_prescreening(kb, true)?;

    match cli.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_queue(cli, &report),
    }
    Ok(())
}

pub fn print_queue(cli: &Cli, report: &Tier2Report) {
    let summary = &report.summary;

    if report.queue.is_empty() {
        if !cli.quiet {
            println!(
                "Nothing queued for review ({} files scanned)",
                summary.total_files_scanned
            );
        }
        return;
    }

    println!(
        "Queued {} of {} files for review:",
        summary.files_with_triggers, summary.total_files_scanned
    );
    println!();
    for item in &report.queue {
        println!("  [{}] {}: {}", item.trigger, item.file, item.reason);
    }

    println!();
    let counts: Vec<String> = summary
        .trigger_counts
        .iter()
        .map(|(trigger, count)| format!("{}={}", trigger, count))
        .collect();
    println!("Triggers: {}", counts.join(", "));
}
