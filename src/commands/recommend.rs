//! `dewey recommend`: curation recommendations from recorded reads

use dewey_core::engine::generate_recommendations;
use dewey_core::error::Result;
use dewey_core::kb::KnowledgeBase;
use dewey_core::recommend::{Gate, RecommendationReport};

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;

pub fn execute(cli: &Cli, kb: &KnowledgeBase, gate: Gate) -> Result<()> {
    let report = generate_recommendations(kb, gate)?;

    match cli.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_recommendations(cli, &report),
    }
    Ok(())
}

pub fn print_recommendations(cli: &Cli, report: &RecommendationReport) {
    if let Some(reason) = &report.skipped {
        if !cli.quiet {
            println!("Recommendations skipped: {}", reason);
        }
        return;
    }

    if report.recommendations.is_empty() {
        if !cli.quiet {
            println!("No recommendations");
        }
        return;
    }

    println!("Recommendations:");
    for rec in &report.recommendations {
        println!("  [{}] {}: {}", rec.recommendation, rec.file, rec.reason);
    }

    if let Some(summary) = &report.summary {
        println!();
        println!(
            "{} of {} files have recommendations",
            summary.files_with_recommendations, summary.total_files
        );
    }
}
