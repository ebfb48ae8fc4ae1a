//! `dewey report`: both tiers in one run, optionally with recommendations

use serde::Serialize;

use dewey_core::engine::{generate_recommendations, run_combined_report, CombinedReport};
use dewey_core::error::Result;
use dewey_core::kb::KnowledgeBase;
use dewey_core::recommend::{Gate, RecommendationReport};

use crate::cli::{Cli, OutputFormat};
use crate::commands::{check, prescreen, print_json, recommend};

#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    report: &'a CombinedReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendations: Option<&'a RecommendationReport>,
}

pub fn execute(cli: &Cli, kb: &KnowledgeBase, gate: Option<Gate>) -> Result<()> {
    let report = run_combined_report(kb)?;
    let recommendations = gate
        .map(|gate| generate_recommendations(kb, gate))
        .transpose()?;

    match cli.format {
        OutputFormat::Json => print_json(&ReportOutput {
            report: &report,
            recommendations: recommendations.as_ref(),
        })?,
        OutputFormat::Human => {
            println!("== Tier 1: structure ==");
            check::print_health(cli, &report.tier1);
            println!();
            println!("== Tier 2: review queue ==");
            prescreen::print_queue(cli, &report.tier2);
            if let Some(recommendations) = &recommendations {
                println!();
                println!("== Recommendations ==");
                recommend::print_recommendations(cli, recommendations);
            }
        }
    }
    Ok(())
}
