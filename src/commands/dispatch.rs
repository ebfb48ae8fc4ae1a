//! Command dispatch logic for dewey
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use dewey_core::error::Result;
use dewey_core::kb::KnowledgeBase;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let kb = KnowledgeBase::open(&cli.root)?;
    tracing::debug!(elapsed = ?start.elapsed(), "open_knowledge_base");

    match &cli.command {
        Commands::Check {
            fix,
            dry_run,
            check_links,
        } => commands::check::execute(cli, &kb, *fix, *dry_run, *check_links),

        Commands::Prescreen => commands::prescreen::execute(cli, &kb),

        Commands::Report {
            recommendations,
            gate,
        } => commands::report::execute(cli, &kb, recommendations.then_some(gate.gate())),

        Commands::Recommend { gate } => commands::recommend::execute(cli, &kb, gate.gate()),

        Commands::History { limit } => commands::history::execute(cli, &kb, *limit),

        Commands::Record { file, context } => {
            commands::record::execute(cli, &kb, file, context.as_deref())
        }
    }
}
