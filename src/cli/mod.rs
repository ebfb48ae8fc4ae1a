//! CLI argument parsing for dewey
//!
//! Global flags: --root, --format, --quiet, --verbose, --log-level, --log-json

pub mod args;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::GateArgs;
pub use output::OutputFormat;

/// Dewey - health checks and curation for agent knowledge bases
#[derive(Parser, Debug)]
#[command(name = "dewey")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Knowledge base root (the directory holding .dewey/ and the knowledge directory)
    #[arg(long, global = true, env = "DEWEY_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace) or a full filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every document and the collection as a whole (tier 1)
    Check {
        /// Apply conservative fixes for the issues found
        #[arg(long, conflicts_with = "dry_run")]
        fix: bool,

        /// List the fixes that --fix would apply without writing
        #[arg(long)]
        dry_run: bool,

        /// Check source URLs over the network
        #[arg(long)]
        check_links: bool,
    },

    /// Queue documents for judgment-based review (tier 2)
    Prescreen,

    /// Run both tiers and record a single snapshot
    Report {
        /// Append utilization-based recommendations
        #[arg(long)]
        recommendations: bool,

        #[command(flatten)]
        gate: GateArgs,
    },

    /// Recommend curation actions from recorded reads
    Recommend {
        #[command(flatten)]
        gate: GateArgs,
    },

    /// Show recent health snapshots, oldest first
    History {
        /// Number of snapshots to show
        #[arg(long, short = 'n', default_value_t = 10)]
        limit: usize,
    },

    /// Record that a document was read
    Record {
        /// Root-relative path of the document (e.g. docs/area/topic.md)
        file: String,

        /// Who read it
        #[arg(long)]
        context: Option<String>,
    },
}
