//! Dewey - health checks and curation for agent knowledge bases
//!
//! Validates a directory of structured markdown documents, applies
//! conservative fixes, and recommends curation actions from read telemetry.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use cli::{Cli, OutputFormat};
use dewey_core::error::{DeweyError, ExitCode as DeweyExitCode};
use dewey_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // `--format` may be unusable when parsing fails, so look at argv directly
        Err(err) if argv_requests_json() => match usage_error(&err) {
            Some(error) => return fail(&error, OutputFormat::Json, false),
            None => err.exit(),
        },
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::from(DeweyExitCode::Success as u8),
        Err(e) => fail(&e, cli.format, cli.quiet),
    }
}

/// Map a clap failure onto the error envelope; `None` for help and version,
/// which clap prints itself
fn usage_error(err: &clap::Error) -> Option<DeweyError> {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::ArgumentConflict
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Some(DeweyError::UsageError(err.to_string()))
        }
        _ => Some(DeweyError::Other(err.to_string())),
    }
}

fn fail(error: &DeweyError, format: OutputFormat, quiet: bool) -> ExitCode {
    match format {
        OutputFormat::Json => eprintln!("{}", error.to_json()),
        OutputFormat::Human if !quiet => eprintln!("error: {}", error),
        OutputFormat::Human => {}
    }
    ExitCode::from(error.exit_code() as u8)
}

fn argv_requests_json() -> bool {
    let args: Vec<String> = env::args().skip(1).collect();
    args.iter().any(|arg| arg == "--format=json")
        || args
            .windows(2)
            .any(|pair| pair[0] == "--format" && pair[1] == "json")
}
