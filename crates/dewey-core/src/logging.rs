//! Tracing setup for the dewey binary
//!
//! Logs always go to stderr so that `--format json` output on stdout stays
//! parseable. `DEWEY_LOG` wins over `RUST_LOG`, which wins over the flags.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a full filter directive
pub const LOG_ENV: &str = "DEWEY_LOG";

const CRATES: [&str; 2] = ["dewey", "dewey_core"];

/// Emit a trace event carrying the time elapsed since `$start`.
///
/// ```rust,ignore
/// let start = Instant::now();
/// trace_time!(start, "collection_checks", documents = docs.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Filter directive for the flags alone. A `--log-level` containing `=` is
/// taken as a complete directive; a bare level applies to dewey's own crates.
pub fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    let level = match log_level {
        Some(directive) if directive.contains('=') => return directive.to_string(),
        Some(level) => level,
        None if verbose => "debug",
        None => "warn",
    };
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn env_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, log_level)))
}

/// Install the global subscriber: compact text, or JSON lines with span
/// open/close events when `log_json` is set
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(env_filter(verbose, log_level));

    if log_json {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_ansi(false)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_warn_for_own_crates() {
        assert_eq!(filter_directive(false, None), "dewey=warn,dewey_core=warn");
    }

    #[test]
    fn test_verbose_raises_to_debug() {
        assert_eq!(filter_directive(true, None), "dewey=debug,dewey_core=debug");
    }

    #[test]
    fn test_explicit_level_beats_verbose() {
        assert_eq!(
            filter_directive(true, Some("trace")),
            "dewey=trace,dewey_core=trace"
        );
    }

    #[test]
    fn test_full_directive_passes_through() {
        assert_eq!(
            filter_directive(false, Some("dewey_core::fix=trace")),
            "dewey_core::fix=trace"
        );
    }
}
