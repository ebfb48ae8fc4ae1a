//! `dewey check`: tier-1 validation with optional fixes

use dewey_core::engine::{run_health_check, HealthOptions, HealthReport};
use dewey_core::error::Result;
use dewey_core::fix::{FixAction, FixMode};
use dewey_core::kb::KnowledgeBase;
use dewey_core::validate::Severity;

use crate::cli::{Cli, OutputFormat};
use crate::commands::print_json;

pub fn execute(
    cli: &Cli,
    kb: &KnowledgeBase,
    fix: bool,
    dry_run: bool,
    check_links: bool,
) -> Result<()> {
    let options = HealthOptions {
        fix_mode: fix_mode(fix, dry_run),
        check_links,
        persist: true,
    };
    let report = run_health_check(kb, &options)?;

    match cli.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Human => print_health(cli, &report),
    }
    Ok(())
}

fn fix_mode(fix: bool, dry_run: bool) -> Option<FixMode> {
    match (fix, dry_run) {
        (true, _) => Some(FixMode::Apply),
        (false, true) => Some(FixMode::DryRun),
        (false, false) => None,
    }
}

pub fn print_health(cli: &Cli, report: &HealthReport) {
    let summary = &report.summary;

    if report.issues.is_empty() {
        if !cli.quiet {
            println!(
                "Knowledge base is healthy ({} files checked)",
                summary.total_files
            );
        }
    } else {
        println!(
            "Found {} issue(s) in {} files:",
            report.issues.len(),
            summary.total_files
        );
        println!();

        for issue in &report.issues {
            let prefix = match issue.severity {
                Severity::Fail => "FAIL",
                Severity::Warn => "WARN",
            };
            println!("  {} {}: {}", prefix, issue.file, issue.message);
        }

        println!();
        println!(
            "Summary: {} fail, {} warn, {} of {} files passing",
            summary.fail_count, summary.warn_count, summary.pass_count, summary.total_files
        );
    }

    if let Some(fixes) = &report.fixes {
        print_fixes(cli, fixes);
    }
}

fn print_fixes(cli: &Cli, fixes: &[FixAction]) {
    if fixes.is_empty() {
        if !cli.quiet {
            println!("No fixes to apply");
        }
        return;
    }

    println!();
    println!("Fixes:");
    for fix in fixes {
        let note = fix
            .section
            .as_deref()
            .or(fix.detail.as_deref())
            .map(|s| format!(" ({})", s))
            .unwrap_or_default();
        println!("  {} {}{}", fix.action, fix.file, note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_takes_precedence_over_dry_run() {
        assert_eq!(fix_mode(true, true), Some(FixMode::Apply));
        assert_eq!(fix_mode(false, true), Some(FixMode::DryRun));
        assert_eq!(fix_mode(false, false), None);
    }
}
