//! Opt-in HTTP reachability check for source URLs
//!
//! This is the only network-dependent check. It never runs unless asked for
//! and is kept out of the deterministic test suite.

use std::time::Duration;

use super::frontmatter::source_urls;
use super::types::{CheckContext, Issue};
use crate::document::Document;

/// Issues HEAD requests with a bounded timeout
pub struct ReachabilityChecker {
    agent: ureq::Agent,
}

impl ReachabilityChecker {
    pub fn new(timeout_secs: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .build();
        ReachabilityChecker { agent }
    }

    /// `Ok` when the URL answers with a non-error status
    pub fn check_url(&self, url: &str) -> Result<(), String> {
        match self.agent.head(url).call() {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => Err(format!("HTTP {code}")),
            Err(ureq::Error::Transport(e)) => Err(e.to_string()),
        }
    }
}

/// Check every well-formed http(s) source of `doc`
pub fn check_source_reachability(
    doc: &Document,
    ctx: &CheckContext,
    checker: &ReachabilityChecker,
) -> Vec<Issue> {
    source_urls(doc.frontmatter())
        .into_iter()
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
        .filter_map(|url| {
            let reason = checker.check_url(url).err()?;
            tracing::debug!(url, %reason, "source unreachable");
            Some(Issue::warn(
                ctx.display(doc.path()),
                format!("Source URL unreachable: {url} ({reason})"),
            ))
        })
        .collect()
}
