//! Manifest synchronisation
//!
//! `AGENTS.md` and `CLAUDE.md` each own a machine-managed region between the
//! begin/end markers. Entries inside it are reconciled against the areas and
//! topics on disk. A manifest that is absent, or has no managed region, is
//! left alone.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::kb::paths::{file_name, normalize_rel, same_rel_path, MARKER_BEGIN, MARKER_END};
use crate::kb::{Area, KnowledgeBase};
use crate::markdown::slugify;
use crate::validate::{CheckContext, Issue};

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("valid link pattern"))
}

fn h3_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^###\s+(.+)$").expect("valid heading pattern"))
}

fn domain_areas_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^###\s+Domain Areas").expect("valid heading pattern"))
}

fn any_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#{1,3}\s+").expect("valid heading pattern"))
}

/// Text strictly between the markers, if both are present in order
pub fn managed_section(text: &str) -> Option<&str> {
    let begin = text.find(MARKER_BEGIN)?;
    let end = text.find(MARKER_END)?;
    let start = begin + MARKER_BEGIN.len();
    (end > begin && end >= start).then(|| &text[start..end])
}

/// A topic row of the role/topic manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestTopic {
    pub name: String,
    pub path: String,
}

/// An `### Area` block of the role/topic manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestArea {
    pub name: String,
    pub topics: Vec<ManifestTopic>,
}

impl ManifestArea {
    /// True when this block describes the area directory `dir_name`
    pub fn matches(&self, dir_name: &str) -> bool {
        slugify(&self.name) == dir_name || self.name.to_lowercase() == dir_name
    }
}

/// Areas and topic table rows of the `AGENTS.md` managed region
pub fn parse_agents_manifest(text: &str) -> Vec<ManifestArea> {
    let Some(section) = managed_section(text) else {
        return Vec::new();
    };

    let mut areas: Vec<ManifestArea> = Vec::new();
    for line in section.lines() {
        if let Some(caps) = h3_re().captures(line) {
            areas.push(ManifestArea {
                name: caps[1].trim().to_string(),
                topics: Vec::new(),
            });
            continue;
        }
        if !line.starts_with('|') {
            continue;
        }
        if let (Some(area), Some(caps)) = (areas.last_mut(), link_re().captures(line)) {
            area.topics.push(ManifestTopic {
                name: caps[1].to_string(),
                path: caps[2].trim().to_string(),
            });
        }
    }
    areas
}

/// A row of the `### Domain Areas` table in `CLAUDE.md`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainArea {
    pub name: String,
    pub path: String,
    pub overview: Option<String>,
}

/// Domain Areas rows of the `CLAUDE.md` managed region
pub fn parse_claude_manifest(text: &str) -> Vec<DomainArea> {
    let Some(section) = managed_section(text) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut in_table = false;

    for line in section.lines() {
        if domain_areas_re().is_match(line) {
            in_table = true;
            continue;
        }
        if !in_table {
            continue;
        }
        if any_heading_re().is_match(line) {
            break;
        }
        if !line.starts_with('|') || line.contains("---") {
            continue;
        }

        let cells: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if cells.len() < 3 || cells[0] == "Area" {
            continue;
        }

        entries.push(DomainArea {
            name: cells[0].to_string(),
            path: cells[1].trim_matches('`').to_string(),
            overview: link_re().captures(cells[2]).map(|caps| caps[2].trim().to_string()),
        });
    }
    entries
}

pub fn check_manifest_sync(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let areas = kb.areas();
    let mut issues = Vec::new();
    if let Some(text) = read_manifest(&kb.agents_manifest()) {
        issues.extend(check_agents(kb, ctx, &areas, &text));
    }
    if let Some(text) = read_manifest(&kb.claude_manifest()) {
        issues.extend(check_claude(kb, ctx, &areas, &text));
    }
    issues
}

fn read_manifest(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => managed_section(&text).is_some().then_some(text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable manifest");
            None
        }
    }
}

fn check_agents(kb: &KnowledgeBase, ctx: &CheckContext, areas: &[Area], text: &str) -> Vec<Issue> {
    let manifest_path = kb.agents_manifest();
    let manifest_file = ctx.display(&manifest_path);
    let listed = parse_agents_manifest(text);
    let mut issues = Vec::new();

    for area in areas {
        let Some(entry) = listed.iter().find(|entry| entry.matches(&area.name)) else {
            issues.push(Issue::warn(
                manifest_file.clone(),
                format!("Area '{}' on disk not listed in AGENTS.md", area.name),
            ));
            continue;
        };

        for topic in &area.topics {
            let rel = format!(
                "{}/{}/{}",
                kb.knowledge_dir_name(),
                area.name,
                file_name(topic)
            );
            if !entry.topics.iter().any(|t| same_rel_path(&t.path, &rel)) {
                issues.push(Issue::warn(
                    ctx.display(topic),
                    format!("Topic not listed in AGENTS.md: {rel}"),
                ));
            }
        }
    }

    for topic in listed.iter().flat_map(|area| &area.topics) {
        if !kb.root().join(normalize_rel(&topic.path)).exists() {
            issues.push(Issue::warn(
                manifest_file.clone(),
                format!("AGENTS.md references nonexistent file: {}", topic.path),
            ));
        }
    }

    issues
}

fn check_claude(kb: &KnowledgeBase, ctx: &CheckContext, areas: &[Area], text: &str) -> Vec<Issue> {
    let manifest_file = ctx.display(&kb.claude_manifest());
    let entries = parse_claude_manifest(text);
    let prefix = format!("{}/", normalize_rel(kb.knowledge_dir_name()));

    let listed: BTreeSet<String> = entries
        .iter()
        .filter_map(|entry| {
            let path = normalize_rel(&entry.path);
            let rest = path.strip_prefix(&prefix)?;
            rest.split('/').next().map(str::to_string)
        })
        .collect();

    let mut issues: Vec<Issue> = areas
        .iter()
        .filter(|area| !listed.contains(&area.name))
        .map(|area| {
            Issue::warn(
                manifest_file.clone(),
                format!("Area '{}' on disk not listed in CLAUDE.md", area.name),
            )
        })
        .collect();

    for entry in &entries {
        if !kb.root().join(normalize_rel(&entry.path)).is_dir() {
            issues.push(Issue::warn(
                manifest_file.clone(),
                format!("CLAUDE.md references nonexistent directory: {}", entry.path),
            ));
        }
        if let Some(overview) = entry.overview.as_deref() {
            if !kb.root().join(normalize_rel(overview)).exists() {
                issues.push(Issue::warn(
                    manifest_file.clone(),
                    format!("CLAUDE.md references nonexistent overview: {overview}"),
                ));
            }
        }
    }

    issues
}
