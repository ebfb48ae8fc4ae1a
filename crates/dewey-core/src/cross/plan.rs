//! Curation plan parsing and synchronisation
//!
//! The plan groups checkbox items under `## <area-slug>` headings:
//!
//! ```text
//! ## paid-search
//! - [x] Bid Strategies -- core -- most asked about
//! - [ ] Quality Score -- supporting
//! ```
//!
//! An item's document is expected at `<knowledge_dir>/<area>/<slugify(name)>.md`.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::kb::paths::file_name;
use crate::kb::KnowledgeBase;
use crate::markdown::slugify;
use crate::validate::{CheckContext, Issue};

fn area_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^##\s+(.+)$").expect("valid heading pattern"))
}

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-\s+\[([ xX])\]\s+(.+?)(?:\s+--\s+.*)?$").expect("valid checkbox pattern")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    pub area: String,
    pub name: String,
    pub checked: bool,
    /// Zero-based line of the item within the plan text
    pub line: usize,
}

impl PlanItem {
    /// Knowledge-directory-relative path of the item's document
    pub fn rel_path(&self) -> String {
        format!("{}/{}.md", self.area, slugify(&self.name))
    }

    pub fn expected_path(&self, kb: &KnowledgeBase) -> PathBuf {
        kb.knowledge_dir().join(&self.area).join(format!("{}.md", slugify(&self.name)))
    }
}

/// Checkbox items grouped under `##` area headings. Items before the first
/// heading are ignored.
pub fn parse_plan(text: &str) -> Vec<PlanItem> {
    let mut items = Vec::new();
    let mut area: Option<String> = None;

    for (idx, line) in text.split('\n').enumerate() {
        let line = line.trim_end_matches('\r');
        if let Some(caps) = area_heading_re().captures(line) {
            area = Some(caps[1].trim().to_string());
            continue;
        }
        let Some(current) = area.as_ref() else {
            continue;
        };
        if let Some(caps) = item_re().captures(line) {
            items.push(PlanItem {
                area: current.clone(),
                name: caps[2].trim().to_string(),
                checked: caps[1].eq_ignore_ascii_case("x"),
                line: idx,
            });
        }
    }
    items
}

/// Read and parse the plan; `None` when it is absent or unreadable
pub fn load_plan(kb: &KnowledgeBase) -> Option<(String, Vec<PlanItem>)> {
    let path = kb.plan_path();
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(text) => {
            let items = parse_plan(&text);
            Some((text, items))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable curation plan");
            None
        }
    }
}

pub fn check_curation_plan_sync(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let Some((_, items)) = load_plan(kb) else {
        return Vec::new();
    };
    if items.is_empty() {
        return Vec::new();
    }

    let plan_file = ctx.display(&kb.plan_path());
    let mut issues = Vec::new();
    let mut planned: BTreeSet<String> = BTreeSet::new();

    for item in &items {
        let rel = item.rel_path();
        let exists = item.expected_path(kb).exists();
        planned.insert(rel.clone());

        if item.checked && !exists {
            issues.push(Issue::warn(
                plan_file.clone(),
                format!("Plan item '{}' is checked but file not found: {rel}", item.name),
            ));
        } else if !item.checked && exists {
            issues.push(Issue::warn(
                plan_file.clone(),
                format!("Plan item '{}' should be checked off -- file exists: {rel}", item.name),
            ));
        }
    }

    for area in kb.areas() {
        for topic in &area.topics {
            let rel = format!("{}/{}", area.name, file_name(topic));
            if !planned.contains(&rel) {
                issues.push(Issue::warn(
                    ctx.display(topic),
                    format!("Topic on disk not in curation plan: {rel}"),
                ));
            }
        }
    }

    issues
}
