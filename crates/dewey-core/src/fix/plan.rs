//! Curation-plan checkbox correction

use std::fs;
use std::sync::OnceLock;

use regex::Regex;

use super::{FixAction, FixActionKind};
use crate::cross::plan::load_plan;
use crate::error::{DeweyError, Result};
use crate::kb::KnowledgeBase;
use crate::validate::CheckContext;

fn unchecked_box_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(-\s+\[) \]").expect("valid checkbox pattern"))
}

/// Check off every unchecked plan item whose document exists, rewriting
/// only the item's own line
pub fn check_off_existing(kb: &KnowledgeBase, ctx: &CheckContext) -> Result<Vec<FixAction>> {
    let Some((text, items)) = load_plan(kb) else {
        return Ok(Vec::new());
    };

    let plan_path = kb.plan_path();
    let plan_file = ctx.display(&plan_path);
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut actions = Vec::new();

    for item in items.iter().filter(|item| !item.checked) {
        if !item.expected_path(kb).exists() {
            continue;
        }
        let Some(line) = lines.get_mut(item.line) else {
            continue;
        };
        let checked = unchecked_box_re().replace(line.as_str(), "${1}x]").into_owned();
        *line = checked;
        actions.push(
            FixAction::new(plan_file.as_str(), FixActionKind::CheckedPlanItem).with_detail(format!(
                "Checked off '{}' -- file exists: {}",
                item.name,
                item.rel_path()
            )),
        );
    }

    if !actions.is_empty() {
        fs::write(&plan_path, lines.join("\n"))
            .map_err(|e| DeweyError::io_operation("write", plan_path.display(), e))?;
    }
    Ok(actions)
}
