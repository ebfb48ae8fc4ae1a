//! Conservative auto-fixes driven by validator findings
//!
//! Only three kinds of finding are acted on: missing required sections,
//! missing companion cross-links, and unchecked curation-plan items whose
//! document now exists. Everything else is ignored. Applying fixes to an
//! already fixed tree changes nothing.

pub mod links;
pub mod plan;
pub mod sections;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::document::Document;
use crate::error::{DeweyError, Result};
use crate::kb::KnowledgeBase;
use crate::trace_time;
use crate::validate::{CheckContext, Issue};

/// Message prefix of the section completeness check
pub const MISSING_SECTION_PREFIX: &str = "Missing required section: ";

/// Marker of plan items whose document already exists
pub const PLAN_CHECK_MARKER: &str = "should be checked off";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    /// Write changes to disk
    Apply,
    /// Report intended changes only
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixActionKind {
    InsertedStubSection,
    AppendedSeeAlso,
    InsertedRefLink,
    CheckedPlanItem,
    WouldInsertStubSection,
    WouldInsertCrossLink,
    WouldCheckPlanItem,
}

impl FixActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixActionKind::InsertedStubSection => "inserted_stub_section",
            FixActionKind::AppendedSeeAlso => "appended_see_also",
            FixActionKind::InsertedRefLink => "inserted_ref_link",
            FixActionKind::CheckedPlanItem => "checked_plan_item",
            FixActionKind::WouldInsertStubSection => "would_insert_stub_section",
            FixActionKind::WouldInsertCrossLink => "would_insert_cross_link",
            FixActionKind::WouldCheckPlanItem => "would_check_plan_item",
        }
    }

    /// The dry-run counterpart of an applied action
    pub fn preview(self) -> Self {
        match self {
            FixActionKind::InsertedStubSection => FixActionKind::WouldInsertStubSection,
            FixActionKind::AppendedSeeAlso | FixActionKind::InsertedRefLink => {
                FixActionKind::WouldInsertCrossLink
            }
            FixActionKind::CheckedPlanItem => FixActionKind::WouldCheckPlanItem,
            preview => preview,
        }
    }
}

impl std::fmt::Display for FixActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applied or intended change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixAction {
    pub file: String,
    pub action: FixActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FixAction {
    pub fn new(file: impl Into<String>, action: FixActionKind) -> Self {
        FixAction {
            file: file.into(),
            action,
            section: None,
            detail: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// True for findings the cross-link fixer can resolve
pub fn is_cross_link_issue(message: &str) -> bool {
    message.contains("See also") || (message.contains("Go Deeper") && message.contains(".ref.md"))
}

/// Act on `issues` for each of `documents`, then on the curation plan.
///
/// Issues are matched to documents by display path. Proposals and other
/// documents not in `documents` are never touched.
#[tracing::instrument(skip_all, fields(mode = ?mode, documents = documents.len()))]
pub fn apply_fixes(
    kb: &KnowledgeBase,
    ctx: &CheckContext,
    documents: &[PathBuf],
    issues: &[Issue],
    mode: FixMode,
) -> Result<Vec<FixAction>> {
    let start = Instant::now();
    let mut actions = Vec::new();

    for path in documents {
        let file = ctx.display(path);
        let doc_issues: Vec<&Issue> = issues.iter().filter(|i| i.file == file).collect();
        if doc_issues.is_empty() {
            continue;
        }
        match mode {
            FixMode::DryRun => actions.extend(preview_document(path, ctx, &doc_issues)?),
            FixMode::Apply => actions.extend(fix_document(path, ctx, &doc_issues)?),
        }
    }

    let plan_issues: Vec<&Issue> = issues
        .iter()
        .filter(|i| i.message.contains(PLAN_CHECK_MARKER))
        .collect();
    match mode {
        FixMode::DryRun => actions.extend(plan_issues.iter().map(|issue| {
            FixAction::new(issue.file.clone(), FixActionKind::WouldCheckPlanItem)
                .with_detail(issue.message.clone())
        })),
        FixMode::Apply if !plan_issues.is_empty() => {
            actions.extend(plan::check_off_existing(kb, ctx)?);
        }
        FixMode::Apply => {}
    }

    trace_time!(start, "apply_fixes", actions = actions.len());
    Ok(actions)
}

/// Changes one fix pass would make to a document, and its resulting text
struct DocumentFix {
    actions: Vec<FixAction>,
    text: Option<String>,
}

/// Work out every change for one document in memory. Apply and dry-run both
/// go through here so a preview lists exactly what a write would do.
fn plan_document(path: &Path, ctx: &CheckContext, issues: &[&Issue]) -> Result<DocumentFix> {
    let file = ctx.display(path);
    let mut doc = Document::load(path)?;
    let mut actions = Vec::new();
    let mut changed = false;

    let missing: Vec<&str> = issues
        .iter()
        .filter_map(|i| i.message.strip_prefix(MISSING_SECTION_PREFIX))
        .collect();
    if let Some(stubbed) = sections::insert_stubs(&doc, &missing) {
        actions.extend(stubbed.inserted.iter().map(|section| {
            FixAction::new(file.as_str(), FixActionKind::InsertedStubSection).with_section(*section)
        }));
        doc = Document::from_text(path, stubbed.text);
        changed = true;
    }

    // A freshly stubbed Go Deeper section can now take the companion link
    let wants_link = changed || issues.iter().any(|i| is_cross_link_issue(&i.message));
    if wants_link {
        if let Some(linked) = links::insert_companion_link(&doc, ctx) {
            actions.push(FixAction::new(file.as_str(), linked.kind).with_detail(linked.detail));
            doc = Document::from_text(path, linked.text);
            changed = true;
        }
    }

    Ok(DocumentFix {
        actions,
        text: changed.then(|| doc.text().to_string()),
    })
}

fn preview_document(path: &Path, ctx: &CheckContext, issues: &[&Issue]) -> Result<Vec<FixAction>> {
    let planned = plan_document(path, ctx, issues)?;
    Ok(planned
        .actions
        .into_iter()
        .map(|mut action| {
            action.action = action.action.preview();
            action
        })
        .collect())
}

fn fix_document(path: &Path, ctx: &CheckContext, issues: &[&Issue]) -> Result<Vec<FixAction>> {
    let planned = plan_document(path, ctx, issues)?;
    if let Some(text) = &planned.text {
        fs::write(path, text).map_err(|e| DeweyError::io_operation("write", path.display(), e))?;
        tracing::debug!(file = %ctx.display(path), actions = planned.actions.len(), "document fixed");
    }
    Ok(planned.actions)
}
