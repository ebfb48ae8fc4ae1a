//! Companion cross-link insertion
//!
//! A link is only ever written when its target exists on disk.

use std::path::Path;

use crate::document::Document;
use crate::kb::paths::{is_reference, ref_companion, working_companion, REF_SUFFIX};
use crate::markdown::title_case;
use crate::validate::links::{check_go_deeper_links, check_ref_see_also};
use crate::validate::CheckContext;

use super::FixActionKind;

const MISSING_REF_LINK_PREFIX: &str = "Go Deeper section missing link to companion";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFix {
    pub text: String,
    pub kind: FixActionKind,
    pub detail: String,
}

/// True when the document's companion (working or reference) exists
pub fn companion_exists(path: &Path) -> bool {
    if is_reference(path) {
        working_companion(path).exists()
    } else {
        ref_companion(path).exists()
    }
}

/// Add the missing companion link, if the document lacks one and the
/// companion exists
pub fn insert_companion_link(doc: &Document, ctx: &CheckContext) -> Option<LinkFix> {
    if doc.is_reference() {
        append_see_also(doc, ctx)
    } else {
        insert_ref_link(doc, ctx)
    }
}

fn append_see_also(doc: &Document, ctx: &CheckContext) -> Option<LinkFix> {
    if check_ref_see_also(doc, ctx).is_empty() || !working_companion(doc.path()).exists() {
        return None;
    }
    let stem = doc.stem();
    let line = format!("**See also:** [{}]({stem}.md)", title_case(stem));
    Some(LinkFix {
        text: format!("{}\n\n{line}\n", doc.text().trim_end()),
        kind: FixActionKind::AppendedSeeAlso,
        detail: format!("Added See also link to {stem}.md"),
    })
}

fn insert_ref_link(doc: &Document, ctx: &CheckContext) -> Option<LinkFix> {
    let missing = check_go_deeper_links(doc, ctx)
        .iter()
        .any(|issue| issue.message.starts_with(MISSING_REF_LINK_PREFIX));
    if !missing || !ref_companion(doc.path()).exists() {
        return None;
    }

    let stem = doc.stem();
    let link = format!(
        "- [{} Reference]({stem}{REF_SUFFIX}) -- quick-lookup version",
        title_case(stem)
    );
    let mut lines: Vec<&str> = doc.text().split('\n').collect();
    let heading = lines
        .iter()
        .position(|line| line.starts_with("## ") && line.to_lowercase().contains("go deeper"))?;
    lines.insert(heading + 1, &link);

    Some(LinkFix {
        text: lines.join("\n"),
        kind: FixActionKind::InsertedRefLink,
        detail: format!("Added link to {stem}{REF_SUFFIX} in Go Deeper"),
    })
}
