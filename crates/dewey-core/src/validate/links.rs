//! Link checks: relative link resolution and companion cross-links

use std::sync::OnceLock;

use regex::Regex;

use super::types::{CheckContext, Issue};
use crate::document::{Depth, Document};
use crate::kb::paths::{resolve_lexical, REF_SUFFIX};
use crate::markdown;

fn see_also_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)see\s+also").expect("valid see-also pattern"))
}

/// True when `text` holds a relative link whose file name is `name`
pub fn links_to_file(text: &str, name: &str) -> bool {
    markdown::link_targets(text)
        .iter()
        .filter_map(|target| markdown::local_target(target))
        .any(|path| path.rsplit('/').next() == Some(name))
}

pub fn check_cross_references(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let Some(dir) = doc.path().parent() else {
        return Vec::new();
    };

    markdown::link_targets(doc.text())
        .iter()
        .filter_map(|target| markdown::local_target(target))
        .filter(|target| !resolve_lexical(dir, target).exists())
        .map(|target| {
            Issue::warn(
                ctx.display(doc.path()),
                format!("Broken internal link: {target}"),
            )
        })
        .collect()
}

/// Working documents must point at their reference companion and at one
/// external source from "Go Deeper". A missing section is left to the
/// completeness check.
pub fn check_go_deeper_links(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    if doc.is_reference() || doc.depth() != Some(Depth::Working) {
        return Vec::new();
    }
    let Some(section) = markdown::extract_section(&doc.body(), "Go Deeper") else {
        return Vec::new();
    };

    let file = ctx.display(doc.path());
    let ref_name = format!("{}{}", doc.stem(), REF_SUFFIX);
    let mut issues = Vec::new();

    if !links_to_file(&section, &ref_name) {
        issues.push(Issue::warn(
            file.clone(),
            format!("Go Deeper section missing link to companion {ref_name}"),
        ));
    }
    if !markdown::contains_external_url(&section) {
        issues.push(Issue::warn(file, "Go Deeper section missing external link"));
    }

    issues
}

/// Reference documents must say "See also" and link back to `<stem>.md`
pub fn check_ref_see_also(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    if !doc.is_reference() {
        return Vec::new();
    }

    let body = doc.body();
    let file = ctx.display(doc.path());

    if !see_also_re().is_match(&body) {
        return vec![Issue::warn(file, "Reference file missing 'See also' section")];
    }

    let companion = format!("{}.md", doc.stem());
    if !links_to_file(&body, &companion) {
        return vec![Issue::warn(
            file,
            format!("See also section missing link to companion {companion}"),
        )];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn ctx(root: &Path) -> CheckContext {
        CheckContext::new(
            root,
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            Policy::default(),
        )
    }

    #[test]
    fn test_cross_references() {
        let dir = tempdir().unwrap();
        let area = dir.path().join("docs/area");
        fs::create_dir_all(&area).unwrap();
        fs::write(area.join("other.md"), "# Other\n").unwrap();

        let text = "[ok](other.md) [anchor](other.md#part) [web](https://x.com) [top](#top) [mail](mailto:a@b.c) [gone](../missing/x.md)";
        let doc = Document::from_text(&area.join("topic.md"), text.to_string());
        let issues = check_cross_references(&doc, &ctx(dir.path()));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Broken internal link: ../missing/x.md");
        assert_eq!(issues[0].file, "docs/area/topic.md");
    }

    #[test]
    fn test_go_deeper_links() {
        let root = Path::new("/kb");
        let path = root.join("docs/area/bidding.md");
        let complete = "---\ndepth: working\n---\n# B\n## Go Deeper\n- [Ref](bidding.ref.md)\n- [Docs](https://example.com)\n";
        let doc = Document::from_text(&path, complete.to_string());
        assert!(check_go_deeper_links(&doc, &ctx(root)).is_empty());

        let bare = "---\ndepth: working\n---\n# B\n## Go Deeper\nnothing here\n## After\n[x](https://later.com)\n";
        let doc = Document::from_text(&path, bare.to_string());
        let messages: Vec<_> = check_go_deeper_links(&doc, &ctx(root))
            .into_iter()
            .map(|i| i.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Go Deeper section missing link to companion bidding.ref.md",
                "Go Deeper section missing external link"
            ]
        );

        let absent = "---\ndepth: working\n---\n# B\n";
        let doc = Document::from_text(&path, absent.to_string());
        assert!(check_go_deeper_links(&doc, &ctx(root)).is_empty());
    }

    #[test]
    fn test_ref_see_also() {
        let root = Path::new("/kb");
        let path = root.join("docs/area/bidding.ref.md");
        let check = |text: &str| {
            let doc = Document::from_text(&path, text.to_string());
            check_ref_see_also(&doc, &ctx(root))
        };

        assert!(check("# B\n**See also:** [Bidding](bidding.md)\n").is_empty());
        assert_eq!(
            check("# B\nterse notes\n")[0].message,
            "Reference file missing 'See also' section"
        );
        assert_eq!(
            check("# B\nsee   also [Other](other-bidding.md)\n")[0].message,
            "See also section missing link to companion bidding.md"
        );

        let working = Document::from_text(&root.join("docs/area/bidding.md"), "# B\n".into());
        assert!(check_ref_see_also(&working, &ctx(root)).is_empty());
    }
}
