//! Slug naming conventions for area directories and document files

use std::fs;
use std::path::PathBuf;

use super::types::{CheckContext, Issue};
use crate::kb::paths::{doc_stem, file_name, INDEX_FILE, OVERVIEW_FILE};
use crate::kb::KnowledgeBase;
use crate::markdown::slugify;

/// Expected slug for `name` when it differs from `name`
pub fn expected_slug(name: &str) -> Option<String> {
    let slug = slugify(name);
    (slug != name).then_some(slug)
}

/// Check every area directory and the documents directly inside it
pub fn check_naming_conventions(kb: &KnowledgeBase, ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();

    for area in kb.areas() {
        if let Some(slug) = expected_slug(&area.name) {
            issues.push(Issue::warn(
                ctx.display(&area.path),
                format!(
                    "Area directory '{}' doesn't follow naming conventions -- expected '{slug}'",
                    area.name
                ),
            ));
        }

        for path in markdown_files(&area.path) {
            let name = file_name(&path);
            if name == OVERVIEW_FILE || name == INDEX_FILE {
                continue;
            }
            if let Some(slug) = expected_slug(doc_stem(&path)) {
                issues.push(Issue::warn(
                    ctx.display(&path),
                    format!("Filename '{name}' doesn't follow naming conventions -- expected '{slug}'"),
                ));
            }
        }
    }

    issues
}

fn markdown_files(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .collect(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable area");
            Vec::new()
        }
    };
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_expected_slug() {
        assert_eq!(expected_slug("bid-strategies"), None);
        assert_eq!(expected_slug("Bid_Strategies"), Some("bid-strategies".to_string()));
    }

    #[test]
    fn test_naming_conventions() {
        let dir = tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("Paid Search")).unwrap();
        fs::create_dir_all(docs.join("organic")).unwrap();
        fs::create_dir_all(docs.join("_proposals")).unwrap();
        fs::write(docs.join("Paid Search/overview.md"), "").unwrap();
        fs::write(docs.join("organic/overview.md"), "").unwrap();
        fs::write(docs.join("organic/Link_Building.md"), "").unwrap();
        fs::write(docs.join("organic/Link_Building.ref.md"), "").unwrap();
        fs::write(docs.join("organic/keywords.md"), "").unwrap();
        fs::write(docs.join("_proposals/Bad Name.md"), "").unwrap();

        let kb = KnowledgeBase::open(dir.path()).unwrap();
        let ctx = CheckContext::new(
            dir.path(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            kb.policy().clone(),
        );
        let issues = check_naming_conventions(&kb, &ctx);
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Area directory 'Paid Search' doesn't follow naming conventions -- expected 'paid-search'",
                "Filename 'Link_Building.md' doesn't follow naming conventions -- expected 'link-building'",
                "Filename 'Link_Building.ref.md' doesn't follow naming conventions -- expected 'link-building'",
            ]
        );
        assert_eq!(issues[0].file, "docs/Paid Search");
    }
}
