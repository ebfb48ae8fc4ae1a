//! A knowledge-base document: its path, raw text and parsed header

pub mod frontmatter;
pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeweyError, Result};
use crate::kb::paths;
use crate::markdown;
pub use frontmatter::{parse_frontmatter, FieldValue, Frontmatter};
pub use types::{Depth, OVERVIEW_SECTIONS, WORKING_SECTIONS};

#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    text: String,
    frontmatter: Frontmatter,
}

impl Document {
    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DeweyError::io_operation("read", path.display(), e))?;
        Ok(Self::from_text(path, text))
    }

    /// Build a document from text already in memory
    pub fn from_text(path: &Path, text: String) -> Self {
        let frontmatter = parse_frontmatter(&text);
        Document {
            path: path.to_path_buf(),
            text,
            frontmatter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Text after the header block (the whole text when there is none)
    pub fn body(&self) -> String {
        markdown::body_without_frontmatter(&self.text)
    }

    /// Declared depth, when it is one of the three valid values
    pub fn depth(&self) -> Option<Depth> {
        self.frontmatter.scalar("depth")?.parse().ok()
    }

    pub fn file_name(&self) -> &str {
        paths::file_name(&self.path)
    }

    /// Stem with `.ref.md` or `.md` removed
    pub fn stem(&self) -> &str {
        paths::doc_stem(&self.path)
    }

    pub fn is_reference(&self) -> bool {
        paths::is_reference(&self.path)
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_and_accessors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bidding.ref.md");
        fs::write(&path, "---\ndepth: reference\n---\n# Bidding\n").unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.depth(), Some(Depth::Reference));
        assert_eq!(doc.stem(), "bidding");
        assert!(doc.is_reference());
        assert_eq!(doc.body(), "# Bidding\n");
        assert_eq!(doc.line_count(), 4);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(Document::load(&dir.path().join("nope.md")).is_err());
    }

    #[test]
    fn test_invalid_depth_is_none() {
        let doc = Document::from_text(Path::new("x.md"), "---\ndepth: deep\n---\n".into());
        assert_eq!(doc.depth(), None);
    }
}
