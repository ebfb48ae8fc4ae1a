//! Stub insertion for missing required sections
//!
//! The document is edited as an ordered line buffer. Section positions are
//! re-read from the buffer after every insertion, so several stubs added in
//! one pass land in canonical order relative to each other.

use std::collections::HashMap;

use crate::document::frontmatter::delimiter_lines;
use crate::document::Document;

/// Placeholder body of an inserted section
pub const STUB_PLACEHOLDER: &str = "<!-- TODO: Add content -->";

/// Result of a stub pass that changed the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stubbed {
    pub text: String,
    /// Inserted sections in canonical order
    pub inserted: Vec<&'static str>,
}

struct SectionBuffer {
    lines: Vec<String>,
    canonical: &'static [&'static str],
    /// First line after the header block
    body_start: usize,
}

impl SectionBuffer {
    fn new(text: &str, canonical: &'static [&'static str]) -> Self {
        SectionBuffer {
            lines: text.split('\n').map(str::to_string).collect(),
            canonical,
            body_start: delimiter_lines(text).map_or(0, |(_, close)| close + 1),
        }
    }

    /// Line index of each canonical section present. A heading counts for
    /// the first canonical section its text contains.
    fn positions(&self) -> HashMap<&'static str, usize> {
        let mut positions = HashMap::new();
        for (idx, line) in self.lines.iter().enumerate().skip(self.body_start) {
            let Some(heading) = line.strip_prefix("## ") else {
                continue;
            };
            let heading = heading.trim().to_lowercase();
            if let Some(section) = self
                .canonical
                .iter()
                .find(|s| heading.contains(&s.to_lowercase()))
            {
                positions.entry(*section).or_insert(idx);
            }
        }
        positions
    }

    fn next_heading_after(&self, idx: usize) -> Option<usize> {
        (idx + 1..self.lines.len()).find(|&j| self.lines[j].starts_with("## "))
    }

    /// Line after the first blank line following the title, or the line
    /// after the title when no blank line follows it
    fn after_title(&self) -> Option<usize> {
        let title = (self.body_start..self.lines.len()).find(|&j| self.lines[j].starts_with("# "))?;
        let blank = (title + 1..self.lines.len()).find(|&k| self.lines[k].trim().is_empty());
        Some(blank.map_or(title + 1, |k| k + 1))
    }

    /// End of the nearest earlier canonical section present, else the start
    /// of the nearest later one, else below the title, else end of text
    fn insertion_point(&self, section: &str) -> usize {
        let positions = self.positions();
        let idx = self
            .canonical
            .iter()
            .position(|s| *s == section)
            .unwrap_or(self.canonical.len());

        if let Some(&prev) = self.canonical[..idx].iter().rev().find_map(|s| positions.get(s)) {
            return self.next_heading_after(prev).unwrap_or(self.lines.len());
        }
        let later = self.canonical.get(idx + 1..).unwrap_or(&[]);
        if let Some(&next) = later.iter().find_map(|s| positions.get(s)) {
            return next;
        }
        self.after_title().unwrap_or(self.lines.len())
    }

    fn insert_stub(&mut self, section: &str) {
        let at = self.insertion_point(section);
        let stub = [
            format!("## {section}"),
            String::new(),
            STUB_PLACEHOLDER.to_string(),
            String::new(),
        ];
        self.lines.splice(at..at, stub);
    }

    fn into_text(self) -> String {
        self.lines.join("\n")
    }
}

/// Insert a stub for each section of `missing` that belongs to the
/// document's depth. `None` when nothing was inserted.
pub fn insert_stubs(doc: &Document, missing: &[&str]) -> Option<Stubbed> {
    let canonical = doc.depth()?.required_sections();
    let wanted: Vec<&'static str> = canonical
        .iter()
        .copied()
        .filter(|section| missing.contains(section))
        .collect();
    if wanted.is_empty() {
        return None;
    }

    let mut buffer = SectionBuffer::new(doc.text(), canonical);
    for section in &wanted {
        buffer.insert_stub(section);
    }
    Some(Stubbed {
        text: buffer.into_text(),
        inserted: wanted,
    })
}
