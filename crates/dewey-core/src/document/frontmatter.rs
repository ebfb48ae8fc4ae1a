//! Header block parser
//!
//! The header is the text between the first two lines whose trimmed content
//! is `---`. It holds `key: value` scalars and list values built from indented
//! `- item` lines (or an inline `[a, b]` list). Parsing never fails: anything
//! unrecognised is ignored and a missing block yields an empty record.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Value of one header key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Key present with nothing after the colon
    Empty,
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Scalar(s) => write!(f, "{s}"),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Parsed header record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: BTreeMap<String, FieldValue>,
}

impl Frontmatter {
    /// True when no header block was found or it held no keys
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Scalar value of `key`, if present and scalar
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }

    /// List value of `key`, if present and a list
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(FieldValue::as_list)
    }

    /// True when `key` is absent or has an empty value
    pub fn is_missing(&self, key: &str) -> bool {
        matches!(self.get(key), None | Some(FieldValue::Empty))
    }

    /// Items of a list-valued key. A scalar value counts as a single item.
    pub fn items(&self, key: &str) -> Vec<&str> {
        match self.get(key) {
            Some(FieldValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(FieldValue::Scalar(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }
}

fn key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w[\w_]*):\s*(.*)$").expect("valid key pattern"))
}

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s+-\s+(.+)$").expect("valid list item pattern"))
}

/// Line indices of the first two `---` delimiter lines
pub fn delimiter_lines(text: &str) -> Option<(usize, usize)> {
    let mut found = text
        .split('\n')
        .enumerate()
        .filter(|(_, line)| line.trim() == "---")
        .map(|(idx, _)| idx);
    let open = found.next()?;
    let close = found.next()?;
    Some((open, close))
}

/// Parse the header block of a document
pub fn parse_frontmatter(text: &str) -> Frontmatter {
    let Some((open, close)) = delimiter_lines(text) else {
        return Frontmatter::default();
    };

    let mut fields: BTreeMap<String, FieldValue> = BTreeMap::new();
    let mut current_key: Option<String> = None;

    for line in text.split('\n').skip(open + 1).take(close - open - 1) {
        let line = line.trim_end_matches('\r');

        if let (Some(caps), Some(key)) = (item_re().captures(line), current_key.as_ref()) {
            let item = caps[1].trim().to_string();
            let entry = fields.entry(key.clone()).or_insert(FieldValue::Empty);
            match entry {
                FieldValue::List(items) => items.push(item),
                other => *other = FieldValue::List(vec![item]),
            }
            continue;
        }

        if let Some(caps) = key_re().captures(line) {
            let key = caps[1].to_string();
            let value = caps[2].trim();
            fields.insert(key.clone(), parse_value(value));
            current_key = Some(key);
        }
    }

    Frontmatter { fields }
}

fn parse_value(value: &str) -> FieldValue {
    if value.is_empty() {
        return FieldValue::Empty;
    }
    if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return FieldValue::List(items);
    }
    FieldValue::Scalar(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---\nsources:\n  - https://a.example.com\n  - url: https://b.example.com\nlast_validated: 2026-01-01\nrelevance: core\ndepth: working\nstatus:\n---\n# Title\n";

    #[test]
    fn test_parse_scalars_and_list() {
        let fm = parse_frontmatter(DOC);
        assert_eq!(
            fm.list("sources").unwrap(),
            &["https://a.example.com", "url: https://b.example.com"]
        );
        assert_eq!(fm.scalar("last_validated"), Some("2026-01-01"));
        assert_eq!(fm.scalar("depth"), Some("working"));
        assert!(fm.is_missing("status"));
        assert!(fm.is_missing("rationale"));
    }

    #[test]
    fn test_fewer_than_two_delimiters_is_empty() {
        assert!(parse_frontmatter("").is_empty());
        assert!(parse_frontmatter("# Title\n\nbody").is_empty());
        assert!(parse_frontmatter("---\ndepth: working\n").is_empty());
    }

    #[test]
    fn test_inline_list() {
        let fm = parse_frontmatter("---\nsources: [https://x.com, 'https://y.com']\n---\n");
        assert_eq!(fm.list("sources").unwrap(), &["https://x.com", "https://y.com"]);

        let fm = parse_frontmatter("---\nsources: []\n---\n");
        assert_eq!(fm.list("sources").unwrap().len(), 0);
        assert!(!fm.is_missing("sources"));
    }

    #[test]
    fn test_list_item_replaces_scalar() {
        let fm = parse_frontmatter("---\nsources: stray\n  - https://x.com\n---\n");
        assert_eq!(fm.list("sources").unwrap(), &["https://x.com"]);
    }

    #[test]
    fn test_item_before_any_key_ignored() {
        let fm = parse_frontmatter("---\n  - orphan\ndepth: overview\n---\n");
        assert_eq!(fm.scalar("depth"), Some("overview"));
        assert!(fm.get("orphan").is_none());
    }

    #[test]
    fn test_items_accepts_scalar() {
        let fm = parse_frontmatter("---\nsources: https://x.com\n---\n");
        assert_eq!(fm.items("sources"), vec!["https://x.com"]);
    }
}
