//! Lightweight markdown pattern matching
//!
//! Headings, links and sections are found with line-oriented regexes rather
//! than a markdown parser. Validators rely on the exact matching rules here
//! (for instance case-insensitive substring matching of `##` heading text).

use std::sync::OnceLock;

use regex::Regex;

use crate::document::frontmatter::delimiter_lines;

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid markdown pattern"))
        }
    };
}

cached_regex!(h2_re, r"(?m)^##\s+(.+)$");
cached_regex!(heading_level_re, r"^(#{1,6})\s+");
cached_regex!(link_re, r"\[([^\]]*)\]\(([^)]+)\)");
cached_regex!(image_re, r"!\[[^\]]*\]\([^)]+\)");
cached_regex!(bold_star_re, r"\*\*(.+?)\*\*");
cached_regex!(bold_underscore_re, r"__(.+?)__");
cached_regex!(italic_star_re, r"\*(.+?)\*");
cached_regex!(italic_underscore_re, r"(^|[^\w])_(.+?)_([^\w]|$)");
cached_regex!(inline_code_re, r"`([^`]+)`");
cached_regex!(external_url_re, r#"https?://[^\s)\]>"'`]+"#);
cached_regex!(slug_strip_re, r"[^a-z0-9\s-]");
cached_regex!(whitespace_re, r"\s+");
cached_regex!(hyphen_run_re, r"-{2,}");
cached_regex!(comment_re, r"(?s)<!--.*?-->");
cached_regex!(list_item_re, r"^\s*(?:[-*+]|\d+[.)])\s+\S");

/// Strip the header block between the first two `---` lines
pub fn body_without_frontmatter(text: &str) -> String {
    match delimiter_lines(text) {
        Some((_, close)) => text.split('\n').skip(close + 1).collect::<Vec<_>>().join("\n"),
        None => text.to_string(),
    }
}

/// Blank out fenced code blocks, keeping the line count
pub fn strip_fenced_code_blocks(text: &str) -> String {
    let mut in_fence = false;
    text.split('\n')
        .map(|line| {
            if line.trim().starts_with("```") {
                in_fence = !in_fence;
                ""
            } else if in_fence {
                ""
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of every `## ` heading, in order
pub fn h2_headings(text: &str) -> Vec<String> {
    h2_re()
        .captures_iter(text)
        .map(|caps| caps[1].trim_end_matches('\r').to_string())
        .collect()
}

/// True when some `##` heading contains `section`, ignoring case
pub fn has_section(headings: &[String], section: &str) -> bool {
    let needle = section.to_lowercase();
    headings.iter().any(|h| h.to_lowercase().contains(&needle))
}

/// Levels of all ATX headings (`#` to `######`), in order
pub fn heading_levels(text: &str) -> Vec<usize> {
    text.split('\n')
        .filter_map(|line| heading_level_re().captures(line))
        .map(|caps| caps[1].len())
        .collect()
}

/// Body lines outside every `## ` section whose heading contains `heading`
/// (case-insensitive)
pub fn without_section(body: &str, heading: &str) -> String {
    let needle = heading.to_lowercase();
    let mut skipping = false;
    let mut kept = Vec::new();
    for line in body.split('\n') {
        if let Some(text) = line.strip_prefix("## ") {
            skipping = text.to_lowercase().contains(&needle);
        }
        if !skipping {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Body of the first `## ` section whose heading contains `heading`
/// (case-insensitive), up to the next `## ` heading. `None` when no such
/// heading exists.
pub fn extract_section(body: &str, heading: &str) -> Option<String> {
    extract_section_by(body, |text| {
        text.to_lowercase().contains(&heading.to_lowercase())
    })
}

/// Like [`extract_section`] with an arbitrary heading predicate
pub fn extract_section_by(body: &str, matches: impl Fn(&str) -> bool) -> Option<String> {
    let mut capturing = false;
    let mut lines = Vec::new();

    for line in body.split('\n') {
        if let Some(heading) = line.strip_prefix("## ") {
            if capturing {
                break;
            }
            if matches(heading.trim()) {
                capturing = true;
            }
        } else if capturing {
            lines.push(line);
        }
    }

    capturing.then(|| lines.join("\n"))
}

/// Targets of every `[text](target)` link, trimmed
pub fn link_targets(text: &str) -> Vec<String> {
    link_re()
        .captures_iter(text)
        .map(|caps| caps[2].trim().to_string())
        .collect()
}

/// True for web URLs, in-page anchors and mail links
pub fn is_external(target: &str) -> bool {
    target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with('#')
        || target.starts_with("mailto:")
}

/// File part of a relative link target (anchor removed), or `None` for
/// external and anchor-only targets
pub fn local_target(target: &str) -> Option<&str> {
    if is_external(target) {
        return None;
    }
    let path = target.split('#').next().unwrap_or("");
    (!path.is_empty()).then_some(path)
}

/// Every absolute http(s) URL appearing in `text`
pub fn external_urls(text: &str) -> Vec<String> {
    external_url_re()
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
        .collect()
}

pub fn contains_external_url(text: &str) -> bool {
    external_url_re().is_match(text)
}

/// Lower-cased host of an http(s) URL, without `www.`, port or credentials
pub fn url_host(url: &str) -> Option<String> {
    let (scheme, rest) = url.trim().split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?.split(':').next()?;
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (!host.is_empty()).then(|| host.to_string())
}

/// Every `<!-- ... -->` comment, including the delimiters
pub fn html_comments(text: &str) -> Vec<&str> {
    comment_re().find_iter(text).map(|m| m.as_str()).collect()
}

/// Text with every HTML comment removed
pub fn strip_comments(text: &str) -> String {
    comment_re().replace_all(text, "").into_owned()
}

/// Bulleted or numbered list items
pub fn list_item_count(text: &str) -> usize {
    text.split('\n').filter(|line| list_item_re().is_match(line)).count()
}

/// Pipe-table rows, not counting `|---|` separator rows
pub fn table_rows(text: &str) -> usize {
    text.split('\n')
        .map(str::trim)
        .filter(|line| line.starts_with('|') && line.matches('|').count() >= 2)
        .filter(|line| !line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ')))
        .count()
}

/// Remove inline formatting (images, links, emphasis, code), keeping the text
pub fn strip_formatting(text: &str) -> String {
    let text = image_re().replace_all(text, "");
    let text = link_re().replace_all(&text, "$1");
    let text = bold_star_re().replace_all(&text, "$1");
    let text = bold_underscore_re().replace_all(&text, "$1");
    let text = italic_star_re().replace_all(&text, "$1");
    let text = italic_underscore_re().replace_all(&text, "$1$2$3");
    let text = inline_code_re().replace_all(&text, "$1");
    text.into_owned()
}

/// Prose words (whitespace-separated tokens containing a letter or digit)
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count()
}

/// Convert a human-readable name to a file or directory slug
pub fn slugify(name: &str) -> String {
    let slug = name.trim().to_lowercase().replace('_', "-");
    let slug = slug_strip_re().replace_all(&slug, "");
    let slug = whitespace_re().replace_all(&slug, "-");
    let slug = hyphen_run_re().replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Display name of a slug: hyphens become spaces and each word is capitalised
pub fn title_case(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_alpha = false;
    for c in stem.replace('-', " ").chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
