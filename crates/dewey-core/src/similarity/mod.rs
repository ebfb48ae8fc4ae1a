//! Content similarity primitives for duplicate detection
//!
//! Exact duplication is found by fingerprinting paragraphs; near duplication
//! by comparing sets of contiguous word shingles with Jaccard similarity.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

fn paragraph_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid paragraph pattern"))
}

fn lowercase_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-z]+").expect("valid word pattern"))
}

/// Trimmed blank-line-separated paragraphs of at least `min_chars` characters
pub fn paragraphs(text: &str, min_chars: usize) -> Vec<String> {
    paragraph_break_re()
        .split(text)
        .map(str::trim)
        .filter(|p| p.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}

/// Stable hex fingerprint of a paragraph
pub fn fingerprint(paragraph: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(paragraph.as_bytes());
    let hash = hasher.finalize();
    hex::encode(hash)
}

/// Set of contiguous `size`-word sequences over the lowercase words of
/// `text`. Empty when the text has fewer than `size` words.
pub fn shingles(text: &str, size: usize) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowercase_word_re()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .collect();
    if size == 0 || words.len() < size {
        return HashSet::new();
    }
    words.windows(size).map(|w| w.join(" ")).collect()
}

/// `|a ∩ b| / |a ∪ b|`, or 0.0 when both sets are empty
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Paragraph fingerprints and shingles of one document body
#[derive(Debug, Clone, Default)]
pub struct ContentProfile {
    pub fingerprints: HashSet<String>,
    pub shingles: HashSet<String>,
}

impl ContentProfile {
    /// Profile already-cleaned body text
    pub fn build(body: &str, min_paragraph_chars: usize, shingle_size: usize) -> Self {
        ContentProfile {
            fingerprints: paragraphs(body, min_paragraph_chars)
                .iter()
                .map(|p| fingerprint(p))
                .collect(),
            shingles: shingles(body, shingle_size),
        }
    }
}
