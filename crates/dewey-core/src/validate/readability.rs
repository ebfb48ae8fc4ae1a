//! Flesch-Kincaid grade estimate with a vowel-group syllable heuristic

use std::sync::OnceLock;

use regex::Regex;

use super::types::{CheckContext, Issue};
use crate::document::Document;
use crate::markdown;

fn vowel_group_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[aeiouy]+").expect("valid vowel pattern"))
}

fn sentence_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("valid sentence pattern"))
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("valid word pattern"))
}

/// Vowel groups in a word after dropping a trailing silent "e"; at least 1
pub fn count_syllables(word: &str) -> usize {
    let word = word.trim().to_lowercase();
    let word = match word.strip_suffix('e') {
        Some(stripped) if word.chars().count() > 2 => stripped,
        _ => word.as_str(),
    };
    vowel_group_re().find_iter(word).count().max(1)
}

/// Grade level of `text`, or `None` with fewer than three sentences
pub fn flesch_kincaid_grade(text: &str) -> Option<f64> {
    let sentences: Vec<&str> = sentence_split_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() < 3 {
        return None;
    }

    let words: Vec<&str> = sentences
        .iter()
        .flat_map(|s| word_re().find_iter(s).map(|m| m.as_str()))
        .collect();
    if words.is_empty() {
        return None;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let words_per_sentence = words.len() as f64 / sentences.len() as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;
    Some(0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59)
}

/// Prose of a document with header, fenced code and inline formatting removed
pub fn prose(doc: &Document) -> String {
    markdown::strip_formatting(&markdown::strip_fenced_code_blocks(&doc.body()))
}

pub fn check_readability(doc: &Document, ctx: &CheckContext) -> Vec<Issue> {
    let Some(depth) = doc.depth() else {
        return Vec::new();
    };
    let Some((lo, hi)) = depth.grade_bounds() else {
        return Vec::new();
    };
    let Some(grade) = flesch_kincaid_grade(&prose(doc)) else {
        return Vec::new();
    };

    let message = if grade < lo {
        format!("Readability grade {grade:.1} below {lo} for depth '{depth}' -- may be too simplistic")
    } else if grade > hi {
        format!("Readability grade {grade:.1} above {hi} for depth '{depth}' -- may be too complex")
    } else {
        return Vec::new();
    };
    vec![Issue::warn(ctx.display(doc.path()), message)]
}
