//! Literal query matching over schedule text fields.
//!
//! Text is compared as case-folded `char` sequences that stay aligned with
//! the original text, so a match offset can be applied to the raw field.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ASCII_LIKE_QUERY: Regex =
        Regex::new(r"(?i)^[a-z0-9\s._-]+$").expect("Invalid Regex, this should be fixed at compile time.");
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchMode {
    /// The query must be flanked by non-alphanumerics or the text edges.
    WordBoundary,
    /// Plain substring.
    Substring,
}

/// Lowercases `text` one char at a time, keeping one output char per input char.
pub fn fold_case(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

/// Lowercases and keeps only `[a-z0-9]`.
fn normalize_ascii(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

pub fn is_ascii_like(query: &str) -> bool {
    ASCII_LIKE_QUERY.is_match(query)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Returns the char offset of the first occurrence of `needle` in `text`
/// that satisfies `mode`.
pub fn find_match(text: &[char], needle: &[char], mode: MatchMode) -> Option<usize> {
    if needle.is_empty() || needle.len() > text.len() {
        return None;
    }
    let len = needle.len();
    (0..=text.len() - len).find(|&start| {
        if text[start..start + len] != *needle {
            return false;
        }
        match mode {
            MatchMode::Substring => true,
            MatchMode::WordBoundary => {
                let before_ok = start == 0 || !is_word_char(text[start - 1]);
                let after_ok = start + len == text.len() || !is_word_char(text[start + len]);
                before_ok && after_ok
            }
        }
    })
}

/// A trimmed, non-empty search query prepared for matching.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    lower: String,
    folded: Vec<char>,
    mode: MatchMode,
    normalized: Option<String>,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        let folded = fold_case(query);
        let ascii_like = is_ascii_like(query);
        Self {
            lower: folded.iter().collect(),
            folded,
            mode: if ascii_like {
                MatchMode::WordBoundary
            } else {
                MatchMode::Substring
            },
            normalized: ascii_like.then(|| normalize_ascii(query)),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Char offset of the query in `text`, if it matches.
    pub fn find_in(&self, text: &str) -> Option<usize> {
        find_match(&fold_case(text), &self.folded, self.mode)
    }

    /// Whether `text` is the query itself, ignoring case and surrounding
    /// whitespace; ASCII-like queries also ignore punctuation.
    pub fn is_exact(&self, text: &str) -> bool {
        let lower: String = fold_case(text).into_iter().collect();
        if lower.trim() == self.lower {
            return true;
        }
        self.normalized
            .as_ref()
            .is_some_and(|normalized| normalize_ascii(text) == *normalized)
    }

    /// Whether trimmed `text` starts with the query, ignoring case.
    pub fn is_prefix(&self, text: &str) -> bool {
        let lower: String = fold_case(text).into_iter().collect();
        lower.trim().starts_with(&self.lower)
    }
}
