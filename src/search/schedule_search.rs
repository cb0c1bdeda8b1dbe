//! Free-text search over schedules.

use super::matching::{fold_case, QueryMatcher};
use crate::schedule::{ScheduleItem, ScheduleKey};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

pub const MAX_RESULTS: usize = 20;

/// Length in chars of the detail excerpt shown for detail matches.
pub const SNIPPET_CHARS: usize = 48;

const ELLIPSIS: char = '…';

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Artist,
    Detail,
}

/// Match quality; smaller is better.
///
/// Every result carries a found offset, so "found before not found" never
/// has to be decided here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MatchRank {
    inexact: bool,
    not_prefix: bool,
    field: MatchField,
    offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub item: ScheduleItem,
    pub match_field: MatchField,
    /// Char offset of the match inside the matched field.
    pub match_index: usize,
    /// Detail text to show: an excerpt around the match for detail matches,
    /// the full detail otherwise.
    pub display_detail: String,
    pub is_exact: bool,
    #[serde(skip)]
    rank: MatchRank,
}

impl SearchResult {
    /// Rank first, then later dates, then artist name ignoring case.
    fn display_order(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.item.date_key.cmp(&self.item.date_key))
            .then_with(|| artist_order(&self.item.artist, &other.item.artist))
    }
}

/// Case-insensitive, with byte order between names that differ only in case.
fn artist_order(a: &str, b: &str) -> Ordering {
    fold_case(a).cmp(&fold_case(b)).then_with(|| a.cmp(b))
}

/// Excerpt of `text` starting at char `offset`.
fn snippet(text: &str, offset: usize) -> String {
    if offset == 0 {
        return text.to_string();
    }
    let total = text.chars().count();
    let end = (offset + SNIPPET_CHARS).min(total);
    let window: String = text.chars().skip(offset).take(end.saturating_sub(offset)).collect();
    let window = window.trim();
    if window.is_empty() {
        return text.to_string();
    }
    let mut out = window.to_string();
    if end < total {
        out.push(ELLIPSIS);
    }
    out
}

fn match_item(matcher: &QueryMatcher, item: &ScheduleItem) -> Option<SearchResult> {
    let (field, text, offset) = if let Some(offset) = matcher.find_in(&item.artist) {
        (MatchField::Artist, item.artist.as_str(), offset)
    } else if let Some(offset) = matcher.find_in(&item.detail) {
        (MatchField::Detail, item.detail.as_str(), offset)
    } else {
        return None;
    };

    let is_exact = matcher.is_exact(text);
    let display_detail = match field {
        MatchField::Detail => snippet(&item.detail, offset),
        MatchField::Artist => item.detail.clone(),
    };

    Some(SearchResult {
        item: item.clone(),
        match_field: field,
        match_index: offset,
        display_detail,
        is_exact,
        rank: MatchRank {
            inexact: !is_exact,
            not_prefix: !matcher.is_prefix(text),
            field,
            offset,
        },
    })
}

/// Ranks `schedules` against `query` and returns at most [`MAX_RESULTS`].
///
/// Activities are never searchable. Entries sharing a [`ScheduleKey`] are
/// reported once, the first one in `schedules` winning.
pub fn search(query: &str, schedules: &[ScheduleItem]) -> Vec<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let matcher = QueryMatcher::new(query);

    let mut seen: HashSet<ScheduleKey> = HashSet::new();
    let mut results: Vec<SearchResult> = schedules
        .iter()
        .filter(|s| !s.is_activity())
        .filter_map(|s| match_item(&matcher, s))
        .filter(|r| seen.insert(ScheduleKey::of(&r.item)))
        .collect();

    results.sort_by(SearchResult::display_order);
    let matched = results.len();
    results.truncate(MAX_RESULTS);

    debug!(
        "Search {:?} ({:?}) matched {} schedules, returning {}",
        query,
        matcher.mode(),
        matched,
        results.len()
    );
    results
}
