mod matching;
mod schedule_search;

pub use matching::{fold_case, is_ascii_like, MatchMode, QueryMatcher};
pub use schedule_search::{search, MatchField, SearchResult, MAX_RESULTS, SNIPPET_CHARS};
