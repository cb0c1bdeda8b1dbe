//! Composite identity of a schedule entry.
//!
//! Feed ids are reassigned between reloads, so persisted collections
//! identify entries by the content that makes them the same event instead.

use super::ScheduleItem;
use std::fmt;

const SEPARATOR: char = '|';

/// Identity key of a schedule entry: `detailUrl|dateKey|type|artist|detail`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleKey(String);

impl ScheduleKey {
    pub fn of(item: &ScheduleItem) -> Self {
        let parts = [
            item.detail_url.as_deref().unwrap_or(""),
            item.date_key.as_str(),
            item.schedule_type.label(),
            item.artist.as_str(),
            item.detail.as_str(),
        ];
        let mut out = String::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(part);
        }
        ScheduleKey(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`ScheduleKey::of`].
pub fn key(item: &ScheduleItem) -> ScheduleKey {
    ScheduleKey::of(item)
}
