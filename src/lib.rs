//! Comeback calendar core.
//!
//! Schedule search ranking, month grid construction and local persistence of
//! favorites, records and view history. The binary in `main.rs` is a thin
//! command line front end over these modules.

pub mod calendar;
pub mod config;
pub mod debounce;
pub mod feed;
pub mod schedule;
pub mod search;
pub mod sqlite_persistence;
pub mod storage;

// Re-export commonly used types for convenience
pub use calendar::{build_calendar, CalendarDay, CalendarFilter};
pub use feed::FeedClient;
pub use schedule::{key, AnnotatedSchedule, ScheduleItem, ScheduleKey, ScheduleType};
pub use search::{search, SearchResult};
pub use storage::{InMemoryKeyValueStore, KeyValueStore, LocalStore, Record, SqliteKeyValueStore};
