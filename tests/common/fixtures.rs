#![allow(dead_code)]

use super::constants::*;
use comeback_calendar::feed::fallback_schedules;
use comeback_calendar::storage::{InMemoryKeyValueStore, LocalStore, SqliteKeyValueStore};
use comeback_calendar::{ScheduleItem, ScheduleType};
use tempfile::TempDir;

/// The built-in sample schedules plus a couple of entries that exercise
/// the fansign platform rule and cross-month grids.
pub fn sample_schedules() -> Vec<ScheduleItem> {
    let mut schedules = fallback_schedules();
    schedules.push(
        ScheduleItem::new(
            SEVENTEEN_ID,
            "SEVENTEEN",
            ScheduleType::Concert,
            "2026-03-01",
            "RIGHT HERE World Tour · Incheon",
        )
        .with_detail_url("https://example.com/svt"),
    );
    schedules.push(
        ScheduleItem::new(
            AESPA_FANSIGN_ID,
            "aespa",
            ScheduleType::Fansign,
            BUSY_DAY_DATE,
            "Offline fansign · Seoul",
        )
        .with_ticket_platform("Weverse"),
    );
    schedules.push(
        ScheduleItem::new(
            NMIXX_FANSIGN_ID,
            "NMIXX",
            ScheduleType::Fansign,
            NMIXX_FANSIGN_DATE,
            "Video call fansign",
        )
        .with_ticket_platform("Ktown4u"),
    );
    schedules
}

pub fn memory_store() -> LocalStore<InMemoryKeyValueStore> {
    LocalStore::new(InMemoryKeyValueStore::new())
}

/// A SQLite-backed store whose file lives as long as the returned value.
pub struct TestStore {
    pub dir: TempDir,
    pub store: LocalStore<SqliteKeyValueStore>,
}

impl TestStore {
    pub fn db_path(&self) -> std::path::PathBuf {
        self.dir.path().join("calendar.db")
    }

    /// Opens a second store on the same file.
    pub fn reopen(&self) -> LocalStore<SqliteKeyValueStore> {
        LocalStore::new(SqliteKeyValueStore::new(self.db_path()).unwrap())
    }
}

pub fn sqlite_store() -> TestStore {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::new(SqliteKeyValueStore::new(dir.path().join("calendar.db")).unwrap());
    TestStore { dir, store }
}
