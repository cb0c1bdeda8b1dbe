//! Favorites, notes and recently viewed entries kept on the user's device.
//!
//! Every collection is a JSON array stored under a fixed key of a
//! [`KeyValueStore`]. Entries are identified by [`ScheduleKey`], never by
//! the feed id. Storage problems never reach the caller: a failed read is
//! an empty collection and a failed write is dropped, both logged.

use super::{KeyValueStore, Record};
use crate::schedule::{AnnotatedSchedule, ScheduleItem, ScheduleKey};
use chrono::{Local, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const FAVORITES_KEY: &str = "my_favorites";
pub const RECORDS_KEY: &str = "my_records";
pub const HISTORY_KEY: &str = "my_history";

pub const MAX_FAVORITES: usize = 200;
pub const MAX_RECORDS: usize = 300;
pub const MAX_HISTORY: usize = 120;

pub struct LocalStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> LocalStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {} from local store: {:#}", key, e);
                return Vec::new();
            }
        };
        let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable {} in local store: {}", key, e);
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<T>(entry) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Skipping unreadable entry #{} of {}: {}", index, key, e);
                    None
                }
            })
            .collect()
    }

    fn write_list<T: Serialize>(&self, key: &str, list: &[T]) {
        let raw = match serde_json::to_string(list) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize {}: {}", key, e);
                return;
            }
        };
        match self.kv.set(key, &raw) {
            Ok(()) => debug!("Wrote {} entries to {}", list.len(), key),
            Err(e) => warn!("Dropped write of {} to local store: {:#}", key, e),
        }
    }

    /// Returns the favorites, newest first.
    pub fn get_favorites(&self) -> Vec<ScheduleItem> {
        self.read_list(FAVORITES_KEY)
    }

    /// Adds `item` to the favorites, or removes it if an entry with the same
    /// key is already there. Returns true if the item is now a favorite.
    pub fn toggle_favorite(&self, item: &ScheduleItem) -> bool {
        let favorites = self.get_favorites();
        let key = ScheduleKey::of(item);

        if favorites.iter().any(|f| ScheduleKey::of(f) == key) {
            let next: Vec<ScheduleItem> = favorites
                .into_iter()
                .filter(|f| ScheduleKey::of(f) != key)
                .collect();
            self.write_list(FAVORITES_KEY, &next);
            false
        } else {
            let mut next = Vec::with_capacity(favorites.len() + 1);
            next.push(item.clone());
            next.extend(favorites);
            next.truncate(MAX_FAVORITES);
            self.write_list(FAVORITES_KEY, &next);
            true
        }
    }

    pub fn is_favorite(&self, item: &ScheduleItem) -> bool {
        let key = ScheduleKey::of(item);
        self.get_favorites()
            .iter()
            .any(|f| ScheduleKey::of(f) == key)
    }

    /// Returns the records, most recently added first.
    pub fn get_records(&self) -> Vec<Record> {
        self.read_list(RECORDS_KEY)
    }

    /// Attaches `note` to `item`, stamped with the current local time.
    pub fn add_record(&self, item: &ScheduleItem, note: &str) {
        self.add_record_at(item, note, Local::now().naive_local())
    }

    /// Same as [`LocalStore::add_record`] with an explicit timestamp.
    ///
    /// An existing record for the same key is replaced where it stands;
    /// otherwise the new record goes first.
    pub fn add_record_at(&self, item: &ScheduleItem, note: &str, recorded_at: NaiveDateTime) {
        let key = ScheduleKey::of(item);
        let record = Record::new(item.clone(), note, recorded_at);

        let mut updated = false;
        let mut next: Vec<Record> = self
            .get_records()
            .into_iter()
            .map(|existing| {
                if ScheduleKey::of(&existing.item) == key {
                    updated = true;
                    record.clone()
                } else {
                    existing
                }
            })
            .collect();
        if !updated {
            next.insert(0, record);
        }
        next.truncate(MAX_RECORDS);
        self.write_list(RECORDS_KEY, &next);
    }

    /// Returns the note attached to `item`, or an empty string.
    pub fn get_record_note(&self, item: &ScheduleItem) -> String {
        let key = ScheduleKey::of(item);
        self.get_records()
            .into_iter()
            .find(|r| ScheduleKey::of(&r.item) == key)
            .map(|r| r.note)
            .unwrap_or_default()
    }

    pub fn is_recorded(&self, item: &ScheduleItem) -> bool {
        let key = ScheduleKey::of(item);
        self.get_records()
            .iter()
            .any(|r| ScheduleKey::of(&r.item) == key)
    }

    /// Returns the recently viewed entries, newest first.
    pub fn get_history(&self) -> Vec<ScheduleItem> {
        self.read_list(HISTORY_KEY)
    }

    /// Moves `item` to the front of the history.
    pub fn add_to_history(&self, item: &ScheduleItem) {
        let key = ScheduleKey::of(item);
        let mut next = vec![item.clone()];
        next.extend(
            self.get_history()
                .into_iter()
                .filter(|h| ScheduleKey::of(h) != key)
                .take(MAX_HISTORY - 1),
        );
        self.write_list(HISTORY_KEY, &next);
    }

    /// Projects `items` with the favorite and recorded flags of this store.
    pub fn annotate(&self, items: &[ScheduleItem]) -> Vec<AnnotatedSchedule> {
        let favorites: HashSet<ScheduleKey> =
            self.get_favorites().iter().map(ScheduleKey::of).collect();
        let recorded: HashSet<ScheduleKey> = self
            .get_records()
            .iter()
            .map(|r| ScheduleKey::of(&r.item))
            .collect();

        items
            .iter()
            .map(|item| {
                let key = ScheduleKey::of(item);
                AnnotatedSchedule {
                    item: item.clone(),
                    is_favorite: favorites.contains(&key),
                    is_recorded: recorded.contains(&key),
                }
            })
            .collect()
    }
}
