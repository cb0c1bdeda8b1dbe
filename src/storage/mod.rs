mod kv_store;
mod local_store;
mod models;
mod sqlite_kv_store;

pub use kv_store::{InMemoryKeyValueStore, KeyValueStore};
pub use local_store::{
    LocalStore, FAVORITES_KEY, HISTORY_KEY, MAX_FAVORITES, MAX_HISTORY, MAX_RECORDS, RECORDS_KEY,
};
pub use models::{Record, RECORDED_AT_FORMAT};
pub use sqlite_kv_store::SqliteKeyValueStore;
