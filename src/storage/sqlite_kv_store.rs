use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned, Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::KeyValueStore;

/// V 0
const KV_ENTRY_TABLE_V_0: Table = Table {
    name: "kv_entry",
    columns: &[
        sqlite_column!(
            "key",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true
        ),
        sqlite_column!("value", &SqlType::Text, non_null = true),
        sqlite_column!(
            "updated",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
};

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[KV_ENTRY_TABLE_V_0],
    migration: None,
}];

/// SQLite backed [`KeyValueStore`], the durable local store of the CLI.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = if db_path.exists() {
            info!("Opening local store at {:?}", db_path);
            let conn = Connection::open(db_path)
                .with_context(|| format!("Failed to open local store {:?}", db_path))?;
            open_versioned(&conn, VERSIONED_SCHEMAS)
                .with_context(|| format!("Invalid local store {:?}", db_path))?;
            conn
        } else {
            info!("Creating local store at {:?}", db_path);
            let conn = Connection::open(db_path)
                .with_context(|| format!("Failed to create local store {:?}", db_path))?;
            VERSIONED_SCHEMAS
                .last()
                .context("No schema defined")?
                .create(&conn)?;
            conn
        };

        Ok(SqliteKeyValueStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Local store connection lock poisoned"))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                &format!("SELECT value FROM {} WHERE key = ?1", KV_ENTRY_TABLE_V_0.name),
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated = {}",
                KV_ENTRY_TABLE_V_0.name, DEFAULT_TIMESTAMP
            ),
            params![key, value],
        )?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!("DELETE FROM {} WHERE key = ?1", KV_ENTRY_TABLE_V_0.name),
            params![key],
        )?;
        Ok(())
    }
}
