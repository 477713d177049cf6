//! Durable client-side key/value storage
//!
//! A SQLite table with browser-storage semantics: string keys, string
//! values, a byte quota, and writes that fail instead of exceeding it.
//! The persisted airport cache and the search history both live here.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::ttl::{CacheBackend, CacheEntry, IndexEntry};
use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

type Result<T> = std::result::Result<T, CacheError>;

/// SQLite-backed key/value storage
pub struct LocalStorage {
    conn: Mutex<Connection>,
    quota_bytes: Option<usize>,
}

impl LocalStorage {
    /// Storage directory (~/.cache/airport-search on Linux)
    pub fn storage_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("airport-search"))
    }

    /// Open storage in a specific directory
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| CacheError::Io(format!("Failed to create storage dir: {}", e)))?;

        let db_path = dir.join("storage.db");
        let conn = Connection::open(&db_path)?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Storage schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            std::fs::remove_file(&db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove storage DB: {}", e)))?;
            return Self::open_at(dir);
        }

        Self::init(conn)
    }

    /// Throwaway in-memory storage
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
            quota_bytes: None,
        })
    }

    /// Limit total stored bytes (keys plus values)
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Io("Storage lock poisoned".to_string()))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or replace `key`. Fails with `QuotaExceeded` without writing.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;

        if let Some(quota) = self.quota_bytes {
            let others: i64 = conn.query_row(
                "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0)
                 FROM storage WHERE key != ?1",
                [key],
                |r| r.get(0),
            )?;
            let needed = others as usize + key.len() + value.len();
            if needed > quota {
                return Err(CacheError::QuotaExceeded { needed, quota });
            }
        }

        conn.execute(
            "INSERT OR REPLACE INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM storage WHERE key = ?1", [key])?;
        Ok(deleted > 0)
    }

    /// Keys starting with `prefix`, in write order
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT key FROM storage WHERE substr(key, 1, length(?1)) = ?1 ORDER BY rowid",
        )?;
        let keys = stmt
            .query_map([prefix], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Delete every key starting with `prefix`
    pub fn remove_prefix(&self, prefix: &str) -> Result<usize> {
        let deleted = self.conn()?.execute(
            "DELETE FROM storage WHERE substr(key, 1, length(?1)) = ?1",
            [prefix],
        )?;
        Ok(deleted)
    }

    /// Statistics for the keys under `prefix`
    pub fn stats(&self, prefix: &str) -> Result<StorageStats> {
        let conn = self.conn()?;
        let (entries, total_bytes, oldest, newest): (i64, i64, Option<i64>, Option<i64>) = conn
            .query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(length(CAST(value AS BLOB))), 0),
                        MIN(updated_at),
                        MAX(updated_at)
                 FROM storage WHERE substr(key, 1, length(?1)) = ?1",
                [prefix],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )?;

        Ok(StorageStats {
            entries: entries as usize,
            total_size_bytes: total_bytes as usize,
            oldest_entry: oldest,
            newest_entry: newest,
        })
    }
}

/// Statistics about a storage namespace
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    pub entries: usize,
    pub total_size_bytes: usize,
    /// Milliseconds since epoch
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
}

/// Just the timestamp of a serialized [`CacheEntry`]
#[derive(Deserialize)]
struct EntryStamp {
    timestamp: i64,
}

/// Cache backend over a key prefix of [`LocalStorage`].
///
/// Entries are stored as JSON `{ "data": ..., "timestamp": ... }`.
pub struct PersistentBackend<T> {
    storage: Arc<LocalStorage>,
    prefix: String,
    _data: PhantomData<fn() -> T>,
}

impl<T> PersistentBackend<T> {
    pub fn new(storage: Arc<LocalStorage>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
            _data: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> CacheBackend<T> for PersistentBackend<T> {
    fn read(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
        match self.storage.get_item(key)? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| CacheError::Corrupt(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn write(&mut self, key: &str, entry: CacheEntry<T>) -> Result<()> {
        let json = serde_json::to_string(&entry)?;
        self.storage.set_item(key, &json)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key)?;
        Ok(())
    }

    fn index(&self) -> Result<Vec<IndexEntry>> {
        let keys = self.storage.keys(&self.prefix)?;
        let mut index = Vec::with_capacity(keys.len());
        for key in keys {
            let stored_at = self
                .storage
                .get_item(&key)?
                .and_then(|json| serde_json::from_str::<EntryStamp>(&json).ok())
                .map(|stamp| stamp.timestamp);
            index.push(IndexEntry { key, stored_at });
        }
        Ok(index)
    }

    fn clear(&mut self) -> Result<usize> {
        self.storage.remove_prefix(&self.prefix)
    }
}
