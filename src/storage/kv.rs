/*!
 * String key-value stores.
 */

use log::debug;
use parking_lot::RwLock;
use rusqlite::{OptionalExtension, params};
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;

use super::connection::DatabaseConnection;
use crate::errors::StorageError;

/// String-keyed, string-valued storage.
///
/// Every call is synchronous and either fully applied or not applied at all.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Key-value store persisted in a SQLite file
#[derive(Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wrap an open database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open (or create) the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self::new(DatabaseConnection::new(path)?))
    }

    /// Open (or create) the store in the platform data directory
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(DatabaseConnection::new_default()?))
    }
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.db.path())
            .finish()
    }
}

fn backend_error(error: anyhow::Error) -> StorageError {
    StorageError::Backend(error.to_string())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.db
            .execute(|conn| {
                let value: Option<String> = conn
                    .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(value)
            })
            .map_err(backend_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db
            .execute(|conn| {
                conn.execute(
                    r#"
                    INSERT INTO kv_store (key, value, updated_at)
                    VALUES (?1, ?2, datetime('now'))
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                    "#,
                    params![key, value],
                )?;
                Ok(())
            })
            .map_err(backend_error)?;

        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db
            .execute(|conn| {
                conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
                Ok(())
            })
            .map_err(backend_error)
    }
}

/// In-memory key-value store.
///
/// An optional quota caps the total size (keys plus values, in bytes) the
/// store may hold, like the capacity limit of browser local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes beyond `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Total bytes currently held
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();

        if let Some(quota) = self.quota {
            let current: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = current + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
