use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Slot store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable key-value slots on top of SQLite
///
/// A slot is a single string value under a fixed key. Writes replace the
/// whole value; there is no merging and no versioning. Two processes
/// writing the same slot resolve as last writer wins.
pub struct SlotStore {
    conn: Mutex<Connection>,
}

impl SlotStore {
    /// Open (or create) a store file, creating parent directories as needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        debug!("Opened slot store at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Store that lives only as long as this value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read a slot; `None` if it was never written
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        debug!("Slot {} read ({})", key, if value.is_some() { "hit" } else { "empty" });
        Ok(value)
    }

    /// Overwrite a slot with a new value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp()],
        )?;
        debug!("Slot {} written ({} bytes)", key, value.len());
        Ok(())
    }

    /// Unix timestamp of the last write to a slot
    pub fn updated_at(&self, key: &str) -> Result<Option<i64>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let ts = conn
            .query_row(
                "SELECT updated_at FROM slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_slot_is_none() {
        let store = SlotStore::open_in_memory().unwrap();
        assert_eq!(store.get("nothing").unwrap(), None);
        assert_eq!(store.updated_at("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = SlotStore::open_in_memory().unwrap();
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        assert!(store.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn test_updated_at_tracks_last_write() {
        let store = SlotStore::open_in_memory().unwrap();
        let before = chrono::Utc::now().timestamp();
        store.set("k", "v").unwrap();

        let ts = store.updated_at("k").unwrap().unwrap();
        assert!(ts >= before);
        assert!(ts <= chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("slots.db");

        {
            let store = SlotStore::open(&path).unwrap();
            store.set("bookfinder_favorites", "[]").unwrap();
        }

        let store = SlotStore::open(&path).unwrap();
        assert_eq!(
            store.get("bookfinder_favorites").unwrap().as_deref(),
            Some("[]")
        );
    }
}
