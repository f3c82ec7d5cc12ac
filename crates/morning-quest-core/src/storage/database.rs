//! SQLite-backed routine storage.
//!
//! Provides persistent storage for:
//! - One JSON routine snapshot per hero, keyed `hero_<name>_<birthday>`
//! - The hero who was logged in last
//!
//! Both live in a single key-value table.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::snapshot::{RoutineSnapshot, RoutineStore};
use crate::error::{Result, StorageError};
use crate::routine::{Identity, IdentityKey};

/// kv key holding the last logged-in identity.
pub const CURRENT_HERO_KEY: &str = "current_hero_user";

const DB_FILE: &str = "morning-quest.db";

/// SQLite database for routine snapshots.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `<data_dir>/morning-quest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a value from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl RoutineStore for SqliteStore {
    fn load(&self, key: &IdentityKey) -> Result<Option<RoutineSnapshot>> {
        match self.kv_get(key.as_str())? {
            Some(json) => Ok(Some(RoutineSnapshot::decode(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &IdentityKey, snapshot: &RoutineSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.kv_set(key.as_str(), &json)?;
        Ok(())
    }

    fn current_identity(&self) -> Result<Option<Identity>> {
        match self.kv_get(CURRENT_HERO_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set_current_identity(&self, identity: Option<&Identity>) -> Result<()> {
        match identity {
            Some(identity) => self.kv_set(CURRENT_HERO_KEY, &serde_json::to_string(identity)?)?,
            None => self.kv_delete(CURRENT_HERO_KEY)?,
        }
        Ok(())
    }
}
