//! SQLite store backend
//!
//! Durable document storage in a single `records` table keyed by
//! (collection, id). Documents are stored as JSON text.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::{debug, info};

use crate::StateStore;
use crate::error::StoreError;
use crate::record::now_ms;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    collection    TEXT NOT NULL,
    id            TEXT NOT NULL,
    doc           TEXT NOT NULL,
    updated_at_ms INTEGER NOT NULL,
    PRIMARY KEY (collection, id)
)";

/// Durable store backed by a SQLite database file
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    ///
    /// Parent directories are created if missing; the schema is applied
    /// idempotently on every open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        debug!(path = %path.display(), "SqliteStore::open: called");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "Opened state store");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for SqliteStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        let doc: Option<String> = conn
            .query_row(
                "SELECT doc FROM records WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        match doc {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        debug!(%collection, %id, "SqliteStore::put: storing document");
        let text = serde_json::to_string(doc)?;
        let conn = self.conn.lock().expect("sqlite store poisoned");
        conn.execute(
            "INSERT INTO records (collection, id, doc, updated_at_ms) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (collection, id) DO UPDATE SET doc = ?3, updated_at_ms = ?4",
            params![collection, id, text, now_ms()],
        )?;
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        let affected = conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        Ok(affected > 0)
    }

    fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().expect("sqlite store poisoned");
        let mut stmt = conn.prepare("SELECT id FROM records WHERE collection = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}
