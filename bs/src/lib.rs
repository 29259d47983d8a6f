//! BotState - persistent conversation-state storage
//!
//! Stores opaque JSON documents keyed by (collection, id). The engine
//! persists one document per conversation; the storage technology behind
//! it is deliberately swappable:
//!
//! - [`MemoryStore`] - process-local, non-durable (tests, ephemeral hosts)
//! - [`SqliteStore`] - durable single-file SQLite database
//!
//! Typed access goes through the [`Record`] trait plus the
//! [`StateStoreExt`] helpers, which round-trip records as JSON.
//!
//! Stores are synchronous and internally locked; callers that need
//! serialized turn processing wrap a store in an actor (one writer at a
//! time per conversation is the caller's contract, not the store's).

mod error;
mod memory;
mod record;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{Record, now_ms};
pub use sqlite::SqliteStore;

use serde_json::Value;

/// Document storage keyed by (collection, id)
pub trait StateStore: Send + Sync {
    /// Fetch a document, or None if absent
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or replace a document
    fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError>;

    /// Remove a document; returns true if one existed
    fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// All document ids in a collection, sorted
    fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

/// Typed record helpers layered over any [`StateStore`]
pub trait StateStoreExt: StateStore {
    /// Fetch and deserialize a record by id
    fn get_record<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        match self.get(R::collection(), id)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a record under its own id
    fn put_record<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let doc = serde_json::to_value(record)?;
        self.put(R::collection(), &record.id(), &doc)
    }

    /// Remove a record by id; returns true if one existed
    fn delete_record<R: Record>(&self, id: &str) -> Result<bool, StoreError> {
        self.delete(R::collection(), id)
    }
}

impl<S: StateStore + ?Sized> StateStoreExt for S {}
