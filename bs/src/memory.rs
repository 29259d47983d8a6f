//! In-memory store backend
//!
//! Keeps documents in a process-local map. Used by tests and by hosts that
//! do not need durability across restarts.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::debug;

use crate::StateStore;
use crate::error::StoreError;

/// Non-durable store keeping documents in a mutex-guarded map
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections
    pub fn len(&self) -> usize {
        self.inner.lock().expect("memory store poisoned").len()
    }

    /// True if no documents are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let map = self.inner.lock().expect("memory store poisoned");
        Ok(map.get(&(collection.to_string(), id.to_string())).cloned())
    }

    fn put(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        debug!(%collection, %id, "MemoryStore::put: storing document");
        let mut map = self.inner.lock().expect("memory store poisoned");
        map.insert((collection.to_string(), id.to_string()), doc.clone());
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut map = self.inner.lock().expect("memory store poisoned");
        Ok(map.remove(&(collection.to_string(), id.to_string())).is_some())
    }

    fn list_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let map = self.inner.lock().expect("memory store poisoned");
        let mut ids: Vec<String> = map
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.get("conversations", "nope").unwrap().is_none());
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        let doc = json!({"stack": [], "id": "c1"});
        store.put("conversations", "c1", &doc).unwrap();
        assert_eq!(store.get("conversations", "c1").unwrap(), Some(doc));
    }

    #[test]
    fn test_put_overwrites() {
        let store = MemoryStore::new();
        store.put("conversations", "c1", &json!({"v": 1})).unwrap();
        store.put("conversations", "c1", &json!({"v": 2})).unwrap();
        assert_eq!(store.get("conversations", "c1").unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        store.put("conversations", "c1", &json!({})).unwrap();
        assert!(store.delete("conversations", "c1").unwrap());
        assert!(!store.delete("conversations", "c1").unwrap());
        assert!(store.get("conversations", "c1").unwrap().is_none());
    }

    #[test]
    fn test_list_ids_is_per_collection() {
        let store = MemoryStore::new();
        store.put("conversations", "b", &json!({})).unwrap();
        store.put("conversations", "a", &json!({})).unwrap();
        store.put("other", "x", &json!({})).unwrap();
        assert_eq!(store.list_ids("conversations").unwrap(), vec!["a", "b"]);
    }
}
