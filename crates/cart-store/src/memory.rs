//! In-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{KeyValueStore, StoreError};

/// A process-local store backed by a `HashMap`.
///
/// Clones share the same map, so a test can hand one clone to the cart
/// and keep another to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicU64,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.inner.entries.lock() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.inner
            .entries
            .lock()
            .map_err(|e| StoreError::StoreError(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::StoreError(format!("write to {} rejected", key)));
        }
        self.entries()?.insert(key.to_string(), value.to_string());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries()?.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
        assert!(!store.exists("missing").unwrap());
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let observer = store.clone();
        store.set("k", "v").unwrap();
        assert!(observer.exists("k").unwrap());
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::with_entry("k", "v");
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_failed_writes_leave_value() {
        let store = MemoryStore::with_entry("k", "old");
        store.fail_writes(true);
        assert!(store.set("k", "new").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        store.set_json("nums", &vec![3, 1, 2]).unwrap();
        let nums: Option<Vec<i32>> = store.get_json("nums").unwrap();
        assert_eq!(nums, Some(vec![3, 1, 2]));

        store.set("bad", "not json").unwrap();
        let bad: Result<Option<Vec<i32>>, _> = store.get_json("bad");
        assert!(matches!(bad, Err(StoreError::SerializeError(_))));
    }
}
