use super::KeyValueStore;
use crate::errors::StorageError;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory [`KeyValueStore`] for native hosts and tests.
///
/// An optional entry limit emulates a full browser quota: writes that would
/// add a key beyond the limit are rejected, updates to existing keys are not.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    capacity_limit: Option<usize>,
}

impl MemoryStore {
    /// Creates an unbounded empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that holds at most `max_entries` keys.
    #[must_use]
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            entries: RefCell::default(),
            capacity_limit: Some(max_entries),
        }
    }

    /// Whether no key is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(limit) = self.capacity_limit {
            if !entries.contains_key(key) && entries.len() >= limit {
                return Err(StorageError::write_rejected(key, "quota exceeded"));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn capacity_limit_rejects_new_keys_only() {
        let store = MemoryStore::with_capacity_limit(1);
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();

        let err = store.set("b", "1").unwrap_err();
        assert_eq!(err, StorageError::write_rejected("b", "quota exceeded"));
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));
        assert_eq!(store.get("b").unwrap(), None);
    }
}
