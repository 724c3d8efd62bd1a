//! In-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::{LocalStore, StorageError, validate_key};

/// Store backed by a `HashMap`, with an optional byte quota.
///
/// The quota counts value bytes across all keys. Availability can be toggled
/// to simulate storage being switched off and back on.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    quota: Option<usize>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Unlimited, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: None,
            available: AtomicBool::new(true),
        }
    }

    /// Store that refuses writes beyond `bytes` of total value size.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Store that rejects every operation until made available.
    #[must_use]
    pub fn disabled() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("storage is disabled".to_string()))
        }
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.check_available()?;
        validate_key(key)?;
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.check_available()?;
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        validate_key(key)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("cart", b"[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some(&b"[]"[..]));

        store.remove("cart").unwrap();
        assert!(store.get("cart").unwrap().is_none());
        store.remove("cart").unwrap();
    }

    #[test]
    fn test_quota_counts_other_keys() {
        let store = MemoryStore::with_quota(10);
        store.set("a", b"123456").unwrap();
        // Replacing a key does not double count it.
        store.set("a", b"1234567").unwrap();

        let err = store.set("b", b"1234").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 11, limit: 10 }));
    }

    #[test]
    fn test_toggle_availability() {
        let store = MemoryStore::disabled();
        assert!(store.set("cart", b"[]").is_err());

        store.set_available(true);
        assert!(store.set("cart", b"[]").is_ok());
    }
}
