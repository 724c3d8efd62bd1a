//! Local persistent key-value store.
//!
//! The store is the device-local home of the cart and wishlist. It is a plain
//! byte store: callers own their keys and their encoding. Two backends ship:
//!
//! - [`FileStore`] - one file per key inside a data directory
//! - [`MemoryStore`] - process memory, used as the fallback when the data
//!   directory is unusable and in tests
//!
//! Both the cart and the wishlist serialize to JSON under disjoint keys
//! (see [`keys`]) and never touch each other's entries.

mod file;
mod memory;
mod write_through;

pub use file::FileStore;
pub use memory::MemoryStore;
pub(crate) use write_through::WriteThrough;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Store keys owned by the aggregates.
pub mod keys {
    /// JSON array of cart line items.
    pub const CART: &str = "cart";

    /// JSON array of wishlist entries.
    pub const WISHLIST: &str = "wishlist";
}

/// The store could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is switched off or otherwise unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the value would exceed the store's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },

    /// Keys are restricted to ASCII letters, digits, `-` and `_`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The value could not be encoded.
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A synchronous byte store scoped to one device/profile.
///
/// Implementations must be safe to share between the aggregates of a session.
pub trait LocalStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Outcome of reading a JSON value from the store.
#[derive(Debug)]
pub enum Loaded<T> {
    Value(T),
    Missing,
    Unavailable(StorageError),
    /// Bytes were present but are not valid JSON for `T`.
    Corrupt(serde_json::Error),
}

/// Read and decode the JSON value stored under `key`.
pub fn load_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Loaded<T> {
    match store.get(key) {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => Loaded::Value(value),
            Err(e) => Loaded::Corrupt(e),
        },
        Ok(None) => Loaded::Missing,
        Err(e) => Loaded::Unavailable(e),
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns [`StorageError`] if encoding or writing fails.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes)
}

/// Check a key against the allowed character set.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(keys::CART).is_ok());
        assert!(validate_key("user_prefs-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a b").is_err());
    }

    #[test]
    fn test_load_json_outcomes() {
        let store = MemoryStore::new();
        assert!(matches!(load_json::<Vec<u32>>(&store, "k"), Loaded::Missing));

        save_json(&store, "k", &vec![1_u32, 2, 3]).unwrap();
        match load_json::<Vec<u32>>(&store, "k") {
            Loaded::Value(v) => assert_eq!(v, vec![1, 2, 3]),
            other => panic!("unexpected {other:?}"),
        }

        store.set("k", b"{not json").unwrap();
        assert!(matches!(load_json::<Vec<u32>>(&store, "k"), Loaded::Corrupt(_)));

        let disabled = MemoryStore::disabled();
        assert!(matches!(
            load_json::<Vec<u32>>(&disabled, "k"),
            Loaded::Unavailable(StorageError::Unavailable(_))
        ));
    }
}
