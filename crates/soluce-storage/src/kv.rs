//! The durable string map every record lives in.
//!
//! Mirrors browser local storage: string keys, string (JSON) values, no
//! transactions across keys. Works for both SQLite (desktop) and the
//! in-memory store (tests, ephemeral sessions).

use std::sync::Arc;

use soluce_core::StorageError;

pub type StorageResult<T> = Result<T, StorageError>;

/// Abstraction over durable key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// All keys starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

// ── Arc<T> blanket impl ──

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }
}
