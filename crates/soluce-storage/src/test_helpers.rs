//! Store stubs for degradation tests.

use soluce_core::StorageError;

use crate::kv::{KeyValueStore, StorageResult};

/// A store where every call fails, like storage disabled by the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

fn unavailable<T>() -> StorageResult<T> {
    Err(StorageError::Unavailable {
        reason: "storage disabled".to_string(),
    })
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        unavailable()
    }
    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        unavailable()
    }
    fn remove(&self, _key: &str) -> StorageResult<()> {
        unavailable()
    }
    fn keys_with_prefix(&self, _prefix: &str) -> StorageResult<Vec<String>> {
        unavailable()
    }
}
