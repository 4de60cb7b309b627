//! `GuardedStore` — availability-aware facade over any `KeyValueStore`.
//!
//! Storage can be missing or throwing (private browsing, a locked or
//! corrupted database). Reads degrade to "no record" and writes report
//! `false` instead of propagating. The `try_*` methods and `remove` surface
//! the error, for callers that must not mistake a broken record for none.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use soluce_core::StorageError;

use crate::keys;
use crate::kv::{KeyValueStore, StorageResult};

#[derive(Clone)]
pub struct GuardedStore {
    inner: Arc<dyn KeyValueStore>,
}

impl GuardedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Capability probe: write, read back, then remove a scratch key.
    pub fn is_available(&self) -> bool {
        let probe = || -> StorageResult<bool> {
            self.inner.set(keys::PROBE_KEY, keys::PROBE_KEY)?;
            let read = self.inner.get(keys::PROBE_KEY)?;
            self.inner.remove(keys::PROBE_KEY)?;
            Ok(read.as_deref() == Some(keys::PROBE_KEY))
        };
        match probe() {
            Ok(ok) => ok,
            Err(e) => {
                debug!(error = %e, "Storage probe failed");
                false
            }
        }
    }

    /// Raw value, or `None` when absent or unreadable.
    pub fn read(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Storage read failed, treating as absent");
                None
            }
        }
    }

    /// Deserialized value. Malformed JSON is treated the same as absent.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_read_json(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Stored value unreadable, ignoring");
                None
            }
        }
    }

    /// Deserialized value. `Ok(None)` only when the key is absent; a failed
    /// read or a value that does not decode is an error.
    pub fn try_read_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        let Some(raw) = self.inner.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// Write, surfacing the error.
    pub fn try_write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.set(key, value)
    }

    /// Serialize and write, surfacing the error.
    pub fn try_write_json<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.try_write(key, &raw)
    }

    /// Write. Returns whether the value was persisted.
    pub fn write(&self, key: &str, value: &str) -> bool {
        match self.try_write(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Storage write failed");
                false
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match self.try_write_json(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Storage write failed");
                false
            }
        }
    }

    /// Remove a key. Errors are surfaced.
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }

    /// Keys under `prefix`; empty when unreadable.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        match self.inner.keys_with_prefix(prefix) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix, error = %e, "Storage scan failed");
                Vec::new()
            }
        }
    }

    /// Remove every key under `prefix`. `false` when storage is unavailable
    /// or any removal fails.
    pub fn remove_prefix(&self, prefix: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        let keys = match self.inner.keys_with_prefix(prefix) {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix, error = %e, "Storage scan failed");
                return false;
            }
        };
        let mut ok = true;
        for key in keys {
            if let Err(e) = self.inner.remove(&key) {
                warn!(key = %key, error = %e, "Storage remove failed");
                ok = false;
            }
        }
        ok
    }
}

impl std::fmt::Debug for GuardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::test_helpers::FailingStore;

    fn memory() -> GuardedStore {
        GuardedStore::new(Arc::new(MemoryStore::new()))
    }

    fn failing() -> GuardedStore {
        GuardedStore::new(Arc::new(FailingStore))
    }

    #[test]
    fn test_probe_leaves_no_trace() {
        let inner = Arc::new(MemoryStore::new());
        let store = GuardedStore::new(inner.clone());
        assert!(store.is_available());
        assert!(inner.is_empty());
    }

    #[test]
    fn test_failing_store_degrades() {
        let store = failing();
        assert!(!store.is_available());
        assert_eq!(store.read("vendors"), None);
        assert!(!store.write("vendors", "[]"));
        assert!(store.keys_with_prefix("sbom_usage_").is_empty());
        assert!(!store.remove_prefix("sbom_usage_"));
        assert!(store.remove("license_record").is_err());
    }

    #[test]
    fn test_malformed_json_reads_as_absent() {
        let store = memory();
        assert!(store.write("purchase_tokens", "{not json"));
        assert_eq!(store.read_json::<serde_json::Value>("purchase_tokens"), None);
    }

    #[test]
    fn test_try_read_json_separates_absent_from_unreadable() {
        let store = memory();
        assert!(store.try_read_json::<Vec<u8>>("vendors").unwrap().is_none());

        store.write("vendors", "[1, 2");
        let err = store.try_read_json::<Vec<u8>>("vendors").unwrap_err();
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "vendors"));

        let err = failing().try_read_json::<Vec<u8>>("vendors").unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
    }

    #[test]
    fn test_remove_prefix_only_touches_prefix() {
        let store = memory();
        store.write("sbom_usage_2026-09", "{}");
        store.write("sbom_usage_2026-10", "{}");
        store.write("theme", "dark");
        assert!(store.remove_prefix("sbom_usage_"));
        assert!(store.keys_with_prefix("sbom_usage_").is_empty());
        assert_eq!(store.read("theme").as_deref(), Some("dark"));
    }
}
