//! # soluce-storage
//!
//! Key-value persistence for the gating engine. A `KeyValueStore` backend
//! (SQLite or in-memory) sits behind `GuardedStore`, which degrades to
//! "no record" when storage is disabled or failing. Typed repositories
//! read and write through on every call; nothing is cached.

pub mod guarded;
pub mod keys;
pub mod kv;
pub mod memory;
pub mod records;
pub mod repository;
pub mod sqlite;
pub mod test_helpers;

pub use guarded::GuardedStore;
pub use kv::{KeyValueStore, StorageResult};
pub use memory::MemoryStore;
pub use records::{LicenseData, LicenseRecord, MonthlyUsage, PurchaseToken, PurchaseTokenStorage};
pub use repository::{
    LicenseRecordRepository, PreferenceStore, PurchaseTokenRepository, Theme, VendorRepository,
};
pub use sqlite::SqliteStore;

use std::sync::Arc;

use soluce_core::config::StorageConfig;

/// Open the backend described by `config`: SQLite at `db_path`, or memory.
pub fn open_store(config: &StorageConfig) -> StorageResult<Arc<dyn KeyValueStore>> {
    match config.db_path.as_deref() {
        Some(path) if !config.is_in_memory() => {
            Ok(Arc::new(SqliteStore::open(std::path::Path::new(path))?))
        }
        _ => Ok(Arc::new(MemoryStore::new())),
    }
}
