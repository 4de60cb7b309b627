//! The single license activation record.

use tracing::warn;

use crate::guarded::GuardedStore;
use crate::keys;
use crate::kv::StorageResult;
use crate::records::LicenseRecord;

#[derive(Debug, Clone)]
pub struct LicenseRecordRepository {
    store: GuardedStore,
}

impl LicenseRecordRepository {
    pub fn new(store: GuardedStore) -> Self {
        Self { store }
    }

    /// Stored record, whether or not its seal is intact.
    pub fn load(&self) -> Option<LicenseRecord> {
        self.store.read_json(keys::LICENSE_RECORD)
    }

    /// Stored record only if its seal verifies.
    pub fn load_verified(&self) -> Option<LicenseRecord> {
        let record = self.load()?;
        if record.verify_seal() {
            Some(record)
        } else {
            warn!("License record seal mismatch, ignoring record");
            None
        }
    }

    /// Overwrite any prior record.
    pub fn save(&self, record: &LicenseRecord) -> StorageResult<()> {
        self.store.try_write_json(keys::LICENSE_RECORD, record)
    }

    pub fn remove(&self) -> StorageResult<()> {
        self.store.remove(keys::LICENSE_RECORD)
    }
}
