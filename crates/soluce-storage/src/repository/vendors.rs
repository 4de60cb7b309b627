//! Vendor and assessment collections, each stored as one JSON array.

use chrono::{DateTime, Utc};
use tracing::debug;

use soluce_core::models::{risk_score, Assessment, Vendor};

use crate::guarded::GuardedStore;
use crate::keys;
use crate::kv::StorageResult;

#[derive(Debug, Clone)]
pub struct VendorRepository {
    store: GuardedStore,
}

impl VendorRepository {
    pub fn new(store: GuardedStore) -> Self {
        Self { store }
    }

    /// All vendors. An absent collection is empty; one that cannot be read
    /// or decoded is an error, so no caller counts or rewrites it as empty.
    pub fn vendors(&self) -> StorageResult<Vec<Vendor>> {
        Ok(self.store.try_read_json(keys::VENDORS)?.unwrap_or_default())
    }

    pub fn assessments(&self) -> StorageResult<Vec<Assessment>> {
        Ok(self.store.try_read_json(keys::ASSESSMENTS)?.unwrap_or_default())
    }

    pub fn vendor_count(&self) -> StorageResult<u64> {
        Ok(self.vendors()?.len() as u64)
    }

    pub fn assessment_count(&self) -> StorageResult<u64> {
        Ok(self.assessments()?.len() as u64)
    }

    pub fn get_vendor(&self, id: &str) -> StorageResult<Option<Vendor>> {
        Ok(self.vendors()?.into_iter().find(|v| v.id == id))
    }

    pub fn assessments_for(&self, vendor_id: &str) -> StorageResult<Vec<Assessment>> {
        Ok(self
            .assessments()?
            .into_iter()
            .filter(|a| a.vendor_id == vendor_id)
            .collect())
    }

    pub fn insert_vendor(&self, vendor: &Vendor) -> StorageResult<()> {
        let mut vendors = self.vendors()?;
        vendors.push(vendor.clone());
        self.store.try_write_json(keys::VENDORS, &vendors)
    }

    /// Replace the vendor with the same id. `false` when not found.
    pub fn update_vendor(&self, vendor: &Vendor) -> StorageResult<bool> {
        let mut vendors = self.vendors()?;
        let Some(slot) = vendors.iter_mut().find(|v| v.id == vendor.id) else {
            return Ok(false);
        };
        *slot = vendor.clone();
        self.store.try_write_json(keys::VENDORS, &vendors)?;
        Ok(true)
    }

    /// Remove a vendor and all of its assessments.
    pub fn delete_vendor(&self, id: &str) -> StorageResult<bool> {
        let mut vendors = self.vendors()?;
        let mut assessments = self.assessments()?;
        let before = vendors.len();
        vendors.retain(|v| v.id != id);
        if vendors.len() == before {
            return Ok(false);
        }
        self.store.try_write_json(keys::VENDORS, &vendors)?;

        assessments.retain(|a| a.vendor_id != id);
        self.store.try_write_json(keys::ASSESSMENTS, &assessments)?;
        Ok(true)
    }

    pub fn insert_assessment(&self, assessment: &Assessment) -> StorageResult<()> {
        let mut assessments = self.assessments()?;
        assessments.push(assessment.clone());
        self.store.try_write_json(keys::ASSESSMENTS, &assessments)
    }

    pub fn delete_assessment(&self, id: &str) -> StorageResult<bool> {
        let mut assessments = self.assessments()?;
        let before = assessments.len();
        assessments.retain(|a| a.id != id);
        if assessments.len() == before {
            return Ok(false);
        }
        self.store.try_write_json(keys::ASSESSMENTS, &assessments)?;
        Ok(true)
    }

    /// Stamp `last_assessment` and recompute the risk score.
    /// Returns the updated vendor, or `None` if it no longer exists.
    pub fn touch_last_assessment(
        &self,
        vendor_id: &str,
        assessed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<Vendor>> {
        let Some(mut vendor) = self.get_vendor(vendor_id)? else {
            debug!(vendor_id, "Assessed vendor no longer exists");
            return Ok(None);
        };
        vendor.last_assessment = Some(assessed_at);
        vendor.risk_score = risk_score(&vendor, now);
        self.update_vendor(&vendor)?;
        Ok(Some(vendor))
    }

    /// Drop both collections, readable or not.
    pub fn clear_all(&self) -> StorageResult<()> {
        self.store.remove(keys::VENDORS)?;
        self.store.remove(keys::ASSESSMENTS)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use soluce_core::models::{NewAssessment, NewVendor, VendorCategory};
    use soluce_core::TemplateId;

    use super::*;
    use crate::memory::MemoryStore;

    fn repo() -> VendorRepository {
        VendorRepository::new(GuardedStore::new(Arc::new(MemoryStore::new())))
    }

    fn vendor(name: &str) -> Vendor {
        Vendor::from_new(
            NewVendor {
                name: name.into(),
                category: VendorCategory::Strategic,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn assessment(vendor_id: &str) -> Assessment {
        Assessment::from_new(
            NewAssessment {
                vendor_id: vendor_id.into(),
                template_id: TemplateId::NistBasic,
                category_scores: TemplateId::NistBasic.initial_scores(),
                answers: serde_json::Value::Null,
                notes: String::new(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_delete_vendor_cascades() {
        let repo = repo();
        let a = vendor("A");
        let b = vendor("B");
        repo.insert_vendor(&a).unwrap();
        repo.insert_vendor(&b).unwrap();
        repo.insert_assessment(&assessment(&a.id)).unwrap();
        repo.insert_assessment(&assessment(&b.id)).unwrap();

        assert!(repo.delete_vendor(&a.id).unwrap());
        assert_eq!(repo.vendor_count().unwrap(), 1);
        assert_eq!(repo.assessment_count().unwrap(), 1);
        assert!(repo.assessments_for(&a.id).unwrap().is_empty());
        assert!(!repo.delete_vendor(&a.id).unwrap());
    }

    #[test]
    fn test_touch_lowers_risk_for_recent_assessment() {
        let repo = repo();
        let v = vendor("A");
        repo.insert_vendor(&v).unwrap();
        let now = Utc::now();

        let touched = repo.touch_last_assessment(&v.id, now, now).unwrap().unwrap();
        assert_eq!(touched.last_assessment, Some(now));
        assert!(touched.risk_score < v.risk_score);
        assert_eq!(repo.get_vendor(&v.id).unwrap().unwrap().risk_score, touched.risk_score);
    }

    #[test]
    fn test_touch_missing_vendor() {
        let now = Utc::now();
        assert!(repo().touch_last_assessment("vendor-x", now, now).unwrap().is_none());
    }

    #[test]
    fn test_clear_all() {
        let repo = repo();
        let v = vendor("A");
        repo.insert_vendor(&v).unwrap();
        repo.insert_assessment(&assessment(&v.id)).unwrap();
        repo.clear_all().unwrap();
        assert!(repo.vendors().unwrap().is_empty());
        assert!(repo.assessments().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_never_overwritten() {
        let store = GuardedStore::new(Arc::new(MemoryStore::new()));
        let repo = VendorRepository::new(store.clone());
        let corrupt = r#"[{"id":"vendor-1","name":"V0","category":"critical","createdAt":"2026-01-01T00:00:00Z"}]"#;
        assert!(store.write(keys::VENDORS, corrupt));

        assert!(repo.vendor_count().is_err());
        assert!(repo.get_vendor("vendor-1").is_err());
        let err = repo.insert_vendor(&vendor("New")).unwrap_err();
        assert!(matches!(err, soluce_core::StorageError::Decode { .. }));
        assert!(repo.delete_vendor("vendor-1").is_err());
        assert_eq!(store.read(keys::VENDORS).as_deref(), Some(corrupt));
    }

    #[test]
    fn test_corrupt_assessments_block_cascade() {
        let store = GuardedStore::new(Arc::new(MemoryStore::new()));
        let repo = VendorRepository::new(store.clone());
        let v = vendor("A");
        repo.insert_vendor(&v).unwrap();
        assert!(store.write(keys::ASSESSMENTS, "{broken"));

        assert!(repo.delete_vendor(&v.id).is_err());
        assert_eq!(repo.vendor_count().unwrap(), 1);
        assert!(repo.insert_assessment(&assessment(&v.id)).is_err());
    }
}
