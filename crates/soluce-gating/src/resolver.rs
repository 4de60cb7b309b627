//! Tier resolution: license record, then purchase token, then Free.
//!
//! Every call reads through to storage. Any storage failure degrades to the
//! next precedence step, so the worst case is Free.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use soluce_core::{capabilities_for, Tier};
use soluce_storage::{LicenseRecordRepository, PreferenceStore, PurchaseTokenRepository};

use crate::clock::Clock;
use crate::usage::UsageTracker;

/// Where the resolved tier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseSource {
    License,
    Purchase,
    Free,
}

/// State of the stored license record at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Valid,
    Expired,
    /// Record present but its seal does not match.
    Invalid,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResolution {
    pub tier: Tier,
    pub source: LicenseSource,
    pub status: LicenseStatus,
    /// Free only: analyses left this month.
    pub remaining_analyses: Option<u32>,
    /// Free only: monthly analysis allowance.
    pub max_analyses: Option<u32>,
}

pub struct LicenseResolver {
    licenses: LicenseRecordRepository,
    purchases: PurchaseTokenRepository,
    preferences: PreferenceStore,
    usage: Arc<UsageTracker>,
    clock: Arc<dyn Clock>,
    product_id: String,
}

impl LicenseResolver {
    pub fn new(
        licenses: LicenseRecordRepository,
        purchases: PurchaseTokenRepository,
        preferences: PreferenceStore,
        usage: Arc<UsageTracker>,
        clock: Arc<dyn Clock>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            licenses,
            purchases,
            preferences,
            usage,
            clock,
            product_id: product_id.into(),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn resolve_tier(&self) -> TierResolution {
        let status = self.license_status();
        let resolution = self.resolve_with(status);
        // Best effort: the cache is informational only.
        self.preferences.set_last_known_tier(resolution.tier);
        debug!(
            tier = %resolution.tier,
            source = ?resolution.source,
            status = ?resolution.status,
            "Tier resolved"
        );
        resolution
    }

    fn license_status(&self) -> (LicenseStatus, Option<Tier>) {
        let Some(record) = self.licenses.load() else {
            return (LicenseStatus::Missing, None);
        };
        if !record.verify_seal() {
            return (LicenseStatus::Invalid, None);
        }
        if record.is_expired(self.clock.now()) {
            return (LicenseStatus::Expired, None);
        }
        (LicenseStatus::Valid, Some(record.tier))
    }

    fn resolve_with(&self, (status, licensed): (LicenseStatus, Option<Tier>)) -> TierResolution {
        if let Some(tier) = licensed {
            return TierResolution {
                tier,
                source: LicenseSource::License,
                status,
                remaining_analyses: None,
                max_analyses: None,
            };
        }

        if let Some(token) = self.purchases.for_product(&self.product_id) {
            return TierResolution {
                tier: token.tier,
                source: LicenseSource::Purchase,
                status,
                remaining_analyses: None,
                max_analyses: None,
            };
        }

        let max = capabilities_for(Tier::Free).max_monthly_analyses.bound();
        TierResolution {
            tier: Tier::Free,
            source: LicenseSource::Free,
            status,
            remaining_analyses: max.map(|m| self.usage.remaining_quota(m)),
            max_analyses: max,
        }
    }
}
