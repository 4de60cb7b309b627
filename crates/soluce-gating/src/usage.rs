//! Monthly usage metering for the Free analysis quota.
//!
//! One record per calendar month under `sbom_usage_<YYYY-MM>`. The month
//! check runs on every read, so a new month always starts from zero without
//! any background reset.

use std::sync::Arc;

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info};

use soluce_storage::keys;
use soluce_storage::{GuardedStore, MonthlyUsage};

use crate::clock::Clock;

/// How many months `usage_statistics` looks back, current month included.
pub const HISTORY_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatistics {
    pub current_month: String,
    pub current_usage: u32,
    /// Recorded months, oldest first.
    pub monthly_history: Vec<MonthlyUsage>,
}

pub struct UsageTracker {
    store: GuardedStore,
    clock: Arc<dyn Clock>,
}

impl UsageTracker {
    pub fn new(store: GuardedStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current month's record, creating a zeroed one when absent or stale.
    fn ensure_current_month(&self) -> MonthlyUsage {
        let month = self.clock.current_month();
        let key = keys::usage_key(&month);
        match self.store.read_json::<MonthlyUsage>(&key) {
            Some(usage) if usage.month == month => usage,
            _ => {
                let fresh = MonthlyUsage::fresh(month, self.clock.now());
                self.store.write_json(&key, &fresh);
                fresh
            }
        }
    }

    pub fn current_month_usage(&self) -> u32 {
        self.ensure_current_month().count
    }

    /// `max - usage`, floored at zero.
    pub fn remaining_quota(&self, max: u32) -> u32 {
        max.saturating_sub(self.current_month_usage())
    }

    /// Add one to this month's count. Returns whether it was persisted.
    pub fn increment_usage(&self) -> bool {
        let mut usage = self.ensure_current_month();
        usage.count = usage.count.saturating_add(1);
        let ok = self
            .store
            .write_json(&keys::usage_key(&usage.month), &usage);
        debug!(month = %usage.month, count = usage.count, persisted = ok, "Usage incremented");
        ok
    }

    /// Zero this month's count.
    pub fn reset_monthly_usage(&self) -> bool {
        let month = self.clock.current_month();
        let fresh = MonthlyUsage::fresh(month.as_str(), self.clock.now());
        let ok = self.store.write_json(&keys::usage_key(&month), &fresh);
        info!(month = %month, persisted = ok, "Monthly usage reset");
        ok
    }

    /// Remove every month's record. `false` when storage is unavailable.
    pub fn clear_all_usage(&self) -> bool {
        self.store.remove_prefix(keys::USAGE_PREFIX)
    }

    pub fn usage_for_month(&self, month: &str) -> Option<MonthlyUsage> {
        self.store.read_json(&keys::usage_key(month))
    }

    pub fn usage_statistics(&self) -> UsageStatistics {
        let current_month = self.clock.current_month();
        let current_usage = self.current_month_usage();

        let now = self.clock.now();
        let base = now.year() * 12 + now.month0() as i32;
        let mut monthly_history: Vec<MonthlyUsage> = (0..HISTORY_MONTHS as i32)
            .map(|back| {
                let idx = base - back;
                format!("{:04}-{:02}", idx.div_euclid(12), idx.rem_euclid(12) + 1)
            })
            .filter_map(|month| self.usage_for_month(&month))
            .collect();
        monthly_history.reverse();

        UsageStatistics {
            current_month,
            current_usage,
            monthly_history,
        }
    }
}
