//! `GatingService` — the session's single entry point.
//!
//! Built once at startup and passed to call sites. Owns the guarded store,
//! clock, usage tracker, resolver, activator, gatekeeper and upgrade
//! signal; nothing in the crate is a global.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use soluce_core::capabilities::{self, capabilities_for, ResourceKind, TierCapabilities};
use soluce_core::models::{Assessment, NewAssessment, NewVendor, Vendor};
use soluce_core::{GateResult, SoluceConfig, TemplateId, Tier};
use soluce_storage::{
    open_store, GuardedStore, KeyValueStore, LicenseRecord, LicenseRecordRepository,
    PreferenceStore, PurchaseToken, PurchaseTokenRepository, Theme, VendorRepository,
};

use crate::activation::{ActivationOutcome, DeactivationOutcome, LicenseActivator};
use crate::authority::{HttpLicenseAuthority, LicenseAuthority, NoAuthority};
use crate::clock::{Clock, SystemClock};
use crate::gate::{AnalysisGrant, ExportContext, GateDecision, Gatekeeper, SampleBatch};
use crate::resolver::{LicenseResolver, TierResolution};
use crate::signal::{UpgradePromptState, UpgradeSignal};
use crate::usage::{UsageStatistics, UsageTracker};

pub struct GatingService<A = NoAuthority> {
    config: SoluceConfig,
    store: GuardedStore,
    clock: Arc<dyn Clock>,
    usage: Arc<UsageTracker>,
    resolver: Arc<LicenseResolver>,
    activator: LicenseActivator<A>,
    gate: Gatekeeper,
    signal: Arc<UpgradeSignal>,
    vendors: VendorRepository,
    purchases: PurchaseTokenRepository,
    licenses: LicenseRecordRepository,
    preferences: PreferenceStore,
}

impl GatingService<NoAuthority> {
    /// Offline-only service: activation never leaves the process.
    pub fn offline(
        config: SoluceConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::build(config, store, clock, None)
    }
}

impl GatingService<HttpLicenseAuthority> {
    /// Production wiring: `SOLUCE_*` environment overrides, store from
    /// `[storage]`, system clock, HTTP authority when `license_api_url` is
    /// set.
    pub fn from_config(config: SoluceConfig) -> GateResult<Self> {
        Self::from_config_with_overrides(config, |name| std::env::var(name).ok())
    }

    /// [`Self::from_config`] with overrides read from `lookup` instead of
    /// the process environment.
    pub fn from_config_with_overrides<F>(mut config: SoluceConfig, lookup: F) -> GateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        soluce_core::tracing_setup::init_tracing();
        config.apply_overrides_from(lookup);
        // Each warning is logged by `validate` itself.
        config.validate();
        let store = open_store(&config.storage)?;
        let authority = match config.license.license_api_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Some(HttpLicenseAuthority::new(
                url,
                Duration::from_millis(config.license.effective_online_timeout_ms()),
            )?),
            _ => None,
        };
        info!(
            in_memory = config.storage.is_in_memory(),
            online = authority.is_some(),
            "Gating service initialized"
        );
        Ok(Self::build(config, store, Arc::new(SystemClock), authority))
    }
}

impl<A: LicenseAuthority> GatingService<A> {
    pub fn with_authority(
        config: SoluceConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        authority: A,
    ) -> Self {
        Self::build(config, store, clock, Some(authority))
    }

    fn build(
        config: SoluceConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        authority: Option<A>,
    ) -> Self {
        let store = GuardedStore::new(store);
        let usage = Arc::new(UsageTracker::new(store.clone(), clock.clone()));
        let licenses = LicenseRecordRepository::new(store.clone());
        let purchases = PurchaseTokenRepository::new(store.clone());
        let preferences = PreferenceStore::new(store.clone());
        let vendors = VendorRepository::new(store.clone());
        let resolver = Arc::new(LicenseResolver::new(
            licenses.clone(),
            purchases.clone(),
            preferences.clone(),
            usage.clone(),
            clock.clone(),
            config.license.effective_product_id(),
        ));
        let signal = Arc::new(UpgradeSignal::new(config.upgrade.clone()));
        let activator = LicenseActivator::new(
            licenses.clone(),
            config.license.clone(),
            authority,
            clock.clone(),
        );
        let gate = Gatekeeper::new(
            resolver.clone(),
            vendors.clone(),
            usage.clone(),
            signal.clone(),
            clock.clone(),
        );
        Self {
            config,
            store,
            clock,
            usage,
            resolver,
            activator,
            gate,
            signal,
            vendors,
            purchases,
            licenses,
            preferences,
        }
    }

    pub fn config(&self) -> &SoluceConfig {
        &self.config
    }

    pub fn is_storage_available(&self) -> bool {
        self.store.is_available()
    }

    // ── Tier ──

    pub fn resolve_tier(&self) -> TierResolution {
        self.resolver.resolve_tier()
    }

    pub fn current_tier(&self) -> Tier {
        self.resolve_tier().tier
    }

    pub fn capabilities(&self) -> &'static TierCapabilities {
        capabilities_for(self.current_tier())
    }

    /// Tier cached by the last resolution. Informational only.
    pub fn last_known_tier(&self) -> Tier {
        self.preferences.last_known_tier()
    }

    // ── License ──

    pub async fn activate_license(
        &self,
        key: &str,
        attempt_online: bool,
    ) -> GateResult<ActivationOutcome> {
        let outcome = self.activator.activate(key, attempt_online).await?;
        self.resolver.resolve_tier();
        Ok(outcome)
    }

    /// Remove the license record. A purchase token for this product, if
    /// any, applies again on the next resolution.
    pub fn deactivate_license(&self) -> GateResult<DeactivationOutcome> {
        let outcome = self.activator.deactivate()?;
        self.resolver.resolve_tier();
        Ok(outcome)
    }

    pub fn license_record(&self) -> Option<LicenseRecord> {
        self.licenses.load_verified()
    }

    /// Masked key of the active license, for display.
    pub fn masked_license_key(&self) -> Option<String> {
        self.license_record()
            .map(|r| crate::license_key::mask_license_key(&r.key))
    }

    // ── Purchases ──

    /// Record a completed purchase for this product, replacing any earlier
    /// one.
    pub fn record_purchase(
        &self,
        tier: Tier,
        features: Vec<String>,
        metadata: Option<Value>,
    ) -> GateResult<()> {
        let now = self.clock.now();
        let token = PurchaseToken {
            product: self.resolver.product_id().to_string(),
            tier,
            purchase_date: now,
            features,
            metadata,
        };
        self.purchases.add(token, now)?;
        info!(tier = %tier, "Purchase recorded");
        Ok(())
    }

    pub fn purchase_tokens(&self) -> Vec<PurchaseToken> {
        self.purchases.all()
    }

    pub fn remove_purchase(&self) -> GateResult<bool> {
        Ok(self
            .purchases
            .remove(self.resolver.product_id(), self.clock.now())?)
    }

    // ── Gated actions ──

    pub fn try_add_vendor(&self, input: NewVendor) -> GateResult<GateDecision<Vendor>> {
        self.gate.try_add_vendor(input)
    }

    pub fn try_add_assessment(
        &self,
        input: NewAssessment,
    ) -> GateResult<GateDecision<Assessment>> {
        self.gate.try_add_assessment(input)
    }

    /// Load up to `count` demo vendors. Free stops at its vendor limit.
    pub fn load_sample_vendors(&self, count: usize) -> GateResult<SampleBatch> {
        self.gate.try_add_sample_vendors(count)
    }

    pub fn try_export_pdf(&self) -> GateDecision<ExportContext> {
        self.gate.try_export_pdf()
    }

    pub fn try_export_json(&self) -> GateDecision<ExportContext> {
        self.gate.try_export_json()
    }

    pub fn try_export_csv(&self) -> GateDecision<ExportContext> {
        self.gate.try_export_csv()
    }

    pub fn try_run_analysis(&self) -> GateDecision<AnalysisGrant> {
        self.gate.try_run_analysis()
    }

    pub fn available_templates(&self) -> &'static [TemplateId] {
        self.gate.available_templates()
    }

    pub fn export_context(&self) -> ExportContext {
        self.gate.export_context()
    }

    pub fn can_export_pdf(&self) -> bool {
        capabilities::can_export_pdf(self.current_tier())
    }

    pub fn can_export_json(&self) -> bool {
        capabilities::can_export_json(self.current_tier())
    }

    /// Display count. Gated actions count strictly in the gatekeeper.
    fn count(&self, kind: ResourceKind) -> u64 {
        let count = match kind {
            ResourceKind::Vendors => self.vendors.vendor_count(),
            ResourceKind::Assessments => self.vendors.assessment_count(),
        };
        count.unwrap_or_else(|e| {
            warn!(kind = kind.as_str(), error = %e, "Could not count stored records");
            0
        })
    }

    pub fn usage_percentage(&self, kind: ResourceKind) -> u8 {
        capabilities::usage_percentage(self.current_tier(), self.count(kind), kind)
    }

    pub fn is_approaching_limit(&self, kind: ResourceKind) -> bool {
        capabilities::is_approaching_limit(self.current_tier(), self.count(kind), kind)
    }

    pub fn is_at_limit(&self, kind: ResourceKind) -> bool {
        capabilities::is_at_limit(self.current_tier(), self.count(kind), kind)
    }

    // ── Records ──

    /// Stored vendors for display; empty (and logged) when unreadable.
    pub fn vendors(&self) -> Vec<Vendor> {
        self.vendors.vendors().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read vendors");
            Vec::new()
        })
    }

    pub fn assessments(&self) -> Vec<Assessment> {
        self.vendors.assessments().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read assessments");
            Vec::new()
        })
    }

    pub fn update_vendor(&self, vendor: &Vendor) -> GateResult<bool> {
        Ok(self.vendors.update_vendor(vendor)?)
    }

    pub fn delete_vendor(&self, id: &str) -> GateResult<bool> {
        Ok(self.vendors.delete_vendor(id)?)
    }

    pub fn delete_assessment(&self, id: &str) -> GateResult<bool> {
        Ok(self.vendors.delete_assessment(id)?)
    }

    /// Wipe vendors, assessments and usage history. License and purchase
    /// state is kept.
    pub fn clear_all_data(&self) -> GateResult<()> {
        self.vendors.clear_all()?;
        if !self.usage.clear_all_usage() {
            warn!("Usage history could not be cleared");
        }
        info!("All vendor data cleared");
        Ok(())
    }

    // ── Usage ──

    pub fn current_month_usage(&self) -> u32 {
        self.usage.current_month_usage()
    }

    pub fn usage_statistics(&self) -> UsageStatistics {
        self.usage.usage_statistics()
    }

    pub fn reset_monthly_usage(&self) -> bool {
        self.usage.reset_monthly_usage()
    }

    // ── Upgrade prompt ──

    pub fn upgrade_prompt(&self) -> UpgradePromptState {
        self.signal.current()
    }

    pub fn dismiss_upgrade_prompt(&self) -> bool {
        self.signal.dismiss()
    }

    pub fn acknowledge_upgrade_prompt(&self) -> bool {
        self.signal.acknowledge()
    }

    /// Raise the prompt directly, e.g. from an "Upgrade" button.
    pub fn request_upgrade(&self, reason: &str) {
        let target = self
            .current_tier()
            .upgrade_recommendation()
            .unwrap_or(Tier::Enterprise);
        self.signal.trigger(reason, target);
    }

    // ── Preferences ──

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    pub fn toggle_theme(&self) -> Theme {
        self.preferences.toggle_theme()
    }
}
