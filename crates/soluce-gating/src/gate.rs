//! Gating enforcement.
//!
//! Every resource-creating or restricted action resolves the tier, checks
//! the capability table and either performs the action or returns a
//! `Denial`. Denials are values, not errors, and each one raises the
//! upgrade prompt. A denied action never writes.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use soluce_core::capabilities::{self, capabilities_for, ResourceKind, TierCapabilities};
use soluce_core::models::{sample_vendor, Assessment, NewAssessment, NewVendor, Vendor};
use soluce_core::{GateError, GateResult, TemplateId, Tier};
use soluce_storage::VendorRepository;

use crate::clock::Clock;
use crate::resolver::LicenseResolver;
use crate::signal::UpgradeSignal;
use crate::usage::UsageTracker;

/// Actions the gate can refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedFeature {
    AddVendor,
    AddAssessment,
    ExportPdf,
    ExportJson,
    ExportCsv,
    RunAnalysis,
}

impl GatedFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddVendor => "add_vendor",
            Self::AddAssessment => "add_assessment",
            Self::ExportPdf => "export_pdf",
            Self::ExportJson => "export_json",
            Self::ExportCsv => "export_csv",
            Self::RunAnalysis => "run_analysis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Denial {
    pub feature: GatedFeature,
    /// User-facing message naming the limit and the plan that lifts it.
    pub reason: String,
    pub current_tier: Tier,
    pub required_tier: Tier,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "value", rename_all = "lowercase")]
pub enum GateDecision<T> {
    Accepted(T),
    Denied(Denial),
}

impl<T> GateDecision<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            Self::Accepted(value) => Some(value),
            Self::Denied(_) => None,
        }
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Accepted(_) => None,
            Self::Denied(denial) => Some(denial),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Json,
    Csv,
}

impl ExportFormat {
    fn feature(&self) -> GatedFeature {
        match self {
            Self::Pdf => GatedFeature::ExportPdf,
            Self::Json => GatedFeature::ExportJson,
            Self::Csv => GatedFeature::ExportCsv,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Json => "JSON",
            Self::Csv => "CSV",
        }
    }

    fn allowed(&self, caps: &TierCapabilities) -> bool {
        match self {
            Self::Pdf => caps.can_export_pdf,
            Self::Json => caps.can_export_json,
            Self::Csv => caps.can_export_csv,
        }
    }
}

/// What an exporter needs to know about the session's tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportContext {
    pub tier: Tier,
    pub watermark: bool,
    pub branding: bool,
}

impl ExportContext {
    pub fn for_tier(tier: Tier) -> Self {
        let caps = capabilities_for(tier);
        Self {
            tier,
            watermark: caps.has_watermark,
            branding: caps.has_branding,
        }
    }
}

/// An accepted analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGrant {
    /// Runs left this month after this one. `None` when unmetered.
    pub remaining: Option<u32>,
}

/// Result of a bulk sample-vendor load. Stops at the first denial.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleBatch {
    pub added: Vec<Vendor>,
    pub denial: Option<Denial>,
}

/// Lowest tier above `current` for which `unlocks` holds.
fn required_tier(current: Tier, unlocks: impl Fn(&TierCapabilities) -> bool) -> Tier {
    Tier::ALL
        .into_iter()
        .find(|t| *t > current && unlocks(capabilities_for(*t)))
        .or_else(|| current.upgrade_recommendation())
        .unwrap_or(Tier::Enterprise)
}

fn limit_reason(
    label: &str,
    noun: &str,
    max: u32,
    current: Tier,
    required: Tier,
    unlimited: bool,
) -> String {
    let lift = if unlimited {
        format!("for unlimited {noun}")
    } else {
        format!("to add more {noun}")
    };
    format!(
        "{label} limit reached ({max}) on the {current} plan. Upgrade to {required} {lift}."
    )
}

pub struct Gatekeeper {
    resolver: Arc<LicenseResolver>,
    vendors: VendorRepository,
    usage: Arc<UsageTracker>,
    signal: Arc<UpgradeSignal>,
    clock: Arc<dyn Clock>,
}

impl Gatekeeper {
    pub fn new(
        resolver: Arc<LicenseResolver>,
        vendors: VendorRepository,
        usage: Arc<UsageTracker>,
        signal: Arc<UpgradeSignal>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            vendors,
            usage,
            signal,
            clock,
        }
    }

    fn current_tier(&self) -> Tier {
        self.resolver.resolve_tier().tier
    }

    fn deny<T>(&self, denial: Denial) -> GateDecision<T> {
        debug!(
            feature = denial.feature.as_str(),
            tier = %denial.current_tier,
            required = %denial.required_tier,
            "Gate denied"
        );
        self.signal.trigger(denial.reason.clone(), denial.required_tier);
        GateDecision::Denied(denial)
    }

    fn count_denial(&self, kind: ResourceKind, tier: Tier, count: u64) -> Option<Denial> {
        let limit = capabilities_for(tier).limit_for(kind);
        if limit.allows(count) {
            return None;
        }
        let max = limit.bound().unwrap_or(u32::MAX);
        let required = required_tier(tier, |caps| caps.limit_for(kind).allows(count));
        let (feature, label) = match kind {
            ResourceKind::Vendors => (GatedFeature::AddVendor, "Vendor"),
            ResourceKind::Assessments => (GatedFeature::AddAssessment, "Assessment"),
        };
        Some(Denial {
            feature,
            reason: limit_reason(
                label,
                kind.as_str(),
                max,
                tier,
                required,
                capabilities_for(required).limit_for(kind).is_unlimited(),
            ),
            current_tier: tier,
            required_tier: required,
            limit: Some(max),
        })
    }

    pub fn try_add_vendor(&self, input: NewVendor) -> GateResult<GateDecision<Vendor>> {
        let tier = self.current_tier();
        let count = self.vendors.vendor_count()?;
        if let Some(denial) = self.count_denial(ResourceKind::Vendors, tier, count) {
            return Ok(self.deny(denial));
        }

        let vendor = Vendor::from_new(input, self.clock.now());
        self.vendors.insert_vendor(&vendor)?;
        debug!(vendor_id = %vendor.id, tier = %tier, "Vendor added");
        Ok(GateDecision::Accepted(vendor))
    }

    /// Add up to `count` demo vendors, each through the vendor limit.
    pub fn try_add_sample_vendors(&self, count: usize) -> GateResult<SampleBatch> {
        let mut batch = SampleBatch {
            added: Vec::with_capacity(count),
            denial: None,
        };
        for i in 0..count {
            match self.try_add_vendor(sample_vendor(i))? {
                GateDecision::Accepted(vendor) => batch.added.push(vendor),
                GateDecision::Denied(denial) => {
                    batch.denial = Some(denial);
                    break;
                }
            }
        }
        info!(added = batch.added.len(), requested = count, "Sample vendors loaded");
        Ok(batch)
    }

    /// Add an assessment, then stamp the vendor's last assessment time.
    /// The vendor update is a consequence of the accepted action and is not
    /// gated again.
    pub fn try_add_assessment(&self, input: NewAssessment) -> GateResult<GateDecision<Assessment>> {
        if self.vendors.get_vendor(&input.vendor_id)?.is_none() {
            return Err(GateError::VendorNotFound(input.vendor_id));
        }

        let tier = self.current_tier();
        let count = self.vendors.assessment_count()?;
        if let Some(denial) = self.count_denial(ResourceKind::Assessments, tier, count) {
            return Ok(self.deny(denial));
        }

        // Forms only offer available templates; this catches anything that
        // bypassed them.
        if !capabilities::can_use_template(tier, input.template_id) {
            return Err(GateError::TemplateNotAllowed {
                template: input.template_id,
                tier,
            });
        }

        let now = self.clock.now();
        let assessment = Assessment::from_new(input, now);
        self.vendors.insert_assessment(&assessment)?;
        if let Err(e) =
            self.vendors
                .touch_last_assessment(&assessment.vendor_id, assessment.created_at, now)
        {
            warn!(vendor_id = %assessment.vendor_id, error = %e, "Could not update vendor after assessment");
        }
        debug!(assessment_id = %assessment.id, tier = %tier, "Assessment added");
        Ok(GateDecision::Accepted(assessment))
    }

    pub fn try_export(&self, format: ExportFormat) -> GateDecision<ExportContext> {
        let tier = self.current_tier();
        if format.allowed(capabilities_for(tier)) {
            return GateDecision::Accepted(ExportContext::for_tier(tier));
        }
        let required = required_tier(tier, |caps| format.allowed(caps));
        let label = format.label();
        self.deny(Denial {
            feature: format.feature(),
            reason: format!(
                "{label} export is not available on the {tier} plan. Upgrade to {required} to export {label} reports."
            ),
            current_tier: tier,
            required_tier: required,
            limit: None,
        })
    }

    pub fn try_export_pdf(&self) -> GateDecision<ExportContext> {
        self.try_export(ExportFormat::Pdf)
    }

    pub fn try_export_json(&self) -> GateDecision<ExportContext> {
        self.try_export(ExportFormat::Json)
    }

    pub fn try_export_csv(&self) -> GateDecision<ExportContext> {
        self.try_export(ExportFormat::Csv)
    }

    /// Metered analysis run. Unmetered tiers are always accepted and not
    /// counted; metered tiers spend one unit of the monthly quota.
    pub fn try_run_analysis(&self) -> GateDecision<AnalysisGrant> {
        let tier = self.current_tier();
        let Some(max) = capabilities_for(tier).max_monthly_analyses.bound() else {
            return GateDecision::Accepted(AnalysisGrant { remaining: None });
        };

        let remaining = self.usage.remaining_quota(max);
        if remaining == 0 {
            let required = required_tier(tier, |caps| {
                caps.max_monthly_analyses > capabilities::Limit::Bounded(max)
            });
            return self.deny(Denial {
                feature: GatedFeature::RunAnalysis,
                reason: limit_reason(
                    "Monthly analysis",
                    "analyses",
                    max,
                    tier,
                    required,
                    capabilities_for(required).max_monthly_analyses.is_unlimited(),
                ),
                current_tier: tier,
                required_tier: required,
                limit: Some(max),
            });
        }

        if !self.usage.increment_usage() {
            warn!("Analysis accepted but usage could not be recorded");
        }
        GateDecision::Accepted(AnalysisGrant {
            remaining: Some(remaining - 1),
        })
    }

    pub fn available_templates(&self) -> &'static [TemplateId] {
        capabilities::available_templates(self.current_tier())
    }

    pub fn export_context(&self) -> ExportContext {
        ExportContext::for_tier(self.current_tier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_tier_is_lowest_unlocking() {
        assert_eq!(required_tier(Tier::Free, |c| c.can_export_pdf), Tier::Pro);
        assert_eq!(required_tier(Tier::Free, |c| c.can_white_label), Tier::Enterprise);
        assert_eq!(required_tier(Tier::Pro, |c| c.can_white_label), Tier::Enterprise);
    }

    #[test]
    fn test_limit_reason_wording() {
        assert_eq!(
            limit_reason("Vendor", "vendors", 5, Tier::Free, Tier::Pro, true),
            "Vendor limit reached (5) on the Free plan. Upgrade to Pro for unlimited vendors."
        );
    }

    #[test]
    fn test_export_context() {
        let free = ExportContext::for_tier(Tier::Free);
        assert!(free.watermark && free.branding);
        let ent = ExportContext::for_tier(Tier::Enterprise);
        assert!(!ent.watermark && !ent.branding);
    }

    #[test]
    fn test_decision_helpers() {
        let d: GateDecision<u8> = GateDecision::Accepted(1);
        assert!(d.is_accepted());
        assert!(d.denial().is_none());
        assert_eq!(d.accepted(), Some(1));
    }
}
