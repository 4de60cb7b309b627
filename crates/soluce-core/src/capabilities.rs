//! Tier capability table: limits and feature flags per tier.
//!
//! Pure static lookup. Unknown tier strings resolve to Free.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::templates::TemplateId;
use crate::tier::Tier;

/// Numeric limit that may be unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Bounded(u32),
    Unlimited,
}

impl Limit {
    /// Whether one more item fits: `current < max`.
    pub fn allows(&self, current: u64) -> bool {
        match self {
            Self::Bounded(max) => current < u64::from(*max),
            Self::Unlimited => true,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The bound, or `None` when unlimited.
    pub fn bound(&self) -> Option<u32> {
        match self {
            Self::Bounded(max) => Some(*max),
            Self::Unlimited => None,
        }
    }
}

impl PartialOrd for Limit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Limit {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unlimited, Self::Unlimited) => Ordering::Equal,
            (Self::Unlimited, Self::Bounded(_)) => Ordering::Greater,
            (Self::Bounded(_), Self::Unlimited) => Ordering::Less,
            (Self::Bounded(a), Self::Bounded(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(max) => write!(f, "{max}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Count-limited resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vendors,
    Assessments,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendors => "vendors",
            Self::Assessments => "assessments",
        }
    }
}

/// Limits and feature flags granted by one tier.
#[derive(Debug, Clone)]
pub struct TierCapabilities {
    pub tier: Tier,
    pub display_name: &'static str,
    pub price: &'static str,
    pub max_vendors: Limit,
    pub max_assessments: Limit,
    pub max_users: Limit,
    /// Metered analysis runs per calendar month.
    pub max_monthly_analyses: Limit,
    pub can_export_csv: bool,
    pub can_export_json: bool,
    pub can_export_pdf: bool,
    /// Exports carry a watermark. A restriction: only ever lifted going up.
    pub has_watermark: bool,
    /// Exports carry VendorSoluce branding. Also a restriction.
    pub has_branding: bool,
    pub allowed_templates: &'static [TemplateId],
    pub can_white_label: bool,
    pub has_priority_support: bool,
    pub has_advanced_reports: bool,
    pub benefits: &'static [&'static str],
}

impl TierCapabilities {
    /// Limit for a count-limited resource.
    pub fn limit_for(&self, kind: ResourceKind) -> Limit {
        match kind {
            ResourceKind::Vendors => self.max_vendors,
            ResourceKind::Assessments => self.max_assessments,
        }
    }
}

const FREE_TEMPLATES: &[TemplateId] = &[TemplateId::NistBasic];

const ALL_TEMPLATES: &[TemplateId] = &TemplateId::ALL;

static FREE: TierCapabilities = TierCapabilities {
    tier: Tier::Free,
    display_name: "Free Edition",
    price: "$0",
    max_vendors: Limit::Bounded(5),
    max_assessments: Limit::Bounded(10),
    max_users: Limit::Bounded(1),
    max_monthly_analyses: Limit::Bounded(1),
    can_export_csv: true,
    can_export_json: false,
    can_export_pdf: false,
    has_watermark: true,
    has_branding: true,
    allowed_templates: FREE_TEMPLATES,
    can_white_label: false,
    has_priority_support: false,
    has_advanced_reports: false,
    benefits: &[
        "Up to 5 vendors",
        "Up to 10 assessments",
        "CSV export",
        "NIST basic template",
    ],
};

static PRO: TierCapabilities = TierCapabilities {
    tier: Tier::Pro,
    display_name: "Professional",
    price: "$149",
    max_vendors: Limit::Unlimited,
    max_assessments: Limit::Unlimited,
    max_users: Limit::Bounded(5),
    max_monthly_analyses: Limit::Unlimited,
    can_export_csv: true,
    can_export_json: true,
    can_export_pdf: true,
    has_watermark: false,
    has_branding: true,
    allowed_templates: ALL_TEMPLATES,
    can_white_label: false,
    has_priority_support: false,
    has_advanced_reports: true,
    benefits: &[
        "Unlimited vendors",
        "Unlimited assessments",
        "PDF & JSON export",
        "All assessment templates",
        "Advanced reporting",
        "No watermarks",
        "Lifetime updates",
    ],
};

static ENTERPRISE: TierCapabilities = TierCapabilities {
    tier: Tier::Enterprise,
    display_name: "Enterprise Edition",
    price: "$449",
    max_vendors: Limit::Unlimited,
    max_assessments: Limit::Unlimited,
    max_users: Limit::Unlimited,
    max_monthly_analyses: Limit::Unlimited,
    can_export_csv: true,
    can_export_json: true,
    can_export_pdf: true,
    has_watermark: false,
    has_branding: false,
    allowed_templates: ALL_TEMPLATES,
    can_white_label: true,
    has_priority_support: true,
    has_advanced_reports: true,
    benefits: &[
        "Everything in Pro",
        "Unlimited users",
        "White-label capability",
        "Custom branding",
        "Priority support",
        "Dedicated account manager",
        "Lifetime updates",
    ],
};

/// Capabilities for a tier.
pub fn capabilities_for(tier: Tier) -> &'static TierCapabilities {
    match tier {
        Tier::Free => &FREE,
        Tier::Pro => &PRO,
        Tier::Enterprise => &ENTERPRISE,
    }
}

/// Capabilities for a raw tier string. Unrecognized values get Free.
pub fn capabilities_for_name(tier: &str) -> &'static TierCapabilities {
    capabilities_for(Tier::normalize(tier))
}

pub fn can_add_vendor(tier: Tier, current_count: u64) -> bool {
    capabilities_for(tier).max_vendors.allows(current_count)
}

pub fn can_add_assessment(tier: Tier, current_count: u64) -> bool {
    capabilities_for(tier).max_assessments.allows(current_count)
}

pub fn can_export_pdf(tier: Tier) -> bool {
    capabilities_for(tier).can_export_pdf
}

pub fn can_export_json(tier: Tier) -> bool {
    capabilities_for(tier).can_export_json
}

pub fn can_export_csv(tier: Tier) -> bool {
    capabilities_for(tier).can_export_csv
}

pub fn has_watermark(tier: Tier) -> bool {
    capabilities_for(tier).has_watermark
}

pub fn can_white_label(tier: Tier) -> bool {
    capabilities_for(tier).can_white_label
}

/// Templates a form may offer at this tier.
pub fn available_templates(tier: Tier) -> &'static [TemplateId] {
    capabilities_for(tier).allowed_templates
}

pub fn can_use_template(tier: Tier, template: TemplateId) -> bool {
    available_templates(tier).contains(&template)
}

/// Percentage (0..=100) of a resource limit in use. Always 0 when the
/// limit is unbounded.
pub fn usage_percentage(tier: Tier, current: u64, kind: ResourceKind) -> u8 {
    match capabilities_for(tier).limit_for(kind) {
        Limit::Unlimited => 0,
        Limit::Bounded(0) => 100,
        Limit::Bounded(max) => {
            let max = u64::from(max);
            // Round half up, matching Math.round on positive values.
            let pct = current.saturating_mul(200).saturating_add(max) / (2 * max);
            pct.min(100) as u8
        }
    }
}

/// 80 <= pct < 100.
pub fn is_approaching_limit(tier: Tier, current: u64, kind: ResourceKind) -> bool {
    let pct = usage_percentage(tier, current, kind);
    (80..100).contains(&pct)
}

/// pct >= 100.
pub fn is_at_limit(tier: Tier, current: u64, kind: ResourceKind) -> bool {
    usage_percentage(tier, current, kind) >= 100
}
