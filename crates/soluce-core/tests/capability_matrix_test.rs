//! Capability table tests.
//!
//! CAP-01: Monotonic unlock. Every limit and flag only grows going up a tier
//! CAP-02: Template availability per tier
//! CAP-03: Usage percentage boundaries

use proptest::prelude::*;

use soluce_core::capabilities::{
    available_templates, can_add_assessment, can_add_vendor, capabilities_for,
    capabilities_for_name, is_approaching_limit, is_at_limit, usage_percentage,
};
use soluce_core::{ResourceKind, TemplateId, Tier, TierCapabilities};

/// `lower` grants nothing that `higher` withholds.
fn assert_dominated(lower: &TierCapabilities, higher: &TierCapabilities) {
    let (l, h) = (lower.tier, higher.tier);

    assert!(lower.max_vendors <= higher.max_vendors, "{l} vs {h}: max_vendors");
    assert!(lower.max_assessments <= higher.max_assessments, "{l} vs {h}: max_assessments");
    assert!(lower.max_users <= higher.max_users, "{l} vs {h}: max_users");
    assert!(
        lower.max_monthly_analyses <= higher.max_monthly_analyses,
        "{l} vs {h}: max_monthly_analyses"
    );

    let unlocks = [
        ("can_export_csv", lower.can_export_csv, higher.can_export_csv),
        ("can_export_json", lower.can_export_json, higher.can_export_json),
        ("can_export_pdf", lower.can_export_pdf, higher.can_export_pdf),
        ("can_white_label", lower.can_white_label, higher.can_white_label),
        ("has_priority_support", lower.has_priority_support, higher.has_priority_support),
        ("has_advanced_reports", lower.has_advanced_reports, higher.has_advanced_reports),
    ];
    for (name, lo, hi) in unlocks {
        assert!(!lo || hi, "{l} vs {h}: {name} unlocked below but not above");
    }

    // Restrictions only disappear going up.
    assert!(!higher.has_watermark || lower.has_watermark, "{l} vs {h}: has_watermark");
    assert!(!higher.has_branding || lower.has_branding, "{l} vs {h}: has_branding");

    for template in lower.allowed_templates {
        assert!(
            higher.allowed_templates.contains(template),
            "{l} vs {h}: template {template:?}"
        );
    }
}

// ============================================================
// CAP-01: Monotonic unlock
// ============================================================

#[test]
fn cap_01a_every_tier_pair_is_monotonic() {
    for lower in Tier::ALL {
        for higher in Tier::ALL {
            if lower <= higher {
                assert_dominated(capabilities_for(lower), capabilities_for(higher));
            }
        }
    }
}

#[test]
fn cap_01b_capabilities_report_their_own_tier() {
    for tier in Tier::ALL {
        assert_eq!(capabilities_for(tier).tier, tier);
    }
}

proptest! {
    #[test]
    fn cap_01c_higher_tier_never_denies_what_lower_allows(
        lo in 0usize..3,
        hi in 0usize..3,
        count in 0u64..10_000,
    ) {
        let (lower, higher) = (Tier::ALL[lo.min(hi)], Tier::ALL[lo.max(hi)]);
        if can_add_vendor(lower, count) {
            prop_assert!(can_add_vendor(higher, count));
        }
        if can_add_assessment(lower, count) {
            prop_assert!(can_add_assessment(higher, count));
        }
        prop_assert!(
            usage_percentage(higher, count, ResourceKind::Vendors)
                <= usage_percentage(lower, count, ResourceKind::Vendors)
        );
    }

    #[test]
    fn cap_01d_unknown_tier_names_never_exceed_free(name in "[a-z]{1,12}") {
        let caps = capabilities_for_name(&name);
        match name.as_str() {
            "pro" | "enterprise" => prop_assert!(caps.tier > Tier::Free),
            _ => prop_assert_eq!(caps.tier, Tier::Free),
        }
    }
}

// ============================================================
// CAP-02: Templates
// ============================================================

#[test]
fn cap_02a_free_has_exactly_baseline_template() {
    assert_eq!(available_templates(Tier::Free), &[TemplateId::BASELINE]);
}

#[test]
fn cap_02b_paid_tiers_have_full_registry() {
    for tier in [Tier::Pro, Tier::Enterprise] {
        let templates = available_templates(tier);
        assert_eq!(templates.len(), TemplateId::ALL.len());
        for id in TemplateId::ALL {
            assert!(templates.contains(&id), "{tier} missing {id:?}");
        }
    }
}

// ============================================================
// CAP-03: Usage percentage
// ============================================================

#[test]
fn cap_03a_unbounded_limit_reports_zero() {
    assert_eq!(usage_percentage(Tier::Pro, 1000, ResourceKind::Vendors), 0);
    assert_eq!(usage_percentage(Tier::Enterprise, 1000, ResourceKind::Assessments), 0);
    assert!(!is_at_limit(Tier::Pro, 1000, ResourceKind::Vendors));
}

#[test]
fn cap_03b_free_assessment_thresholds() {
    assert!(!is_approaching_limit(Tier::Free, 7, ResourceKind::Assessments));
    assert!(is_approaching_limit(Tier::Free, 8, ResourceKind::Assessments));
    assert!(is_approaching_limit(Tier::Free, 9, ResourceKind::Assessments));
    assert!(is_at_limit(Tier::Free, 10, ResourceKind::Assessments));
    assert_eq!(usage_percentage(Tier::Free, 25, ResourceKind::Assessments), 100);
}
