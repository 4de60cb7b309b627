//! Persisted key layout.

pub const VENDORS: &str = "vendors";
pub const ASSESSMENTS: &str = "assessments";
pub const THEME: &str = "theme";
/// Last resolved tier, kept as a fallback cache for the presentation layer.
pub const LICENSE_TIER: &str = "licenseTier";
pub const PURCHASE_TOKENS: &str = "purchase_tokens";
pub const LICENSE_RECORD: &str = "license_record";
/// Monthly usage records are stored as `sbom_usage_<YYYY-MM>`.
pub const USAGE_PREFIX: &str = "sbom_usage_";
/// Scratch key written by the availability probe.
pub const PROBE_KEY: &str = "__storage_test__";

/// Key holding the usage record for `month` ("YYYY-MM").
pub fn usage_key(month: &str) -> String {
    format!("{USAGE_PREFIX}{month}")
}
