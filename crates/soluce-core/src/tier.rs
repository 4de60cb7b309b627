//! 3-tier licensing: Free, Pro, Enterprise.
//!
//! - Free: 5 vendors, 10 assessments, CSV export, one baseline template
//! - Pro: unlimited vendors/assessments, PDF + JSON export, all templates
//! - Enterprise: + unlimited users, white-label, priority support

use std::fmt;

use serde::{Deserialize, Serialize};

/// License tier. Ordered by capability: `Free < Pro < Enterprise`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 3] = [Self::Free, Self::Pro, Self::Enterprise];

    /// Storage form ("free", "pro", "enterprise").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Pro => "Pro",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Strict parse. Case-insensitive; `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    /// Lenient parse used at the storage boundary: unknown or corrupted
    /// values become `Free`, so bad data never elevates a session.
    pub fn normalize(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Free)
    }

    /// Numeric level for comparison and display ordering.
    pub fn level(&self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Pro => 1,
            Self::Enterprise => 2,
        }
    }

    /// The next tier up, or `None` at the top.
    pub fn upgrade_recommendation(&self) -> Option<Tier> {
        match self {
            Self::Free => Some(Self::Pro),
            Self::Pro => Some(Self::Enterprise),
            Self::Enterprise => None,
        }
    }

    /// Whether this tier includes everything `other` grants.
    pub fn includes(&self, other: Tier) -> bool {
        self.level() >= other.level()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Tier::Free < Tier::Pro);
        assert!(Tier::Pro < Tier::Enterprise);
        assert!(Tier::Enterprise.includes(Tier::Free));
        assert!(!Tier::Free.includes(Tier::Pro));
    }

    #[test]
    fn test_normalize_unknown_is_free() {
        assert_eq!(Tier::normalize("PRO"), Tier::Pro);
        assert_eq!(Tier::normalize(" enterprise "), Tier::Enterprise);
        assert_eq!(Tier::normalize("platinum"), Tier::Free);
        assert_eq!(Tier::normalize(""), Tier::Free);
        assert_eq!(Tier::normalize("{\"tier\":\"pro\"}"), Tier::Free);
    }

    #[test]
    fn test_upgrade_recommendation() {
        assert_eq!(Tier::Free.upgrade_recommendation(), Some(Tier::Pro));
        assert_eq!(Tier::Pro.upgrade_recommendation(), Some(Tier::Enterprise));
        assert_eq!(Tier::Enterprise.upgrade_recommendation(), None);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Pro).unwrap(), "\"pro\"");
        let t: Tier = serde_json::from_str("\"enterprise\"").unwrap();
        assert_eq!(t, Tier::Enterprise);
    }
}
