//! Assessment template registry.
//!
//! Free gets exactly one baseline template; Pro and Enterprise get the full
//! registry. Forms should populate their choices from
//! [`crate::capabilities::available_templates`] so a disallowed template can
//! never be picked in the first place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Known assessment templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    NistBasic,
    Soc2Quick,
    GdprCompliance,
    #[serde(rename = "iso27001")]
    Iso27001,
    HipaaSecurity,
}

/// Score every category starts at on a fresh assessment form.
pub const DEFAULT_CATEGORY_SCORE: u8 = 70;

/// One scored category. Weights within a template sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: f64,
}

/// Static description of a template.
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub categories: &'static [TemplateCategory],
}

impl TemplateId {
    /// All templates in registry order.
    pub const ALL: [TemplateId; 5] = [
        Self::NistBasic,
        Self::Soc2Quick,
        Self::GdprCompliance,
        Self::Iso27001,
        Self::HipaaSecurity,
    ];

    /// Baseline template available on every tier.
    pub const BASELINE: TemplateId = Self::NistBasic;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NistBasic => "nist_basic",
            Self::Soc2Quick => "soc2_quick",
            Self::GdprCompliance => "gdpr_compliance",
            Self::Iso27001 => "iso27001",
            Self::HipaaSecurity => "hipaa_security",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nist_basic" => Some(Self::NistBasic),
            "soc2_quick" => Some(Self::Soc2Quick),
            "gdpr_compliance" => Some(Self::GdprCompliance),
            "iso27001" => Some(Self::Iso27001),
            "hipaa_security" => Some(Self::HipaaSecurity),
            _ => None,
        }
    }

    /// Registry entry for this template.
    pub fn entry(&self) -> &'static TemplateEntry {
        // TEMPLATE_REGISTRY is indexed in `ALL` order.
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        &TEMPLATE_REGISTRY[idx]
    }

    pub fn categories(&self) -> &'static [TemplateCategory] {
        self.entry().categories
    }

    /// Every category at [`DEFAULT_CATEGORY_SCORE`], keyed by category id.
    pub fn initial_scores(&self) -> BTreeMap<String, u8> {
        self.categories()
            .iter()
            .map(|c| (c.id.to_string(), DEFAULT_CATEGORY_SCORE))
            .collect()
    }

    /// Weighted overall score, rounded half up. A category missing from
    /// `scores` counts as 0; ids the template does not define are ignored.
    pub fn weighted_score(&self, scores: &BTreeMap<String, u8>) -> u8 {
        let sum: f64 = self
            .categories()
            .iter()
            .map(|c| {
                let score = scores.get(c.id).copied().unwrap_or(0).min(100);
                f64::from(score) * c.weight
            })
            .sum();
        sum.round().clamp(0.0, 100.0) as u8
    }
}

pub const TEMPLATE_REGISTRY: &[TemplateEntry] = &[
    TemplateEntry {
        id: TemplateId::NistBasic,
        name: "NIST Basic Assessment",
        description: "Baseline vendor review aligned to the NIST Cybersecurity Framework",
        categories: &[
            TemplateCategory { id: "security", name: "Security", weight: 0.25 },
            TemplateCategory { id: "compliance", name: "Compliance", weight: 0.25 },
            TemplateCategory { id: "financial", name: "Financial", weight: 0.25 },
            TemplateCategory { id: "operational", name: "Operational", weight: 0.25 },
        ],
    },
    TemplateEntry {
        id: TemplateId::Soc2Quick,
        name: "SOC 2 Quick Assessment",
        description: "Trust services criteria spot check",
        categories: &[
            TemplateCategory { id: "security", name: "Security", weight: 0.25 },
            TemplateCategory { id: "availability", name: "Availability", weight: 0.20 },
            TemplateCategory { id: "processing_integrity", name: "Processing Integrity", weight: 0.20 },
            TemplateCategory { id: "confidentiality", name: "Confidentiality", weight: 0.20 },
            TemplateCategory { id: "privacy", name: "Privacy", weight: 0.15 },
        ],
    },
    TemplateEntry {
        id: TemplateId::GdprCompliance,
        name: "GDPR Compliance Check",
        description: "Processor obligations under the GDPR",
        categories: &[
            TemplateCategory { id: "data_protection", name: "Data Protection", weight: 0.30 },
            TemplateCategory { id: "data_subject_rights", name: "Data Subject Rights", weight: 0.25 },
            TemplateCategory { id: "security_measures", name: "Security Measures", weight: 0.25 },
            TemplateCategory { id: "breach_response", name: "Breach Response", weight: 0.20 },
        ],
    },
    TemplateEntry {
        id: TemplateId::Iso27001,
        name: "ISO 27001 Security Assessment",
        description: "Annex A control coverage review",
        categories: &[
            TemplateCategory { id: "information_security_policies", name: "Information Security Policies", weight: 0.15 },
            TemplateCategory { id: "access_control", name: "Access Control", weight: 0.20 },
            TemplateCategory { id: "cryptography", name: "Cryptography", weight: 0.15 },
            TemplateCategory { id: "physical_security", name: "Physical Security", weight: 0.15 },
            TemplateCategory { id: "operations_security", name: "Operations Security", weight: 0.20 },
            TemplateCategory { id: "incident_management", name: "Incident Management", weight: 0.15 },
        ],
    },
    TemplateEntry {
        id: TemplateId::HipaaSecurity,
        name: "HIPAA Security Assessment",
        description: "Security Rule safeguards for business associates",
        categories: &[
            TemplateCategory { id: "administrative_safeguards", name: "Administrative Safeguards", weight: 0.30 },
            TemplateCategory { id: "physical_safeguards", name: "Physical Safeguards", weight: 0.25 },
            TemplateCategory { id: "technical_safeguards", name: "Technical Safeguards", weight: 0.30 },
            TemplateCategory { id: "breach_notification", name: "Breach Notification", weight: 0.15 },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_all_order() {
        assert_eq!(TEMPLATE_REGISTRY.len(), TemplateId::ALL.len());
        for (entry, id) in TEMPLATE_REGISTRY.iter().zip(TemplateId::ALL) {
            assert_eq!(entry.id, id);
            assert_eq!(id.entry().name, entry.name);
        }
    }

    #[test]
    fn test_str_parse() {
        for id in TemplateId::ALL {
            assert_eq!(TemplateId::parse(id.as_str()), Some(id));
        }
        assert_eq!(TemplateId::parse("pci_dss"), None);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for id in TemplateId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    fn scores(pairs: &[(&str, u8)]) -> BTreeMap<String, u8> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_weights_sum_to_one() {
        for entry in TEMPLATE_REGISTRY {
            let total: f64 = entry.categories.iter().map(|c| c.weight).sum();
            assert!((total - 1.0).abs() < 1e-9, "{} weights sum to {total}", entry.name);
        }
    }

    #[test]
    fn test_initial_scores_default_every_category() {
        for id in TemplateId::ALL {
            let initial = id.initial_scores();
            assert_eq!(initial.len(), id.categories().len());
            assert!(initial.values().all(|s| *s == DEFAULT_CATEGORY_SCORE));
            assert_eq!(id.weighted_score(&initial), DEFAULT_CATEGORY_SCORE);
        }
    }

    #[test]
    fn test_weighted_score() {
        let nist = scores(&[
            ("security", 80),
            ("compliance", 60),
            ("financial", 90),
            ("operational", 50),
        ]);
        assert_eq!(TemplateId::NistBasic.weighted_score(&nist), 70);

        // 22.5 + 14 + 14 + 14 + 6 = 70.5
        let soc2 = scores(&[
            ("security", 90),
            ("availability", 70),
            ("processing_integrity", 70),
            ("confidentiality", 70),
            ("privacy", 40),
        ]);
        assert_eq!(TemplateId::Soc2Quick.weighted_score(&soc2), 71);
    }

    #[test]
    fn test_weighted_score_missing_and_unknown_categories() {
        let partial = scores(&[("data_protection", 85), ("not_a_category", 100)]);
        assert_eq!(TemplateId::GdprCompliance.weighted_score(&partial), 26);
        assert_eq!(TemplateId::HipaaSecurity.weighted_score(&BTreeMap::new()), 0);
    }
}
