//! Vendor and assessment records: the resources the gating engine counts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::templates::TemplateId;

/// How critical a vendor relationship is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorCategory {
    Strategic,
    Operational,
    #[default]
    Tactical,
}

/// Vendor input as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewVendor {
    pub name: String,
    pub category: VendorCategory,
    pub sector: String,
    pub location: String,
    pub contract_value: u64,
    pub contact: String,
    /// Free-text list of data handled, e.g. "PII, Financial".
    pub data_types: String,
    pub notes: String,
}

/// A persisted vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: VendorCategory,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contract_value: u64,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub data_types: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_assessment: Option<DateTime<Utc>>,
    #[serde(default)]
    pub risk_score: u8,
}

impl Vendor {
    /// Build a vendor from form input, assigning an id and risk score.
    pub fn from_new(input: NewVendor, now: DateTime<Utc>) -> Self {
        let mut vendor = Self {
            id: format!("vendor-{}", uuid::Uuid::new_v4()),
            name: input.name,
            category: input.category,
            sector: input.sector,
            location: input.location,
            contract_value: input.contract_value,
            contact: input.contact,
            data_types: input.data_types,
            notes: input.notes,
            created_at: now,
            last_assessment: None,
            risk_score: 0,
        };
        vendor.risk_score = risk_score(&vendor, now);
        vendor
    }
}

const SAMPLE_NAMES: [&str; 10] = [
    "TechCorp",
    "DataSystems",
    "CloudServe",
    "SecureNet",
    "FinTech",
    "HealthCare",
    "LogisTrans",
    "ConsultPro",
    "DevOps",
    "InfoSec",
];
const SAMPLE_SECTORS: [&str; 5] = ["Technology", "Finance", "Healthcare", "Manufacturing", "Retail"];
const SAMPLE_LOCATIONS: [&str; 5] = ["USA", "UK", "Germany", "Canada", "France"];

/// Demo vendor number `i`. Deterministic, so a batch can be reproduced.
pub fn sample_vendor(i: usize) -> NewVendor {
    let category = match i % 3 {
        0 => VendorCategory::Strategic,
        1 => VendorCategory::Operational,
        _ => VendorCategory::Tactical,
    };
    NewVendor {
        name: format!("{} {}", SAMPLE_NAMES[i % SAMPLE_NAMES.len()], i + 1),
        category,
        sector: SAMPLE_SECTORS[i % SAMPLE_SECTORS.len()].to_string(),
        location: SAMPLE_LOCATIONS[(i / 2) % SAMPLE_LOCATIONS.len()].to_string(),
        contract_value: 50_000 + (i as u64 * 97_003) % 500_000,
        contact: format!("contact@vendor{i}.com"),
        data_types: "PII, Financial".to_string(),
        notes: "Sample vendor for testing".to_string(),
    }
}

/// Assessment input as submitted by a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssessment {
    pub vendor_id: String,
    pub template_id: TemplateId,
    /// Per-category scores (0..=100) keyed by template category id. Start a
    /// form from [`TemplateId::initial_scores`].
    #[serde(default)]
    pub category_scores: BTreeMap<String, u8>,
    #[serde(default)]
    pub answers: serde_json::Value,
    #[serde(default)]
    pub notes: String,
}

/// A persisted assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub vendor_id: String,
    pub template_id: TemplateId,
    /// Weighted overall score derived from `category_scores`.
    pub score: u8,
    #[serde(default)]
    pub category_scores: BTreeMap<String, u8>,
    #[serde(default)]
    pub answers: serde_json::Value,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Assessment {
    pub fn from_new(input: NewAssessment, now: DateTime<Utc>) -> Self {
        let category_scores: BTreeMap<String, u8> = input
            .category_scores
            .into_iter()
            .map(|(id, score)| (id, score.min(100)))
            .collect();
        Self {
            id: format!("assessment-{}", uuid::Uuid::new_v4()),
            vendor_id: input.vendor_id,
            template_id: input.template_id,
            score: input.template_id.weighted_score(&category_scores),
            category_scores,
            answers: input.answers,
            notes: input.notes,
            created_at: now,
        }
    }
}

/// Risk bracket derived from a 0..=100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Critical,
            60..=79 => Self::High,
            40..=59 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Heuristic vendor risk score, clamped to 0..=100.
///
/// Base 30, plus category weight, contract value band, sensitive data
/// handling and assessment recency.
pub fn risk_score(vendor: &Vendor, now: DateTime<Utc>) -> u8 {
    let mut score: i64 = 30;

    score += match vendor.category {
        VendorCategory::Strategic => 30,
        VendorCategory::Operational => 20,
        VendorCategory::Tactical => 10,
    };

    score += match vendor.contract_value {
        v if v > 500_000 => 25,
        v if v > 100_000 => 15,
        _ => 5,
    };

    let data = vendor.data_types.to_lowercase();
    if data.contains("pii") || data.contains("phi") || data.contains("financial") {
        score += 20;
    }

    score += match vendor.last_assessment {
        Some(at) => {
            let days = (now - at).num_days();
            if days > 180 {
                15
            } else if days > 90 {
                10
            } else {
                -10
            }
        }
        None => 20,
    };

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn vendor(category: VendorCategory, value: u64, data: &str) -> Vendor {
        Vendor::from_new(
            NewVendor {
                name: "Acme".into(),
                category,
                contract_value: value,
                data_types: data.into(),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_risk_score_low_profile() {
        // 30 + 10 + 5 + 0 + 20 (never assessed)
        let v = vendor(VendorCategory::Tactical, 10_000, "");
        assert_eq!(v.risk_score, 65);
    }

    #[test]
    fn test_risk_score_clamped() {
        // 30 + 30 + 25 + 20 + 20 = 125 -> 100
        let v = vendor(VendorCategory::Strategic, 900_000, "PII, PHI");
        assert_eq!(v.risk_score, 100);
    }

    #[test]
    fn test_recent_assessment_lowers_risk() {
        let now = Utc::now();
        let mut v = vendor(VendorCategory::Operational, 200_000, "logs");
        let never = risk_score(&v, now);
        v.last_assessment = Some(now - Duration::days(10));
        let recent = risk_score(&v, now);
        v.last_assessment = Some(now - Duration::days(200));
        let stale = risk_score(&v, now);
        assert_eq!(never - recent, 30);
        assert!(stale > recent);
    }

    #[test]
    fn test_risk_level_brackets() {
        assert_eq!(RiskLevel::from_score(85), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
    }

    #[test]
    fn test_assessment_score_is_weighted_from_categories() {
        let mut category_scores = TemplateId::GdprCompliance.initial_scores();
        category_scores.insert("data_protection".into(), 250);
        category_scores.insert("breach_response".into(), 20);
        let a = Assessment::from_new(
            NewAssessment {
                vendor_id: "vendor-1".into(),
                template_id: TemplateId::GdprCompliance,
                category_scores,
                answers: serde_json::Value::Null,
                notes: String::new(),
            },
            Utc::now(),
        );
        // 100 * 0.30 + 70 * 0.25 + 70 * 0.25 + 20 * 0.20
        assert_eq!(a.score, 69);
        assert_eq!(a.category_scores["data_protection"], 100);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["categoryScores"]["breach_response"], 20);
    }

    #[test]
    fn test_sample_vendors_cycle_fixture_values() {
        let samples: Vec<NewVendor> = (0..12).map(sample_vendor).collect();
        assert_eq!(samples[0].name, "TechCorp 1");
        assert_eq!(samples[10].name, "TechCorp 11");
        assert_eq!(samples[1].category, VendorCategory::Operational);
        assert!(samples.iter().all(|v| v.data_types == "PII, Financial"));
        assert!(samples.iter().all(|v| (50_000..550_000).contains(&v.contract_value)));
    }

    #[test]
    fn test_vendor_json_is_camel_case() {
        let v = vendor(VendorCategory::Strategic, 1, "");
        let json = serde_json::to_value(&v).unwrap();
        assert!(json.get("contractValue").is_some());
        assert!(json.get("lastAssessment").is_some());
        assert_eq!(json["category"], "strategic");
    }
}
