//! Persisted record shapes. JSON field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use soluce_core::Tier;

/// Tier fields tolerate corrupted or unknown values by reading them as Free.
fn lenient_tier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tier, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Tier::normalize).unwrap_or_default())
}

/// Extra data captured at activation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub validated_at: DateTime<Utc>,
    /// Whether the online authority confirmed the key.
    #[serde(default)]
    pub online: bool,
}

/// Proof of a key-based activation. At most one is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRecord {
    pub key: String,
    #[serde(deserialize_with = "lenient_tier")]
    pub tier: Tier,
    pub activated_at: DateTime<Utc>,
    pub data: LicenseData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// blake3 over the identifying fields. A hand-edited record fails
    /// `verify_seal`.
    #[serde(default)]
    pub seal: String,
}

impl LicenseRecord {
    pub fn new(
        key: impl Into<String>,
        tier: Tier,
        activated_at: DateTime<Utc>,
        data: LicenseData,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut record = Self {
            key: key.into(),
            tier,
            activated_at,
            data,
            expires_at,
            seal: String::new(),
        };
        record.seal = record.compute_seal();
        record
    }

    fn compute_seal(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.key.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.tier.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(&self.activated_at.timestamp_millis().to_le_bytes());
        hasher.update(b"\0");
        if let Some(expires) = self.expires_at {
            hasher.update(&expires.timestamp_millis().to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    pub fn verify_seal(&self) -> bool {
        !self.seal.is_empty() && self.seal == self.compute_seal()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Purchase made through the payment flow rather than a license key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseToken {
    pub product: String,
    #[serde(deserialize_with = "lenient_tier")]
    pub tier: Tier,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Envelope stored under `purchase_tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTokenStorage {
    #[serde(default)]
    pub tokens: Vec<PurchaseToken>,
    pub last_updated: DateTime<Utc>,
}

/// Metered usage for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyUsage {
    /// "YYYY-MM".
    pub month: String,
    pub count: u32,
    pub last_reset: DateTime<Utc>,
}

impl MonthlyUsage {
    pub fn fresh(month: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            month: month.into(),
            count: 0,
            last_reset: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: Option<DateTime<Utc>>) -> LicenseRecord {
        let now = Utc::now();
        LicenseRecord::new(
            "PRO-AAAA-BBBB-CCCC-DDDD",
            Tier::Pro,
            now,
            LicenseData {
                email: None,
                validated_at: now,
                online: false,
            },
            expires_at,
        )
    }

    #[test]
    fn test_seal_survives_json_roundtrip() {
        let rec = record(Some(Utc::now() + Duration::days(30)));
        let json = serde_json::to_string(&rec).unwrap();
        let back: LicenseRecord = serde_json::from_str(&json).unwrap();
        assert!(back.verify_seal());
    }

    #[test]
    fn test_edited_tier_breaks_seal() {
        let rec = record(None);
        let json = serde_json::to_string(&rec)
            .unwrap()
            .replace("\"pro\"", "\"enterprise\"");
        let edited: LicenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(edited.tier, Tier::Enterprise);
        assert!(!edited.verify_seal());
    }

    #[test]
    fn test_corrupted_tier_reads_as_free() {
        let json = r#"{"product":"vendorsoluce","tier":"platinum","purchaseDate":"2026-01-01T00:00:00Z"}"#;
        let token: PurchaseToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.tier, Tier::Free);
        assert!(token.features.is_empty());
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(record(Some(now - Duration::days(1))).is_expired(now));
        assert!(!record(Some(now + Duration::days(1))).is_expired(now));
        assert!(!record(None).is_expired(now));
    }
}
