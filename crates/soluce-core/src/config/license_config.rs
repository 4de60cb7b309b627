//! License activation configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRODUCT_ID: &str = "vendorsoluce";
pub const DEFAULT_ONLINE_TIMEOUT_MS: u64 = 5_000;

/// Settings for license resolution and activation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LicenseConfig {
    /// Product identifier purchase tokens are matched against.
    /// Default: "vendorsoluce".
    pub product_id: Option<String>,
    /// Base URL of the license validation API. `None` disables online
    /// validation entirely.
    pub license_api_url: Option<String>,
    /// Upper bound on an online validation round-trip. Default: 5000ms.
    pub online_timeout_ms: Option<u64>,
    /// Keys refused by offline validation (normalized to uppercase on use).
    #[serde(default)]
    pub revoked_keys: Vec<String>,
}

impl LicenseConfig {
    pub fn effective_product_id(&self) -> &str {
        self.product_id.as_deref().unwrap_or(DEFAULT_PRODUCT_ID)
    }

    pub fn effective_online_timeout_ms(&self) -> u64 {
        self.online_timeout_ms.unwrap_or(DEFAULT_ONLINE_TIMEOUT_MS)
    }

    /// Whether `key` appears in the revoked list.
    pub fn is_revoked(&self, key: &str) -> bool {
        self.revoked_keys
            .iter()
            .any(|k| k.trim().eq_ignore_ascii_case(key.trim()))
    }
}
