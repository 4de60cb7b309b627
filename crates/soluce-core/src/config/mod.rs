pub mod license_config;
pub mod storage_config;
pub mod upgrade_config;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{GateError, GateResult};

pub use license_config::LicenseConfig;
pub use storage_config::StorageConfig;
pub use upgrade_config::UpgradeConfig;

pub const ENV_LICENSE_API_URL: &str = "SOLUCE_LICENSE_API_URL";
pub const ENV_PRO_PAYMENT_LINK: &str = "SOLUCE_PRO_PAYMENT_LINK";
pub const ENV_ENTERPRISE_PAYMENT_LINK: &str = "SOLUCE_ENTERPRISE_PAYMENT_LINK";

/// Substrings that mark a value as an unfilled placeholder.
const PLACEHOLDER_MARKERS: &[&str] = &["your_", "test_", "xxxxx", "placeholder"];

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SoluceConfig {
    pub storage: StorageConfig,
    pub license: LicenseConfig,
    pub upgrade: UpgradeConfig,
}

/// A non-fatal configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl SoluceConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> GateResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GateError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&content)
            .map_err(|e| GateError::Config(format!("invalid TOML in {}: {e}", path.display())))
    }

    /// Apply `SOLUCE_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_LICENSE_API_URL) {
            self.license.license_api_url = Some(url);
        }
        if let Some(link) = get(ENV_PRO_PAYMENT_LINK) {
            self.upgrade.pro_payment_link = Some(link);
        }
        if let Some(link) = get(ENV_ENTERPRISE_PAYMENT_LINK) {
            self.upgrade.enterprise_payment_link = Some(link);
        }
    }

    /// Report placeholder or malformed values. Never fails: every field has
    /// a usable default.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let checks: [(&'static str, Option<&str>); 3] = [
            ("license.license_api_url", self.license.license_api_url.as_deref()),
            ("upgrade.pro_payment_link", self.upgrade.pro_payment_link.as_deref()),
            (
                "upgrade.enterprise_payment_link",
                self.upgrade.enterprise_payment_link.as_deref(),
            ),
        ];

        for (field, value) in checks {
            let Some(value) = value else { continue };
            if PLACEHOLDER_MARKERS.iter().any(|m| value.contains(m)) {
                warnings.push(ConfigWarning {
                    field,
                    message: format!("'{value}' appears to be a placeholder value"),
                });
            } else if !value.starts_with("http://") && !value.starts_with("https://") {
                warnings.push(ConfigWarning {
                    field,
                    message: format!("'{value}' is not an http(s) URL"),
                });
            }
        }

        if self.license.effective_online_timeout_ms() == 0 {
            warnings.push(ConfigWarning {
                field: "license.online_timeout_ms",
                message: "timeout of 0ms makes every online validation fall back to offline"
                    .to_string(),
            });
        }

        for w in &warnings {
            warn!(field = w.field, message = %w.message, "Configuration warning");
        }
        warnings
    }
}
