//! Upgrade links shown alongside denial messages.

use serde::{Deserialize, Serialize};

use crate::tier::Tier;

pub const DEFAULT_PRO_PAYMENT_LINK: &str = "https://buy.stripe.com/test_your-pro-license-link";
pub const DEFAULT_ENTERPRISE_PAYMENT_LINK: &str =
    "https://buy.stripe.com/test_your-enterprise-license-link";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UpgradeConfig {
    pub pro_payment_link: Option<String>,
    pub enterprise_payment_link: Option<String>,
}

impl UpgradeConfig {
    /// Payment link for a tier. Free has none.
    pub fn payment_link(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Free => None,
            Tier::Pro => Some(
                self.pro_payment_link
                    .as_deref()
                    .unwrap_or(DEFAULT_PRO_PAYMENT_LINK),
            ),
            Tier::Enterprise => Some(
                self.enterprise_payment_link
                    .as_deref()
                    .unwrap_or(DEFAULT_ENTERPRISE_PAYMENT_LINK),
            ),
        }
    }
}
