//! Offline validation: the key's own structure, minus the revoked list.

use soluce_core::config::LicenseConfig;

use super::AuthorityVerdict;
use crate::license_key::LicenseKey;

pub fn validate_offline(key: &LicenseKey, config: &LicenseConfig) -> AuthorityVerdict {
    if config.is_revoked(key.as_str()) {
        return AuthorityVerdict::Rejected {
            reason: "License key has been revoked".to_string(),
        };
    }
    AuthorityVerdict::Valid {
        tier: Some(key.tier()),
        expires_at: None,
        email: None,
    }
}
