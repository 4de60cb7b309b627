//! License activation and deactivation.
//!
//! Order: syntax check, optional online validation under a timeout,
//! offline fallback, then persist. A network failure never blocks
//! activation; an explicit rejection does.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use soluce_core::config::LicenseConfig;
use soluce_core::{GateError, GateResult, Tier};
use soluce_storage::{LicenseData, LicenseRecord, LicenseRecordRepository};

use crate::authority::{validate_offline, AuthorityError, AuthorityVerdict, LicenseAuthority};
use crate::clock::Clock;
use crate::license_key::LicenseKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationOutcome {
    /// Tier in effect after activation. Free for an expired key.
    pub tier: Tier,
    pub message: String,
    /// Non-blocking notice, e.g. the key has expired.
    pub warning: Option<String>,
    pub validated_online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeactivationOutcome {
    pub message: String,
}

pub struct LicenseActivator<A> {
    licenses: LicenseRecordRepository,
    config: LicenseConfig,
    authority: Option<A>,
    clock: Arc<dyn Clock>,
}

impl<A: LicenseAuthority> LicenseActivator<A> {
    pub fn new(
        licenses: LicenseRecordRepository,
        config: LicenseConfig,
        authority: Option<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            licenses,
            config,
            authority,
            clock,
        }
    }

    pub fn has_online_authority(&self) -> bool {
        self.authority.is_some()
    }

    pub async fn activate(&self, raw_key: &str, attempt_online: bool) -> GateResult<ActivationOutcome> {
        let key = LicenseKey::parse(raw_key)?;

        let (verdict, validated_online) = match (&self.authority, attempt_online) {
            (Some(authority), true) => match self.validate_online(authority, &key).await {
                Ok(verdict) => (verdict, true),
                Err(e) => {
                    warn!(key = %key, error = %e, "Online validation failed, falling back to offline");
                    (validate_offline(&key, &self.config), false)
                }
            },
            _ => (validate_offline(&key, &self.config), false),
        };

        let (tier, expires_at, email) = match verdict {
            AuthorityVerdict::Valid {
                tier,
                expires_at,
                email,
            } => (tier.unwrap_or(key.tier()), expires_at, email),
            AuthorityVerdict::Rejected { reason } => {
                warn!(key = %key, reason = %reason, "License key rejected");
                return Err(GateError::LicenseRejected { reason });
            }
        };

        let now = self.clock.now();
        let record = LicenseRecord::new(
            key.as_str(),
            tier,
            now,
            LicenseData {
                email,
                validated_at: now,
                online: validated_online,
            },
            expires_at,
        );
        self.licenses.save(&record)?;

        if record.is_expired(now) {
            let expired_on = expires_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            warn!(key = %key, expired_on = %expired_on, "Activated an expired license");
            return Ok(ActivationOutcome {
                tier: Tier::Free,
                message: "License key recorded".to_string(),
                warning: Some(format!(
                    "This license expired on {expired_on}. You are on the Free plan until it is renewed."
                )),
                validated_online,
            });
        }

        info!(key = %key, tier = %tier, online = validated_online, "License activated");
        Ok(ActivationOutcome {
            tier,
            message: format!("{tier} license activated successfully"),
            warning: None,
            validated_online,
        })
    }

    async fn validate_online(
        &self,
        authority: &A,
        key: &LicenseKey,
    ) -> Result<AuthorityVerdict, AuthorityError> {
        let timeout_ms = self.config.effective_online_timeout_ms();
        let product = self.config.effective_product_id();
        tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            authority.validate(key, product),
        )
        .await
        .map_err(|_| AuthorityError::TimedOut(timeout_ms))?
    }

    /// Remove the license record. Storage failures are surfaced.
    pub fn deactivate(&self) -> GateResult<DeactivationOutcome> {
        self.licenses.remove()?;
        info!("License deactivated");
        Ok(DeactivationOutcome {
            message: "License deactivated".to_string(),
        })
    }
}
