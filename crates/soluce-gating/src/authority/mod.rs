//! License validation authorities.
//!
//! An online authority is optional. Any `AuthorityError` is recovered by
//! falling back to offline validation; only an explicit `Rejected` verdict
//! blocks activation.

pub mod http;
pub mod offline;

use std::future::Future;

use chrono::{DateTime, Utc};

use soluce_core::Tier;

use crate::license_key::LicenseKey;

pub use http::HttpLicenseAuthority;
pub use offline::validate_offline;

/// Outcome of a validation that reached a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorityVerdict {
    Valid {
        /// Tier granted. `None` means "as named by the key prefix".
        tier: Option<Tier>,
        expires_at: Option<DateTime<Utc>>,
        email: Option<String>,
    },
    Rejected {
        reason: String,
    },
}

/// The authority could not reach a decision.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    #[error("license authority unreachable: {0}")]
    Unreachable(String),

    #[error("license authority response unreadable: {0}")]
    BadResponse(String),

    #[error("license authority timed out after {0}ms")]
    TimedOut(u64),
}

/// A remote source of truth for license keys.
pub trait LicenseAuthority: Send + Sync {
    fn validate(
        &self,
        key: &LicenseKey,
        product: &str,
    ) -> impl Future<Output = Result<AuthorityVerdict, AuthorityError>> + Send;
}

/// Stand-in when no online authority is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuthority;

impl LicenseAuthority for NoAuthority {
    async fn validate(
        &self,
        _key: &LicenseKey,
        _product: &str,
    ) -> Result<AuthorityVerdict, AuthorityError> {
        Err(AuthorityError::Unreachable(
            "no license authority configured".to_string(),
        ))
    }
}

impl From<AuthorityError> for soluce_core::GateError {
    fn from(e: AuthorityError) -> Self {
        soluce_core::GateError::NetworkValidation {
            reason: e.to_string(),
        }
    }
}
