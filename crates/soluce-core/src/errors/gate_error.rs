//! Gating engine error types (thiserror).
//!
//! Limit denials are not errors: they come back as a `Denial` value.
//! These variants cover the cases a caller must actually handle.

use crate::templates::TemplateId;
use crate::tier::Tier;

use super::error_code::{self, SoluceErrorCode};
use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(
        "Invalid license key format: expected TIER-XXXX-XXXX-XXXX-XXXX \
         (tier one of FREE, PRO, ENTERPRISE)"
    )]
    InvalidLicenseFormat,

    #[error("License key rejected: {reason}")]
    LicenseRejected { reason: String },

    #[error("Online license validation failed: {reason}")]
    NetworkValidation { reason: String },

    #[error("Template '{}' is not available on the {tier} plan", template.as_str())]
    TemplateNotAllowed { template: TemplateId, tier: Tier },

    #[error("Vendor not found: {0}")]
    VendorNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Store failures, including records that cannot be encoded or decoded.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SoluceErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLicenseFormat => error_code::INVALID_LICENSE_FORMAT,
            Self::LicenseRejected { .. } => error_code::LICENSE_REJECTED,
            Self::NetworkValidation { .. } => error_code::NETWORK_VALIDATION_FAILED,
            Self::TemplateNotAllowed { .. } => error_code::TEMPLATE_NOT_ALLOWED,
            Self::VendorNotFound(_) => error_code::NOT_FOUND,
            Self::Config(_) => error_code::CONFIG_ERROR,
            Self::Storage(e) => e.error_code(),
        }
    }
}

pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_code_passes_through() {
        let err = GateError::from(StorageError::DbBusy);
        assert_eq!(err.error_code(), error_code::DB_BUSY);
    }

    #[test]
    fn test_corrupt_record_maps_to_serialization_code() {
        let err = GateError::from(StorageError::Decode {
            key: "vendors".into(),
            message: "unknown variant `critical`".into(),
        });
        assert_eq!(err.error_code(), error_code::SERIALIZATION_ERROR);
        assert!(err.to_string().contains("vendors"));
    }

    #[test]
    fn test_template_message_names_plan() {
        let err = GateError::TemplateNotAllowed {
            template: TemplateId::Iso27001,
            tier: Tier::Free,
        };
        assert_eq!(
            err.to_string(),
            "Template 'iso27001' is not available on the Free plan"
        );
    }
}
