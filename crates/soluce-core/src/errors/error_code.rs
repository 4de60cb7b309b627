//! Stable error codes surfaced to the presentation layer.

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const STORAGE_UNAVAILABLE: &str = "STORAGE_UNAVAILABLE";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const DB_BUSY: &str = "DB_BUSY";
pub const INVALID_LICENSE_FORMAT: &str = "INVALID_LICENSE_FORMAT";
pub const LICENSE_REJECTED: &str = "LICENSE_REJECTED";
pub const NETWORK_VALIDATION_FAILED: &str = "NETWORK_VALIDATION_FAILED";
pub const TEMPLATE_NOT_ALLOWED: &str = "TEMPLATE_NOT_ALLOWED";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";

/// Implemented by every error enum in the workspace.
pub trait SoluceErrorCode {
    fn error_code(&self) -> &'static str;
}
