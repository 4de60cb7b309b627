//! Persistent store errors.

use super::error_code::{self, SoluceErrorCode};

/// Errors raised by a key-value store backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Could not encode record for {key}: {message}")]
    Encode { key: String, message: String },

    #[error("Stored record at {key} is unreadable: {message}")]
    Decode { key: String, message: String },
}

impl SoluceErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::Unavailable { .. } => error_code::STORAGE_UNAVAILABLE,
            Self::Encode { .. } | Self::Decode { .. } => error_code::SERIALIZATION_ERROR,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
