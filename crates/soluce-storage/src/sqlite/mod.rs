//! SQLite backend: connection PRAGMAs, migrations, store engine.

pub mod engine;
pub mod migrations;
pub mod pragmas;

pub use engine::SqliteStore;

use soluce_core::StorageError;

/// Map a rusqlite error, singling out SQLITE_BUSY.
pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    if matches!(
        e,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::DatabaseBusy,
                ..
            },
            _,
        )
    ) {
        return StorageError::DbBusy;
    }
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
