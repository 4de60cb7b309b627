//! Schema versioning using PRAGMA user_version.
//!
//! - No extra tables for version tracking
//! - Each version bump is a const SQL string

use rusqlite::Connection;
use tracing::info;

use soluce_core::StorageError;

use crate::kv::StorageResult;

use super::sqlite_err;

/// Current schema version. Bump this when adding new migrations.
pub const CURRENT_VERSION: u32 = 1;

const KV_TABLES_V1: &str = "
    CREATE TABLE IF NOT EXISTS kv_entries (
        key        TEXT PRIMARY KEY NOT NULL,
        value      TEXT NOT NULL,
        updated_at INTEGER NOT NULL DEFAULT (unixepoch())
    ) STRICT;
";

pub fn get_schema_version(conn: &Connection) -> StorageResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))
        .map_err(sqlite_err)
}

fn set_schema_version(conn: &Connection, version: u32) -> StorageResult<()> {
    conn.pragma_update(None, "user_version", version)
        .map_err(sqlite_err)
}

/// Run all pending migrations. Returns the version migrated to.
pub fn migrate(conn: &Connection) -> StorageResult<u32> {
    let current = get_schema_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(current);
    }

    if current < 1 {
        info!("Migrating store schema: 0 → 1 (kv_entries)");
        conn.execute_batch(KV_TABLES_V1)
            .map_err(|e| StorageError::MigrationFailed {
                version: 1,
                message: e.to_string(),
            })?;
        set_schema_version(conn, 1)?;
    }

    let final_version = get_schema_version(conn)?;
    info!(from = current, to = final_version, "Store schema migration complete");
    Ok(final_version)
}
