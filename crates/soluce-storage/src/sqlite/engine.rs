//! `SqliteStore` — SQLite-backed `KeyValueStore`.
//!
//! The only place in the crate that holds a `Mutex<Connection>`.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use soluce_core::StorageError;

use crate::kv::{KeyValueStore, StorageResult};

use super::{migrations, pragmas, sqlite_err};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a file-backed store and run migrations.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(sqlite_err)?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "Opened SQLite store");
        Ok(store)
    }

    /// Open an in-memory store (tests, ephemeral sessions).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory().map_err(sqlite_err)?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        pragmas::configure_connection(&conn)?;
        migrations::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Schema version currently applied.
    pub fn schema_version(&self) -> StorageResult<u32> {
        self.with_conn(migrations::get_schema_version)
    }

    /// Run raw SQL. Used by tests to simulate a broken database.
    pub fn execute_batch(&self, sql: &str) -> StorageResult<()> {
        self.with_conn(|conn| conn.execute_batch(sql).map_err(sqlite_err))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StorageResult<T>) -> StorageResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(sqlite_err)
        })
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, unixepoch())
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )
            .map(|_| ())
            .map_err(sqlite_err)
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![key])
                .map(|_| ())
                .map_err(sqlite_err)
        })
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.with_conn(|conn| {
            // substr comparison instead of LIKE: keys may contain '_' and '%'.
            let mut stmt = conn
                .prepare(
                    "SELECT key FROM kv_entries
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key ASC",
                )
                .map_err(sqlite_err)?;
            let rows = stmt
                .query_map(params![prefix], |row| row.get::<_, String>(0))
                .map_err(sqlite_err)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
        })
    }
}
