//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Where the key-value store lives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database. `None` = in-memory.
    pub db_path: Option<String>,
}

impl StorageConfig {
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_deref().map_or(true, |p| p.trim().is_empty())
    }
}
