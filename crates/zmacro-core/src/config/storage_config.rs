//! Storage configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_READ_POOL_SIZE: usize = 4;
const MAX_READ_POOL_SIZE: usize = 8;

/// Configuration for the SQLite data source.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. `None` means the caller decides (usually in-memory).
    pub path: Option<String>,
    /// Number of read connections. Default: 4, clamped to 1..=8.
    pub read_pool_size: Option<usize>,
}

impl StorageConfig {
    /// Returns the effective read pool size, clamped to 1..=8.
    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size
            .unwrap_or(DEFAULT_READ_POOL_SIZE)
            .clamp(1, MAX_READ_POOL_SIZE)
    }
}
