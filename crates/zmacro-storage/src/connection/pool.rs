//! ReadPool: read-only connections shared by concurrent resolution batches.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OpenFlags};
use zmacro_core::config::StorageConfig;
use zmacro_core::errors::StorageError;

use super::pragmas::apply_read_pragmas;
use crate::migrations::{self, LATEST_VERSION};
use crate::sqlite_err;

/// A pool of read-only SQLite connections.
///
/// A batch takes the first idle connection after the round-robin cursor and
/// only waits when every connection is held by another batch.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `config.effective_read_pool_size()` readers on a migrated database.
    pub fn open(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let size = config.effective_read_pool_size();
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(sqlite_err)?;
            apply_read_pragmas(&conn)?;
            let version = migrations::current_version(&conn)?;
            if version != LATEST_VERSION {
                return Err(StorageError::MigrationFailed {
                    version,
                    message: format!("reader sees schema v{version}, expected v{LATEST_VERSION}"),
                });
            }
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Execute a closure with a read connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.acquire()?;
        f(&guard)
    }

    fn acquire(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        let len = self.connections.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % len;
        for offset in 0..len {
            let idx = (start + offset) % len;
            if let Ok(guard) = self.connections[idx].try_lock() {
                return Ok(guard);
            }
        }
        tracing::debug!(readers = len, "all read connections busy, waiting");
        self.connections[start]
            .lock()
            .map_err(|_| StorageError::SqliteError {
                message: "read pool lock poisoned".to_string(),
            })
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }
}
