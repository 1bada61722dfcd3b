//! SQLite-backed `DataSource` for the zmacro resolution engine.
//!
//! One serialized writer, a round-robin pool of read-only connections,
//! schema migrations keyed on `PRAGMA user_version` and one query module
//! per table. All selects take id batches and chunk them below SQLite's
//! host-parameter limit.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod source;

pub use connection::DatabaseManager;
pub use source::SqliteSource;

use zmacro_core::errors::StorageError;

/// Convert a rusqlite error, keeping lock contention distinguishable.
pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    match e.sqlite_error_code() {
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
            StorageError::DbBusy
        }
        _ => StorageError::SqliteError {
            message: e.to_string(),
        },
    }
}
