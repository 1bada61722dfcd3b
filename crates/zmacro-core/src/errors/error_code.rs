//! Stable error codes shared by every error enum.

/// Trait giving every zmacro error a stable, machine-readable code.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "SOURCE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SOURCE_ERROR: &str = "SOURCE_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const RESOLVE_ERROR: &str = "RESOLVE_ERROR";
