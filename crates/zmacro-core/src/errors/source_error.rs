//! Data-access errors raised by a `DataSource`.

use super::error_code::{self, ErrorCode};
use super::StorageError;

/// A data-source query could not be answered.
///
/// This is the only error the resolver surfaces to its callers. Missing
/// rows are never an error; they become sentinels in the resolved text.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("query {query} failed: {message}")]
    QueryFailed { query: &'static str, message: String },

    #[error("data source unavailable: {message}")]
    Unavailable { message: String },

    #[error("invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            _ => error_code::SOURCE_ERROR,
        }
    }
}
