//! Errors surfaced by resolver entry points.

use super::error_code::{self, ErrorCode};
use super::{ConfigError, SourceError};

/// Aggregates the failures a resolution batch can hit.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown text configuration: {name}")]
    UnknownTextConfig { name: String },
}

impl ErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Source(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::UnknownTextConfig { .. } => error_code::RESOLVE_ERROR,
        }
    }
}
