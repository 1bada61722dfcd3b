//! Error handling for zmacro.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod resolve_error;
pub mod source_error;
pub mod storage_error;

pub use config_error::{ConfigError, ConfigKey};
pub use error_code::ErrorCode;
pub use resolve_error::ResolveError;
pub use source_error::SourceError;
pub use storage_error::StorageError;
