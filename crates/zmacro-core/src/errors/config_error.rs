//! Configuration errors, keyed by the setting that caused them.

use std::fmt;

use super::error_code::{self, ErrorCode};

/// A tunable setting: its dotted TOML path and its `ZMACRO_*` override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    HistoryPeriod,
    TextTrimLength,
    StoragePath,
    ReadPoolSize,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::HistoryPeriod,
        ConfigKey::TextTrimLength,
        ConfigKey::StoragePath,
        ConfigKey::ReadPoolSize,
    ];

    /// Dotted path in `zmacro.toml`.
    pub fn toml_path(self) -> &'static str {
        match self {
            ConfigKey::HistoryPeriod => "resolver.history_period",
            ConfigKey::TextTrimLength => "resolver.text_trim_length",
            ConfigKey::StoragePath => "storage.path",
            ConfigKey::ReadPoolSize => "storage.read_pool_size",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::HistoryPeriod => "ZMACRO_HISTORY_PERIOD",
            ConfigKey::TextTrimLength => "ZMACRO_TEXT_TRIM_LENGTH",
            ConfigKey::StoragePath => "ZMACRO_STORAGE_PATH",
            ConfigKey::ReadPoolSize => "ZMACRO_READ_POOL_SIZE",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.toml_path())
    }
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("{key} must be greater than 0 (check zmacro.toml and {env})", env = .key.env_var())]
    NotPositive { key: ConfigKey },

    #[error("{key} must not be empty (check zmacro.toml and {env})", env = .key.env_var())]
    Empty { key: ConfigKey },

    /// An environment override that does not parse. Reported, then ignored.
    #[error("{env}={value:?} is not a valid value for {key}", env = .key.env_var())]
    InvalidEnvValue { key: ConfigKey, value: String },
}

impl ConfigError {
    /// The setting at fault, when there is one.
    pub fn key(&self) -> Option<ConfigKey> {
        match self {
            ConfigError::NotPositive { key }
            | ConfigError::Empty { key }
            | ConfigError::InvalidEnvValue { key, .. } => Some(*key),
            ConfigError::FileNotFound { .. } | ConfigError::ParseError { .. } => None,
        }
    }
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
