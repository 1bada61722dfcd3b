//! Top-level zmacro configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ResolverConfig, StorageConfig};
use crate::errors::{ConfigError, ConfigKey};

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`ZMACRO_*`)
/// 3. Project config (`zmacro.toml` in project root)
/// 4. User config (`~/.zmacro/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ZmacroConfig {
    pub resolver: ResolverConfig,
    pub storage: StorageConfig,
}

/// Programmatic overrides, applied last.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub history_period: Option<u64>,
    pub text_trim_length: Option<usize>,
    pub storage_path: Option<String>,
    pub read_pool_size: Option<usize>,
}

impl ZmacroConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&Overrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join("zmacro.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ZmacroConfig) -> Result<(), ConfigError> {
        if config.resolver.history_period == Some(0) {
            return Err(ConfigError::NotPositive {
                key: ConfigKey::HistoryPeriod,
            });
        }
        if config.resolver.text_trim_length == Some(0) {
            return Err(ConfigError::NotPositive {
                key: ConfigKey::TextTrimLength,
            });
        }
        if let Some(ref path) = config.storage.path {
            if path.trim().is_empty() {
                return Err(ConfigError::Empty {
                    key: ConfigKey::StoragePath,
                });
            }
        }
        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".zmacro").join("config.toml"))
    }

    /// Merge a TOML file into the existing config. Unknown keys are ignored.
    fn merge_toml_file(config: &mut ZmacroConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ZmacroConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut ZmacroConfig, other: &ZmacroConfig) {
        if other.resolver.history_period.is_some() {
            base.resolver.history_period = other.resolver.history_period;
        }
        if other.resolver.text_trim_length.is_some() {
            base.resolver.text_trim_length = other.resolver.text_trim_length;
        }
        if other.storage.path.is_some() {
            base.storage.path = other.storage.path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }
    }

    /// One `ZMACRO_*` variable per [`ConfigKey`]. Values that do not parse
    /// are logged and ignored.
    fn apply_env_overrides(config: &mut ZmacroConfig) {
        for key in ConfigKey::ALL {
            let Ok(val) = std::env::var(key.env_var()) else {
                continue;
            };
            if let Err(e) = Self::apply_env_value(config, key, val) {
                tracing::warn!(error = %e, "ignoring environment override");
            }
        }
    }

    fn apply_env_value(
        config: &mut ZmacroConfig,
        key: ConfigKey,
        val: String,
    ) -> Result<(), ConfigError> {
        let invalid = |value: &str| ConfigError::InvalidEnvValue {
            key,
            value: value.to_string(),
        };
        match key {
            ConfigKey::HistoryPeriod => {
                config.resolver.history_period = Some(val.parse().map_err(|_| invalid(&val))?);
            }
            ConfigKey::TextTrimLength => {
                config.resolver.text_trim_length = Some(val.parse().map_err(|_| invalid(&val))?);
            }
            ConfigKey::StoragePath => config.storage.path = Some(val),
            ConfigKey::ReadPoolSize => {
                config.storage.read_pool_size = Some(val.parse().map_err(|_| invalid(&val))?);
            }
        }
        Ok(())
    }

    fn apply_overrides(config: &mut ZmacroConfig, o: &Overrides) {
        if let Some(v) = o.history_period {
            config.resolver.history_period = Some(v);
        }
        if let Some(v) = o.text_trim_length {
            config.resolver.text_trim_length = Some(v);
        }
        if let Some(ref v) = o.storage_path {
            config.storage.path = Some(v.clone());
        }
        if let Some(v) = o.read_pool_size {
            config.storage.read_pool_size = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
