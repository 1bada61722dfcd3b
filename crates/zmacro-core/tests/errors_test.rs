//! Tests for the zmacro error handling system.

use std::collections::HashSet;

use zmacro_core::errors::error_code;
use zmacro_core::errors::*;

#[test]
fn test_every_error_has_a_code() {
    let codes = [
        SourceError::Unavailable { message: "down".into() }.error_code(),
        StorageError::DbBusy.error_code(),
        ConfigError::FileNotFound { path: "x".into() }.error_code(),
        ResolveError::UnknownTextConfig { name: "x".into() }.error_code(),
    ];
    for code in codes {
        assert!(!code.is_empty());
    }
}

#[test]
fn test_storage_codes_are_distinct() {
    let codes: HashSet<&str> = [
        StorageError::SqliteError { message: "x".into() }.error_code(),
        StorageError::MigrationFailed { version: 1, message: "x".into() }.error_code(),
        StorageError::DbBusy.error_code(),
    ]
    .into_iter()
    .collect();
    assert_eq!(codes.len(), 3);
}

#[test]
fn test_storage_error_keeps_code_through_source_error() {
    let source: SourceError = StorageError::DbBusy.into();
    assert_eq!(source.error_code(), error_code::DB_BUSY);

    let resolve: ResolveError = source.into();
    assert_eq!(resolve.error_code(), error_code::DB_BUSY);
}

#[test]
fn test_coded_string_format() {
    let err = SourceError::QueryFailed {
        query: "fetch_hosts",
        message: "no such table".into(),
    };
    assert_eq!(
        err.coded_string(),
        "[SOURCE_ERROR] query fetch_hosts failed: no such table"
    );
}

#[test]
fn test_config_error_through_resolve_error() {
    let err: ResolveError = ConfigError::NotPositive {
        key: ConfigKey::HistoryPeriod,
    }
    .into();
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);
    assert!(err.to_string().contains("resolver.history_period"));
}

#[test]
fn test_config_keys_name_path_and_variable() {
    let paths: HashSet<&str> = ConfigKey::ALL.iter().map(|k| k.toml_path()).collect();
    let vars: HashSet<&str> = ConfigKey::ALL.iter().map(|k| k.env_var()).collect();
    assert_eq!(paths.len(), ConfigKey::ALL.len());
    assert_eq!(vars.len(), ConfigKey::ALL.len());
    assert!(vars.iter().all(|v| v.starts_with("ZMACRO_")));

    let err = ConfigError::InvalidEnvValue {
        key: ConfigKey::ReadPoolSize,
        value: "lots".into(),
    };
    assert_eq!(
        err.to_string(),
        "ZMACRO_READ_POOL_SIZE=\"lots\" is not a valid value for storage.read_pool_size"
    );
    assert_eq!(err.key(), Some(ConfigKey::ReadPoolSize));
    assert_eq!(ConfigError::FileNotFound { path: "x".into() }.key(), None);
}
