//! Engine-wide constants.

/// Substituted for a recognised, data-backed macro that has no value.
pub const UNRESOLVED_MACRO_STRING: &str = "*UNKNOWN*";

/// Substituted for a function id in an expression whose function, item or
/// host no longer exists.
pub const UNKNOWN_FUNCTION_STRING: &str = "*ERROR*";

/// Default lookback window for "last value" lookups, in seconds.
pub const DEFAULT_HISTORY_PERIOD: u64 = 86_400;

/// Default length at which character/text/log values are shortened.
pub const DEFAULT_TEXT_TRIM_LENGTH: usize = 20;

/// Highest slot number a numbered macro can reference (`{HOST.NAME9}`).
pub const MAX_SLOT: u8 = 9;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "ZMACRO_LOG";
