//! Resolver configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HISTORY_PERIOD, DEFAULT_TEXT_TRIM_LENGTH};

/// Configuration for the resolution engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Lookback window for "last value" lookups, in seconds. Default: 86400.
    pub history_period: Option<u64>,
    /// Length at which character/text/log values are shortened. Default: 20.
    pub text_trim_length: Option<usize>,
}

impl ResolverConfig {
    /// Returns the effective history period, defaulting to one day.
    pub fn effective_history_period(&self) -> u64 {
        self.history_period.unwrap_or(DEFAULT_HISTORY_PERIOD)
    }

    /// Returns the effective trim length, defaulting to 20.
    pub fn effective_text_trim_length(&self) -> usize {
        self.text_trim_length.unwrap_or(DEFAULT_TEXT_TRIM_LENGTH)
    }
}
