//! Configuration system for zmacro.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod resolver_config;
pub mod storage_config;
pub mod zmacro_config;

pub use resolver_config::ResolverConfig;
pub use storage_config::StorageConfig;
pub use zmacro_config::{Overrides, ZmacroConfig};
