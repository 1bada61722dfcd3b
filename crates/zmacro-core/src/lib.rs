//! Core crate for the zmacro resolution engine.
//!
//! Holds the read-only record types the engine consumes, typed ids, the
//! `DataSource` collaborator contract, error enums, layered configuration
//! and tracing setup. No resolution logic lives here.

pub mod config;
pub mod constants;
pub mod errors;
pub mod source;
pub mod tracing;
pub mod types;

pub use source::{DataSource, MemorySource};
