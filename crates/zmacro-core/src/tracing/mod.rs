//! Observability for zmacro: `tracing` with an `EnvFilter`.

pub mod setup;

pub use setup::init_tracing;
