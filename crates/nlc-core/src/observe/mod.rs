//! # Observability
//!
//! Structured logging through `tracing`. Pipeline stages emit `debug` events
//! per transform; the scenario engine emits `info` milestones.

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
