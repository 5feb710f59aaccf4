//! # Observability
//!
//! Structured logging via `tracing`. Evaluations emit one `debug` event each,
//! grid guard adjustments are `trace`, and clamped session parameters are
//! `warn`.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  PatternEngine / Session / antviz CLI    │
//! │  tracing::{trace, debug, warn}!()        │
//! └────────────────────┬─────────────────────┘
//!                      ▼
//!              ┌───────────────┐
//!              │ EnvFilter     │  RUST_LOG or LogConfig
//!              └───────┬───────┘
//!                      ▼
//!            stderr / log file (JSON, Pretty, Compact)
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
