//! Logging setup and span helpers shared by the leadboard binaries.
//!
//! - **Logging**: human-readable or JSON output via `tracing-subscriber`,
//!   with the level taken from `RUST_LOG`, then `-v` flags, then config.
//! - **Tracing**: per-command operation spans carrying a trace id so the
//!   log lines of one status change can be correlated.

pub mod logging;
pub mod tracing_setup;
