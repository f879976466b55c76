//! Structured logging for the viewer.
//!
//! Logs are written to stdout as JSON, one event per line.
//!
//! # Telemetry invariants
//!
//! - **No link keys or decrypted text** may appear in any span attribute or
//!   log field. Recipient ids and resolution kinds are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init_telemetry;
