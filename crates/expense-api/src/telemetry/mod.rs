//! Structured logging for the expense service.
//!
//! # Telemetry invariants
//!
//! - Credentials and the database connection string must never appear in any
//!   span attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
