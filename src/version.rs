//! Runner version information.
//!
//! Taken from Cargo metadata at compile time so the CLI and log output agree on one value.

/// The yoru runner version string (for example, `0.1.0`).
pub const YORU_VERSION: &str = env!("CARGO_PKG_VERSION");
