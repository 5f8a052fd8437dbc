#![forbid(unsafe_code)]
//! yoru build runner
//!
//! Compiles a single C source file (the test suite or a named demo), runs the produced executable, and deletes it
//! afterwards. Every step is a blocking subprocess gated on its exit code; the first failure ends the command.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `runner` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod demos;
pub mod platform;
pub mod runner;
pub mod version;

pub use config::RunnerConfig;
pub use demos::{DemoCatalog, DemoError};
pub use platform::Platform;
pub use runner::{BuildTarget, RunError, Runner};
