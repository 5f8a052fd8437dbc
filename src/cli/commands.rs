//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use crate::demos::DemoCatalog;
use crate::runner::Runner;
use crate::runner::process::ProcessExecutor;
use crate::runner::report::Reporter;

use super::{CliError, CliResult, ExitCode};

/// Compile and run the test suite.
pub fn run_tests<E: ProcessExecutor, R: Reporter>(runner: &mut Runner<E, R>, args: &[String]) -> CliResult<ExitCode> {
    let suite = runner.config().test_suite.clone();
    if !suite.is_file() {
        return Err(CliError::failure(format!(
            "Test suite {} not found",
            suite.display()
        )));
    }

    runner.compile_and_run(&suite, args)?;
    Ok(ExitCode::SUCCESS)
}

/// Compile and run the demo called `name`.
///
/// The demo must exist before anything is spawned; a missing one is a usage error.
pub fn run_demo<E: ProcessExecutor, R: Reporter>(
    runner: &mut Runner<E, R>,
    name: &str,
    args: &[String],
) -> CliResult<ExitCode> {
    let source = DemoCatalog::from_config(runner.config()).resolve(name)?;
    runner.compile_and_run(&source, args)?;
    Ok(ExitCode::SUCCESS)
}

/// Print every demo name.
pub fn list_demos(catalog: &DemoCatalog) -> CliResult<ExitCode> {
    let names = catalog.names()?;
    print!("{}", render_demo_list(catalog.dir(), &names));
    Ok(ExitCode::SUCCESS)
}

/// Listing text: a header line, then one indented name per line.
pub fn render_demo_list(dir: &Path, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No demos found in {}\n", dir.display());
    }

    let mut out = format!("Available demos in {}:\n", dir.display());
    for name in names {
        out.push_str("  ");
        out.push_str(name);
        out.push('\n');
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
