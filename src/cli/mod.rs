//! CLI module for the yoru build runner
//!
//! ## Commands
//!
//! - `test [args...]` - Compile and run the test suite
//! - `demo <name> [args...]` - Compile and run `<demo_dir>/<name>.c`
//! - `demo --list` / `demo -l` - List available demos
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. Unknown subcommands are captured rather than rejected
//! by clap so they can be reported in the same `[ERROR]: ...` + usage form as every other usage problem.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use miette::Diagnostic;

use crate::config::RunnerConfig;
use crate::demos::{DemoCatalog, DemoError};
use crate::runner::report::{ConsoleReporter, Reporter};
use crate::runner::{RunError, Runner};
use crate::version::YORU_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point catches these errors, prints the message as
/// an `[ERROR]` line, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message; empty when only the usage text should be shown
    pub message: String,
    /// Follow-up advice printed as a `[WARN]` line
    pub help: Option<String>,
    /// Print the usage text after the message
    pub show_usage: bool,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            help: None,
            show_usage: false,
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error: message, then the usage text, exit code 1.
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            show_usage: true,
            ..Self::failure(message)
        }
    }

    fn with_help(mut self, help: Option<String>) -> Self {
        self.help = help;
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        let help = err.help().map(|h| h.to_string());
        CliError::failure(err.to_string()).with_help(help)
    }
}

impl From<DemoError> for CliError {
    fn from(err: DemoError) -> Self {
        match err {
            DemoError::NotFound { .. } | DemoError::InvalidName(_) => CliError::usage(err.to_string()),
            DemoError::Directory { .. } => CliError::failure(err.to_string()),
        }
    }
}

/// Parse errors other than help/version become usage errors carrying clap's one-line summary.
impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let first = rendered.lines().next().unwrap_or_default();
        let message = first.strip_prefix("error: ").unwrap_or(first);
        CliError::usage(message)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Build and run the yoru test suite or a demo
#[derive(Parser, Debug)]
#[command(name = "yoru")]
#[command(version = YORU_VERSION)]
#[command(about = "Compile and run the yoru test suite or a demo", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Compiler executable (default: gcc)
    #[arg(long = "cc", value_name = "COMPILER")]
    pub compiler: Option<String>,

    /// Directory for compiled executables (default: build)
    #[arg(long = "build-dir", value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Directory holding demo sources (default: src/_examples)
    #[arg(long = "demo-dir", value_name = "DIR")]
    pub demo_dir: Option<PathBuf>,

    /// Test suite source (default: src/testing/yoru_tests.c)
    #[arg(long = "test-suite", value_name = "FILE")]
    pub test_suite: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // Neither subcommand defines flags (not even `-h`), so every argument reaches the program untouched.
    /// Compile and run the test suite
    #[command(disable_help_flag = true)]
    Test {
        /// Arguments passed to the test executable
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Compile and run a demo, or list demos with `--list` / `-l`
    #[command(disable_help_flag = true)]
    Demo {
        /// Demo name followed by arguments for the demo executable, or `--list` / `-l`
        #[arg(value_name = "NAME [ARGS]... | --list", trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Anything else; reported as an unknown command
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// What `demo` was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoRequest {
    List,
    Run { name: String, args: Vec<String> },
}

impl DemoRequest {
    /// Interpret the raw words after `demo`.
    ///
    /// `--list` / `-l` only counts as the first word; after a name everything belongs to the demo.
    pub fn from_words(words: &[String]) -> CliResult<Self> {
        let is_list = |word: &str| word == "--list" || word == "-l";
        match words {
            [] => Err(CliError::usage("Demo name is required")),
            [flag] if is_list(flag.as_str()) => Ok(DemoRequest::List),
            [flag, ..] if is_list(flag.as_str()) => Err(CliError::usage(format!("{flag} takes no arguments"))),
            [name, args @ ..] => Ok(DemoRequest::Run {
                name: name.clone(),
                args: args.to_vec(),
            }),
        }
    }
}

impl Cli {
    /// Default configuration with any command-line overrides applied.
    pub fn config(&self) -> RunnerConfig {
        let mut config = RunnerConfig::new();
        if let Some(compiler) = &self.compiler {
            config = config.with_compiler(compiler);
        }
        if let Some(dir) = &self.build_dir {
            config = config.with_build_dir(dir);
        }
        if let Some(dir) = &self.demo_dir {
            config = config.with_demo_dir(dir);
        }
        if let Some(path) = &self.test_suite {
            config = config.with_test_suite(path);
        }
        config
    }
}

/// Usage text printed after every usage error.
pub fn usage() -> String {
    [
        "Usage: yoru [options] <command> [args...]",
        "Commands:",
        "  test [args...]         - Run all tests",
        "  demo <name> [args...]  - Run a demo",
        "  demo --list | -l       - List available demos",
        "Run `yoru --help` for options.",
    ]
    .join("\n")
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command implementations return `CliResult` and
/// errors are handled here.
pub fn run() {
    let cli = match parse_command(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        // Help or version was printed
        Ok(None) => return,
        Err(e) => exit_with(e),
    };

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => exit_with(e),
    }
}

/// Parse process arguments.
///
/// Returns `Ok(None)` after printing `--help` or `--version` output.
pub fn parse_command<I, T>(args: I) -> CliResult<Option<Cli>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Execute the parsed command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.config();

    match cli.command {
        Some(Command::Test { args }) => commands::run_tests(&mut Runner::system(config), &args),
        Some(Command::Demo { words }) => match DemoRequest::from_words(&words)? {
            DemoRequest::List => commands::list_demos(&DemoCatalog::from_config(&config)),
            DemoRequest::Run { name, args } => commands::run_demo(&mut Runner::system(config), &name, &args),
        },
        Some(Command::External(args)) => {
            let name = args.first().map(String::as_str).unwrap_or_default();
            Err(CliError::usage(format!("Unknown command: {name}")))
        }
        // No command - show usage
        None => Err(CliError::usage("")),
    }
}

/// Print an error the way the runner logs, then exit.
fn exit_with(err: CliError) -> ! {
    report_error(&mut ConsoleReporter, &err);
    if err.show_usage {
        println!("{}", usage());
    }
    process::exit(err.exit_code.0);
}

/// Log an error and its advice.
pub fn report_error<R: Reporter>(reporter: &mut R, err: &CliError) {
    if !err.message.is_empty() {
        reporter.error(&err.message);
    }
    if let Some(help) = &err.help {
        reporter.warn(help);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::runner::report::RecordingReporter;

    fn parse(args: &[&str]) -> Cli {
        parse_command(args.iter().copied()).unwrap().unwrap()
    }

    #[test]
    fn test_cli_parse_test() {
        let cli = parse(&["yoru", "test"]);
        assert!(matches!(cli.command, Some(Command::Test { ref args }) if args.is_empty()));
    }

    #[test]
    fn test_cli_parse_test_with_args() {
        let cli = parse(&["yoru", "test", "--filter", "vector"]);
        if let Some(Command::Test { args }) = cli.command {
            assert_eq!(args, vec!["--filter", "vector"]);
        } else {
            panic!("Expected Test command");
        }
    }

    fn demo_request(args: &[&str]) -> CliResult<DemoRequest> {
        match parse(args).command {
            Some(Command::Demo { words }) => DemoRequest::from_words(&words),
            other => panic!("Expected Demo command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_demo() {
        let request = demo_request(&["yoru", "demo", "hello", "a", "-b"]).unwrap();
        assert_eq!(
            request,
            DemoRequest::Run {
                name: "hello".to_string(),
                args: vec!["a".to_string(), "-b".to_string()],
            }
        );
    }

    #[test]
    fn test_cli_parse_demo_list_forms_are_equivalent() {
        for flag in ["--list", "-l"] {
            assert_eq!(demo_request(&["yoru", "demo", flag]).unwrap(), DemoRequest::List, "{flag}");
        }
    }

    #[test]
    fn test_cli_parse_demo_flags_after_name_belong_to_demo() {
        for flag in ["-l", "--list", "-h", "--help"] {
            let request = demo_request(&["yoru", "demo", "hello", flag]).unwrap();
            assert_eq!(
                request,
                DemoRequest::Run {
                    name: "hello".to_string(),
                    args: vec![flag.to_string()],
                },
                "{flag} should be passed to the demo"
            );
        }
    }

    #[test]
    fn test_cli_parse_list_with_extra_words() {
        let err = demo_request(&["yoru", "demo", "--list", "hello"]).unwrap_err();
        assert!(err.show_usage);
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_cli_parse_test_help_flag_belongs_to_suite() {
        for flag in ["-h", "--help"] {
            let cli = parse(&["yoru", "test", flag]);
            if let Some(Command::Test { args }) = cli.command {
                assert_eq!(args, vec![flag]);
            } else {
                panic!("Expected Test command for {flag}");
            }
        }
    }

    #[test]
    fn test_cli_parse_unknown_command_is_captured() {
        let cli = parse(&["yoru", "bench", "x"]);
        if let Some(Command::External(args)) = cli.command {
            assert_eq!(args, vec!["bench", "x"]);
        } else {
            panic!("Expected External command");
        }
    }

    #[test]
    fn test_cli_parse_overrides() {
        let cli = parse(&["yoru", "--cc", "clang", "--build-dir", "out", "demo", "hello"]);
        let config = cli.config();
        assert_eq!(config.compiler, "clang");
        assert_eq!(config.build_dir, PathBuf::from("out"));
        assert_eq!(config.demo_dir, PathBuf::from("src/_examples"));
    }

    #[test]
    fn test_cli_parse_bad_flag_is_usage_error() {
        let err = parse_command(["yoru", "--bogus"]).unwrap_err();
        assert!(err.show_usage);
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("--bogus"));
        assert!(!err.message.starts_with("error:"));
    }

    #[test]
    fn test_execute_no_command_shows_usage() {
        let err = execute(parse(&["yoru"])).unwrap_err();
        assert!(err.show_usage);
        assert!(err.message.is_empty());
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_execute_unknown_command() {
        let err = execute(parse(&["yoru", "frobnicate"])).unwrap_err();
        assert_eq!(err.message, "Unknown command: frobnicate");
        assert!(err.show_usage);
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_execute_demo_without_name() {
        let err = execute(parse(&["yoru", "demo"])).unwrap_err();
        assert_eq!(err.message, "Demo name is required");
        assert!(err.show_usage);
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_execute_missing_demo_names_it() {
        let dir = std::env::temp_dir().join(format!("yoru_cli_missing_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let demo_dir = dir.to_string_lossy().to_string();

        let err = execute(parse(&["yoru", "--demo-dir", &demo_dir, "demo", "missing"])).unwrap_err();
        assert!(err.message.contains("missing"));
        assert!(err.show_usage);
        assert_eq!(err.exit_code, ExitCode::FAILURE);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_execute_list_demos() {
        let dir = std::env::temp_dir().join(format!("yoru_cli_list_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello.c"), "").unwrap();
        let demo_dir = dir.to_string_lossy().to_string();

        for flag in ["--list", "-l"] {
            let code = execute(parse(&["yoru", "--demo-dir", &demo_dir, "demo", flag])).unwrap();
            assert_eq!(code, ExitCode::SUCCESS);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_run_error_carries_help() {
        let err: CliError = RunError::Cleanup {
            executable: PathBuf::from("build/hello"),
            code: Some(1),
        }
        .into();
        assert_eq!(err.message, "Failed to remove executable build/hello");
        assert_eq!(err.help.as_deref(), Some("Please remove build/hello manually"));
        assert!(!err.show_usage);

        let mut reporter = RecordingReporter::new();
        report_error(&mut reporter, &err);
        assert_eq!(
            reporter.lines(),
            vec![
                "[ERROR]: Failed to remove executable build/hello",
                "[WARN]: Please remove build/hello manually",
            ]
        );
    }

    #[test]
    fn test_usage_text() {
        insta::assert_snapshot!(usage(), @r"
        Usage: yoru [options] <command> [args...]
        Commands:
          test [args...]         - Run all tests
          demo <name> [args...]  - Run a demo
          demo --list | -l       - List available demos
        Run `yoru --help` for options.
        ");
    }
}
