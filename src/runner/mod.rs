//! Compile, run, clean up
//!
//! The [`Runner`] turns one source file into three blocking subprocesses:
//!
//! 1. the compiler, producing `<build_dir>/<stem>`
//! 2. the produced executable, with the caller's trailing arguments
//! 3. the platform delete command for that executable
//!
//! Each step must exit with status zero before the next one starts. The first failure is returned as a
//! [`RunError`] and nothing after it runs. When the program itself fails, the executable is left in place so it can
//! be inspected; that is the only path that skips cleanup.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod process;
pub mod report;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::config::RunnerConfig;
use crate::platform::Platform;

use process::{CommandLine, InvocationResult, ProcessExecutor, SystemExecutor};
use report::{ConsoleReporter, Reporter};

// ============================================================================
// Build target
// ============================================================================

/// Source file and the executable it compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Absolute path of the C source
    pub source: PathBuf,
    /// `<build_dir>/<source stem>`, plus `.exe` on Windows
    pub output: PathBuf,
}

impl BuildTarget {
    /// Resolve the output path for `source`.
    pub fn resolve(source: &Path, build_dir: &Path, platform: Platform) -> Result<Self, RunError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RunError::InvalidSource(source.to_path_buf()))?;

        let absolute = std::path::absolute(source).map_err(|_| RunError::InvalidSource(source.to_path_buf()))?;

        Ok(Self {
            source: absolute,
            output: build_dir.join(platform.executable_name(stem)),
        })
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Stage a run failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Creating the build directory or resolving the target
    Prepare,
    Compile,
    Execute,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Prepare => "prepare",
            Stage::Compile => "compile",
            Stage::Execute => "execute",
            Stage::Cleanup => "cleanup",
        };
        write!(f, "{name}")
    }
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Cannot create build directory {}: {source}", .dir.display())]
    BuildDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot derive an executable name from {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("Failed to start {program}: {source}")]
    Launch {
        stage: Stage,
        program: String,
        /// Executable already on disk when the launch failed
        executable: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    #[error("Error compiling {}", .source_file.display())]
    Compile { source_file: PathBuf, code: Option<i32> },

    #[error("Program exited with {}", describe_exit(.code))]
    Program { executable: PathBuf, code: Option<i32> },

    #[error("Failed to remove executable {}", .executable.display())]
    Cleanup { executable: PathBuf, code: Option<i32> },

    #[error("Cannot remove executable {}: no delete command for platform '{platform}'", .executable.display())]
    UnsupportedCleanup { executable: PathBuf, platform: Platform },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "a signal".to_string(),
    }
}

impl RunError {
    /// Stage the run stopped at.
    pub fn stage(&self) -> Stage {
        match self {
            RunError::BuildDir { .. } | RunError::InvalidSource(_) => Stage::Prepare,
            RunError::Launch { stage, .. } => *stage,
            RunError::Compile { .. } => Stage::Compile,
            RunError::Program { .. } => Stage::Execute,
            RunError::Cleanup { .. } | RunError::UnsupportedCleanup { .. } => Stage::Cleanup,
        }
    }

    /// Executable left on disk by this failure, if any.
    pub fn leftover_executable(&self) -> Option<&Path> {
        match self {
            RunError::Program { executable, .. }
            | RunError::Cleanup { executable, .. }
            | RunError::UnsupportedCleanup { executable, .. } => Some(executable),
            RunError::Launch { executable, .. } => executable.as_deref(),
            _ => None,
        }
    }
}

impl Diagnostic for RunError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("yoru::{}", self.stage())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            RunError::Launch {
                stage: Stage::Execute,
                executable: Some(executable),
                ..
            } => format!("Executable {} was kept; remove it manually", executable.display()),
            RunError::Launch {
                program,
                executable: Some(executable),
                ..
            } => format!(
                "Check that `{program}` is installed and on PATH, then remove {} manually",
                executable.display()
            ),
            RunError::Launch { program, .. } => format!("Check that `{program}` is installed and on PATH"),
            RunError::Program { executable, .. } => {
                format!("Executable {} was kept for inspection; remove it manually", executable.display())
            }
            RunError::Cleanup { executable, .. } | RunError::UnsupportedCleanup { executable, .. } => {
                format!("Please remove {} manually", executable.display())
            }
            _ => return None,
        };
        Some(Box::new(help))
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Sequences compile, execute and cleanup for one source file.
pub struct Runner<E: ProcessExecutor, R: Reporter> {
    config: RunnerConfig,
    platform: Platform,
    executor: E,
    reporter: R,
}

impl Runner<SystemExecutor, ConsoleReporter> {
    /// Runner for the host platform that spawns real processes and logs to stdout.
    pub fn system(config: RunnerConfig) -> Self {
        Self::new(config, Platform::host(), SystemExecutor, ConsoleReporter)
    }
}

impl<E: ProcessExecutor, R: Reporter> Runner<E, R> {
    pub fn new(config: RunnerConfig, platform: Platform, executor: E, reporter: R) -> Self {
        Self {
            config,
            platform,
            executor,
            reporter,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Create the build directory. Succeeds if it already exists.
    pub fn prepare_build_dir(&self) -> Result<(), RunError> {
        let dir = &self.config.build_dir;
        // An empty directory would leave a bare executable name, which is looked up on PATH
        if dir.as_os_str().is_empty() {
            return Err(RunError::BuildDir {
                dir: dir.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "build directory must not be empty"),
            });
        }
        if dir.is_absolute() {
            tracing::debug!("Using absolute build directory: {}", dir.display());
        }
        fs::create_dir_all(dir).map_err(|source| RunError::BuildDir {
            dir: dir.clone(),
            source,
        })
    }

    /// Compile `source`, run it with `args`, then delete the executable.
    ///
    /// Returns the target that was built on success. A new executable is compiled on every call.
    pub fn compile_and_run(&mut self, source: &Path, args: &[String]) -> Result<BuildTarget, RunError> {
        self.prepare_build_dir()?;
        let target = BuildTarget::resolve(source, &self.config.build_dir, self.platform)?;
        tracing::debug!(source = %target.source.display(), output = %target.output.display(), "resolved target");

        self.compile(&target)?;
        self.execute(&target, args)?;
        self.cleanup(&target)?;
        Ok(target)
    }

    fn compile(&mut self, target: &BuildTarget) -> Result<(), RunError> {
        let command = CommandLine::new(&self.config.compiler)
            .arg(target.source.to_string_lossy())
            .arg("-o")
            .arg(target.output.to_string_lossy())
            .args(self.config.compile_flags.iter().cloned())
            .args(self.platform.link_flags().iter().copied());

        let result = self.invoke(&command, Stage::Compile, None)?;
        if !result.success() {
            return Err(RunError::Compile {
                source_file: target.source.clone(),
                code: result.code,
            });
        }
        Ok(())
    }

    fn execute(&mut self, target: &BuildTarget, args: &[String]) -> Result<(), RunError> {
        let command = CommandLine::new(target.output.to_string_lossy()).args(args.iter().cloned());

        let result = self.invoke(&command, Stage::Execute, Some(&target.output))?;
        if !result.success() {
            // Executable stays on disk for post-mortem debugging
            return Err(RunError::Program {
                executable: target.output.clone(),
                code: result.code,
            });
        }

        self.reporter.info(&format!(
            "Program {} executed successfully",
            target.output.display()
        ));
        Ok(())
    }

    fn cleanup(&mut self, target: &BuildTarget) -> Result<(), RunError> {
        let Some(command) = self.platform.cleanup_command(&target.output) else {
            return Err(RunError::UnsupportedCleanup {
                executable: target.output.clone(),
                platform: self.platform,
            });
        };

        let result = self.invoke(&command, Stage::Cleanup, Some(&target.output))?;
        if !result.success() {
            return Err(RunError::Cleanup {
                executable: target.output.clone(),
                code: result.code,
            });
        }

        self.reporter
            .info(&format!("Removed executable {}", target.output.display()));
        Ok(())
    }

    /// Log and run one command. `leftover` is the executable that stays on disk if the command cannot start.
    fn invoke(
        &mut self,
        command: &CommandLine,
        stage: Stage,
        leftover: Option<&Path>,
    ) -> Result<InvocationResult, RunError> {
        self.reporter.cmd(&command.to_string());
        self.executor.execute(command).map_err(|source| RunError::Launch {
            stage,
            program: command.program.clone(),
            executable: leftover.map(Path::to_path_buf),
            source,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
