//! Runner configuration
//!
//! Compiler name, flags and directory layout are fixed for the yoru tree. They are gathered into one immutable
//! value built at startup and handed to the runner, so nothing reads them from globals.

use std::path::{Path, PathBuf};

/// Compiler invoked for every build.
pub const DEFAULT_COMPILER: &str = "gcc";
/// Language standard and warnings, passed after the output flag.
pub const DEFAULT_COMPILE_FLAGS: &[&str] = &["-std=c99", "-Wall"];
/// Directory that receives compiled executables.
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Source file compiled by `yoru test`.
pub const DEFAULT_TEST_SUITE: &str = "src/testing/yoru_tests.c";
/// Directory searched by `yoru demo <name>`.
pub const DEFAULT_DEMO_DIR: &str = "src/_examples";
/// Extension (without the dot) of runnable sources.
pub const DEFAULT_SOURCE_EXTENSION: &str = "c";

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Compiler executable, looked up on `PATH`
    pub compiler: String,
    /// Flags placed after `-o <output>`; link flags come from the platform
    pub compile_flags: Vec<String>,
    /// Output directory for executables
    pub build_dir: PathBuf,
    /// Test suite source
    pub test_suite: PathBuf,
    /// Demo source directory
    pub demo_dir: PathBuf,
    /// Source extension without the leading dot
    pub source_extension: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            compile_flags: DEFAULT_COMPILE_FLAGS.iter().map(|f| f.to_string()).collect(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            test_suite: PathBuf::from(DEFAULT_TEST_SUITE),
            demo_dir: PathBuf::from(DEFAULT_DEMO_DIR),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compiler executable
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Set the output directory
    pub fn with_build_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.build_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the test suite source
    pub fn with_test_suite(mut self, path: impl AsRef<Path>) -> Self {
        self.test_suite = path.as_ref().to_path_buf();
        self
    }

    /// Set the demo directory
    pub fn with_demo_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.demo_dir = dir.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compiler_invocation() {
        let config = RunnerConfig::default();
        assert_eq!(config.compiler, "gcc");
        assert_eq!(config.compile_flags, vec!["-std=c99", "-Wall"]);
    }

    #[test]
    fn test_default_layout() {
        let config = RunnerConfig::new();
        assert_eq!(config.build_dir, PathBuf::from("build"));
        assert_eq!(config.test_suite, PathBuf::from("src/testing/yoru_tests.c"));
        assert_eq!(config.demo_dir, PathBuf::from("src/_examples"));
        assert_eq!(config.source_extension, "c");
    }

    #[test]
    fn test_builder_overrides() {
        let config = RunnerConfig::new()
            .with_compiler("clang")
            .with_build_dir("out")
            .with_test_suite("tests/all.c")
            .with_demo_dir("demos");

        assert_eq!(config.compiler, "clang");
        assert_eq!(config.build_dir, PathBuf::from("out"));
        assert_eq!(config.test_suite, PathBuf::from("tests/all.c"));
        assert_eq!(config.demo_dir, PathBuf::from("demos"));
        // Untouched fields keep their defaults
        assert_eq!(config.compile_flags, vec!["-std=c99", "-Wall"]);
    }
}
