//! Progress reporting
//!
//! Every user-visible event is a `[LEVEL]: message` line. The runner emits them through the [`Reporter`] trait so the
//! console format stays in one place and tests can record what was said.

use std::fmt;

/// Severity tag printed in brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A subprocess about to be started
    Cmd,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Level::Cmd => "CMD",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        write!(f, "{tag}")
    }
}

/// Render a log line without printing it.
pub fn format_line(level: Level, message: &str) -> String {
    format!("[{level}]: {message}")
}

/// Receives runner events.
pub trait Reporter {
    fn log(&mut self, level: Level, message: &str);

    fn cmd(&mut self, message: &str) {
        self.log(Level::Cmd, message);
    }

    fn info(&mut self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&mut self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Prints every event to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn log(&mut self, level: Level, message: &str) {
        println!("{}", format_line(level, message));
    }
}

/// Keeps events in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub events: Vec<(Level, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events rendered the way the console would print them.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|(level, msg)| format_line(*level, msg)).collect()
    }
}

impl Reporter for RecordingReporter {
    fn log(&mut self, level: Level, message: &str) {
        self.events.push((level, message.to_string()));
    }
}
