//! Log severities and the console sink collaborator.
//!
//! The core never writes to a terminal itself. Anything user-facing goes
//! through a [`ConsoleSink`], which the embedding shell provides.

use std::fmt;

/// Severity of a console log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Normal output.
    Info,
    /// Something unexpected that is not fatal.
    Warn,
    /// An operation failed.
    Error,
}

impl LogLevel {
    /// Bracketed label rendered in front of a line.
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Renders one log line of a given severity.
pub trait ConsoleSink {
    /// Render `fragments` joined by single spaces as one line.
    fn log(&mut self, level: LogLevel, fragments: &[&dyn fmt::Display]);

    /// Shorthand for a single-fragment info line.
    fn info(&mut self, message: &str) {
        self.log(LogLevel::Info, &[&message]);
    }

    /// Shorthand for a single-fragment warning line.
    fn warn(&mut self, message: &str) {
        self.log(LogLevel::Warn, &[&message]);
    }

    /// Shorthand for a single-fragment error line.
    fn error(&mut self, message: &str) {
        self.log(LogLevel::Error, &[&message]);
    }
}

/// Join display fragments with single spaces.
pub fn join_fragments(fragments: &[&dyn fmt::Display]) -> String {
    let mut line = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&fragment.to_string());
    }
    line
}

/// In-memory sink that records every rendered line.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    lines: Vec<(LogLevel, String)>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(level, line)` pairs in render order.
    pub fn lines(&self) -> &[(LogLevel, String)] {
        &self.lines
    }

    /// Recorded lines of one severity.
    pub fn lines_at(&self, level: LogLevel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, s)| s.as_str())
            .collect()
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, s)| s.contains(needle))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl ConsoleSink for MemoryConsole {
    fn log(&mut self, level: LogLevel, fragments: &[&dyn fmt::Display]) {
        self.lines.push((level, join_fragments(fragments)));
    }
}
