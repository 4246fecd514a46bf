//! Terminal rendering of console log lines.

use std::fmt;
use std::io::{self, Write};

use colored::Colorize;
use nconsole_types::console::{ConsoleSink, LogLevel, MemoryConsole, join_fragments};

/// A console sink that can also show the input prompt.
pub trait Terminal: ConsoleSink {
    /// Print the input prefix without a newline.
    fn prompt(&mut self, prefix: &str) -> io::Result<()>;
}

/// Writes `[INFO]` lines in green, `[WARNING]` in yellow, `[ERROR]` in red.
pub struct AnsiConsole<W: Write> {
    out: W,
}

impl<W: Write> AnsiConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ConsoleSink for AnsiConsole<W> {
    fn log(&mut self, level: LogLevel, fragments: &[&dyn fmt::Display]) {
        let line = format!("[{}] {}", level.label(), join_fragments(fragments));
        let painted = match level {
            LogLevel::Info => line.as_str().green(),
            LogLevel::Warn => line.as_str().yellow(),
            LogLevel::Error => line.as_str().red(),
        };
        if let Err(e) = writeln!(self.out, "{painted}") {
            log::error!("console write failed: {e}");
        }
    }
}

impl<W: Write> Terminal for AnsiConsole<W> {
    fn prompt(&mut self, prefix: &str) -> io::Result<()> {
        write!(self.out, "{prefix}")?;
        self.out.flush()
    }
}

impl Terminal for MemoryConsole {
    fn prompt(&mut self, _prefix: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> AnsiConsole<Vec<u8>> {
        colored::control::set_override(false);
        AnsiConsole::new(Vec::new())
    }

    fn text(console: AnsiConsole<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn renders_labels_and_fragments() {
        let mut console = plain();
        console.info("hello");
        console.log(LogLevel::Warn, &[&"low", &"battery:", &5]);
        console.error("bad");
        assert_eq!(
            text(console),
            "[INFO] hello\n[WARNING] low battery: 5\n[ERROR] bad\n"
        );
    }

    #[test]
    fn prompt_has_no_newline() {
        let mut console = plain();
        console.prompt("> ").unwrap();
        assert_eq!(text(console), "> ");
    }
}
