//! Error types for nconsole.

use std::io;

/// Errors produced by the nconsole framework.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("{0} is an invalid command")]
    UnmatchedCommand(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    #[error("invalid command name: {0:?}")]
    InvalidName(String),

    #[error("persistence error for '{command}': {message}")]
    Persistence { command: String, message: String },

    #[error("invalid state document: {0}")]
    InvalidState(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Build a persistence error for `command` from any displayable cause.
    pub fn persistence(command: &str, cause: impl std::fmt::Display) -> Self {
        Self::Persistence {
            command: command.to_string(),
            message: cause.to_string(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ConsoleError>;
