//! Command registry and dispatch.
//!
//! Commands implement the `Command` trait (or wrap a closure in `FnCommand`)
//! and are registered by name and aliases. The registry splits an input
//! line, resolves the first token, and runs `execute()` on the first match.
//! Commands that declare state are saved and restored in bulk through a
//! `StateStore`.

mod commands;
mod fn_command;
mod interpreter;
mod persist;

/// Register the built-in commands (help, echo, save, load, quit).
pub use commands::register_builtins;
/// A command backed by a closure.
pub use fn_command::FnCommand;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text, table, shell signals).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Result of dispatching one line.
pub use interpreter::DispatchOutcome;
/// Environment passed to every command.
pub use interpreter::Environment;
/// Split a line into command token and arguments.
pub use interpreter::split_input;
/// Per-command results of bulk save/load.
pub use persist::PersistReport;
