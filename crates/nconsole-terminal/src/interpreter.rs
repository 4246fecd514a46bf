//! Command trait, registry, and dispatch logic.
//!
//! Input is split on whitespace with no quoting. The first token is matched
//! case-insensitively against command names and aliases in registration
//! order, and the first hit wins.

use nconsole_types::console::ConsoleSink;
use nconsole_types::error::{ConsoleError, Result};
use nconsole_types::state::CommandState;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Command produced no visible output.
    None,
    /// Plain text lines, rendered at info level.
    Text(String),
    /// Text rendered at warning level.
    Warn(String),
    /// Tabular data (header row + data rows).
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Signal to the shell to print help for all commands or one topic.
    Help {
        /// Command name or alias to describe; `None` lists everything.
        topic: Option<String>,
    },
    /// Signal to the shell to save every command's state.
    SaveState,
    /// Signal to the shell to reload every command's state.
    LoadState,
    /// Signal to the shell to leave the read loop.
    Quit,
}

/// Environment passed to every command.
pub struct Environment<'a> {
    /// Where the command renders log lines while it runs.
    pub console: &'a mut dyn ConsoleSink,
}

impl<'a> Environment<'a> {
    pub fn new(console: &'a mut dyn ConsoleSink) -> Self {
        Self { console }
    }
}

/// A single dispatchable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "score \[add|sub <n>|reset\]").
    fn usage(&self) -> &str {
        self.name()
    }

    /// Alternative names resolving to this command.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Fields to persist between sessions. `None` opts out of persistence.
    fn state(&self) -> Option<&CommandState> {
        None
    }

    /// Mutable access to the persisted fields, used when restoring.
    fn state_mut(&mut self) -> Option<&mut CommandState> {
        None
    }

    /// Run the command. `args` is `None` when the input had no arguments.
    fn execute(
        &mut self,
        args: Option<&[&str]>,
        env: &mut Environment<'_>,
    ) -> Result<CommandOutput>;
}

/// What happened to one line of input.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The line was empty or whitespace only.
    NoInput,
    /// A command matched and its action succeeded.
    Matched {
        command: String,
        output: CommandOutput,
    },
    /// No name or alias matched the (lowercased) first token.
    Unmatched(String),
    /// A command matched but its action returned an error.
    Failed { command: String, error: ConsoleError },
}

impl DispatchOutcome {
    /// Canonical name of the command that ran, if any did.
    pub fn command(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Matched { command, .. } | DispatchOutcome::Failed { command, .. } => {
                Some(command.as_str())
            },
            DispatchOutcome::NoInput | DispatchOutcome::Unmatched(_) => None,
        }
    }

    /// Collapse into a `Result`, turning an unmatched token into
    /// `ConsoleError::UnmatchedCommand`.
    pub fn into_result(self) -> Result<CommandOutput> {
        match self {
            DispatchOutcome::NoInput => Ok(CommandOutput::None),
            DispatchOutcome::Matched { output, .. } => Ok(output),
            DispatchOutcome::Unmatched(name) => Err(ConsoleError::UnmatchedCommand(name)),
            DispatchOutcome::Failed { error, .. } => Err(error),
        }
    }
}

/// Registry of available commands with dispatch.
///
/// Registration order is evaluation order.
pub struct CommandRegistry {
    pub(crate) commands: Vec<Box<dyn Command>>,
    lowercase_args: bool,
}

impl CommandRegistry {
    /// Create an empty command registry that lowercases arguments.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            lowercase_args: true,
        }
    }

    /// Choose whether arguments are lowercased along with the command token.
    pub fn with_lowercase_args(mut self, lowercase: bool) -> Self {
        self.lowercase_args = lowercase;
        self
    }

    /// Register a command.
    ///
    /// Fails on an empty or whitespace-containing name or alias, and on a
    /// name already taken by another command. Identifiers shadowed by an
    /// earlier command's alias are accepted with a warning; they can never
    /// match.
    pub fn register(&mut self, cmd: Box<dyn Command>) -> Result<()> {
        let name = cmd.name();
        for ident in std::iter::once(name).chain(cmd.aliases().iter().copied()) {
            if ident.is_empty() || ident.chars().any(char::is_whitespace) {
                return Err(ConsoleError::InvalidName(ident.to_string()));
            }
        }
        if self.get(name).is_some() {
            return Err(ConsoleError::DuplicateCommand(name.to_lowercase()));
        }
        for ident in std::iter::once(name).chain(cmd.aliases().iter().copied()) {
            if let Some(owner) = self.find(ident) {
                log::warn!(
                    "'{ident}' of command '{name}' is shadowed by command '{}'",
                    owner.name()
                );
            }
        }
        log::debug!("registered command '{name}' ({} alias(es))", cmd.aliases().len());
        self.commands.push(cmd);
        Ok(())
    }

    /// Look up a command by canonical name only, ignoring aliases.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        let key = name.to_lowercase();
        self.commands
            .iter()
            .find(|c| c.name().to_lowercase() == key)
            .map(|c| c.as_ref())
    }

    /// Resolve a name or alias the way `dispatch` would.
    pub fn find(&self, token: &str) -> Option<&dyn Command> {
        self.position(&token.to_lowercase())
            .map(|i| self.commands[i].as_ref())
    }

    /// Registered commands in evaluation order.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Parse one line of input and run the matching command.
    ///
    /// Never fails: unmatched input and action errors come back as outcomes.
    pub fn dispatch(&mut self, line: &str, env: &mut Environment<'_>) -> DispatchOutcome {
        let Some((name, args)) = split_input(line, self.lowercase_args) else {
            return DispatchOutcome::NoInput;
        };

        let Some(index) = self.position(&name) else {
            log::debug!("no command matches '{name}'");
            return DispatchOutcome::Unmatched(name);
        };

        let cmd = &mut self.commands[index];
        let command = cmd.name().to_string();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let args = if arg_refs.is_empty() {
            None
        } else {
            Some(arg_refs.as_slice())
        };

        log::debug!("dispatching '{command}' with {} arg(s)", arg_refs.len());
        match cmd.execute(args, env) {
            Ok(output) => DispatchOutcome::Matched { command, output },
            Err(error) => {
                log::debug!("command '{command}' failed: {error}");
                DispatchOutcome::Failed { command, error }
            },
        }
    }

    /// Return a sorted list of (name, description) pairs.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Return the names and aliases starting with `partial`.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let lower = partial.to_lowercase();
        let mut out: Vec<String> = self
            .commands
            .iter()
            .flat_map(|c| std::iter::once(c.name()).chain(c.aliases().iter().copied()))
            .map(str::to_lowercase)
            .filter(|ident| ident.starts_with(&lower))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Index of the first command whose name or alias equals `token`.
    /// `token` must already be lowercased.
    fn position(&self, token: &str) -> Option<usize> {
        self.commands.iter().position(|c| {
            c.name().to_lowercase() == token
                || c.aliases().iter().any(|alias| alias.to_lowercase() == token)
        })
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a line into a lowercased command token and its arguments.
///
/// Returns `None` for blank input. Arguments are lowercased too when
/// `lowercase_args` is set.
pub fn split_input(line: &str, lowercase_args: bool) -> Option<(String, Vec<String>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    let args = tokens
        .map(|t| {
            if lowercase_args {
                t.to_lowercase()
            } else {
                t.to_string()
            }
        })
        .collect();
    Some((name, args))
}
