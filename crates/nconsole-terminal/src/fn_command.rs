//! Closure-backed commands.

use nconsole_types::error::Result;
use nconsole_types::state::CommandState;

use crate::{Command, CommandOutput, Environment};

type Action =
    dyn FnMut(Option<&[&str]>, &mut CommandState, &mut Environment<'_>) -> Result<CommandOutput>;

/// A command whose action is a closure.
///
/// The closure always receives a state bag. It is only persisted when the
/// command was built with [`FnCommand::with_state`].
pub struct FnCommand {
    name: String,
    description: String,
    usage: Option<String>,
    aliases: Vec<&'static str>,
    state: CommandState,
    persistent: bool,
    action: Box<Action>,
}

impl FnCommand {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, action: F) -> Self
    where
        F: FnMut(Option<&[&str]>, &mut CommandState, &mut Environment<'_>) -> Result<CommandOutput>
            + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            usage: None,
            aliases: Vec::new(),
            state: CommandState::new(),
            persistent: false,
            action: Box::new(action),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&'static str]) -> Self {
        self.aliases = aliases.to_vec();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Persist `defaults` (and whatever the action writes) between sessions.
    pub fn with_state(mut self, defaults: CommandState) -> Self {
        self.state = defaults;
        self.persistent = true;
        self
    }
}

impl Command for FnCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn usage(&self) -> &str {
        self.usage.as_deref().unwrap_or(&self.name)
    }

    fn aliases(&self) -> &[&str] {
        &self.aliases
    }

    fn state(&self) -> Option<&CommandState> {
        self.persistent.then_some(&self.state)
    }

    fn state_mut(&mut self) -> Option<&mut CommandState> {
        if self.persistent {
            Some(&mut self.state)
        } else {
            None
        }
    }

    fn execute(
        &mut self,
        args: Option<&[&str]>,
        env: &mut Environment<'_>,
    ) -> Result<CommandOutput> {
        (self.action)(args, &mut self.state, env)
    }
}
