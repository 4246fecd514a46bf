//! Built-in commands for an nconsole shell.
//!
//! Commands that need the registry or the store (help, save, load, quit)
//! return a signal and let the shell act on it.

use nconsole_types::error::Result;

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment};

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(HelpCmd))?;
    reg.register(Box::new(EchoCmd))?;
    reg.register(Box::new(SaveCmd))?;
    reg.register(Box::new(LoadCmd))?;
    reg.register(Box::new(QuitCmd))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "List available commands"
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    fn aliases(&self) -> &[&str] {
        &["h", "?"]
    }
    fn execute(
        &mut self,
        args: Option<&[&str]>,
        _env: &mut Environment<'_>,
    ) -> Result<CommandOutput> {
        let topic = args.and_then(|a| a.first()).map(|t| t.to_string());
        Ok(CommandOutput::Help { topic })
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print arguments"
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(
        &mut self,
        args: Option<&[&str]>,
        _env: &mut Environment<'_>,
    ) -> Result<CommandOutput> {
        match args {
            Some(words) => Ok(CommandOutput::Text(words.join(" "))),
            None => Ok(CommandOutput::None),
        }
    }
}

// ---------------------------------------------------------------------------
// save / load
// ---------------------------------------------------------------------------

struct SaveCmd;
impl Command for SaveCmd {
    fn name(&self) -> &str {
        "save"
    }
    fn description(&self) -> &str {
        "Save the state of every command"
    }
    fn execute(&mut self, _: Option<&[&str]>, _: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::SaveState)
    }
}

struct LoadCmd;
impl Command for LoadCmd {
    fn name(&self) -> &str {
        "load"
    }
    fn description(&self) -> &str {
        "Reload saved state for every command"
    }
    fn execute(&mut self, _: Option<&[&str]>, _: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::LoadState)
    }
}

// ---------------------------------------------------------------------------
// quit
// ---------------------------------------------------------------------------

struct QuitCmd;
impl Command for QuitCmd {
    fn name(&self) -> &str {
        "quit"
    }
    fn description(&self) -> &str {
        "Leave the console"
    }
    fn aliases(&self) -> &[&str] {
        &["exit", "q"]
    }
    fn execute(&mut self, _: Option<&[&str]>, _: &mut Environment<'_>) -> Result<CommandOutput> {
        Ok(CommandOutput::Quit)
    }
}
