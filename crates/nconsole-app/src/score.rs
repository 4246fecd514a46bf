//! `score`: a demo command with persisted state.

use nconsole_terminal::{Command, CommandOutput, Environment};
use nconsole_types::error::{ConsoleError, Result};
use nconsole_types::state::CommandState;

const POINTS: &str = "points";

/// Keeps a running point total that survives restarts.
pub struct ScoreCmd {
    state: CommandState,
}

impl ScoreCmd {
    pub fn new() -> Self {
        let mut state = CommandState::new();
        state.insert(POINTS, 0.into());
        Self { state }
    }

    pub fn points(&self) -> i64 {
        self.state.get(POINTS).unwrap_or(0)
    }

    fn set_points(&mut self, points: i64) -> Result<CommandOutput> {
        self.state.set(POINTS, points)?;
        Ok(CommandOutput::Text(format!("points: {points}")))
    }
}

impl Default for ScoreCmd {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_amount(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| ConsoleError::Command(format!("not a number: {raw}")))
}

impl Command for ScoreCmd {
    fn name(&self) -> &str {
        "score"
    }

    fn description(&self) -> &str {
        "Show or change the saved point total"
    }

    fn usage(&self) -> &str {
        "score [add <n>|sub <n>|reset]"
    }

    fn state(&self) -> Option<&CommandState> {
        Some(&self.state)
    }

    fn state_mut(&mut self) -> Option<&mut CommandState> {
        Some(&mut self.state)
    }

    fn execute(
        &mut self,
        args: Option<&[&str]>,
        env: &mut Environment<'_>,
    ) -> Result<CommandOutput> {
        let Some(args) = args else {
            return Ok(CommandOutput::Text(format!("points: {}", self.points())));
        };
        match args {
            ["add", n] => {
                let total = self.points().saturating_add(parse_amount(n)?);
                self.set_points(total)
            },
            ["sub", n] => {
                let total = self.points().saturating_sub(parse_amount(n)?);
                if total < 0 {
                    env.console.warn("score is now negative");
                }
                self.set_points(total)
            },
            ["reset"] => self.set_points(0),
            _ => Err(ConsoleError::Command(format!("usage: {}", self.usage()))),
        }
    }
}
