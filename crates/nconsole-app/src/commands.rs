use nconsole_terminal::{CommandOutput, CommandRegistry, DispatchOutcome, PersistReport};
use nconsole_types::console::{ConsoleSink, LogLevel};
use nconsole_types::error::ConsoleError;

use crate::app_state::AppState;
use crate::input::InputResult;

/// Render the outcome of one dispatched line and act on shell signals.
pub fn process_outcome(
    outcome: DispatchOutcome,
    state: &mut AppState,
    term: &mut dyn ConsoleSink,
) -> InputResult {
    match outcome {
        DispatchOutcome::NoInput => InputResult::Continue,
        DispatchOutcome::Unmatched(name) => {
            term.error(&ConsoleError::UnmatchedCommand(name).to_string());
            InputResult::Continue
        },
        DispatchOutcome::Failed { command, error } => {
            term.log(LogLevel::Error, &[&format!("{command}:"), &error]);
            InputResult::Continue
        },
        DispatchOutcome::Matched { output, .. } => process_command_output(output, state, term),
    }
}

/// Process a successful command result.
pub fn process_command_output(
    output: CommandOutput,
    state: &mut AppState,
    term: &mut dyn ConsoleSink,
) -> InputResult {
    match output {
        CommandOutput::None => {},
        CommandOutput::Text(text) => {
            for l in text.lines() {
                term.info(l);
            }
        },
        CommandOutput::Warn(text) => {
            for l in text.lines() {
                term.warn(l);
            }
        },
        CommandOutput::Table { headers, rows } => {
            term.info(&headers.join(" | "));
            for row in &rows {
                term.info(&row.join(" | "));
            }
        },
        CommandOutput::Help { topic } => render_help(&state.cmd_reg, topic.as_deref(), term),
        CommandOutput::SaveState => {
            let report = state.save_state();
            report_persist("saved", &report, term);
        },
        CommandOutput::LoadState => {
            let report = state.load_state();
            report_persist("loaded", &report, term);
        },
        CommandOutput::Quit => return InputResult::Quit,
    }
    InputResult::Continue
}

/// List every command, or describe one command and its aliases.
pub fn render_help(reg: &CommandRegistry, topic: Option<&str>, term: &mut dyn ConsoleSink) {
    let Some(topic) = topic else {
        term.info("Commands:");
        for (name, description) in reg.list_commands() {
            term.info(&format!("  {name:<10} {description}"));
        }
        return;
    };
    match reg.find(topic) {
        Some(cmd) => {
            term.info(&format!("usage: {}", cmd.usage()));
            term.info(cmd.description());
            if !cmd.aliases().is_empty() {
                term.info(&format!("aliases: {}", cmd.aliases().join(", ")));
            }
        },
        None => term.warn(&format!("no help for '{topic}'")),
    }
}

/// One summary line plus one line per failed or skipped command.
pub fn report_persist(verb: &str, report: &PersistReport, term: &mut dyn ConsoleSink) {
    for (_, error) in &report.failures {
        term.error(&error.to_string());
    }
    for name in &report.skipped {
        term.warn(&format!("state of '{name}' not saved: its saved file failed to load"));
    }
    if report.visited() == 0 {
        if report.skipped.is_empty() {
            term.info("no command has state to persist");
        }
    } else if report.is_ok() {
        term.info(&format!("{verb} state of {} command(s)", report.succeeded.len()));
    } else {
        term.warn(&format!(
            "{verb} state of {} command(s), {} failed",
            report.succeeded.len(),
            report.failures.len()
        ));
    }
}
