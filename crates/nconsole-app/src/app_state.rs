use std::collections::BTreeSet;
use std::io::BufRead;

use anyhow::Result;
use nconsole_store::StateStore;
use nconsole_terminal::{CommandRegistry, Environment, PersistReport, register_builtins};
use nconsole_types::config::ConsoleConfig;

use crate::commands::{self, report_persist};
use crate::input::{self, InputResult};
use crate::render::Terminal;
use crate::score::ScoreCmd;

/// Everything the shell loop needs: settings, commands, and their store.
pub struct AppState {
    pub config: ConsoleConfig,
    pub cmd_reg: CommandRegistry,
    pub store: StateStore,
    /// Commands whose saved file failed to load. Autosave leaves their
    /// files alone until a later load or an explicit save succeeds.
    unloaded: BTreeSet<String>,
}

impl AppState {
    /// Build the registry (built-ins plus the demo commands) and the store.
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let mut cmd_reg = CommandRegistry::new().with_lowercase_args(config.lowercase_args);
        register_builtins(&mut cmd_reg)?;
        cmd_reg.register(Box::new(ScoreCmd::default()))?;
        log::info!("Registered {} commands", cmd_reg.len());

        let store = StateStore::new(config.state_dir.clone());
        Ok(Self {
            config,
            cmd_reg,
            store,
            unloaded: BTreeSet::new(),
        })
    }

    /// Restore every command's state, remembering the ones that failed.
    pub fn load_state(&mut self) -> PersistReport {
        let report = self.cmd_reg.load_all(&self.store);
        for name in report.succeeded.iter().chain(&report.no_saved_state) {
            self.unloaded.remove(name);
        }
        for (name, _) in &report.failures {
            self.unloaded.insert(name.clone());
        }
        report
    }

    /// Save every command's state, including ones that failed to load.
    pub fn save_state(&mut self) -> PersistReport {
        let report = self.cmd_reg.save_all(&self.store);
        for name in &report.succeeded {
            self.unloaded.remove(name);
        }
        report
    }

    /// Save on exit, skipping commands whose saved file could not be read.
    pub fn autosave(&self) -> PersistReport {
        self.cmd_reg
            .save_where(&self.store, |name| !self.unloaded.contains(name))
    }

    /// Prompt, read one line, dispatch it, and render the outcome.
    pub fn update<R: BufRead, T: Terminal>(
        &mut self,
        reader: &mut R,
        term: &mut T,
    ) -> Result<InputResult> {
        term.prompt(&self.config.prompt)?;
        let Some(line) = input::read_line(reader)? else {
            return Ok(InputResult::Quit);
        };
        let outcome = {
            let mut env = Environment::new(&mut *term);
            self.cmd_reg.dispatch(&line, &mut env)
        };
        Ok(commands::process_outcome(outcome, self, term))
    }

    /// Run the read loop until `quit` or end of input.
    ///
    /// An I/O error on the prompt or the input ends the loop. Autosave
    /// still runs, then the error is returned.
    pub fn run<R: BufRead, T: Terminal>(&mut self, reader: &mut R, term: &mut T) -> Result<()> {
        if self.config.load_on_start {
            let report = self.load_state();
            if !report.is_ok() {
                report_persist("loaded", &report, term);
            }
        }

        let mut input_error = None;
        loop {
            match self.update(reader, term) {
                Ok(InputResult::Continue) => {},
                Ok(InputResult::Quit) => break,
                Err(e) => {
                    log::error!("input failed, ending session: {e:#}");
                    term.error(&format!("input failed: {e:#}"));
                    input_error = Some(e);
                    break;
                },
            }
        }

        if self.config.autosave {
            let report = self.autosave();
            report_persist("saved", &report, term);
        }
        match input_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
