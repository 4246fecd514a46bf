//! Bulk save and restore of command state.
//!
//! Every command with declared state is processed independently: a failure
//! for one command is recorded and the loop moves on.

use nconsole_store::StateStore;
use nconsole_types::error::ConsoleError;

use crate::CommandRegistry;

/// Per-command results of `save_all` / `load_all`.
#[derive(Debug, Default)]
pub struct PersistReport {
    /// Commands saved, or restored from a saved file.
    pub succeeded: Vec<String>,
    /// Commands with no saved file yet (load only). They keep their defaults.
    pub no_saved_state: Vec<String>,
    /// Commands whose save or load failed, with the reason.
    pub failures: Vec<(String, ConsoleError)>,
    /// Commands left out by the caller's filter (save only). Their files
    /// are not touched.
    pub skipped: Vec<String>,
}

impl PersistReport {
    /// Whether every command was processed without error.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of commands with declared state that were read or written.
    pub fn visited(&self) -> usize {
        self.succeeded.len() + self.no_saved_state.len() + self.failures.len()
    }
}

impl CommandRegistry {
    /// Save the state of every command that declares some.
    pub fn save_all(&self, store: &StateStore) -> PersistReport {
        self.save_where(store, |_| true)
    }

    /// Save the state of every command that declares some and whose name
    /// passes `include`. Excluded commands are listed in `skipped`.
    pub fn save_where<F>(&self, store: &StateStore, include: F) -> PersistReport
    where
        F: Fn(&str) -> bool,
    {
        let mut report = PersistReport::default();
        for cmd in &self.commands {
            let Some(state) = cmd.state() else {
                continue;
            };
            let name = cmd.name().to_string();
            if !include(&name) {
                log::debug!("not saving state of '{name}'");
                report.skipped.push(name);
                continue;
            }
            match store.save(&name, state) {
                Ok(()) => report.succeeded.push(name),
                Err(e) => {
                    log::warn!("could not save state of '{name}': {e}");
                    report.failures.push((name, e));
                },
            }
        }
        log::info!(
            "saved state for {} command(s), {} skipped, {} failure(s)",
            report.succeeded.len(),
            report.skipped.len(),
            report.failures.len()
        );
        report
    }

    /// Restore the state of every command that declares some.
    ///
    /// Saved fields overwrite the live ones. A missing file keeps the
    /// defaults; a corrupt one leaves the live state untouched.
    pub fn load_all(&mut self, store: &StateStore) -> PersistReport {
        let mut report = PersistReport::default();
        for cmd in &mut self.commands {
            let name = cmd.name().to_string();
            let Some(state) = cmd.state_mut() else {
                continue;
            };
            match store.load(&name) {
                Ok(Some(saved)) => {
                    state.merge(saved);
                    report.succeeded.push(name);
                },
                Ok(None) => report.no_saved_state.push(name),
                Err(e) => {
                    log::warn!("could not load state of '{name}': {e}");
                    report.failures.push((name, e));
                },
            }
        }
        log::info!(
            "loaded state for {} command(s), {} without saved state, {} failure(s)",
            report.succeeded.len(),
            report.no_saved_state.len(),
            report.failures.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandOutput, Environment, FnCommand};
    use nconsole_types::console::MemoryConsole;
    use nconsole_types::state::CommandState;
    use std::fs;

    fn score_cmd() -> FnCommand {
        FnCommand::new("score", "Track points", |args, state, _| {
            if let Some(["add", n]) = args {
                let n: i64 = n
                    .parse()
                    .map_err(|_| ConsoleError::Command(format!("not a number: {n}")))?;
                let points = state.get::<i64>("points").unwrap_or(0) + n;
                state.set("points", points)?;
            }
            Ok(CommandOutput::None)
        })
        .with_state(CommandState::new().with("points", 0).unwrap())
    }

    fn stateless(name: &str) -> FnCommand {
        FnCommand::new(name, "No state", |_, _, _| Ok(CommandOutput::None))
    }

    fn stateful(name: &str, value: i64) -> FnCommand {
        FnCommand::new(name, "Has state", |_, _, _| Ok(CommandOutput::None))
            .with_state(CommandState::new().with("value", value).unwrap())
    }

    fn points(reg: &CommandRegistry) -> Option<i64> {
        reg.get("score")?.state()?.get("points")
    }

    #[test]
    fn scenario_state_survives_a_fresh_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        let mut reg = CommandRegistry::new();
        reg.register(Box::new(stateless("help").with_aliases(&["h"])))
            .unwrap();
        reg.register(Box::new(score_cmd())).unwrap();
        let mut console = MemoryConsole::new();
        let mut env = Environment::new(&mut console);
        reg.dispatch("score add 5", &mut env);
        assert_eq!(points(&reg), Some(5));

        let report = reg.save_all(&store);
        assert!(report.is_ok());
        assert_eq!(report.succeeded, vec!["score".to_string()]);
        assert!(!dir.path().join("help.json").exists());

        let mut fresh = CommandRegistry::new();
        fresh
            .register(Box::new(stateless("help").with_aliases(&["h"])))
            .unwrap();
        fresh.register(Box::new(score_cmd())).unwrap();
        assert_eq!(points(&fresh), Some(0));
        let report = fresh.load_all(&store);
        assert!(report.is_ok());
        assert_eq!(points(&fresh), Some(5));
    }

    #[test]
    fn load_without_files_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(score_cmd())).unwrap();
        let report = reg.load_all(&store);
        assert!(report.is_ok());
        assert_eq!(report.no_saved_state, vec!["score".to_string()]);
        assert_eq!(points(&reg), Some(0));
    }

    #[test]
    fn corrupt_file_leaves_state_and_other_commands_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        fs::write(dir.path().join("score.json"), "{\"points\": ").unwrap();
        fs::write(dir.path().join("other.json"), "{\"value\": 7}").unwrap();

        let mut reg = CommandRegistry::new();
        reg.register(Box::new(score_cmd())).unwrap();
        reg.register(Box::new(stateful("other", 1))).unwrap();
        let report = reg.load_all(&store);

        assert!(!report.is_ok());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "score");
        assert_eq!(report.succeeded, vec!["other".to_string()]);
        assert_eq!(points(&reg), Some(0));
        assert_eq!(
            reg.get("other").unwrap().state().unwrap().get::<i64>("value"),
            Some(7)
        );
    }

    #[test]
    fn load_merges_saved_fields_into_live_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        fs::write(dir.path().join("score.json"), "{\"points\": 3, \"best\": 9}").unwrap();
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(
            score_cmd().with_state(
                CommandState::new()
                    .with("points", 0)
                    .unwrap()
                    .with("level", 2)
                    .unwrap(),
            ),
        ))
        .unwrap();
        reg.load_all(&store);
        let state = reg.get("score").unwrap().state().unwrap();
        assert_eq!(state.get::<i64>("points"), Some(3));
        assert_eq!(state.get::<i64>("best"), Some(9));
        assert_eq!(state.get::<i64>("level"), Some(2));
    }

    #[test]
    fn one_failing_save_does_not_block_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(stateful("first", 1))).unwrap();
        // A name with a path separator cannot be turned into a state file.
        reg.register(Box::new(stateful("bad/name", 2))).unwrap();
        reg.register(Box::new(stateless("plain"))).unwrap();
        reg.register(Box::new(stateful("last", 3))).unwrap();

        let report = reg.save_all(&store);
        assert_eq!(report.succeeded, vec!["first".to_string(), "last".to_string()]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "bad/name");
        assert!(matches!(
            report.failures[0].1,
            ConsoleError::Persistence { .. }
        ));
        assert_eq!(report.visited(), 3);
        assert!(dir.path().join("first.json").is_file());
        assert!(dir.path().join("last.json").is_file());
        assert!(!dir.path().join("plain.json").exists());
    }

    #[test]
    fn io_failure_on_one_file_does_not_block_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("blocked.json")).unwrap();
        let store = StateStore::new(dir.path());
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(stateful("blocked", 1))).unwrap();
        reg.register(Box::new(stateful("free", 2))).unwrap();

        let report = reg.save_all(&store);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "blocked");
        assert_eq!(report.succeeded, vec!["free".to_string()]);
    }

    #[test]
    fn save_where_leaves_excluded_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("kept.json"), "not json at all").unwrap();
        let store = StateStore::new(dir.path());
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(stateful("kept", 1))).unwrap();
        reg.register(Box::new(stateful("written", 2))).unwrap();
        reg.register(Box::new(stateless("plain"))).unwrap();

        let report = reg.save_where(&store, |name| name != "kept");
        assert!(report.is_ok());
        assert_eq!(report.skipped, vec!["kept".to_string()]);
        assert_eq!(report.succeeded, vec!["written".to_string()]);
        assert_eq!(report.visited(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("kept.json")).unwrap(),
            "not json at all"
        );
    }

    #[test]
    fn stateless_commands_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(stateless("plain"))).unwrap();
        assert_eq!(reg.save_all(&store).visited(), 0);
        assert_eq!(reg.load_all(&store).visited(), 0);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
