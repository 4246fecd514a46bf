//! nconsole interactive shell.
//!
//! Reads one line at a time from stdin, dispatches it to the registered
//! commands, and prints colored `[INFO]`/`[WARNING]`/`[ERROR]` lines.
//! Command state is restored on start and saved on `quit`.

mod app_state;
mod commands;
mod input;
mod render;
mod score;

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use app_state::AppState;
use nconsole_types::config::ConsoleConfig;
use render::AnsiConsole;

const CONFIG_ENV: &str = "NCONSOLE_CONFIG";
const DEFAULT_CONFIG: &str = "nconsole.toml";

/// First CLI argument, then `NCONSOLE_CONFIG`, then `./nconsole.toml`.
fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = config_path();
    let config = ConsoleConfig::load(&path)?;
    let mut state = AppState::new(config)?;
    log::info!(
        "nconsole starting (config: {}, state dir: {})",
        path.display(),
        state.store.root().display()
    );
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut term = AnsiConsole::new(io::stdout());
    state.run(&mut reader, &mut term)?;

    log::info!("nconsole shut down");
    Ok(())
}
