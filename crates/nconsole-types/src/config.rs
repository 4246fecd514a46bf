//! Console configuration loaded from TOML.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConsoleError, Result};

/// Shell and persistence settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Input prefix printed before each read.
    pub prompt: String,
    /// Directory holding one `<command>.json` file per persistent command.
    pub state_dir: PathBuf,
    /// Lowercase arguments as well as the command token.
    pub lowercase_args: bool,
    /// Restore saved state before the first prompt.
    pub load_on_start: bool,
    /// Save all state when the loop ends.
    pub autosave: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            state_dir: PathBuf::from("."),
            lowercase_args: true,
            load_on_start: true,
            autosave: true,
        }
    }
}

impl ConsoleConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConsoleError::Config(format!("{e}")))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            },
            Err(e) => {
                return Err(ConsoleError::Config(format!("{}: {e}", path.display())));
            },
        };
        toml::from_str(&text).map_err(|e| ConsoleError::Config(format!("{}: {e}", path.display())))
    }
}
