//! Directory-backed state store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nconsole_types::error::{ConsoleError, Result};
use nconsole_types::state::CommandState;

/// Reads and writes `<root>/<command>.json` files.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the state of `command`.
    ///
    /// Command names are case-insensitive, so the file name is the lowercased
    /// name. Names that could escape the store directory are rejected.
    pub fn path_for(&self, command: &str) -> Result<PathBuf> {
        let key = command.to_lowercase();
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0'])
        {
            return Err(ConsoleError::persistence(
                command,
                "name cannot be used as a state file name",
            ));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Write `state` for `command`, replacing any previous file.
    pub fn save(&self, command: &str, state: &CommandState) -> Result<()> {
        let path = self.path_for(command)?;
        let content = state
            .to_json()
            .map_err(|e| ConsoleError::persistence(command, e))?;

        fs::create_dir_all(&self.root).map_err(|e| {
            ConsoleError::persistence(command, format!("{}: {e}", self.root.display()))
        })?;

        // Atomic write: temp file in the same directory, then rename.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| {
            ConsoleError::persistence(command, format!("{}: {e}", temp_path.display()))
        })?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(ConsoleError::persistence(
                command,
                format!("{}: {e}", path.display()),
            ));
        }

        log::debug!("saved {} field(s) for '{command}' to {}", state.len(), path.display());
        Ok(())
    }

    /// Read the saved state of `command`.
    ///
    /// `Ok(None)` means nothing was saved yet. Unreadable or malformed files
    /// are errors.
    pub fn load(&self, command: &str) -> Result<Option<CommandState>> {
        let path = self.path_for(command)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no saved state for '{command}' at {}", path.display());
                return Ok(None);
            },
            Err(e) => {
                return Err(ConsoleError::persistence(
                    command,
                    format!("{}: {e}", path.display()),
                ));
            },
        };

        let state = CommandState::from_json(&text).map_err(|e| {
            ConsoleError::persistence(command, format!("{}: {e}", path.display()))
        })?;
        log::debug!("loaded {} field(s) for '{command}'", state.len());
        Ok(Some(state))
    }
}
