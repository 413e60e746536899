//! JSON persistence for the session snapshot.
//!
//! The snapshot is the only state that survives a restart: the brew
//! parameters and, while a brew runs, its start instant. Everything else is
//! derived again from those.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    error::{BrewError, Result},
    models::SessionSnapshot,
};

/// File-backed store for a [`SessionSnapshot`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// A store backed by `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// A store at the default location, see [`default_path`](Self::default_path).
    ///
    /// # Errors
    ///
    /// Returns `BrewError::XdgDirectory` if the state directory cannot be
    /// created.
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Returns the default snapshot path following XDG Base Directory
    /// specification: `$XDG_STATE_HOME/drip/session.json` or
    /// `~/.local/state/drip/session.json`.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("drip")
            .place_state_file("session.json")
            .map_err(|e| BrewError::XdgDirectory(e.to_string()))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved snapshot, or `None` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::FileSystem` if the file cannot be read and
    /// `BrewError::Serialization` if it is not a valid snapshot.
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.fs_error(&self.path, e)),
        };
        let snapshot = serde_json::from_str(&text)?;
        debug!("Loaded session from {}", self.path.display());
        Ok(Some(snapshot))
    }

    /// Writes `snapshot`, replacing whatever was saved before.
    ///
    /// The file is written next to its final location and renamed into place,
    /// so a crash never leaves a half-written snapshot.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::FileSystem` if the file cannot be written.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.fs_error(parent, e))?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|e| self.fs_error(&staging, e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.fs_error(&self.path, e))?;

        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Deletes the saved snapshot. A no-op if there is none.
    ///
    /// # Errors
    ///
    /// Returns `BrewError::FileSystem` if the file exists but cannot be
    /// removed.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.fs_error(&self.path, e)),
        }
    }

    fn fs_error(&self, path: &Path, source: io::Error) -> BrewError {
        BrewError::FileSystem {
            path: path.to_path_buf(),
            source,
        }
    }
}
