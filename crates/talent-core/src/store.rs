//! JSON state store.
//!
//! One pretty-printed JSON document per agent. The path is injected;
//! `default_location()` picks `~/.talent-tree.json`. Absent file means
//! "no state yet", which every mutating command checks first.

use crate::error::TalentError;
use crate::state::TalentState;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Default state file name, placed in the home directory.
pub const STATE_FILE: &str = ".talent-tree.json";

/// State store bound to one file path.
pub struct TalentStore {
    path: PathBuf,
}

impl TalentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location.
    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last saved state, or `None` if nothing was ever saved.
    pub fn load(&self) -> Result<Option<TalentState>, TalentError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&data)?;
        Ok(Some(state))
    }

    /// Load, failing with `NoState` when nothing was ever saved.
    pub fn load_required(&self) -> Result<TalentState, TalentError> {
        self.load()?.ok_or(TalentError::NoState)
    }

    /// Persist the whole record, stamping `last_activity`.
    pub fn save(&self, state: &mut TalentState) -> Result<(), TalentError> {
        state.last_activity = Utc::now();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// Return the existing state, or create and persist a fresh one.
    pub fn init(&self) -> Result<TalentState, TalentError> {
        if let Some(state) = self.load()? {
            return Ok(state);
        }
        let mut state = TalentState::new();
        self.save(&mut state)?;
        Ok(state)
    }
}
