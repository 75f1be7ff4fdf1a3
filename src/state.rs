// src/state.rs

use crate::core::settings_store::{self, StoreError};
use crate::core::paths;
use crate::models::BasicInfo;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// The stored BasicInfo record as loaded at startup.
/// It holds the current value and, once a mutation is requested, a snapshot of
/// the value as it was loaded.
#[derive(Debug)]
enum SessionState {
    /// No mutable access has been handed out yet.
    Pristine(BasicInfo),
    /// Mutable access was requested; `original` is what is on disk.
    Dirty {
        original: BasicInfo,
        current: BasicInfo,
    },
}

/// A journaled view of the stored BasicInfo record.
///
/// Reading goes through `Deref`. The first `DerefMut` snapshots the loaded
/// value, so [`BasicInfoSession::commit`] only touches the disk when the record
/// really changed.
#[derive(Debug)]
pub struct BasicInfoSession {
    state: SessionState,
    path: PathBuf,
    stored: bool,
}

impl BasicInfoSession {
    /// Opens the record in the default settings location.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = paths::get_basic_info_path()?;
        Ok(Self::open(path))
    }

    /// Opens the record stored at `path`.
    ///
    /// A missing file starts from defaults. An unreadable one is reported as a
    /// warning and also starts from defaults; the next commit replaces it.
    pub fn open(path: PathBuf) -> Self {
        let loaded = match settings_store::load_basic_info_from(&path) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                None
            }
        };
        let stored = loaded.is_some();
        Self {
            state: SessionState::Pristine(loaded.unwrap_or_default()),
            path,
            stored,
        }
    }

    /// Whether a record existed on disk when the session was opened.
    pub fn was_stored(&self) -> bool {
        self.stored
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks if the record needs saving by comparing the current value against
    /// the snapshot, if one exists.
    pub fn needs_saving(&self) -> bool {
        match &self.state {
            SessionState::Pristine(_) => false,
            SessionState::Dirty { original, current } => !self.stored || original != current,
        }
    }

    /// Writes the record if it changed. Returns whether anything was written.
    pub fn commit(&mut self) -> Result<bool, StoreError> {
        if !self.needs_saving() {
            log::debug!("Stored settings unchanged; nothing to write.");
            return Ok(false);
        }
        settings_store::save_basic_info_to(&self.path, &**self)?;

        // The saved value becomes the new baseline.
        let current = match std::mem::replace(&mut self.state, SessionState::Pristine(BasicInfo::default())) {
            SessionState::Pristine(info) | SessionState::Dirty { current: info, .. } => info,
        };
        self.state = SessionState::Pristine(current);
        self.stored = true;
        Ok(true)
    }

    /// Deletes the stored record and resets the session to defaults.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        settings_store::clear_basic_info_at(&self.path)?;
        self.state = SessionState::Pristine(BasicInfo::default());
        self.stored = false;
        Ok(())
    }
}

impl Deref for BasicInfoSession {
    type Target = BasicInfo;

    fn deref(&self) -> &Self::Target {
        match &self.state {
            SessionState::Pristine(info) => info,
            SessionState::Dirty { current, .. } => current,
        }
    }
}

impl DerefMut for BasicInfoSession {
    fn deref_mut(&mut self) -> &mut BasicInfo {
        // First mutable access: keep a snapshot of the loaded value.
        if let SessionState::Pristine(info) = &self.state {
            let original = info.clone();
            self.state = match std::mem::replace(&mut self.state, SessionState::Pristine(BasicInfo::default())) {
                SessionState::Pristine(current) | SessionState::Dirty { current, .. } => {
                    SessionState::Dirty { original, current }
                }
            };
        }

        match &mut self.state {
            SessionState::Dirty { current, .. } | SessionState::Pristine(current) => current,
        }
    }
}
