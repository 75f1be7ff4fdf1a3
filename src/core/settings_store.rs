// src/core/settings_store.rs

//! Persistence of the BasicInfo record between runs, stored as pretty JSON under
//! the `basicInfoInput` key's file in the ctapgen config directory.

use crate::{
    core::paths::{self, PathError},
    models::BasicInfo,
};
use log::debug;
use std::{fs, io, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Failed to read stored settings at '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Stored settings at '{path}' are not valid: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write stored settings at '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Loads the stored record from the default location. `Ok(None)` when nothing
/// has been stored yet.
pub fn load_basic_info() -> Result<Option<BasicInfo>, StoreError> {
    load_basic_info_from(&paths::get_basic_info_path()?)
}

/// Overwrites the stored record at the default location.
pub fn save_basic_info(info: &BasicInfo) -> Result<(), StoreError> {
    save_basic_info_to(&paths::get_basic_info_path()?, info)
}

/// Removes the stored record. Succeeds when nothing was stored.
pub fn clear_basic_info() -> Result<(), StoreError> {
    clear_basic_info_at(&paths::get_basic_info_path()?)
}

pub fn load_basic_info_from(path: &Path) -> Result<Option<BasicInfo>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No stored settings at '{}'.", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(StoreError::Read { path: path.display().to_string(), source: e });
        }
    };
    let info = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!("Loaded stored settings from '{}'.", path.display());
    Ok(Some(info))
}

pub fn save_basic_info_to(path: &Path, info: &BasicInfo) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(info)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| StoreError::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    debug!("Stored settings at '{}'.", path.display());
    Ok(())
}

pub fn clear_basic_info_at(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::Write { path: path.display().to_string(), source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HydraSource, PipelineMode};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let loaded = load_basic_info_from(&dir.path().join("basicInfoInput.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basicInfoInput.json");
        let mut info = BasicInfo::default();
        info.pipeline_name = "demo".to_string();
        info.mode = PipelineMode::Branch;
        info.hydra.source = Some(HydraSource::CleanSeed("seed.set".to_string()));

        save_basic_info_to(&path, &info).unwrap();
        let loaded = load_basic_info_from(&path).unwrap().unwrap();
        assert_eq!(loaded, info);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basicInfoInput.json");
        let mut info = BasicInfo::default();
        info.eeg_type = "set".to_string();
        save_basic_info_to(&path, &info).unwrap();
        info.eeg_type = "bdf".to_string();
        save_basic_info_to(&path, &info).unwrap();
        assert_eq!(load_basic_info_from(&path).unwrap().unwrap().eeg_type, "bdf");
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basicInfoInput.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_basic_info_from(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basicInfoInput.json");
        fs::write(&path, r#"{ "pipeline_name": "partial" }"#).unwrap();
        let loaded = load_basic_info_from(&path).unwrap().unwrap();
        assert_eq!(loaded.pipeline_name, "partial");
        assert_eq!(loaded.data_path, crate::constants::DEFAULT_DATA_PATH);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basicInfoInput.json");
        save_basic_info_to(&path, &BasicInfo::default()).unwrap();
        clear_basic_info_at(&path).unwrap();
        clear_basic_info_at(&path).unwrap();
        assert!(load_basic_info_from(&path).unwrap().is_none());
    }
}
