// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, BASIC_INFO_FILENAME, CONFIG_DIR_ENV};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to expand path '{template}': {reason}")]
    Expansion { template: String, reason: String },
}

/// Returns the ctapgen settings directory, creating it if needed.
///
/// `CTAPGEN_CONFIG_DIR` wins when set and non-empty; otherwise the directory is
/// `ctapgen` inside the platform config directory (`~/.config/ctapgen` on Linux).
pub fn get_ctapgen_config_dir() -> Result<PathBuf, PathError> {
    let config_path = match env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(APP_DIR_NAME),
    };

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    Ok(config_path)
}

/// Path of the stored BasicInfo record.
pub fn get_basic_info_path() -> Result<PathBuf, PathError> {
    get_ctapgen_config_dir().map(|dir| dir.join(BASIC_INFO_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user-supplied path.
pub fn expand_user_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// A path for messages: canonical when it exists, without the `\\?\` prefix on Windows.
pub fn display_path(path: &Path) -> String {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical.display().to_string(),
        Err(_) => dunce::simplified(path).display().to_string(),
    }
}
