// src/core/config_loader.rs

//! # Config Loader
//!
//! Reads pipeline configuration files. The format is chosen by extension:
//! `.json` is JSON, everything else (normally `.toml`) is TOML.

use crate::models::{BasicInfo, PipelineConfig};
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON file at '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Failed to serialize configuration: {0}")]
    JsonSerialize(#[from] serde_json::Error),
    #[error("Failed to write configuration file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Reads and parses a pipeline configuration file.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let format = ConfigFormat::from_path(path);
    debug!("Loading {:?} configuration from '{}'.", format, path.display());

    match format {
        ConfigFormat::Toml => toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        }),
        ConfigFormat::Json => serde_json::from_str(&content).map_err(|e| ConfigError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Fills the empty free-text fields of `config.basic` from the stored record.
/// Returns the names of the fields that were filled.
pub fn apply_stored_defaults(config: &mut PipelineConfig, stored: &BasicInfo) -> Vec<&'static str> {
    let before = config.basic.clone();
    config.basic.fill_missing_from(stored);
    let filled: Vec<&'static str> = BasicInfo::TEXT_FIELDS
        .iter()
        .copied()
        .filter(|name| before.field(name) != config.basic.field(name))
        .collect();
    if !filled.is_empty() {
        debug!("Filled from stored settings: {}", filled.join(", "));
    }
    filled
}

/// Serializes a configuration in the given format.
pub fn serialize_pipeline_config(
    config: &PipelineConfig,
    format: ConfigFormat,
) -> Result<String, ConfigError> {
    Ok(match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Json => {
            let mut json = serde_json::to_string_pretty(config)?;
            json.push('\n');
            json
        }
    })
}

/// Writes a configuration file, picking the format from the extension.
pub fn save_pipeline_config(path: &Path, config: &PipelineConfig) -> Result<(), ConfigError> {
    let content = serialize_pipeline_config(config, ConfigFormat::from_path(path))?;
    fs::write(path, content).map_err(|e| ConfigError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HydraSource, PipelineMode};
    use tempfile::tempdir;

    const LINEAR_TOML: &str = r#"
[basic]
pipeline_name = "demo"
project_root = "demo_project"
sbj_filt = "1"
eeg_type = "set"
eeg_chanloc = "chanlocs128_pist.elp"
eeg_reference = "L_MASTOID, R_MASTOID"
eeg_veog_channel_names = "VEOG1, VEOG2"
eeg_heog_channel_names = "HEOG1, HEOG2"
mode = "linear"

[basic.hydra]
enabled = true
source = { time_range = "10 70" }

[runtime]
stop_on_error = true

[[step_sets]]
label = "_load"

[[step_sets.functions]]
name = "CTAP_load_data"

[[step_sets]]
label = "_filter"

[[step_sets.functions]]
name = "CTAP_fir_filter"
params = "'locutoff', 1"
"#;

    #[test]
    fn test_load_toml_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipe.toml");
        fs::write(&path, LINEAR_TOML).unwrap();

        let config = load_pipeline_config(&path).unwrap();
        assert_eq!(config.basic.pipeline_name, "demo");
        assert_eq!(config.basic.mode, PipelineMode::Linear);
        assert_eq!(config.basic.hydra.source, Some(HydraSource::TimeRange("10 70".to_string())));
        assert!(config.runtime.stop_on_error);
        assert!(config.runtime.overwrite_old_results);
        assert_eq!(config.step_sets.len(), 2);
        assert_eq!(config.step_sets[1].functions[0].params, "'locutoff', 1");
        assert!(config.segments.is_empty());
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipe.json");
        fs::write(
            &path,
            r#"{
                "basic": { "pipeline_name": "branchy", "mode": "branch" },
                "segments": [
                    { "id": "A", "label": "_filter", "step_sets": [
                        { "label": "_load", "functions": [ { "name": "CTAP_load_data" } ] }
                    ] },
                    { "id": "B", "label": "_ica", "parent": "A" }
                ]
            }"#,
        )
        .unwrap();

        let config = load_pipeline_config(&path).unwrap();
        assert_eq!(config.basic.mode, PipelineMode::Branch);
        assert_eq!(config.segments.len(), 2);
        assert_eq!(config.segments[1].parent, "A");
        assert!(config.segments[1].step_sets.is_empty());
    }

    #[test]
    fn test_parse_errors_carry_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[basic\npipeline_name = ").unwrap();
        let err = load_pipeline_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = load_pipeline_config(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_apply_stored_defaults_only_fills_blanks() {
        let mut config = PipelineConfig::default();
        config.basic.pipeline_name = "mine".to_string();
        let mut stored = BasicInfo::default();
        stored.pipeline_name = "stored".to_string();
        stored.eeg_type = "bdf".to_string();

        let filled = apply_stored_defaults(&mut config, &stored);
        assert_eq!(filled, vec!["eeg_type"]);
        assert_eq!(config.basic.pipeline_name, "mine");
        assert_eq!(config.basic.eeg_type, "bdf");
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::new(PipelineMode::Branch);
        config.basic.pipeline_name = "saved".to_string();
        config.segments[0].id = "A".to_string();

        for name in ["pipe.toml", "pipe.json"] {
            let path = dir.path().join(name);
            save_pipeline_config(&path, &config).unwrap();
            let loaded = load_pipeline_config(&path).unwrap();
            assert_eq!(loaded.basic, config.basic);
            assert_eq!(loaded.segments.len(), 1);
            assert_eq!(loaded.segments[0].id, "A");
        }
    }
}
