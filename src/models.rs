// src/models.rs

use crate::constants::DEFAULT_DATA_PATH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// --- BASIC SETTINGS (persisted between sessions) ---

/// Shape of the generated pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// A flat, ordered list of stepSets run by `CTAP_pipeline_looper`.
    #[default]
    Linear,
    /// Named pipe segments that depend on each other, run by `CTAP_pipeline_brancher`.
    Branch,
}

impl PipelineMode {
    /// The lowercase name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Branch => "branch",
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "branch" => Ok(Self::Branch),
            other => Err(format!(
                "Unknown pipeline mode '{}'. Expected 'linear' or 'branch'.",
                other
            )),
        }
    }
}

/// Where HYDRA takes its clean calibration data from.
///
/// Being an enum, only one of the two options can be active at a time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HydraSource {
    /// Clean segment time range `[start end]` in seconds, taken from the test data.
    TimeRange(String),
    /// Name of a clean seed data file extracted from the test data.
    CleanSeed(String),
}

impl HydraSource {
    /// The user-provided text of whichever option is active.
    pub fn value(&self) -> &str {
        match self {
            Self::TimeRange(v) | Self::CleanSeed(v) => v,
        }
    }
}

/// The optional HYDRA parameter-sweep block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct HydraSettings {
    pub enabled: bool,
    pub source: Option<HydraSource>,
}

impl Default for HydraSettings {
    fn default() -> Self {
        // The form starts with HYDRA on and the time-range option ticked.
        Self {
            enabled: true,
            source: Some(HydraSource::TimeRange(String::new())),
        }
    }
}

/// Flat record of scalar pipeline settings.
///
/// This is the only record that survives between sessions; see
/// [`crate::core::settings_store`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BasicInfo {
    /// Name of the folder holding the pipe outputs. Also names the generated file.
    pub pipeline_name: String,
    /// The root directory of the current analysis, below `ctap/templates`.
    pub project_root: String,
    /// Location of the EEG data.
    pub data_path: String,
    /// When `false`, `data_path` is relative to the CTAP repository root.
    pub own_data_path: bool,
    /// Selects the subjects from the EEG dataset names.
    pub sbj_filt: String,
    /// EEG file type, e.g. `set` or `bdf`.
    pub eeg_type: String,
    /// Channel location identifier of the EEG data.
    pub eeg_chanloc: String,
    /// Reference channel(s), comma separated.
    pub eeg_reference: String,
    /// VEOG channel names, comma separated.
    pub eeg_veog_channel_names: String,
    /// HEOG channel names, comma separated.
    pub eeg_heog_channel_names: String,
    pub mode: PipelineMode,
    pub hydra: HydraSettings,
}

impl Default for BasicInfo {
    fn default() -> Self {
        Self {
            pipeline_name: String::new(),
            project_root: String::new(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            own_data_path: false,
            sbj_filt: String::new(),
            eeg_type: String::new(),
            eeg_chanloc: String::new(),
            eeg_reference: String::new(),
            eeg_veog_channel_names: String::new(),
            eeg_heog_channel_names: String::new(),
            mode: PipelineMode::default(),
            hydra: HydraSettings::default(),
        }
    }
}

impl BasicInfo {
    /// Names of the free-text fields, in the order the form shows them.
    /// These are the keys accepted by [`BasicInfo::set_field`].
    pub const TEXT_FIELDS: &'static [&'static str] = &[
        "pipeline_name",
        "project_root",
        "data_path",
        "sbj_filt",
        "eeg_type",
        "eeg_chanloc",
        "eeg_reference",
        "eeg_veog_channel_names",
        "eeg_heog_channel_names",
    ];

    /// Returns the value of a free-text field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "pipeline_name" => &self.pipeline_name,
            "project_root" => &self.project_root,
            "data_path" => &self.data_path,
            "sbj_filt" => &self.sbj_filt,
            "eeg_type" => &self.eeg_type,
            "eeg_chanloc" => &self.eeg_chanloc,
            "eeg_reference" => &self.eeg_reference,
            "eeg_veog_channel_names" => &self.eeg_veog_channel_names,
            "eeg_heog_channel_names" => &self.eeg_heog_channel_names,
            _ => return None,
        };
        Some(value)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "pipeline_name" => &mut self.pipeline_name,
            "project_root" => &mut self.project_root,
            "data_path" => &mut self.data_path,
            "sbj_filt" => &mut self.sbj_filt,
            "eeg_type" => &mut self.eeg_type,
            "eeg_chanloc" => &mut self.eeg_chanloc,
            "eeg_reference" => &mut self.eeg_reference,
            "eeg_veog_channel_names" => &mut self.eeg_veog_channel_names,
            "eeg_heog_channel_names" => &mut self.eeg_heog_channel_names,
            _ => return None,
        };
        Some(value)
    }

    /// Sets any field by name from its textual form.
    ///
    /// Besides the free-text fields this understands `own_data_path`, `mode`,
    /// `hydra` (on/off), `hydra_time_range` and `hydra_clean_seed`; the last two
    /// also select their HYDRA option, mirroring the form's mutually exclusive
    /// checkboxes.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), String> {
        match name {
            "own_data_path" => self.own_data_path = parse_flag(name, value)?,
            "hydra" => self.hydra.enabled = parse_flag(name, value)?,
            "mode" => self.mode = value.parse()?,
            "hydra_time_range" => {
                self.hydra.source = Some(HydraSource::TimeRange(value.to_string()));
            }
            "hydra_clean_seed" => {
                self.hydra.source = Some(HydraSource::CleanSeed(value.to_string()));
            }
            _ => {
                let slot = self
                    .field_mut(name)
                    .ok_or_else(|| format!("Unknown basic setting '{}'.", name))?;
                *slot = value.to_string();
            }
        }
        Ok(())
    }

    /// Fills every empty free-text field from `stored`, leaving user values alone.
    pub fn fill_missing_from(&mut self, stored: &BasicInfo) {
        for name in Self::TEXT_FIELDS {
            let Some(fallback) = stored.field(name) else {
                continue;
            };
            if let Some(slot) = self.field_mut(name)
                && slot.trim().is_empty()
                && !fallback.trim().is_empty()
            {
                *slot = fallback.to_string();
            }
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!(
            "Setting '{}' expects true/false, got '{}'.",
            name, value
        )),
    }
}

/// Run-time switches written at the top of the generated script.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeOptions {
    /// Branch mode only: guards the `CTAP_pipeline_brancher` call.
    pub prepro: bool,
    pub stop_on_error: bool,
    pub overwrite_old_results: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            prepro: true,
            stop_on_error: false,
            overwrite_old_results: true,
        }
    }
}

// --- PIPELINE TREE (session only) ---

/// One CTAP function call inside a stepSet.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FunctionCall {
    /// Session-local handle used by the tree editor. Never serialized.
    #[serde(skip, default = "Uuid::new_v4")]
    pub key: Uuid,
    /// Function name from the CTAP catalog, e.g. `CTAP_load_data`.
    #[serde(default)]
    pub name: String,
    /// Raw parameter text placed inside `struct(...)`, e.g. `'method', 'fastica'`.
    #[serde(default)]
    pub params: String,
}

impl Default for FunctionCall {
    fn default() -> Self {
        Self {
            key: Uuid::new_v4(),
            name: String::new(),
            params: String::new(),
        }
    }
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            ..Default::default()
        }
    }
}

/// An ordered group of function calls; one stage of the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StepSet {
    #[serde(skip, default = "Uuid::new_v4")]
    pub key: Uuid,
    /// Description label appended to the stepSet number, e.g. `_load`.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub functions: Vec<FunctionCall>,
}

impl Default for StepSet {
    fn default() -> Self {
        Self {
            key: Uuid::new_v4(),
            label: String::new(),
            functions: vec![FunctionCall::default()],
        }
    }
}

impl StepSet {
    pub fn new(label: impl Into<String>, functions: Vec<FunctionCall>) -> Self {
        Self {
            label: label.into(),
            functions,
            ..Default::default()
        }
    }
}

/// A named branch of a branch-mode pipeline.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PipeSegment {
    #[serde(skip, default = "Uuid::new_v4")]
    pub key: Uuid,
    /// Segment id, e.g. `pipe2`. Also names the generated `sbf_<id>` routine.
    #[serde(default)]
    pub id: String,
    /// Description label of the segment's work, e.g. `_load`.
    #[serde(default)]
    pub label: String,
    /// Id of the previously declared segment this one consumes. Empty for the first.
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub step_sets: Vec<StepSet>,
}

impl Default for PipeSegment {
    fn default() -> Self {
        Self {
            key: Uuid::new_v4(),
            id: String::new(),
            label: String::new(),
            parent: String::new(),
            step_sets: vec![StepSet::default()],
        }
    }
}

impl PipeSegment {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        parent: impl Into<String>,
        step_sets: Vec<StepSet>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent: parent.into(),
            step_sets,
            ..Default::default()
        }
    }

    /// The declared parent id, or `None` when left empty.
    pub fn parent_id(&self) -> Option<&str> {
        let parent = self.parent.trim();
        (!parent.is_empty()).then_some(parent)
    }
}

/// The whole configuration handed to the generator.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub basic: BasicInfo,
    #[serde(default)]
    pub runtime: RuntimeOptions,
    /// The linear tree, used when `basic.mode` is `linear`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub step_sets: Vec<StepSet>,
    /// The branch tree, used when `basic.mode` is `branch`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<PipeSegment>,
}

// --- OUTPUT ---

/// The rendered script: an ordered list of lines plus the file name to write it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDocument {
    pub file_name: String,
    pub lines: Vec<String>,
}

impl ScriptDocument {
    /// The document as written to disk: lines joined by `\n`, with a trailing newline.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
