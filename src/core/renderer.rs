// src/core/renderer.rs

//! # Renderer
//!
//! Entry point of script generation plus the building blocks shared by the
//! linear and branch templates. Every function here returns whole lines; the
//! templates only decide their order and indentation.

use crate::{
    dev_utils,
    constants::{FUNCTION_PREFIX_LEN, SCRIPT_EXTENSION},
    core::{branch_template, hierarchy::HierarchyError, linear_template},
    models::{BasicInfo, HydraSource, PipelineConfig, PipelineMode, ScriptDocument, StepSet},
};
use crate::core::sanitizer::{cell_literal, filter_literal};
use thiserror::Error;

/// Stem used when the pipeline name has no usable characters.
const FALLBACK_STEM: &str = "ctap_pipeline";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Cannot build the branch hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),
}

/// Renders the whole configuration into a script document.
///
/// The tree used is the one matching `basic.mode`; the other one is ignored.
/// Linear rendering never fails. Branch rendering fails only when the segment
/// parents do not form a valid hierarchy.
pub fn render(config: &PipelineConfig) -> Result<ScriptDocument, RenderError> {
    let _timer = dev_utils::BlockTimer::new("renderer::render");
    let stem = script_stem(&config.basic.pipeline_name);
    let lines = match config.basic.mode {
        PipelineMode::Linear => {
            linear_template::render_linear(&config.basic, &config.runtime, &config.step_sets, &stem)
        }
        PipelineMode::Branch => branch_template::render_branch(
            &config.basic,
            &config.runtime,
            &config.segments,
            &stem,
        )?,
    };
    log::debug!(
        "Rendered {} pipeline '{}' into {} lines.",
        config.basic.mode,
        stem,
        lines.len()
    );
    Ok(ScriptDocument {
        file_name: format!("{}.{}", stem, SCRIPT_EXTENSION),
        lines,
    })
}

/// File stem of the generated script: the pipeline name with every character
/// outside `[A-Za-z0-9_]` replaced by `_`.
pub fn script_stem(pipeline_name: &str) -> String {
    let stem: String = pipeline_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Quotes text as a MATLAB char array, doubling embedded single quotes.
pub(crate) fn matlab_str(value: &str) -> String {
    format!("'{}'", one_line(value).replace('\'', "''"))
}

/// Trims a user value and folds any line breaks into spaces, so that every
/// rendered element stays a single line.
pub(crate) fn one_line(value: &str) -> String {
    value.trim().replace(['\r', '\n'], " ")
}

/// The `out.<field>` name for a function: its name without the `CTAP_` prefix.
pub fn struct_field_name(function_name: &str) -> String {
    function_name.trim().chars().skip(FUNCTION_PREFIX_LEN).collect()
}

/// Pipeline name and the directory bookkeeping at the top of every script.
pub(crate) fn path_lines(basic: &BasicInfo, stem: &str) -> Vec<String> {
    let data_dir = if basic.own_data_path {
        format!("data_dir = {};", matlab_str(&basic.data_path))
    } else {
        format!("data_dir = append(reporoot, {});", matlab_str(&basic.data_path))
    };
    vec![
        format!("pipeline_name = {};", matlab_str(&basic.pipeline_name)),
        "FILE_ROOT = mfilename('fullpath');".to_string(),
        format!(
            "reporoot = FILE_ROOT(1:strfind(FILE_ROOT, fullfile('ctap', 'templates', {}, '{}')) - 1);",
            matlab_str(&basic.project_root),
            stem
        ),
        format!("project_dir = FILE_ROOT(1:strfind(FILE_ROOT, fullfile('{}')) - 1);", stem),
        data_dir,
    ]
}

/// EEG metadata assignments. List-valued fields go through the token sanitizer.
pub(crate) fn eeg_lines(basic: &BasicInfo, indent: &str) -> Vec<String> {
    vec![
        format!("{indent}Cfg.eeg.chanlocs = {};", matlab_str(&basic.eeg_chanloc)),
        format!("{indent}Cfg.eeg.reference = {};", cell_literal(&basic.eeg_reference)),
        format!(
            "{indent}Cfg.eeg.veogChannelNames = {};",
            cell_literal(&basic.eeg_veog_channel_names)
        ),
        format!(
            "{indent}Cfg.eeg.heogChannelNames = {};",
            cell_literal(&basic.eeg_heog_channel_names)
        ),
    ]
}

/// The measurement-config line selecting the input files.
pub(crate) fn measurement_line(basic: &BasicInfo) -> String {
    format!(
        "Cfg.MC = get_meas_cfg_MC(Cfg, data_dir, 'eeg_ext', {}, 'sbj_filt', {});",
        matlab_str(&basic.eeg_type),
        filter_literal(&basic.sbj_filt)
    )
}

/// The HYDRA block. Empty when HYDRA is disabled.
pub(crate) fn hydra_lines(basic: &BasicInfo) -> Vec<String> {
    if !basic.hydra.enabled {
        return Vec::new();
    }
    let mut lines = vec![
        "HYDRA = true;".to_string(),
        "PARAM = param_sweep_setup(project_dir);".to_string(),
        "Cfg.HYDRA.ifapply = HYDRA;".to_string(),
        format!("Cfg.HYDRA.chanloc = {};", matlab_str(&basic.eeg_chanloc)),
        "Cfg.HYDRA.PARAM = PARAM;".to_string(),
        "Cfg.HYDRA.FULL_CLEAN_SEED = false;".to_string(),
    ];
    match &basic.hydra.source {
        Some(HydraSource::TimeRange(range)) => {
            lines.push("Cfg.HYDRA.provide_seed_timerange = true;".to_string());
            lines.push(format!("Cfg.HYDRA.cleanseed_timerange = {};", time_range_literal(range)));
        }
        Some(HydraSource::CleanSeed(seed)) => {
            lines.push("Cfg.HYDRA.provide_seed_timerange = false;".to_string());
            let file_name = seed.trim().trim_matches(|c| c == '\'' || c == '"');
            lines.push(format!("Cfg.HYDRA.seed_fname = {};", matlab_str(file_name)));
        }
        None => {}
    }
    lines
}

/// `10 70` and `[10 70]` both render as `[10 70]`.
fn time_range_literal(range: &str) -> String {
    let range = one_line(range);
    if range.starts_with('[') {
        range
    } else {
        format!("[{}]", range)
    }
}

/// The stepSet construction block.
///
/// Every stepSet contributes its `id` and `funH` lines, numbered from 1 in list
/// order; then every function contributes one `out.<field> = struct(...)` line,
/// in stepSet order and then function order.
pub(crate) fn step_set_block(step_sets: &[StepSet], indent: &str) -> Vec<String> {
    let mut structure = Vec::with_capacity(step_sets.len() * 2);
    let mut params = Vec::new();

    for (index, step_set) in step_sets.iter().enumerate() {
        let n = index + 1;
        let handles = step_set
            .functions
            .iter()
            .map(|f| format!("@{}", one_line(&f.name)))
            .collect::<Vec<_>>()
            .join(", ");
        structure.push(format!(
            "{indent}stepSet({n}).id = [num2str({n}), {}];",
            matlab_str(&step_set.label)
        ));
        structure.push(format!("{indent}stepSet({n}).funH = {{{handles}}};"));

        for function in &step_set.functions {
            params.push(format!(
                "{indent}out.{} = struct({});",
                struct_field_name(&one_line(&function.name)),
                one_line(&function.params)
            ));
        }
    }

    structure.extend(params);
    structure
}
