// src/core/validator.rs

//! Pre-generation checks over a [`PipelineConfig`].
//!
//! Every problem is collected rather than stopping at the first, so the user
//! can fix a configuration file in one pass. Issues of [`Severity::Error`]
//! block generation; warnings are printed and generation continues.

use crate::{
    core::catalog,
    models::{BasicInfo, HydraSource, PipeSegment, PipelineConfig, PipelineMode, StepSet},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashSet, fmt};

lazy_static! {
    static ref MATLAB_IDENT: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier regex is valid");
    // Segment ids follow `sbf_`, so a leading digit is fine.
    static ref SEGMENT_ID: Regex = Regex::new(r"^[A-Za-z0-9_]+$").expect("segment id regex is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Where the problem is, e.g. `segments[1].parent`.
    pub path: String,
    pub reason: String,
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { path: path.into(), reason: reason.into(), severity: Severity::Error }
    }

    fn warning(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { path: path.into(), reason: reason.into(), severity: Severity::Warning }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", tag, self.path, self.reason)
    }
}

/// Checks a configuration and returns every issue found, errors and warnings
/// interleaved in document order. An empty list means the configuration is clean.
pub fn validate(config: &PipelineConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    validate_basic(&config.basic, &mut issues);

    match config.basic.mode {
        PipelineMode::Linear => {
            if config.step_sets.is_empty() {
                issues.push(ValidationIssue::error("step_sets", "a linear pipeline needs at least one stepSet"));
            }
            validate_step_sets(&config.step_sets, "step_sets", &mut issues);
            if !config.segments.is_empty() {
                issues.push(ValidationIssue::warning(
                    "segments",
                    "pipe segments are ignored in linear mode",
                ));
            }
        }
        PipelineMode::Branch => {
            if config.segments.is_empty() {
                issues.push(ValidationIssue::error("segments", "a branch pipeline needs at least one pipe segment"));
            }
            validate_segments(&config.segments, &mut issues);
            if !config.step_sets.is_empty() {
                issues.push(ValidationIssue::warning(
                    "step_sets",
                    "top-level stepSets are ignored in branch mode",
                ));
            }
        }
    }

    issues
}

/// Returns `true` if any issue blocks generation.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

fn validate_basic(basic: &BasicInfo, issues: &mut Vec<ValidationIssue>) {
    // Every free-text field is required.
    for &name in BasicInfo::TEXT_FIELDS {
        if basic.field(name).is_some_and(|v| v.trim().is_empty()) {
            issues.push(ValidationIssue::error(
                format!("basic.{name}"),
                "the field cannot be empty",
            ));
        }
    }

    let name = basic.pipeline_name.trim();
    if !name.is_empty() && !MATLAB_IDENT.is_match(name) {
        issues.push(ValidationIssue::warning(
            "basic.pipeline_name",
            format!("'{name}' is not a valid MATLAB identifier; the script file name will be adjusted"),
        ));
    }

    let chanloc = basic.eeg_chanloc.trim();
    if !chanloc.is_empty() && !catalog::is_known_chanloc(chanloc) {
        issues.push(ValidationIssue::warning(
            "basic.eeg_chanloc",
            format!("'{chanloc}' is not one of the bundled channel-location files"),
        ));
    }

    if basic.hydra.enabled {
        match &basic.hydra.source {
            None => issues.push(ValidationIssue::warning(
                "basic.hydra",
                "HYDRA is enabled but neither a time range nor a clean seed is given",
            )),
            Some(source) if source.value().trim().is_empty() => {
                let path = match source {
                    HydraSource::TimeRange(_) => "basic.hydra.time_range",
                    HydraSource::CleanSeed(_) => "basic.hydra.clean_seed",
                };
                issues.push(ValidationIssue::error(path, "the selected HYDRA option cannot be empty"));
            }
            Some(_) => {}
        }
    }
}

fn validate_step_sets(step_sets: &[StepSet], prefix: &str, issues: &mut Vec<ValidationIssue>) {
    for (i, step_set) in step_sets.iter().enumerate() {
        let loc = format!("{prefix}[{i}]");
        if step_set.label.trim().is_empty() {
            issues.push(ValidationIssue::error(format!("{loc}.label"), "stepSet label cannot be empty"));
        }
        if step_set.functions.is_empty() {
            issues.push(ValidationIssue::error(
                format!("{loc}.functions"),
                "a stepSet needs at least one function",
            ));
        }
        for (j, function) in step_set.functions.iter().enumerate() {
            let fpath = format!("{loc}.functions[{j}].name");
            let name = function.name.trim();
            if name.is_empty() {
                issues.push(ValidationIssue::error(fpath, "function name cannot be empty"));
            } else if !catalog::is_known_function(name) {
                issues.push(ValidationIssue::warning(
                    fpath,
                    format!("'{name}' is not a known CTAP function"),
                ));
            }
        }
    }
}

fn validate_segments(segments: &[PipeSegment], issues: &mut Vec<ValidationIssue>) {
    let mut declared: HashSet<&str> = HashSet::new();
    let all_ids: HashSet<&str> = segments.iter().map(|s| s.id.trim()).collect();

    for (i, segment) in segments.iter().enumerate() {
        let loc = format!("segments[{i}]");
        let id = segment.id.trim();

        if id.is_empty() {
            issues.push(ValidationIssue::error(format!("{loc}.id"), "segment id cannot be empty"));
        } else if !SEGMENT_ID.is_match(id) {
            issues.push(ValidationIssue::error(
                format!("{loc}.id"),
                format!("segment id '{id}' may only contain letters, digits and '_'"),
            ));
            declared.insert(id);
        } else if !declared.insert(id) {
            issues.push(ValidationIssue::error(
                format!("{loc}.id"),
                format!("duplicate segment id '{id}'"),
            ));
        }

        let parent_path = format!("{loc}.parent");
        match (i, segment.parent_id()) {
            (0, Some(parent)) => issues.push(ValidationIssue::warning(
                parent_path,
                format!("the first segment is the root; its parent '{parent}' is ignored"),
            )),
            (0, None) => {}
            (_, None) => issues.push(ValidationIssue::error(
                parent_path,
                "every segment after the first must name its parent",
            )),
            (_, Some(parent)) if parent == id => issues.push(ValidationIssue::error(
                parent_path,
                "a segment cannot be its own parent",
            )),
            (_, Some(parent)) if declared.contains(parent) => {}
            (_, Some(parent)) if all_ids.contains(parent) => issues.push(ValidationIssue::error(
                parent_path,
                format!("parent '{parent}' is declared after this segment"),
            )),
            (_, Some(parent)) => issues.push(ValidationIssue::error(
                parent_path,
                format!("No such pipe: '{parent}'"),
            )),
        }

        validate_step_sets(&segment.step_sets, &format!("{loc}.step_sets"), issues);
    }
}
