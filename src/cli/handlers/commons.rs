// src/cli/handlers/commons.rs

// Shared steps of the generate, check and preview commands.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::path::Path;

use crate::{
    core::{
        config_loader,
        paths::display_path,
        renderer,
        validator::{self, Severity, ValidationIssue},
    },
    models::{PipelineConfig, ScriptDocument},
    state::BasicInfoSession,
};

/// Loads a configuration file and fills its blank basic settings from the
/// stored record.
pub fn load_config(path: &Path, session: &BasicInfoSession) -> Result<PipelineConfig> {
    let mut config = config_loader::load_pipeline_config(path)
        .with_context(|| format!(t!("config.error.load"), path = display_path(path)))?;

    let filled = config_loader::apply_stored_defaults(&mut config, session);
    if !filled.is_empty() {
        eprintln!(
            "{}",
            format!(t!("config.info.filled_from_store"), fields = filled.join(", ")).dimmed()
        );
    }
    Ok(config)
}

/// Prints every issue to stderr. Fails when any of them is an error.
pub fn report_issues(issues: &[ValidationIssue]) -> Result<()> {
    for issue in issues {
        let line = issue.to_string();
        match issue.severity {
            Severity::Error => eprintln!("{}", line.red()),
            Severity::Warning => eprintln!("{}", line.yellow()),
        }
    }

    let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
    if errors > 0 {
        return Err(anyhow!(format!(t!("validate.error.blocked"), count = errors)));
    }
    Ok(())
}

/// Validates and renders a configuration. Validation errors stop before rendering.
pub fn validate_and_render(config: &PipelineConfig) -> Result<ScriptDocument> {
    report_issues(&validator::validate(config))?;
    renderer::render(config).with_context(|| t!("generate.error.render"))
}
