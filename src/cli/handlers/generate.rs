// src/cli/handlers/generate.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use super::commons;
use crate::{
    cli::args::GenerateArgs,
    core::{
        paths::display_path,
        script_writer::{self, WriteOutcome},
    },
    state::BasicInfoSession,
};

/// The handler for the `generate` command: load, validate, render, write.
pub fn handle(args: Vec<String>, session: &mut BasicInfoSession) -> Result<()> {
    let generate_args = GenerateArgs::try_parse_from(&args)?;

    let config = commons::load_config(&generate_args.config, session)?;
    let document = commons::validate_and_render(&config)?;

    if generate_args.stdout {
        print!("{}", document.text());
    } else {
        let target = match &generate_args.output {
            Some(output) => output.clone(),
            None => default_target(&generate_args.config),
        };
        let report = script_writer::write_script(&document, &target)
            .with_context(|| t!("generate.error.write"))?;

        let shown = display_path(&report.path);
        match report.outcome {
            WriteOutcome::Written => println!(
                "{} {}",
                t!("common.success").green().bold(),
                format!(t!("generate.success.written"), path = shown.cyan(), lines = document.lines.len())
            ),
            WriteOutcome::Unchanged => println!(
                "{}",
                format!(t!("generate.info.unchanged"), path = shown.cyan())
            ),
        }
        println!("  {}", format!(t!("generate.info.fingerprint"), hash = report.fingerprint).dimmed());
    }

    if !generate_args.no_remember {
        **session = config.basic;
    }
    Ok(())
}

/// The directory holding the configuration file, with a trailing separator so
/// the script gets its own file name.
fn default_target(config_path: &std::path::Path) -> String {
    let dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    format!("{}{}", dir, std::path::MAIN_SEPARATOR)
}
