// src/cli/handlers/check.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use super::commons;
use crate::{cli::args::CheckArgs, core::validator, state::BasicInfoSession};

/// The handler for the `check` command. Prints every issue; fails on errors.
pub fn handle(args: Vec<String>, session: &mut BasicInfoSession) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;

    let config = commons::load_config(&check_args.config, session)?;
    let issues = validator::validate(&config);
    commons::report_issues(&issues)?;

    if issues.is_empty() {
        println!("{} {}", t!("common.success").green().bold(), t!("check.success.clean"));
    } else {
        println!(
            "{}",
            format!(t!("check.info.warnings_only"), count = issues.len()).yellow()
        );
    }
    Ok(())
}
