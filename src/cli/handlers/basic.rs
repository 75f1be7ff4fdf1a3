// src/cli/handlers/basic.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::{BasicAction, BasicArgs},
    constants::BASIC_INFO_STORAGE_KEY,
    core::paths::display_path,
    models::{BasicInfo, HydraSource},
    state::BasicInfoSession,
};

/// The handler for the `basic` command.
pub fn handle(args: Vec<String>, session: &mut BasicInfoSession) -> Result<()> {
    let basic_args = BasicArgs::try_parse_from(&args)?;

    match basic_args.action.unwrap_or(BasicAction::Show) {
        BasicAction::Show => show(session),
        BasicAction::Set { pairs } => {
            let parsed = parse_key_value_pairs(&pairs)?;
            for (key, value) in &parsed {
                session.set_field(key, value).map_err(|e| anyhow!(e))?;
            }
            // The session writes on commit, only if something really changed.
            println!(
                "{} {}",
                t!("common.success").green().bold(),
                format!(t!("basic.success.updated"), count = parsed.len())
            );
            Ok(())
        }
        BasicAction::Reset => {
            session.reset()?;
            println!("{} {}", t!("common.success").green().bold(), t!("basic.success.reset"));
            Ok(())
        }
    }
}

fn show(session: &BasicInfoSession) -> Result<()> {
    println!(
        "{} {}",
        BASIC_INFO_STORAGE_KEY.bold(),
        format!("({})", display_path(session.path())).dimmed()
    );
    if !session.was_stored() {
        println!("  {}", t!("basic.info.nothing_stored").yellow());
    }
    for (key, value) in describe(session) {
        println!("  {:<24} {}", key.cyan(), value);
    }
    Ok(())
}

/// Every setting as `(key, value)` in the order `basic set` accepts them.
fn describe(info: &BasicInfo) -> Vec<(&'static str, String)> {
    let mut rows: Vec<(&'static str, String)> = BasicInfo::TEXT_FIELDS
        .iter()
        .map(|&name| (name, info.field(name).unwrap_or_default().to_string()))
        .collect();
    rows.push(("own_data_path", info.own_data_path.to_string()));
    rows.push(("mode", info.mode.to_string()));
    rows.push(("hydra", info.hydra.enabled.to_string()));
    match &info.hydra.source {
        Some(HydraSource::TimeRange(range)) => rows.push(("hydra_time_range", range.clone())),
        Some(HydraSource::CleanSeed(seed)) => rows.push(("hydra_clean_seed", seed.clone())),
        None => {}
    }
    rows
}

/// Parses "KEY=VALUE" strings, keeping their order.
fn parse_key_value_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.trim().to_string(), value.trim().to_string())),
            None => Err(anyhow!(format!(t!("basic.error.pair_format"), pair = pair))),
        })
        .collect()
}
