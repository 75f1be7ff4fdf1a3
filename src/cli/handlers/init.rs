// src/cli/handlers/init.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use crate::{
    cli::args::InitArgs,
    constants::{DEFAULT_CONFIG_FILENAME, MAX_TREE_ENTRIES},
    core::{
        config_loader,
        paths::{self, display_path},
        tree_editor::{resize_segments, resize_step_sets},
    },
    models::{BasicInfo, FunctionCall, PipelineConfig, PipelineMode, StepSet},
    state::BasicInfoSession,
};

/// The handler for the `init` command.
/// Writes a starter configuration whose basic settings come from the stored
/// record, the flags, or interactive prompts.
pub fn handle(args: Vec<String>, session: &mut BasicInfoSession) -> Result<()> {
    let init_args = InitArgs::try_parse_from(&args)?;

    let target = resolve_target(&init_args)?;
    if target.exists() && !init_args.force {
        return Err(anyhow!(format!(
            t!("init.error.exists"),
            path = display_path(&target)
        )));
    }

    let is_interactive = !init_args.autosolve;

    let mut basic: BasicInfo = (**session).clone();
    if is_interactive {
        prompt_basic_info(&mut basic)?;
    }
    basic.mode = resolve_mode(&init_args, basic.mode, is_interactive)?;

    let step_sets = resolve_count(init_args.step_sets, t!("init.prompt.step_sets"), is_interactive)?;
    let segments = match basic.mode {
        PipelineMode::Branch => {
            resolve_count(init_args.segments, t!("init.prompt.segments"), is_interactive)?
        }
        PipelineMode::Linear => 1,
    };

    let config = build_starter_config(basic, step_sets, segments)?;
    config_loader::save_pipeline_config(&target, &config)
        .with_context(|| t!("init.error.write"))?;

    **session = config.basic.clone();

    println!("\n{}", t!("common.success").green().bold());
    println!(
        "  {}",
        format!(t!("init.success.created"), path = display_path(&target).cyan())
    );
    println!("  {}", t!("init.info.next_step").dimmed());
    Ok(())
}

fn resolve_target(args: &InitArgs) -> Result<PathBuf> {
    let raw = args.path.as_deref().unwrap_or(DEFAULT_CONFIG_FILENAME);
    let path = paths::expand_user_path(raw)?;
    Ok(if path.is_dir() { path.join(DEFAULT_CONFIG_FILENAME) } else { path })
}

/// Asks for the free-text settings, offering the current values as defaults.
fn prompt_basic_info(basic: &mut BasicInfo) -> Result<()> {
    let theme = ColorfulTheme::default();
    for &name in BasicInfo::TEXT_FIELDS {
        let current = basic.field(name).unwrap_or_default().to_string();
        let value: String = Input::with_theme(&theme)
            .with_prompt(name)
            .default(current)
            .allow_empty(true)
            .interact_text()?;
        basic.set_field(name, &value).map_err(|e| anyhow!(e))?;
    }
    Ok(())
}

fn resolve_mode(args: &InitArgs, current: PipelineMode, is_interactive: bool) -> Result<PipelineMode> {
    if let Some(mode) = args.mode {
        return Ok(mode);
    }
    if !is_interactive {
        return Ok(current);
    }
    let choices = [PipelineMode::Linear, PipelineMode::Branch];
    let default = choices.iter().position(|m| *m == current).unwrap_or(0);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("init.prompt.mode"))
        .items(&choices.map(|m| m.as_str()))
        .default(default)
        .interact()?;
    Ok(choices.get(selection).copied().unwrap_or_default())
}

fn resolve_count(flag: Option<u8>, prompt: &str, is_interactive: bool) -> Result<usize> {
    if let Some(count) = flag {
        return Ok(usize::from(count));
    }
    if !is_interactive {
        return Ok(1);
    }
    let count: usize = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(1)
        .validate_with(|n: &usize| {
            if (1..=MAX_TREE_ENTRIES).contains(n) {
                Ok(())
            } else {
                Err(format!(t!("init.error.count_range"), max = MAX_TREE_ENTRIES))
            }
        })
        .interact_text()?;
    Ok(count)
}

/// Lays out the starter tree: the first stepSet loads the data, the others are
/// placeholders to fill in. Branch segments are chained `pipe1 -> pipe2 -> ...`.
fn build_starter_config(basic: BasicInfo, step_sets: usize, segments: usize) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::new(basic.mode);
    config.basic = basic;

    let mut starter = Vec::new();
    resize_step_sets(&mut starter, step_sets)?;
    for (i, step_set) in starter.iter_mut().enumerate() {
        step_set.label = format!("_step{}", i + 1);
    }
    if let Some(first) = starter.first_mut() {
        *first = StepSet::new(
            "_load",
            vec![
                FunctionCall::new("CTAP_load_data", ""),
                FunctionCall::new("CTAP_load_chanlocs", "'index_match', false"),
            ],
        );
    }

    match config.basic.mode {
        PipelineMode::Linear => config.step_sets = starter,
        PipelineMode::Branch => {
            resize_segments(&mut config.segments, segments)?;
            let mut previous: Option<String> = None;
            for (i, segment) in config.segments.iter_mut().enumerate() {
                segment.id = format!("pipe{}", i + 1);
                segment.label = format!("_segment{}", i + 1);
                segment.parent = previous.take().unwrap_or_default();
                segment.step_sets = starter.clone();
                previous = Some(segment.id.clone());
            }
        }
    }
    Ok(config)
}
