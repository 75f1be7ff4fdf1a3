// src/cli/handlers/preview.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use super::commons;
use crate::{cli::args::PreviewArgs, models::ScriptDocument, state::BasicInfoSession};

/// The handler for the `preview` command.
pub fn handle(args: Vec<String>, session: &mut BasicInfoSession) -> Result<()> {
    let preview_args = PreviewArgs::try_parse_from(&args)?;

    let config = commons::load_config(&preview_args.config, session)?;
    let document = commons::validate_and_render(&config)?;

    println!("{}", format!("% {}", document.file_name).dimmed());
    for line in numbered_lines(&document, !preview_args.no_line_numbers) {
        println!("{}", line);
    }
    Ok(())
}

fn numbered_lines(document: &ScriptDocument, with_numbers: bool) -> Vec<String> {
    if !with_numbers {
        return document.lines.clone();
    }
    let width = document.lines.len().to_string().len();
    document
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{} {}", format!("{:>width$} |", i + 1).dimmed(), line))
        .collect()
}
