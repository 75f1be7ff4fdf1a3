// src/cli/handlers/funcs.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::args::FuncsArgs,
    core::{catalog, renderer::struct_field_name},
    state::BasicInfoSession,
};

/// The handler for the `funcs` command: lists catalog entries.
pub fn handle(args: Vec<String>, _session: &mut BasicInfoSession) -> Result<()> {
    let funcs_args = FuncsArgs::try_parse_from(&args)?;
    let filter = funcs_args.filter.unwrap_or_default();

    let hits = catalog::search(&filter);
    if hits.is_empty() {
        println!("{}", format!(t!("funcs.info.no_match"), filter = filter).yellow());
    }
    for name in hits {
        println!("  {:<40} {}", name.cyan(), format!("out.{}", struct_field_name(name)).dimmed());
    }

    if funcs_args.chanlocs {
        println!("\n{}", t!("funcs.header.chanlocs").bold());
        for chanloc in catalog::CTAP_CHANLOCS {
            println!("  {}", chanloc);
        }
    }
    Ok(())
}
