// src/bin/ctapgen.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use ctapgen::{
    cli::{Cli, dispatcher},
    state::BasicInfoSession,
};

/// Sets up logging, dispatches the command, saves the stored settings if the
/// command changed them, and reports errors.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Command-level parse errors and `--help` print themselves.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut session = BasicInfoSession::open_default()?;
    dispatcher::dispatch(cli.args, &mut session)?;

    if session.commit()? {
        log::debug!("Stored settings updated at '{}'.", session.path().display());
    }
    Ok(())
}
