// src/cli/args.rs
use crate::models::PipelineMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Generates the MATLAB script for a pipeline configuration.")]
pub struct GenerateArgs {
    /// The pipeline configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Output file or directory. Defaults to the directory of the configuration file.
    #[arg(long, short)]
    pub output: Option<String>,

    /// Print the script to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Do not store the basic settings for future runs.
    #[arg(long)]
    pub no_remember: bool,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Validates a pipeline configuration without generating anything.")]
pub struct CheckArgs {
    /// The pipeline configuration file (TOML or JSON).
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Prints the generated script with line numbers.")]
pub struct PreviewArgs {
    /// The pipeline configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Print the bare script.
    #[arg(long)]
    pub no_line_numbers: bool,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Writes a starter pipeline configuration.")]
pub struct InitArgs {
    /// Where to write the configuration. Defaults to `ctap_pipeline.toml`.
    pub path: Option<String>,

    /// Pipeline layout. Asked interactively when omitted.
    #[arg(long)]
    pub mode: Option<PipelineMode>,

    /// Number of stepSets in a linear pipeline (per segment in branch mode).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub step_sets: Option<u8>,

    /// Number of pipe segments in a branch pipeline.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub segments: Option<u8>,

    /// Do not ask for user input, use stored settings and defaults.
    #[arg(long)]
    pub autosolve: bool,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Shows or edits the stored basic settings.")]
pub struct BasicArgs {
    #[command(subcommand)]
    pub action: Option<BasicAction>,
}

#[derive(clap::Subcommand, Debug)]
pub enum BasicAction {
    /// Print the stored settings (default).
    Show,
    /// Set one or more settings, e.g. `eeg_type=set hydra=off`.
    Set {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Forget the stored settings.
    Reset,
}

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the known CTAP functions.")]
pub struct FuncsArgs {
    /// Only list functions containing this text (case-insensitive).
    pub filter: Option<String>,

    /// Also list the bundled channel-location files.
    #[arg(long)]
    pub chanlocs: bool,
}
