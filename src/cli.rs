use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use mixtaper::mixtape::{OutputFormat, errors::Result};

use crate::runner;

#[derive(Parser)]
#[command(name = "mixtaper")]
#[command(version, about = "Apply playlist changes to a mixtape", long_about = None)]
struct Cli {
    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a change set and write the updated mixtape
    Apply {
        /// Mixtape snapshot to read (env: MIXTAPE_PATH)
        #[arg(short = 'm', long)]
        mixtape: Option<PathBuf>,

        /// Change set to apply (env: MIXTAPE_CHANGES_PATH)
        #[arg(short = 'c', long)]
        changes: Option<PathBuf>,

        /// Where to write the result (env: MIXTAPE_OUTPUT_PATH)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of tab indented
        #[arg(long)]
        compact: bool,
    },
    /// Print a summary of a mixtape
    Show {
        /// Mixtape snapshot to read (env: MIXTAPE_PATH)
        #[arg(short = 'm', long)]
        mixtape: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Apply {
            mixtape,
            changes,
            output,
            compact,
        } => {
            let format = if compact {
                OutputFormat::Compact
            } else {
                OutputFormat::Pretty
            };
            info!("Building config ...");
            let config = runner::ConfigBuilder::new()
                .mixtape_path(mixtape)
                .changes_path(changes)
                .output_path(output)
                .format(format)
                .build()?;
            runner::Runner::new(config).apply().await
        }
        Commands::Show { mixtape } => {
            let config = runner::ConfigBuilder::new().mixtape_path(mixtape).build()?;
            runner::Runner::new(config).show().await
        }
    }
}
