//! rnvisual CLI - Main Entry Point
//!
//! Compares React Native Storybook screenshots against baselines and
//! suggests ignore regions for the areas that changed.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod output;

use commands::{baseline, compare, config, regions, run};
use rnvisual_core::RnVisualConfig;

/// rnvisual - visual regression for React Native Storybook
#[derive(Parser)]
#[command(name = "rnvisual")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = rnvisual_core::config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest ignore regions for a diff image
    Regions(regions::RegionsArgs),

    /// Compare a single screenshot against its baseline
    Compare(compare::CompareArgs),

    /// Compare every captured screenshot and write results.json
    Run(run::RunArgs),

    /// Manage baselines
    #[command(subcommand)]
    Baseline(baseline::BaselineCommands),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match execute(cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            2
        }
    };
    std::process::exit(code);
}

/// Run the selected command; `Ok(false)` means a regression or an unapproved screenshot
fn execute(cli: Cli) -> anyhow::Result<bool> {
    let config_path = cli.config;
    let format = cli.format;
    let load = || -> anyhow::Result<RnVisualConfig> {
        let settings = RnVisualConfig::load(&config_path)?;
        debug!("Loaded configuration from {}", config_path.display());
        Ok(settings)
    };

    match cli.command {
        Commands::Regions(args) => regions::execute(args, &load()?, format),
        Commands::Compare(args) => compare::execute(args, load()?, format),
        Commands::Run(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run::execute(args, load()?, format))
        }
        Commands::Baseline(cmd) => baseline::execute(cmd, load()?, format),
        Commands::Config(cmd) => config::execute(cmd, &config_path, format),
    }
}
