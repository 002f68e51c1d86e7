//! Configuration Commands

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Subcommand;

use rnvisual_core::RnVisualConfig;

use crate::output::{notify, Notice, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Destination; the --config path when omitted
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn execute(cmd: ConfigCommands, config_path: &Path, format: OutputFormat) -> Result<bool> {
    match cmd {
        ConfigCommands::Show => {
            let config = RnVisualConfig::load(config_path)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&config)?),
                OutputFormat::Table | OutputFormat::Plain => {
                    print!("{}", toml::to_string_pretty(&config)?)
                }
            }
        }
        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or_else(|| config_path.to_path_buf());
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            RnVisualConfig::default().save(&path)?;
            notify(Notice::Success, &format!("Wrote {}", path.display()), format);
        }
    }

    Ok(true)
}
