//! Baseline Commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use rnvisual_core::{RnVisualConfig, VisualTester};

use crate::output::{notify, print_list, Notice, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum BaselineCommands {
    /// List approved baselines
    List,

    /// Approve captured screenshots as the new baselines
    Update {
        /// Screenshot name; every captured screenshot when omitted
        name: Option<String>,
    },

    /// Remove rendered diff images
    CleanDiffs,
}

/// Baseline row
#[derive(Serialize)]
pub struct BaselineDisplay {
    pub name: String,
    pub captured: bool,
}

impl TableDisplay for BaselineDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Baseline", "Captured this run"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            if self.captured { "yes" } else { "no" }.to_string(),
        ]
    }
}

pub fn execute(cmd: BaselineCommands, config: RnVisualConfig, format: OutputFormat) -> Result<bool> {
    let tester = VisualTester::new(config.visual_config()?)?;

    match cmd {
        BaselineCommands::List => {
            let captured = tester.list_screenshots()?;
            let rows: Vec<BaselineDisplay> = tester
                .list_baselines()?
                .into_iter()
                .map(|name| BaselineDisplay {
                    captured: captured.contains(&name),
                    name,
                })
                .collect();
            print_list(&rows, format);
        }
        BaselineCommands::Update { name: Some(name) } => {
            tester.update_baseline(&name)?;
            notify(Notice::Success, &format!("Updated baseline '{}'", name), format);
        }
        BaselineCommands::Update { name: None } => {
            let names = tester.list_screenshots()?;
            for name in &names {
                tester.update_baseline(name)?;
            }
            notify(
                Notice::Success,
                &format!("Updated {} baseline(s)", names.len()),
                format,
            );
        }
        BaselineCommands::CleanDiffs => {
            let removed = tester.clean_diffs()?;
            notify(
                Notice::Success,
                &format!("Removed {} diff image(s)", removed),
                format,
            );
        }
    }

    Ok(true)
}
