//! CLI Commands

pub mod baseline;
pub mod compare;
pub mod config;
pub mod regions;
pub mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use rnvisual_core::{parse_regions, ComparisonResult, ComparisonStatus, RnVisualConfig};

use crate::output::TableDisplay;

/// Flags that override the `[paths]` and `[comparison]` config sections
#[derive(Args, Debug, Default)]
pub struct ComparisonArgs {
    /// Directory holding baseline screenshots
    #[arg(long)]
    pub baseline_dir: Option<PathBuf>,

    /// Directory holding captured screenshots
    #[arg(long)]
    pub actual_dir: Option<PathBuf>,

    /// Directory diff images are written to
    #[arg(long)]
    pub diff_dir: Option<PathBuf>,

    /// Allowed share of differing pixels, in percent
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Extra ignore regions, "x,y,w,h;x,y,w,h"
    #[arg(long)]
    pub ignore_regions: Option<String>,

    /// Create missing baselines from the captured screenshots
    #[arg(long)]
    pub update_baselines: bool,
}

impl ComparisonArgs {
    pub fn apply(&self, config: &mut RnVisualConfig) -> Result<()> {
        if let Some(dir) = &self.baseline_dir {
            config.paths.baseline_dir = dir.clone();
        }
        if let Some(dir) = &self.actual_dir {
            config.paths.actual_dir = dir.clone();
        }
        if let Some(dir) = &self.diff_dir {
            config.paths.diff_dir = dir.clone();
        }
        if let Some(threshold) = self.threshold {
            config.comparison.threshold = threshold;
        }
        if let Some(regions) = &self.ignore_regions {
            // Validate now so a typo fails before any comparison runs.
            parse_regions(regions)?;
            config.comparison.ignore_regions.push(regions.clone());
        }
        if self.update_baselines {
            config.comparison.auto_update = true;
        }
        config.validate()?;
        Ok(())
    }
}

/// Comparison result row
#[derive(Serialize)]
#[serde(transparent)]
pub struct ResultDisplay(pub ComparisonResult);

impl TableDisplay for ResultDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Screenshot", "Status", "Diff %", "Suggested ignore regions"]
    }

    fn row(&self) -> Vec<String> {
        let status = match self.0.status {
            ComparisonStatus::Passed => "✓ passed",
            ComparisonStatus::Failed => "✗ failed",
            ComparisonStatus::NewBaseline => "+ new baseline",
            ComparisonStatus::MissingBaseline => "? no baseline",
            ComparisonStatus::Error => "! error",
        };

        vec![
            self.0.name.clone(),
            status.to_string(),
            format!("{:.2}", self.0.diff_percent),
            self.0
                .suggested_ignore_regions
                .clone()
                .or_else(|| self.0.error.clone())
                .unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut config = RnVisualConfig::default();
        let args = ComparisonArgs {
            threshold: Some(2.0),
            ignore_regions: Some("0,0,375,44".to_string()),
            update_baselines: true,
            actual_dir: Some(PathBuf::from("shots")),
            ..Default::default()
        };

        args.apply(&mut config).unwrap();
        assert_eq!(config.comparison.threshold, 2.0);
        assert!(config.comparison.auto_update);
        assert_eq!(config.paths.actual_dir, PathBuf::from("shots"));
        assert_eq!(config.ignore_regions().unwrap().len(), 1);
    }

    #[test]
    fn test_bad_override_rejected() {
        let mut config = RnVisualConfig::default();
        let args = ComparisonArgs {
            ignore_regions: Some("0,0,375".to_string()),
            ..Default::default()
        };
        assert!(args.apply(&mut config).is_err());

        let args = ComparisonArgs {
            threshold: Some(-1.0),
            ..Default::default()
        };
        assert!(args.apply(&mut RnVisualConfig::default()).is_err());
    }
}
