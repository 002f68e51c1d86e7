//! Ignore-region suggestion for an existing diff image

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use rnvisual_core::{extract_from_path, format_regions, Region, RnVisualConfig};

use crate::output::{notify, print_list, Notice, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct RegionsArgs {
    /// Diff image with changed pixels painted in the marker color
    pub diff_image: PathBuf,

    /// Maximum number of regions to suggest
    #[arg(long)]
    pub max_regions: Option<usize>,

    /// Only print the "x,y,w,h;..." flag value
    #[arg(long)]
    pub flag_only: bool,
}

/// Region row
#[derive(Serialize)]
pub struct RegionDisplay {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: u64,
}

impl From<Region> for RegionDisplay {
    fn from(region: Region) -> Self {
        Self {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            area: region.area(),
        }
    }
}

impl TableDisplay for RegionDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["X", "Y", "Width", "Height", "Area"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.x.to_string(),
            self.y.to_string(),
            self.width.to_string(),
            self.height.to_string(),
            self.area.to_string(),
        ]
    }
}

pub fn execute(args: RegionsArgs, config: &RnVisualConfig, format: OutputFormat) -> Result<bool> {
    if !args.diff_image.exists() {
        bail!("Diff image not found: {}", args.diff_image.display());
    }

    let mut params = config.extractor.clone();
    if let Some(max) = args.max_regions {
        params.max_regions = max;
    }

    let regions = extract_from_path(&args.diff_image, &config.marker, &params);
    let flag = format_regions(&regions);

    if args.flag_only {
        println!("{}", flag);
        return Ok(true);
    }

    if regions.is_empty() {
        notify(
            Notice::Info,
            "No diff-marker pixels found; nothing to suggest",
            format,
        );
        if format.is_human() {
            return Ok(true);
        }
    }

    let rows: Vec<RegionDisplay> = regions.into_iter().map(RegionDisplay::from).collect();
    print_list(&rows, format);

    if !flag.is_empty() {
        notify(
            Notice::Info,
            &format!("Reuse with: --ignore-regions \"{}\"", flag),
            format,
        );
    }

    Ok(true)
}
