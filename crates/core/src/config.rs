//! rnvisual configuration file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{VisualError, VisualResult};
use crate::extractor::ExtractorParams;
use crate::marker::DiffMarker;
use crate::region::{parse_regions, Region};
use crate::visual::VisualConfig;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rnvisual.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RnVisualConfig {
    /// Screenshot directories
    pub paths: PathsConfig,

    /// Comparison settings
    pub comparison: ComparisonConfig,

    /// Diff marker color
    pub marker: DiffMarker,

    /// Ignore-region extraction heuristics
    pub extractor: ExtractorParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Approved screenshots
    pub baseline_dir: PathBuf,

    /// Screenshots captured by the latest run
    pub actual_dir: PathBuf,

    /// Rendered diff images
    pub diff_dir: PathBuf,

    /// Where `results.json` goes
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            baseline_dir: PathBuf::from("visual-tests/baselines"),
            actual_dir: PathBuf::from("visual-tests/screenshots"),
            diff_dir: PathBuf::from("visual-tests/diffs"),
            output_dir: PathBuf::from("visual-tests"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Allowed share of differing pixels (0.0 - 100.0 percent)
    pub threshold: f64,

    /// Per-channel difference still treated as equal
    pub pixel_tolerance: u8,

    /// Create missing baselines from the captured screenshot
    pub auto_update: bool,

    /// Ignore regions in `x,y,w,h` form
    pub ignore_regions: Vec<String>,

    /// Comparisons run concurrently
    pub jobs: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            pixel_tolerance: 5,
            auto_update: false,
            ignore_regions: Vec::new(),
            jobs: 4,
        }
    }
}

impl RnVisualConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> VisualResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> VisualResult<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> VisualResult<()> {
        if !(0.0..=100.0).contains(&self.comparison.threshold) {
            return Err(VisualError::InvalidConfig(format!(
                "threshold must be between 0 and 100, got {}",
                self.comparison.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.extractor.band_share) {
            return Err(VisualError::InvalidConfig(format!(
                "extractor.band_share must be between 0 and 1, got {}",
                self.extractor.band_share
            )));
        }
        if self.extractor.band_height == 0 {
            return Err(VisualError::InvalidConfig(
                "extractor.band_height must be positive".to_string(),
            ));
        }
        self.ignore_regions()?;
        Ok(())
    }

    /// Parsed ignore regions; each entry may itself hold a `;` list
    pub fn ignore_regions(&self) -> VisualResult<Vec<Region>> {
        let mut regions = Vec::new();
        for entry in &self.comparison.ignore_regions {
            regions.extend(parse_regions(entry)?);
        }
        Ok(regions)
    }

    /// Settings for a [`crate::VisualTester`]
    pub fn visual_config(&self) -> VisualResult<VisualConfig> {
        Ok(VisualConfig {
            baseline_dir: self.paths.baseline_dir.clone(),
            actual_dir: self.paths.actual_dir.clone(),
            diff_dir: self.paths.diff_dir.clone(),
            threshold: self.comparison.threshold,
            pixel_tolerance: self.comparison.pixel_tolerance,
            auto_update: self.comparison.auto_update,
            ignore_regions: self.ignore_regions()?,
            marker: self.marker,
            extractor: self.extractor.clone(),
        })
    }
}
