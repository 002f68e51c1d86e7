//! Suite results written after a comparison run

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::batch::ComparisonOutcome;
use crate::error::{VisualError, VisualResult};
use crate::region::format_regions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Passed,
    Failed,
    NewBaseline,
    MissingBaseline,
    Error,
}

/// Result of comparing a single screenshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub name: String,
    pub status: ComparisonStatus,
    pub diff_percent: f64,
    pub diff_image_path: Option<String>,
    /// Suggested ignore regions in `x,y,w,h;...` form
    pub suggested_ignore_regions: Option<String>,
    pub error: Option<String>,
}

impl From<&ComparisonOutcome> for ComparisonResult {
    fn from(outcome: &ComparisonOutcome) -> Self {
        let name = outcome.name.clone();
        match &outcome.result {
            Ok(diff) => {
                let status = if diff.new_baseline {
                    ComparisonStatus::NewBaseline
                } else if diff.matches {
                    ComparisonStatus::Passed
                } else {
                    ComparisonStatus::Failed
                };
                let suggested = (!diff.suggested_regions.is_empty())
                    .then(|| format_regions(&diff.suggested_regions));

                Self {
                    name,
                    status,
                    diff_percent: diff.diff_percent,
                    diff_image_path: diff
                        .diff_image_path
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string()),
                    suggested_ignore_regions: suggested,
                    error: None,
                }
            }
            Err(e) => Self {
                name,
                status: match e {
                    VisualError::BaselineNotFound(_) => ComparisonStatus::MissingBaseline,
                    _ => ComparisonStatus::Error,
                },
                diff_percent: 0.0,
                diff_image_path: None,
                suggested_ignore_regions: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Result of comparing a whole screenshot set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new_baselines: usize,
    pub missing_baselines: usize,
    pub errored: usize,
    pub duration_ms: u64,
    pub results: Vec<ComparisonResult>,
}

impl SuiteReport {
    pub fn from_outcomes(outcomes: &[ComparisonOutcome], duration_ms: u64) -> Self {
        let results: Vec<ComparisonResult> = outcomes.iter().map(ComparisonResult::from).collect();
        let count = |status: ComparisonStatus| results.iter().filter(|r| r.status == status).count();

        Self {
            generated_at: Utc::now(),
            total: results.len(),
            passed: count(ComparisonStatus::Passed),
            failed: count(ComparisonStatus::Failed),
            new_baselines: count(ComparisonStatus::NewBaseline),
            missing_baselines: count(ComparisonStatus::MissingBaseline),
            errored: count(ComparisonStatus::Error),
            duration_ms,
            results,
        }
    }

    /// Whether every screenshot passed or became a new baseline
    ///
    /// A screenshot without a baseline has not been approved, so it fails
    /// the run like a regression does.
    pub fn success(&self) -> bool {
        self.failed == 0 && self.missing_baselines == 0 && self.errored == 0
    }

    /// Write the report as `results.json` into `dir`
    pub fn write_json(&self, dir: &Path) -> VisualResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("results.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
