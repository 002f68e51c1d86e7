//! rnvisual core
//!
//! Screenshot comparison for React Native Storybook visual regression runs:
//! - Compares captured screenshots against approved baselines
//! - Paints differing pixels into diff images with a marker color
//! - Suggests ignore regions by clustering marked pixels into rectangles
//! - Runs comparisons concurrently and writes a results file
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  compare_all(tester, names, jobs)                           │
//! │    └── VisualTester::compare(name) -> VisualDiff            │
//! │          ├── paint_diff(actual, baseline) -> diff image     │
//! │          └── extract_regions(diff, marker, params)          │
//! │                -> [Region]  ("x,y,w,h;x,y,w,h")             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SuiteReport::from_outcomes(..).write_json(dir)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod extractor;
pub mod marker;
pub mod region;
pub mod report;
pub mod visual;

pub use batch::{compare_all, ComparisonOutcome};
pub use config::RnVisualConfig;
pub use error::{VisualError, VisualResult};
pub use extractor::{extract_from_path, extract_regions, DiffImage, ExtractorParams};
pub use marker::DiffMarker;
pub use region::{format_regions, parse_regions, Region};
pub use report::{ComparisonResult, ComparisonStatus, SuiteReport};
pub use visual::{VisualConfig, VisualDiff, VisualTester};
