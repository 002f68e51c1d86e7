//! Visual regression testing with screenshot comparison

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{VisualError, VisualResult};
use crate::extractor::{extract_regions, DiffImage, ExtractorParams};
use crate::marker::DiffMarker;
use crate::region::Region;

/// Result of a visual comparison
#[derive(Debug, Clone)]
pub struct VisualDiff {
    /// Whether the images match (within threshold)
    pub matches: bool,

    /// Set when the baseline was created from this screenshot
    pub new_baseline: bool,

    /// Percentage of pixels that differ
    pub diff_percent: f64,

    /// Number of different pixels
    pub diff_pixels: u64,

    /// Total pixels compared
    pub total_pixels: u64,

    /// Path to the diff image (if generated)
    pub diff_image_path: Option<PathBuf>,

    /// Ignore regions suggested from the diff image
    pub suggested_regions: Vec<Region>,

    /// Hash of the actual screenshot
    pub actual_hash: String,

    /// Hash of the baseline screenshot
    pub baseline_hash: String,
}

/// Visual regression testing utilities
pub struct VisualTester {
    /// Directory containing baseline screenshots
    baseline_dir: PathBuf,

    /// Directory for actual screenshots
    actual_dir: PathBuf,

    /// Directory for diff images
    diff_dir: PathBuf,

    /// Failure threshold (0.0 - 100.0 percent)
    threshold: f64,

    /// Per-channel difference still treated as equal
    pixel_tolerance: u8,

    /// Whether to auto-update baselines when missing
    auto_update: bool,

    /// Regions excluded from comparison
    ignore_regions: Vec<Region>,

    marker: DiffMarker,

    extractor: ExtractorParams,
}

impl VisualTester {
    /// Create a new visual tester
    pub fn new(config: VisualConfig) -> VisualResult<Self> {
        std::fs::create_dir_all(&config.baseline_dir)?;
        std::fs::create_dir_all(&config.actual_dir)?;
        std::fs::create_dir_all(&config.diff_dir)?;

        Ok(Self {
            baseline_dir: config.baseline_dir,
            actual_dir: config.actual_dir,
            diff_dir: config.diff_dir,
            threshold: config.threshold,
            pixel_tolerance: config.pixel_tolerance,
            auto_update: config.auto_update,
            ignore_regions: config.ignore_regions,
            marker: config.marker,
            extractor: config.extractor,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare a screenshot against its baseline
    pub fn compare(&self, name: &str) -> VisualResult<VisualDiff> {
        let actual_path = self.actual_path(name);
        let baseline_path = self.baseline_path(name);

        if !actual_path.exists() {
            return Err(VisualError::ScreenshotNotFound(
                actual_path.display().to_string(),
            ));
        }

        if !baseline_path.exists() {
            if self.auto_update {
                info!("Creating baseline for '{}' (auto-update enabled)", name);
                ensure_parent(&baseline_path)?;
                std::fs::copy(&actual_path, &baseline_path)?;

                let actual_hash = hash_file(&actual_path)?;
                return Ok(VisualDiff {
                    matches: true,
                    new_baseline: true,
                    diff_percent: 0.0,
                    diff_pixels: 0,
                    total_pixels: 0,
                    diff_image_path: None,
                    suggested_regions: Vec::new(),
                    actual_hash: actual_hash.clone(),
                    baseline_hash: actual_hash,
                });
            }
            return Err(VisualError::BaselineNotFound(
                baseline_path.display().to_string(),
            ));
        }

        let actual_hash = hash_file(&actual_path)?;
        let baseline_hash = hash_file(&baseline_path)?;

        let actual_img = image::open(&actual_path)?.to_rgba8();

        if actual_hash == baseline_hash {
            debug!("Screenshots match exactly (same hash)");
            return Ok(VisualDiff {
                matches: true,
                new_baseline: false,
                diff_percent: 0.0,
                diff_pixels: 0,
                total_pixels: actual_img.width() as u64 * actual_img.height() as u64,
                diff_image_path: None,
                suggested_regions: Vec::new(),
                actual_hash,
                baseline_hash,
            });
        }

        let baseline_img = image::open(&baseline_path)?.to_rgba8();
        if actual_img.dimensions() != baseline_img.dimensions() {
            warn!(
                "Screenshot dimensions differ for '{}': actual {:?} vs baseline {:?}",
                name,
                actual_img.dimensions(),
                baseline_img.dimensions()
            );
        }

        let (diff_img, diff_pixels) = self.paint_diff(&actual_img, &baseline_img);
        let total_pixels = diff_img.width() as u64 * diff_img.height() as u64;
        let diff_percent = if total_pixels == 0 {
            0.0
        } else {
            (diff_pixels as f64 / total_pixels as f64) * 100.0
        };
        let matches = diff_percent <= self.threshold;

        let (diff_image_path, suggested_regions) = if diff_pixels > 0 {
            let path = self.diff_path(name);
            ensure_parent(&path)?;
            diff_img.save(&path)?;
            let regions = match DiffImage::from_rgba(&diff_img) {
                Ok(raster) => extract_regions(&raster, &self.marker, &self.extractor),
                Err(e) => {
                    warn!("Skipping region extraction for '{}': {}", name, e);
                    Vec::new()
                }
            };
            (Some(path), regions)
        } else {
            (None, Vec::new())
        };

        if !matches {
            warn!(
                "Visual regression detected in '{}': {:.2}% pixels differ (threshold: {:.2}%)",
                name, diff_percent, self.threshold
            );
        }

        Ok(VisualDiff {
            matches,
            new_baseline: false,
            diff_percent,
            diff_pixels,
            total_pixels,
            diff_image_path,
            suggested_regions,
            actual_hash,
            baseline_hash,
        })
    }

    /// Paint differing pixels in the marker color over a dimmed copy of the screenshots
    ///
    /// The diff covers the union of both sizes; a pixel present in only one
    /// image always differs.
    fn paint_diff(&self, actual: &RgbaImage, baseline: &RgbaImage) -> (RgbaImage, u64) {
        let width = actual.width().max(baseline.width());
        let height = actual.height().max(baseline.height());
        let marker = Rgba(self.marker.rgba());

        let mut diff_img = RgbaImage::new(width, height);
        let mut diff_pixels = 0u64;

        for y in 0..height {
            for x in 0..width {
                let actual_pixel = actual.get_pixel_checked(x, y);
                let baseline_pixel = baseline.get_pixel_checked(x, y);

                let ignored = self.ignore_regions.iter().any(|r| r.contains_point(x, y));
                let differs = !ignored
                    && match (actual_pixel, baseline_pixel) {
                        (Some(a), Some(b)) => self.pixels_differ(a, b),
                        _ => true,
                    };

                if differs {
                    diff_pixels += 1;
                    diff_img.put_pixel(x, y, marker);
                } else {
                    let [r, g, b, _] = actual_pixel
                        .or(baseline_pixel)
                        .map(|p| p.0)
                        .unwrap_or_default();
                    diff_img.put_pixel(x, y, Rgba([r / 2, g / 2, b / 2, 128]));
                }
            }
        }

        (diff_img, diff_pixels)
    }

    /// Check if two pixels differ significantly
    fn pixels_differ(&self, a: &Rgba<u8>, b: &Rgba<u8>) -> bool {
        a.0.iter()
            .zip(b.0.iter())
            .any(|(x, y)| x.abs_diff(*y) > self.pixel_tolerance)
    }

    /// Update the baseline with the actual screenshot
    pub fn update_baseline(&self, name: &str) -> VisualResult<()> {
        let actual_path = self.actual_path(name);
        if !actual_path.exists() {
            return Err(VisualError::ScreenshotNotFound(format!(
                "cannot update baseline from {}",
                actual_path.display()
            )));
        }

        let baseline_path = self.baseline_path(name);
        ensure_parent(&baseline_path)?;
        std::fs::copy(&actual_path, &baseline_path)?;
        info!("Updated baseline for '{}'", name);

        Ok(())
    }

    /// List all baselines
    pub fn list_baselines(&self) -> VisualResult<Vec<String>> {
        list_png_names(&self.baseline_dir)
    }

    /// List all captured screenshots
    pub fn list_screenshots(&self) -> VisualResult<Vec<String>> {
        list_png_names(&self.actual_dir)
    }

    /// Clean up old diff images, returning how many were removed
    pub fn clean_diffs(&self) -> VisualResult<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.diff_dir)? {
            let path = entry?.path();
            if path.is_file() {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn actual_path(&self, name: &str) -> PathBuf {
        self.actual_dir.join(format!("{}.png", name))
    }

    fn baseline_path(&self, name: &str) -> PathBuf {
        self.baseline_dir.join(format!("{}.png", name))
    }

    fn diff_path(&self, name: &str) -> PathBuf {
        self.diff_dir.join(format!("{}-diff.png", name))
    }
}

/// Story names may nest (`Button/primary`), so writes create their directory first
fn ensure_parent(path: &Path) -> VisualResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Hash a file using SHA256
fn hash_file(path: &Path) -> VisualResult<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

/// Screenshot names (relative path without `.png`) under a directory, sorted
fn list_png_names(dir: &Path) -> VisualResult<Vec<String>> {
    let mut names: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "png")
                .unwrap_or(false)
        })
        .filter_map(|e| {
            let relative = e.path().strip_prefix(dir).ok()?.with_extension("");
            Some(relative.to_string_lossy().replace('\\', "/"))
        })
        .collect();

    names.sort();
    Ok(names)
}

/// Configuration for visual testing
#[derive(Debug, Clone)]
pub struct VisualConfig {
    pub baseline_dir: PathBuf,
    pub actual_dir: PathBuf,
    pub diff_dir: PathBuf,
    pub threshold: f64,
    pub pixel_tolerance: u8,
    pub auto_update: bool,
    pub ignore_regions: Vec<Region>,
    pub marker: DiffMarker,
    pub extractor: ExtractorParams,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            baseline_dir: PathBuf::from("visual-tests/baselines"),
            actual_dir: PathBuf::from("visual-tests/screenshots"),
            diff_dir: PathBuf::from("visual-tests/diffs"),
            threshold: 0.5,
            pixel_tolerance: 5,
            auto_update: false,
            ignore_regions: Vec::new(),
            marker: DiffMarker::default(),
            extractor: ExtractorParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &Path) -> VisualConfig {
        VisualConfig {
            baseline_dir: root.join("baselines"),
            actual_dir: root.join("screenshots"),
            diff_dir: root.join("diffs"),
            ..Default::default()
        }
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_visual_config_default() {
        let config = VisualConfig::default();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.pixel_tolerance, 5);
        assert!(!config.auto_update);
    }

    #[test]
    fn test_identical_screenshots_match() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        let img = solid(40, 40, [10, 20, 30, 255]);
        img.save(config.actual_dir.join("button.png")).unwrap();
        img.save(config.baseline_dir.join("button.png")).unwrap();

        let diff = tester.compare("button").unwrap();
        assert!(diff.matches);
        assert_eq!(diff.diff_pixels, 0);
        assert_eq!(diff.total_pixels, 1600);
        assert!(diff.diff_image_path.is_none());
        assert_eq!(diff.actual_hash, diff.baseline_hash);
    }

    #[test]
    fn test_changed_band_is_reported() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        let baseline = solid(100, 100, [255, 255, 255, 255]);
        let mut actual = baseline.clone();
        for y in 0..8 {
            for x in 0..100 {
                actual.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        baseline.save(config.baseline_dir.join("header.png")).unwrap();
        actual.save(config.actual_dir.join("header.png")).unwrap();

        let diff = tester.compare("header").unwrap();
        assert!(!diff.matches);
        assert_eq!(diff.diff_pixels, 800);
        assert!((diff.diff_percent - 8.0).abs() < 1e-9);

        let diff_path = diff.diff_image_path.unwrap();
        assert!(diff_path.exists());
        assert_eq!(diff.suggested_regions, vec![Region::new(0, 0, 100, 30)]);
    }

    #[test]
    fn test_ignore_regions_exclude_pixels() {
        let tmp = TempDir::new().unwrap();
        let config = VisualConfig {
            ignore_regions: vec![Region::new(0, 0, 100, 8)],
            ..config_in(tmp.path())
        };
        let tester = VisualTester::new(config.clone()).unwrap();

        let baseline = solid(100, 100, [255, 255, 255, 255]);
        let mut actual = baseline.clone();
        for x in 0..100 {
            actual.put_pixel(x, 3, Rgba([0, 0, 0, 255]));
        }
        baseline.save(config.baseline_dir.join("clock.png")).unwrap();
        actual.save(config.actual_dir.join("clock.png")).unwrap();

        let diff = tester.compare("clock").unwrap();
        assert!(diff.matches);
        assert_eq!(diff.diff_pixels, 0);
        assert!(diff.suggested_regions.is_empty());
    }

    #[test]
    fn test_small_noise_within_tolerance() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        solid(20, 20, [100, 100, 100, 255])
            .save(config.baseline_dir.join("noise.png"))
            .unwrap();
        solid(20, 20, [104, 97, 100, 255])
            .save(config.actual_dir.join("noise.png"))
            .unwrap();

        let diff = tester.compare("noise").unwrap();
        assert!(diff.matches);
        assert_eq!(diff.diff_pixels, 0);
    }

    #[test]
    fn test_missing_baseline() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        solid(10, 10, [0, 0, 0, 255])
            .save(config.actual_dir.join("fresh.png"))
            .unwrap();

        assert!(matches!(
            tester.compare("fresh"),
            Err(VisualError::BaselineNotFound(_))
        ));
        assert!(matches!(
            tester.compare("absent"),
            Err(VisualError::ScreenshotNotFound(_))
        ));
    }

    #[test]
    fn test_auto_update_creates_baseline() {
        let tmp = TempDir::new().unwrap();
        let config = VisualConfig {
            auto_update: true,
            ..config_in(tmp.path())
        };
        let tester = VisualTester::new(config.clone()).unwrap();

        solid(10, 10, [0, 0, 0, 255])
            .save(config.actual_dir.join("fresh.png"))
            .unwrap();

        let diff = tester.compare("fresh").unwrap();
        assert!(diff.matches);
        assert!(diff.new_baseline);
        assert!(config.baseline_dir.join("fresh.png").exists());
        assert_eq!(tester.list_baselines().unwrap(), vec!["fresh".to_string()]);
    }

    #[test]
    fn test_dimension_mismatch_counts_uncovered_pixels() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        solid(10, 5, [0, 0, 0, 255])
            .save(config.baseline_dir.join("grown.png"))
            .unwrap();
        solid(10, 10, [0, 0, 0, 255])
            .save(config.actual_dir.join("grown.png"))
            .unwrap();

        let diff = tester.compare("grown").unwrap();
        assert_eq!(diff.diff_pixels, 50);
        assert_eq!(diff.total_pixels, 100);
        assert!(!diff.matches);
    }

    #[test]
    fn test_dimension_mismatch_counts_cropped_pixels() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        solid(10, 10, [0, 0, 0, 255])
            .save(config.baseline_dir.join("cropped.png"))
            .unwrap();
        solid(10, 5, [0, 0, 0, 255])
            .save(config.actual_dir.join("cropped.png"))
            .unwrap();

        let diff = tester.compare("cropped").unwrap();
        assert_eq!(diff.diff_pixels, 50);
        assert_eq!(diff.total_pixels, 100);
        assert!((diff.diff_percent - 50.0).abs() < 1e-9);
        assert!(!diff.matches);

        let painted = image::open(diff.diff_image_path.unwrap()).unwrap().to_rgba8();
        assert_eq!(painted.dimensions(), (10, 10));
        assert_eq!(painted.get_pixel(3, 8).0, [255, 0, 255, 255]);
    }

    #[test]
    fn test_nested_story_writes_nested_diff() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        for dir in [&config.baseline_dir, &config.actual_dir] {
            std::fs::create_dir_all(dir.join("Card")).unwrap();
        }
        solid(10, 10, [255, 255, 255, 255])
            .save(config.baseline_dir.join("Card/elevated.png"))
            .unwrap();
        solid(10, 10, [0, 0, 0, 255])
            .save(config.actual_dir.join("Card/elevated.png"))
            .unwrap();

        let diff = tester.compare("Card/elevated").unwrap();
        assert_eq!(
            diff.diff_image_path,
            Some(config.diff_dir.join("Card/elevated-diff.png"))
        );
        assert!(config.diff_dir.join("Card/elevated-diff.png").exists());
    }

    #[test]
    fn test_unwritable_baseline_dir_propagates() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        std::fs::create_dir_all(config.actual_dir.join("Blocked")).unwrap();
        solid(4, 4, [1, 2, 3, 255])
            .save(config.actual_dir.join("Blocked/story.png"))
            .unwrap();
        // A plain file where the story directory should go.
        std::fs::write(config.baseline_dir.join("Blocked"), b"x").unwrap();

        assert!(matches!(
            tester.update_baseline("Blocked/story"),
            Err(VisualError::Io(_))
        ));
    }

    #[test]
    fn test_update_list_and_clean() {
        let tmp = TempDir::new().unwrap();
        let config = config_in(tmp.path());
        let tester = VisualTester::new(config.clone()).unwrap();

        std::fs::create_dir_all(config.actual_dir.join("Button")).unwrap();
        solid(4, 4, [1, 2, 3, 255])
            .save(config.actual_dir.join("Button/primary.png"))
            .unwrap();
        std::fs::write(config.diff_dir.join("stale-diff.png"), b"x").unwrap();

        assert_eq!(
            tester.list_screenshots().unwrap(),
            vec!["Button/primary".to_string()]
        );

        tester.update_baseline("Button/primary").unwrap();
        assert!(config.baseline_dir.join("Button/primary.png").exists());
        assert!(tester.update_baseline("missing").is_err());

        assert_eq!(tester.clean_diffs().unwrap(), 1);
        assert_eq!(tester.clean_diffs().unwrap(), 0);
    }
}
