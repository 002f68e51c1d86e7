//! Ignore-region extraction from rendered diff images
//!
//! A diff image marks every changed pixel with the [`DiffMarker`] color.
//! The extractor turns those pixels into a handful of rectangles:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  overall bounding box        │  always the first candidate
//! ├──────────────────────────────┤
//! │  band regions                │  horizontal strips holding a large share
//! │  (status bar, home bar, ...) │  of the changed pixels, widened and padded
//! └──────────────────────────────┘
//! ```
//!
//! Candidates below the minimum area are dropped (the overall box excepted),
//! candidates fully inside another are dropped, and the rest is capped.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{VisualError, VisualResult};
use crate::marker::DiffMarker;
use crate::region::Region;

/// Borrowed RGBA8 raster, row-major
#[derive(Debug, Clone, Copy)]
pub struct DiffImage<'a> {
    width: u32,
    height: u32,
    pixels: &'a [u8],
}

impl<'a> DiffImage<'a> {
    pub fn new(width: u32, height: u32, pixels: &'a [u8]) -> VisualResult<Self> {
        if width == 0 || height == 0 {
            return Err(VisualError::InvalidRaster(format!(
                "zero dimension {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(VisualError::InvalidRaster(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba(image: &'a image::RgbaImage) -> VisualResult<Self> {
        Self::new(image.width(), image.height(), image.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coordinates of every pixel matching the marker, in scan order
    pub fn marked_pixels(&self, marker: &DiffMarker) -> Vec<(u32, u32)> {
        self.pixels
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, pixel)| marker.matches(pixel))
            .map(|(i, _)| {
                let i = i as u64;
                let width = self.width as u64;
                ((i % width) as u32, (i / width) as u32)
            })
            .collect()
    }
}

/// Heuristic knobs of the band clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    /// Rows per band
    pub band_height: u32,

    /// Rows added above and below a band when bounding its pixels
    pub vicinity: u32,

    /// Share of all marked pixels a band must exceed (0.0 - 1.0)
    pub band_share: f64,

    /// Absolute pixel count a band must exceed
    pub min_band_pixels: usize,

    /// Margin added around band regions
    pub padding: u32,

    /// Minimum area of a band region, in square pixels
    pub min_area: u64,

    /// Maximum number of regions returned
    pub max_regions: usize,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            band_height: 10,
            vicinity: 15,
            band_share: 0.10,
            min_band_pixels: 50,
            padding: 5,
            min_area: 100,
            max_regions: 5,
        }
    }
}

/// Suggest ignore regions for a diff image
pub fn extract_regions(
    image: &DiffImage<'_>,
    marker: &DiffMarker,
    params: &ExtractorParams,
) -> Vec<Region> {
    let points = image.marked_pixels(marker);
    debug!(
        "{} marked pixels in {}x{} diff image",
        points.len(),
        image.width(),
        image.height()
    );

    let Some(overall) = bounding_box(&points) else {
        return Vec::new();
    };

    let mut candidates = vec![overall];
    for region in band_regions(image, &points, params) {
        if region.area() >= params.min_area {
            candidates.push(region);
        } else {
            debug!("Dropping band region {} below minimum area", region);
        }
    }

    let mut regions = drop_contained(&candidates);
    debug!(
        "{} candidate region(s), {} after containment filter",
        candidates.len(),
        regions.len()
    );

    regions.truncate(params.max_regions);
    regions
}

/// Decode a diff image from disk and extract regions from it
///
/// Undecodable files yield no regions; the caller only loses a suggestion.
pub fn extract_from_path(path: &Path, marker: &DiffMarker, params: &ExtractorParams) -> Vec<Region> {
    let decoded = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!("Cannot decode diff image {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match DiffImage::from_rgba(&decoded) {
        Ok(raster) => extract_regions(&raster, marker, params),
        Err(e) => {
            warn!("Skipping diff image {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn bounding_box(points: &[(u32, u32)]) -> Option<Region> {
    let (&(x, y), rest) = points.split_first()?;
    let (min_x, min_y, max_x, max_y) = rest.iter().fold(
        (x, y, x, y),
        |(min_x, min_y, max_x, max_y), &(x, y)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        },
    );
    Some(Region::from_corners(min_x, min_y, max_x, max_y))
}

fn band_regions(image: &DiffImage<'_>, points: &[(u32, u32)], params: &ExtractorParams) -> Vec<Region> {
    let band_height = params.band_height.max(1);

    let mut bands: BTreeMap<u32, usize> = BTreeMap::new();
    for &(_, y) in points {
        *bands.entry(y / band_height).or_default() += 1;
    }

    let share_floor = points.len() as f64 * params.band_share;

    bands
        .into_iter()
        .filter(|&(_, count)| count as f64 > share_floor && count > params.min_band_pixels)
        .filter_map(|(band, count)| {
            let band_top = band * band_height;
            let top = band_top.saturating_sub(params.vicinity);
            let bottom = band_top
                .saturating_add(band_height)
                .saturating_add(params.vicinity);

            let (min_x, max_x) = points
                .iter()
                .filter(|&&(_, y)| y >= top && y < bottom)
                .fold(None, |acc: Option<(u32, u32)>, &(x, _)| match acc {
                    Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                    None => Some((x, x)),
                })?;

            let x0 = min_x.saturating_sub(params.padding);
            let x1 = max_x
                .saturating_add(1)
                .saturating_add(params.padding)
                .min(image.width());
            let y0 = top.saturating_sub(params.padding);
            let y1 = bottom.saturating_add(params.padding).min(image.height());

            debug!("Band {} holds {} marked pixels", band, count);
            Some(Region::new(x0, y0, x1 - x0, y1 - y0))
        })
        .collect()
}

/// Keep candidates not fully inside another; of identical ones the first stays
fn drop_contained(candidates: &[Region]) -> Vec<Region> {
    candidates
        .iter()
        .enumerate()
        .filter(|&(i, region)| {
            !candidates.iter().enumerate().any(|(j, other)| {
                j != i && other.contains(region) && (other != region || j < i)
            })
        })
        .map(|(_, region)| *region)
        .collect()
}
