//! Diff marker color matching

use serde::{Deserialize, Serialize};

/// Color painted over differing pixels, matched with a per-channel tolerance
///
/// The tolerance absorbs anti-aliasing and lossy recompression of the diff
/// image, so a pixel of (250, 12, 247) still reads as magenta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffMarker {
    /// Nominal RGB color
    pub color: [u8; 3],

    /// Maximum absolute deviation allowed on each channel
    pub tolerance: u8,
}

impl Default for DiffMarker {
    fn default() -> Self {
        Self {
            color: [255, 0, 255],
            tolerance: 50,
        }
    }
}

impl DiffMarker {
    /// Whether an RGB(A) pixel matches the marker; alpha is ignored
    #[inline]
    pub fn matches(&self, pixel: &[u8]) -> bool {
        self.color
            .iter()
            .zip(pixel)
            .all(|(&nominal, &actual)| nominal.abs_diff(actual) <= self.tolerance)
    }

    pub fn rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.color;
        [r, g, b, 255]
    }
}
