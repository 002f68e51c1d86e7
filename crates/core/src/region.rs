//! Rectangular regions and their `x,y,w,h` text form

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{VisualError, VisualResult};

/// An axis-aligned rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build a region from inclusive corner coordinates
    pub fn from_corners(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right edge
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Whether `other` lies entirely inside this region (edges may touch)
    pub fn contains(&self, other: &Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && (x as u64) < self.right() && (y as u64) < self.bottom()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Region {
    type Err = VisualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| VisualError::InvalidRegion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid("expected four comma-separated values x,y,w,h"));
        }

        let mut values = [0u32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid("values must be non-negative integers"))?;
        }

        let [x, y, width, height] = values;
        if width == 0 || height == 0 {
            return Err(invalid("width and height must be positive"));
        }

        Ok(Region::new(x, y, width, height))
    }
}

/// Join regions into the `x,y,w,h;x,y,w,h` flag form
pub fn format_regions(regions: &[Region]) -> String {
    regions
        .iter()
        .map(Region::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Parse the `;`-separated flag form, skipping empty segments
pub fn parse_regions(input: &str) -> VisualResult<Vec<Region>> {
    input
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let region = Region::new(0, 70, 100, 30);
        assert_eq!(region.to_string(), "0,70,100,30");
        assert_eq!("0,70,100,30".parse::<Region>().unwrap(), region);
    }

    #[test]
    fn test_parse_list() {
        let regions = parse_regions(" 0,0,375,44 ; 0,778,375,34;").unwrap();
        assert_eq!(
            regions,
            vec![Region::new(0, 0, 375, 44), Region::new(0, 778, 375, 34)]
        );
        assert_eq!(format_regions(&regions), "0,0,375,44;0,778,375,34");
        assert!(parse_regions("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("1,2,3".parse::<Region>().is_err());
        assert!("1,2,-3,4".parse::<Region>().is_err());
        assert!("1,2,0,4".parse::<Region>().is_err());
        assert!(parse_regions("1,2,3,4;oops").is_err());
    }

    #[test]
    fn test_containment() {
        let outer = Region::new(10, 10, 50, 50);
        assert!(outer.contains(&Region::new(10, 10, 50, 50)));
        assert!(outer.contains(&Region::new(20, 20, 5, 5)));
        assert!(!outer.contains(&Region::new(5, 20, 10, 10)));
        assert!(!outer.contains(&Region::new(50, 50, 11, 1)));
        assert!(outer.contains_point(59, 59));
        assert!(!outer.contains_point(60, 59));
    }
}
