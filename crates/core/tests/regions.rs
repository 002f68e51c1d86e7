use image::{Rgba, RgbaImage};
use rnvisual_core::{
    extract_from_path, format_regions, DiffMarker, ExtractorParams, Region, VisualConfig,
    VisualTester,
};
use tempfile::TempDir;

const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Diff image the way a phone screenshot tends to look: clock in the
/// status bar changed, home indicator re-rendered.
fn status_bar_diff() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(375, 812, Rgba([40, 40, 40, 128]));
    for y in 14..30 {
        for x in 20..70 {
            img.put_pixel(x, y, MAGENTA);
        }
    }
    for y in 798..803 {
        for x in 120..255 {
            img.put_pixel(x, y, MAGENTA);
        }
    }
    img
}

#[test]
fn suggests_status_bar_and_home_indicator() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("story-diff.png");
    status_bar_diff().save(&path).unwrap();

    let regions = extract_from_path(&path, &DiffMarker::default(), &ExtractorParams::default());

    // Overall box spans both clusters, so band regions only survive where
    // their padding pokes out of it.
    assert_eq!(regions[0], Region::new(20, 14, 235, 789));
    assert!(regions.len() <= 5);
    assert!(regions.iter().skip(1).any(|r| r.y <= 14 && r.x <= 20));
    assert!(regions.iter().skip(1).any(|r| r.bottom() == 812));
    for region in &regions {
        assert!(region.right() <= 375 && region.bottom() <= 812);
    }
}

#[test]
fn undecodable_file_yields_nothing() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let regions = extract_from_path(&path, &DiffMarker::default(), &ExtractorParams::default());
    assert!(regions.is_empty());

    let missing = extract_from_path(
        &tmp.path().join("missing.png"),
        &DiffMarker::default(),
        &ExtractorParams::default(),
    );
    assert!(missing.is_empty());
}

#[test]
fn suggested_regions_make_the_rerun_pass() {
    let tmp = TempDir::new().unwrap();
    let config = VisualConfig {
        baseline_dir: tmp.path().join("baselines"),
        actual_dir: tmp.path().join("screenshots"),
        diff_dir: tmp.path().join("diffs"),
        ..Default::default()
    };
    let tester = VisualTester::new(config.clone()).unwrap();

    let baseline = RgbaImage::from_pixel(200, 400, Rgba([250, 250, 250, 255]));
    let mut actual = baseline.clone();
    for y in 5..15 {
        for x in 150..190 {
            actual.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    baseline.save(config.baseline_dir.join("Header.png")).unwrap();
    actual.save(config.actual_dir.join("Header.png")).unwrap();

    let first = tester.compare("Header").unwrap();
    assert!(first.diff_pixels > 0);
    assert!(!first.suggested_regions.is_empty());

    let flag = format_regions(&first.suggested_regions);
    let rerun = VisualTester::new(VisualConfig {
        ignore_regions: rnvisual_core::parse_regions(&flag).unwrap(),
        ..config
    })
    .unwrap();

    let second = rerun.compare("Header").unwrap();
    assert!(second.matches);
    assert_eq!(second.diff_pixels, 0);
}
