//! Integration tests for loading rasters through the `image` decoders.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use histscale::{Error, Raster, TranslateCommand};
use image::{ImageBuffer, Luma, Rgb};

#[test]
fn test_load_16_bit_grayscale_png() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dem.png");
    // 0, 100, .., 6300 across an 8x8 raster.
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(8, 8, |x, y| Luma([((y * 8 + x) * 100) as u16]));
    buffer.save(&path).unwrap();

    let raster = Raster::open(&path).expect("should load PNG");
    assert_eq!(raster.len(), 64);

    let stats = raster.statistics().unwrap();
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 6300.0);
    assert_eq!(stats.mean, 3150.0);

    let histogram = raster.histogram(63).unwrap();
    assert_eq!(histogram.total(), 64);
    assert_eq!(histogram.bin_edges()[1], 100.0);
}

#[test]
fn test_rgb_raster_uses_first_band() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("rgb.png");
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(4, 4, |x, _| Rgb([x as u8 * 10, 255, 0]));
    buffer.save(&path).unwrap();

    let raster = Raster::open(&path).unwrap();
    let stats = raster.statistics().unwrap();

    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 30.0);
}

#[test]
fn test_estimate_from_raster() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("ramp.png");
    // Columns 0..=100, with a single hot outlier pixel.
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(101, 10, |x, y| {
        if x == 0 && y == 0 {
            Luma([60_000])
        } else {
            Luma([x as u16])
        }
    });
    buffer.save(&path).unwrap();

    let raster = Raster::open(&path).unwrap();
    let histogram = raster.histogram(1000).unwrap();
    let estimate = histogram.estimate(&[0.1, 99.9]).unwrap();

    assert_eq!(estimate.lo(), 0.0);
    assert_eq!(estimate.hi(), 60_000.0);

    // The outlier stretches the range to 60-wide buckets, but the scaling
    // bounds stay on the bulk of the samples: 1009 of 1010 lie below 120.
    let (low, high) = estimate.scale_bounds().unwrap();
    assert_eq!(low, 0.0);
    assert_eq!(high, 60.0);

    let cmd = TranslateCommand::from_estimate("ramp.png", "PNG", &estimate).unwrap();
    assert!(cmd.to_string().ends_with("ramp.png clipped-ramp.png.png"));
}

#[test]
fn test_missing_image_is_io_error() {
    let temp = tempfile::tempdir().unwrap();
    let res = Raster::open(temp.path().join("missing.tif"));

    assert!(matches!(res, Err(Error::Io { .. })));
}

#[test]
fn test_undecodable_image() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("garbage.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let res = Raster::open(&path);
    assert!(matches!(res, Err(Error::Decode { .. })));
}
