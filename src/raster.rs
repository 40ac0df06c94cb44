use crate::error::{Error, Result};
use crate::histogram::Histogram;
use float_ord::FloatOrd;
use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Extensions read as plain-text sample lists instead of images.
const TEXT_EXTENSIONS: &[&str] = &["txt", "csv", "dat"];

/// Summary statistics over every valid sample of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub count: usize,
}

/// Samples of the first band of a raster.
///
/// Non-finite samples are treated as nodata and dropped on construction.
#[derive(Debug, Clone, Default)]
pub struct Raster {
    samples: Vec<f64>,
}

impl Raster {
    pub fn from_samples(samples: Vec<f64>) -> Self {
        let before = samples.len();
        let samples: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
        if samples.len() < before {
            warn!(
                dropped = before - samples.len(),
                "ignoring non-finite samples"
            );
        }
        Self { samples }
    }

    /// Loads the first band of the raster at `path`.
    ///
    /// `.txt`, `.csv` and `.dat` files hold decimal samples separated by
    /// whitespace or commas, with `#` starting a comment. Anything else is
    /// decoded as an image; 8-bit, 16-bit and float rasters keep their
    /// native sample values.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

        let raster = if is_text {
            let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.display().to_string(),
                source,
            })?;
            Self::from_samples(parse_samples(path, &content)?)
        } else {
            let image = image::open(path).map_err(|source| match source {
                image::ImageError::IoError(source) => Error::Io {
                    path: path.display().to_string(),
                    source,
                },
                source => Error::Decode {
                    path: path.display().to_string(),
                    source,
                },
            })?;
            debug!(
                width = image.width(),
                height = image.height(),
                color = ?image.color(),
                "decoded raster"
            );
            Self::from_samples(first_band(&image))
        };

        debug!(path = %path.display(), samples = raster.len(), "loaded raster");
        Ok(raster)
    }

    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Exact statistics over all samples.
    pub fn statistics(&self) -> Result<Statistics> {
        let min = self.samples.iter().copied().map(FloatOrd).min();
        let max = self.samples.iter().copied().map(FloatOrd).max();
        let (Some(FloatOrd(min)), Some(FloatOrd(max))) = (min, max) else {
            return Err(Error::DegenerateDistribution);
        };

        let count = self.samples.len();
        let mean = self.samples.iter().sum::<f64>() / count as f64;
        let variance = self
            .samples
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / count as f64;

        Ok(Statistics {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
            count,
        })
    }

    /// Histogram of all samples over `buckets` buckets spanning the sample
    /// minimum and maximum.
    pub fn histogram(&self, buckets: usize) -> Result<Histogram> {
        let stats = self.statistics()?;
        let histogram =
            Histogram::from_samples(stats.min, stats.max, buckets, self.samples.iter().copied())?;
        debug!(
            buckets,
            lo = stats.min,
            hi = stats.max,
            total = histogram.total(),
            "computed histogram"
        );
        Ok(histogram)
    }
}

fn parse_samples(path: &Path, content: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for token in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
        {
            let value = token.parse::<f64>().map_err(|_| Error::Parse {
                path: path.display().to_string(),
                line: line_no + 1,
                token: token.to_string(),
            })?;
            samples.push(value);
        }
    }
    Ok(samples)
}

fn first_band(image: &DynamicImage) -> Vec<f64> {
    match image {
        DynamicImage::ImageLuma8(buffer) => channel_zero(buffer),
        DynamicImage::ImageLumaA8(buffer) => channel_zero(buffer),
        DynamicImage::ImageRgb8(buffer) => channel_zero(buffer),
        DynamicImage::ImageRgba8(buffer) => channel_zero(buffer),
        DynamicImage::ImageLuma16(buffer) => channel_zero(buffer),
        DynamicImage::ImageLumaA16(buffer) => channel_zero(buffer),
        DynamicImage::ImageRgb16(buffer) => channel_zero(buffer),
        DynamicImage::ImageRgba16(buffer) => channel_zero(buffer),
        DynamicImage::ImageRgb32F(buffer) => channel_zero(buffer),
        DynamicImage::ImageRgba32F(buffer) => channel_zero(buffer),
        other => channel_zero(&other.to_rgba32f()),
    }
}

fn channel_zero<P>(buffer: &ImageBuffer<P, Vec<P::Subpixel>>) -> Vec<f64>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
{
    buffer.pixels().map(|pixel| pixel.channels()[0].into()).collect()
}
