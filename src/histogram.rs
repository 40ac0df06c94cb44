use crate::error::{Error, Result};
use std::cmp::Ordering;
use tracing::debug;

/// Sample counts over equal-width buckets partitioning `[lo, hi]`.
///
/// Bucket `i` is bounded by `bin_edges()[i]` and `bin_edges()[i + 1]`. A
/// `Histogram` is only ever constructed in a valid state: at least one
/// bucket, a finite non-empty value range and strictly increasing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lo: f64,
    hi: f64,
    counts: Vec<u64>,
    edges: Vec<f64>,
    total: u64,
}

impl Histogram {
    /// Creates a histogram with one bucket per entry of `counts`.
    pub fn new(lo: f64, hi: f64, counts: Vec<u64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(Error::InvalidHistogram(
                "at least one bucket is required".to_string(),
            ));
        }
        if !lo.is_finite() || !hi.is_finite() {
            return Err(Error::InvalidHistogram(format!(
                "value range [{lo}, {hi}] is not finite"
            )));
        }
        if lo >= hi {
            return Err(Error::InvalidHistogram(format!(
                "value range [{lo}, {hi}] is empty"
            )));
        }
        if !(hi - lo).is_finite() {
            return Err(Error::InvalidHistogram(format!(
                "width of value range [{lo}, {hi}] overflows f64"
            )));
        }

        let edges = bin_edges(lo, hi, counts.len());
        // NaN edges compare as unordered and are rejected too.
        if let Some(i) = edges
            .windows(2)
            .position(|pair| pair[0].partial_cmp(&pair[1]) != Some(Ordering::Less))
        {
            return Err(Error::InvalidHistogram(format!(
                "bin edges are not strictly increasing at edge {i} ({})",
                edges[i]
            )));
        }

        let total = counts
            .iter()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
            .ok_or_else(|| Error::InvalidHistogram("total count overflows u64".to_string()))?;

        Ok(Self {
            lo,
            hi,
            counts,
            edges,
            total,
        })
    }

    /// Like [`Histogram::new`], but also checks that `counts` holds exactly
    /// `buckets` entries.
    pub fn with_buckets(lo: f64, hi: f64, buckets: usize, counts: Vec<u64>) -> Result<Self> {
        if buckets == 0 {
            return Err(Error::InvalidHistogram(
                "bucket count must be at least 1".to_string(),
            ));
        }
        if counts.len() != buckets {
            return Err(Error::InvalidHistogram(format!(
                "expected {buckets} bucket counts, got {}",
                counts.len()
            )));
        }
        Self::new(lo, hi, counts)
    }

    /// Counts `samples` into `buckets` equal-width buckets over `[lo, hi]`.
    ///
    /// A sample equal to `hi` lands in the last bucket. Samples outside the
    /// range, and non-finite samples, are not counted.
    pub fn from_samples<I>(lo: f64, hi: f64, buckets: usize, samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if buckets == 0 {
            return Err(Error::InvalidHistogram(
                "bucket count must be at least 1".to_string(),
            ));
        }

        let mut counts = vec![0u64; buckets];
        let scale = buckets as f64 / (hi - lo);
        let mut skipped = 0usize;
        for value in samples {
            if !value.is_finite() || value < lo || value > hi {
                skipped += 1;
                continue;
            }
            let index = (((value - lo) * scale) as usize).min(buckets - 1);
            counts[index] += 1;
        }
        if skipped > 0 {
            debug!(skipped, lo, hi, "samples outside histogram range were not counted");
        }

        Self::new(lo, hi, counts)
    }

    /// Lower bound of the value range.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper bound of the value range.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Number of buckets.
    #[inline]
    pub fn buckets(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of samples over all buckets.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The `buckets() + 1` edges, linearly spaced from `lo` to `hi`.
    #[inline]
    pub fn bin_edges(&self) -> &[f64] {
        &self.edges
    }

    /// Width of a bucket, measured between the first two edges.
    #[inline]
    pub fn bucket_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Per-bucket density, normalized so that it integrates to 1 over
    /// `[lo, hi]`.
    pub fn pmf(&self) -> Result<Vec<f64>> {
        if self.total == 0 {
            return Err(Error::DegenerateDistribution);
        }
        let norm = self.total as f64 * self.bucket_width();
        Ok(self.counts.iter().map(|&count| count as f64 / norm).collect())
    }

    /// Cumulative distribution at the upper edge of each bucket.
    ///
    /// Non-decreasing, and ends at 1.0 up to rounding.
    pub fn cdf(&self) -> Result<Vec<f64>> {
        let width = self.bucket_width();
        let mut running = 0.0;
        Ok(self
            .pmf()?
            .into_iter()
            .map(|density| {
                running += density;
                running * width
            })
            .collect())
    }
}

/// `buckets + 1` edges from `lo` to `hi`; the last edge is `hi` exactly.
fn bin_edges(lo: f64, hi: f64, buckets: usize) -> Vec<f64> {
    let step = (hi - lo) / buckets as f64;
    let mut edges: Vec<f64> = (0..buckets).map(|i| i as f64 * step + lo).collect();
    edges.push(hi);
    edges
}
