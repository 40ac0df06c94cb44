use crate::error::{Error, Result};
use crate::histogram::Histogram;
use serde::Serialize;
use tracing::debug;

/// Estimated values at a list of percentiles.
///
/// The requested percentiles are bracketed by the implicit `0` and `100`,
/// whose values are always the histogram's `lo` and `hi`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    percentiles: Vec<f64>,
    values: Vec<f64>,
}

impl Estimate {
    /// Percentiles in request order, with `0` prepended and `100` appended.
    #[inline]
    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    /// Estimated value for each entry of [`Estimate::percentiles`].
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(percentile, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.percentiles
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Value at the implicit 0th percentile.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.values[0]
    }

    /// Value at the implicit 100th percentile.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Values at the first and last *requested* percentiles, for use as
    /// rescaling bounds. `None` if no percentile was requested.
    pub fn scale_bounds(&self) -> Option<(f64, f64)> {
        let n = self.values.len();
        (n > 2).then(|| (self.values[1], self.values[n - 2]))
    }
}

impl Histogram {
    /// Estimates the value at each of `percentiles` (each within `[0, 100]`).
    ///
    /// A percentile `p` resolves to the bin edge at index `k`, where `k` is
    /// the number of buckets whose cumulative probability is strictly below
    /// `p / 100`. A CDF entry equal to `p / 100` is therefore not counted.
    /// When every bucket is below the target, `k == buckets()` and the value
    /// is `hi`.
    ///
    /// For example:
    ///   - `[lo, p1, .., pn, hi]` is returned for `[p1, .., pn]`
    ///   - `[lo, hi]` is returned for `[]`
    pub fn estimate(&self, percentiles: &[f64]) -> Result<Estimate> {
        if let Some(&p) = percentiles.iter().find(|p| !(0.0..=100.0).contains(*p)) {
            return Err(Error::InvalidPercentile(p));
        }

        let cdf = self.cdf()?;
        let edges = self.bin_edges();

        let mut all_percentiles = Vec::with_capacity(percentiles.len() + 2);
        let mut values = Vec::with_capacity(percentiles.len() + 2);
        all_percentiles.push(0.0);
        values.push(self.lo());
        for &p in percentiles {
            // The CDF is non-decreasing, so the entries below the target
            // form a prefix.
            let index = cdf.partition_point(|&c| c < p / 100.0);
            debug!(percentile = p, index, value = edges[index], "estimated percentile");
            all_percentiles.push(p);
            values.push(edges[index]);
        }
        all_percentiles.push(100.0);
        values.push(self.hi());

        Ok(Estimate {
            percentiles: all_percentiles,
            values,
        })
    }
}

/// Estimates values at `percentiles` from `counts` over equal-width buckets
/// spanning `[lo, hi]`.
///
/// Convenience wrapper around [`Histogram::new`] and
/// [`Histogram::estimate`].
pub fn estimate_percentiles(
    lo: f64,
    hi: f64,
    counts: &[u64],
    percentiles: &[f64],
) -> Result<Estimate> {
    Histogram::new(lo, hi, counts.to_vec())?.estimate(percentiles)
}
