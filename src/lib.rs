//! Histogram-based percentile estimation in Rust
//!
//! Estimates the values at given percentiles of a large sample population
//! from a coarse histogram of counts over equal-width buckets, instead of
//! sorting or storing every sample. The estimates are robust minimum and
//! maximum bounds for rescaling a high-dynamic-range raster to 8-bit, where
//! a few outliers would otherwise stretch the scale.
//!
//! The estimate is approximate: every value is a bin edge, so accuracy
//! depends on the bucket count and on the shape of the distribution.
//!
//! ## Example
//!
//! ```rust
//! use histscale::Histogram;
//!
//! let counts = vec![0, 5, 90, 5, 0];
//! let histogram = Histogram::new(0.0, 50.0, counts).unwrap();
//!
//! let estimate = histogram.estimate(&[1.0, 99.0]).unwrap();
//!
//! assert_eq!(estimate.percentiles(), &[0.0, 1.0, 99.0, 100.0]);
//! assert_eq!(estimate.values(), &[0.0, 10.0, 30.0, 50.0]);
//! assert_eq!(estimate.scale_bounds(), Some((10.0, 30.0)));
//! ```

mod error;
mod estimate;
mod histogram;
mod raster;
mod translate;

pub use error::*;
pub use estimate::*;
pub use histogram::*;
pub use raster::*;
pub use translate::*;
