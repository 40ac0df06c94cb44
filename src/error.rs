use thiserror::Error;

/// Errors raised while building a histogram or estimating percentiles.
#[derive(Error, Debug)]
pub enum Error {
    /// The histogram holds no samples, so no percentile can be computed.
    #[error("degenerate distribution: histogram has zero total mass")]
    DegenerateDistribution,
    /// The histogram is structurally unusable.
    #[error("invalid histogram: {0}")]
    InvalidHistogram(String),
    /// A requested percentile lies outside `[0, 100]` (or is NaN).
    #[error("invalid percentile {0}: must be within [0, 100]")]
    InvalidPercentile(f64),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode raster {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("{path}:{line}: cannot parse sample {token:?}")]
    Parse {
        path: String,
        line: usize,
        token: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
