use crate::estimate::Estimate;
use std::fmt;

/// A `gdal_translate` invocation that rescales a raster to 8-bit.
///
/// Sample values in `[min, max]` are mapped linearly onto `[0, 255]`; the
/// output is written next to the input as `clipped-<input>.<format>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateCommand {
    input: String,
    format: String,
    min: f64,
    max: f64,
}

impl TranslateCommand {
    pub fn new(input: impl Into<String>, format: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            input: input.into(),
            format: format.into(),
            min,
            max,
        }
    }

    /// Uses the values at the first and last requested percentiles of
    /// `estimate` as the scaling range. `None` if nothing was requested.
    pub fn from_estimate(
        input: impl Into<String>,
        format: impl Into<String>,
        estimate: &Estimate,
    ) -> Option<Self> {
        let (min, max) = estimate.scale_bounds()?;
        Some(Self::new(input, format, min, max))
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Name of the file the command writes.
    pub fn output(&self) -> String {
        format!("clipped-{}.{}", self.input, self.format.to_lowercase())
    }
}

/// Bounds use Rust's shortest round-trip float formatting, so very large or
/// small values render with a bare exponent (`1e20`, not `1e+20`).
impl fmt::Display for TranslateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gdal_translate -ot Byte -of {} -a_nodata 0 -scale {:?} {:?} 0 255 {} {}",
            self.format,
            self.min,
            self.max,
            self.input,
            self.output()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::estimate_percentiles;

    #[test]
    fn test_renders_command() {
        let cmd = TranslateCommand::new("dem.tif", "PNG", 12.5, 3071.0);

        assert_eq!(
            cmd.to_string(),
            "gdal_translate -ot Byte -of PNG -a_nodata 0 -scale 12.5 3071.0 0 255 dem.tif clipped-dem.tif.png"
        );
        assert_eq!(cmd.output(), "clipped-dem.tif.png");
    }

    #[test]
    fn test_renders_extreme_bounds_with_bare_exponent() {
        let cmd = TranslateCommand::new("x.tif", "PDF", -1e-7, 1e20);

        assert!(cmd.to_string().contains("-scale -1e-7 1e20 0 255"));
    }

    #[test]
    fn test_from_estimate_uses_requested_bounds() {
        let est = estimate_percentiles(0.0, 50.0, &[0, 5, 90, 5, 0], &[1.0, 99.0]).unwrap();
        let cmd = TranslateCommand::from_estimate("a.tif", "PDF", &est).unwrap();

        assert_eq!(cmd.min(), 10.0);
        assert_eq!(cmd.max(), 30.0);
        assert_eq!(cmd.format(), "PDF");
        assert!(cmd.to_string().ends_with("a.tif clipped-a.tif.pdf"));
    }

    #[test]
    fn test_from_estimate_without_requests() {
        let est = estimate_percentiles(0.0, 1.0, &[1], &[]).unwrap();
        assert!(TranslateCommand::from_estimate("a.tif", "PDF", &est).is_none());
    }
}
