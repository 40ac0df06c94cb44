//! Command-line arguments and the estimate-and-print pipeline.

pub mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use histscale::{Estimate, Raster, Statistics, TranslateCommand};
use serde::Serialize;
use tracing::{debug, info};

use config::AppConfig;

/// Built-in defaults, overridden by config files and then by flags.
mod defaults {
    pub const OUTFORMAT: &str = "PDF";
    pub const NBUCKETS: usize = 1000;
    pub const PERCENTILES: [f64; 2] = [0.1, 99.9];
}

/// Parse a bucket count (at least 1).
fn parse_buckets(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid bucket count"))?;
    if value == 0 {
        Err("bucket count must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Print the gdal_translate command that rescales a raster to 8-bit using
/// histogram-estimated percentile bounds
#[derive(Parser)]
#[command(name = "histscale")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Raster to analyze (image, or a .txt/.csv/.dat list of samples)
    #[arg(short, long)]
    pub filename: PathBuf,

    /// Output format passed to gdal_translate [default: PDF]
    #[arg(short = 'o', long)]
    pub outformat: Option<String>,

    /// Number of histogram buckets [default: 1000]
    #[arg(short, long, value_parser = parse_buckets)]
    pub nbuckets: Option<usize>,

    /// Lower and upper percentiles of the scaling range [default: 0.1 99.9]
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["LOW", "HIGH"],
        allow_negative_numbers = true
    )]
    pub percentiles: Option<Vec<f64>>,

    /// Print a JSON report instead of the command
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Effective settings after layering defaults, config files and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub outformat: String,
    pub nbuckets: usize,
    pub percentiles: Vec<f64>,
    pub json: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &AppConfig) -> Self {
        Self {
            outformat: cli
                .outformat
                .clone()
                .or_else(|| config.output.format.clone())
                .unwrap_or_else(|| defaults::OUTFORMAT.to_string()),
            nbuckets: cli
                .nbuckets
                .or(config.estimate.nbuckets)
                .unwrap_or(defaults::NBUCKETS),
            percentiles: cli
                .percentiles
                .clone()
                .or_else(|| config.estimate.percentiles.map(Vec::from))
                .unwrap_or_else(|| defaults::PERCENTILES.to_vec()),
            json: cli.json || config.output.json.unwrap_or(false),
        }
    }
}

/// JSON report printed with `--json`.
#[derive(Serialize)]
struct Report<'a> {
    command: String,
    statistics: &'a Statistics,
    #[serde(flatten)]
    estimate: &'a Estimate,
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = AppConfig::load();
    let settings = Settings::resolve(cli, &config);
    debug!(?settings, "resolved settings");

    let raster = Raster::open(&cli.filename)
        .with_context(|| format!("cannot load raster {}", cli.filename.display()))?;
    let statistics = raster
        .statistics()
        .with_context(|| format!("{} holds no valid samples", cli.filename.display()))?;
    info!(
        min = statistics.min,
        max = statistics.max,
        mean = statistics.mean,
        std_dev = statistics.std_dev,
        "raster statistics"
    );

    let histogram = raster
        .histogram(settings.nbuckets)
        .context("cannot build histogram")?;
    let estimate = histogram
        .estimate(&settings.percentiles)
        .context("cannot estimate percentiles")?;

    let input = cli.filename.display().to_string();
    let command = TranslateCommand::from_estimate(input, &settings.outformat, &estimate)
        .context("no percentiles requested")?;

    if settings.json {
        let report = Report {
            command: command.to_string(),
            statistics: &statistics,
            estimate: &estimate,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{command}");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("histscale").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-f", "in.tif"]);
        let settings = Settings::resolve(&cli, &AppConfig::default());

        assert_eq!(settings.outformat, "PDF");
        assert_eq!(settings.nbuckets, 1000);
        assert_eq!(settings.percentiles, vec![0.1, 99.9]);
        assert!(!settings.json);
    }

    #[test]
    fn test_flags_override_config() {
        let config: AppConfig = toml::from_str(
            r"
[estimate]
nbuckets = 64
percentiles = [2.0, 98.0]

[output]
format = 'GTiff'
",
        )
        .unwrap();

        let cli = parse(&["-f", "in.tif", "-n", "256", "-p", "1", "99"]);
        let settings = Settings::resolve(&cli, &config);
        assert_eq!(settings.nbuckets, 256);
        assert_eq!(settings.percentiles, vec![1.0, 99.0]);
        assert_eq!(settings.outformat, "GTiff");

        let cli = parse(&["-f", "in.tif", "--outformat", "PNG"]);
        let settings = Settings::resolve(&cli, &config);
        assert_eq!(settings.nbuckets, 64);
        assert_eq!(settings.percentiles, vec![2.0, 98.0]);
        assert_eq!(settings.outformat, "PNG");
    }

    #[test]
    fn test_percentiles_take_two_values() {
        let res = Cli::try_parse_from(["histscale", "-f", "in.tif", "-p", "5"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_negative_percentile_reaches_validation() {
        let cli = parse(&["-f", "in.tif", "-p", "-5", "50"]);
        assert_eq!(cli.percentiles, Some(vec![-5.0, 50.0]));
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let res = Cli::try_parse_from(["histscale", "-f", "in.tif", "-n", "0"]);
        assert!(res.is_err());
    }
}
