//! Configuration file support for histscale.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/histscale/config.toml` (lowest priority)
//! - Project-local: `.histscale.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Percentile estimation settings.
    pub estimate: EstimateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Percentile estimation configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    /// Number of histogram buckets.
    pub nbuckets: Option<usize>,
    /// Lower and upper percentiles of the scaling range.
    pub percentiles: Option<[f64; 2]>,
}

/// Output configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// gdal_translate output format, e.g. "PDF" or "PNG".
    pub format: Option<String>,
    /// Print a JSON report instead of the command.
    pub json: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Missing files are silently ignored. Invalid values are dropped with a
    /// warning.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        config.sanitize();
        config
    }

    /// Drop values that are out of range, warning about each one.
    fn sanitize(&mut self) {
        if self.estimate.nbuckets == Some(0) {
            warn!("estimate.nbuckets must be at least 1, ignoring");
            self.estimate.nbuckets = None;
        }
        if let Some([low, high]) = self.estimate.percentiles {
            let valid = |p: f64| (0.0..=100.0).contains(&p);
            if !valid(low) || !valid(high) {
                warn!("estimate.percentiles must be within 0-100, got [{low}, {high}], ignoring");
                self.estimate.percentiles = None;
            }
        }
        if let Some(ref f) = self.output.format {
            if f.trim().is_empty() {
                warn!("output.format must not be empty, ignoring");
                self.output.format = None;
            }
        }
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.estimate.nbuckets = other.estimate.nbuckets.or(self.estimate.nbuckets);
        self.estimate.percentiles = other.estimate.percentiles.or(self.estimate.percentiles);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.json = other.output.json.or(self.output.json);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("histscale").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.histscale.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".histscale.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
