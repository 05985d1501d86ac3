//! TOML configuration file support.
//!
//! Every setting of the `pick` and `filter-gaps` commands can be kept in a
//! config file; command-line flags override the file:
//!
//! ```toml
//! # mzpick.toml
//! [picking]
//! ms_level = 1
//! suffix = "peaks"
//!
//! [picking.mass_detector]
//! name = "centroid"
//! parameters = { noise_level = 1000.0 }
//!
//! [picking.peak_builder]
//! name = "simple"
//! parameters = { mz_tolerance = { ppm = 10.0 }, gap_tolerance = 2, min_matched_scans = 4 }
//!
//! [filter]
//! min_present = 2
//!
//! [output]
//! compression_level = 9
//! row_group_size = 100000
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzpick::task::PeakPickerParameters;
use mzpick::writer::{CompressionType, WriterConfig};

/// Root configuration structure for mzpick.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Peak picking settings.
    #[serde(default)]
    pub picking: PeakPickerParameters,

    /// Gap filter settings.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for the filter-gaps command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Minimum number of raw data files in which a row must have a peak.
    pub min_present: Option<usize>,
}

/// Configuration of the written Parquet files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// ZSTD compression level (1-22).
    pub compression_level: Option<i32>,

    /// Number of table rows per Parquet row group.
    pub row_group_size: Option<usize>,
}

impl OutputConfig {
    /// Writer configuration with the configured overrides applied.
    pub fn writer_config(&self) -> WriterConfig {
        let mut config = WriterConfig::default();
        if let Some(level) = self.compression_level {
            config.compression = CompressionType::Zstd(level);
        }
        if let Some(size) = self.row_group_size {
            config.row_group_size = size;
        }
        config
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Load the file if one was given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
