//! Configuration management and validation.
//!
//! Holds the file locations and tuning knobs for a join run. Values are
//! layered: built-in defaults, then an optional JSON file, then command-line
//! overrides, then [`JoinConfig::validate`].

use crate::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_GEOJSON_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_SLDL_CSV_PATH,
    DEFAULT_SLDU_CSV_PATH, UPPER_CHAMBER_MTFCC,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for one join run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Combined legislative district GeoJSON FeatureCollection
    pub geojson_path: PathBuf,

    /// Upper chamber OCD-ID table
    pub sldu_csv_path: PathBuf,

    /// Lower chamber OCD-ID table
    pub sldl_csv_path: PathBuf,

    /// Destination for the enriched FeatureCollection
    pub output_path: PathBuf,

    /// MTFCC that marks an upper chamber district
    pub upper_chamber_mtfcc: String,

    /// Parsed features buffered ahead of the writer
    pub channel_capacity: usize,

    /// Show a progress spinner while streaming
    pub show_progress: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            geojson_path: PathBuf::from(DEFAULT_GEOJSON_PATH),
            sldu_csv_path: PathBuf::from(DEFAULT_SLDU_CSV_PATH),
            sldl_csv_path: PathBuf::from(DEFAULT_SLDL_CSV_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            upper_chamber_mtfcc: UPPER_CHAMBER_MTFCC.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            show_progress: true,
        }
    }
}

impl JoinConfig {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path, "Failed to read config file", e))?;
        serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Defaults, overlaid by `config_file` when given
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_geojson_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.geojson_path = path.into();
        self
    }

    pub fn with_sldu_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sldu_csv_path = path.into();
        self
    }

    pub fn with_sldl_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sldl_csv_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_upper_chamber_mtfcc(mut self, code: impl Into<String>) -> Self {
        self.upper_chamber_mtfcc = code.into();
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Disable the progress spinner (tests, non-interactive runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(Error::configuration("channel_capacity must be at least 1"));
        }

        if self.upper_chamber_mtfcc.trim().is_empty() {
            return Err(Error::configuration("upper_chamber_mtfcc must not be empty"));
        }

        let inputs = [
            ("geojson_path", &self.geojson_path),
            ("sldu_csv_path", &self.sldu_csv_path),
            ("sldl_csv_path", &self.sldl_csv_path),
        ];
        for (name, path) in inputs {
            if path.as_os_str().is_empty() {
                return Err(Error::configuration(format!("{} must not be empty", name)));
            }
            if *path == self.output_path {
                return Err(Error::configuration(format!(
                    "output_path must differ from {} ({})",
                    name,
                    path.display()
                )));
            }
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(Error::configuration("output_path must not be empty"));
        }

        Ok(())
    }
}
