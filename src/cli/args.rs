//! Command-line argument definitions for the SLD OCD-ID joiner
//!
//! Defines the CLI using the clap derive API. Every path has a default, so
//! `sld-ocdid join` with no flags reproduces the standard `./data` layout.

use crate::config::JoinConfig;
use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_TIGER_YEAR};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the SLD OCD-ID joiner
///
/// Attaches Open Civic Data division identifiers and state postal codes to
/// U.S. state legislative district boundaries.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sld-ocdid",
    version,
    about = "Join state legislative district GeoJSON with OCD division identifiers",
    long_about = "Streams a GeoJSON FeatureCollection of Census TIGER/Line state legislative \
                  districts, looks each district up in the upper and lower chamber OCD-ID tables, \
                  and writes a new FeatureCollection whose properties are exactly \
                  { ocdid, type, state }. The input is never held in memory as a whole."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Join district features with OCD-IDs (main command)
    Join(JoinArgs),
    /// List or download the Census shapefile archives the district GeoJSON is built from
    Sources(SourcesArgs),
}

/// Arguments for the join command
#[derive(Debug, Clone, Parser)]
pub struct JoinArgs {
    /// Input GeoJSON FeatureCollection of legislative districts
    #[arg(long = "geojson", value_name = "PATH", help = "Input district GeoJSON")]
    pub geojson_path: Option<PathBuf>,

    /// Upper chamber OCD-ID table (columns: census_geoid_14, id)
    #[arg(long = "sldu", value_name = "PATH", help = "Upper chamber OCD-ID CSV")]
    pub sldu_csv_path: Option<PathBuf>,

    /// Lower chamber OCD-ID table (columns: census_geoid_14, id)
    #[arg(long = "sldl", value_name = "PATH", help = "Lower chamber OCD-ID CSV")]
    pub sldl_csv_path: Option<PathBuf>,

    /// Output GeoJSON path; parent directories are created as needed
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output GeoJSON path"
    )]
    pub output_path: Option<PathBuf>,

    /// JSON configuration file
    ///
    /// Keys match the configuration fields (geojson_path, sldu_csv_path,
    /// sldl_csv_path, output_path, upper_chamber_mtfcc, channel_capacity,
    /// show_progress). Command-line flags take precedence.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "JSON configuration file"
    )]
    pub config_file: Option<PathBuf>,

    /// Parsed features buffered ahead of the writer
    #[arg(long = "channel-capacity", value_name = "N")]
    pub channel_capacity: Option<usize>,

    /// MTFCC that identifies upper chamber districts
    #[arg(long = "upper-mtfcc", value_name = "CODE")]
    pub upper_chamber_mtfcc: Option<String>,

    /// Disable the progress spinner
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show warnings and errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except warnings and errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl JoinArgs {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Overlay command-line values onto a loaded configuration
    pub fn apply_overrides(&self, mut config: JoinConfig) -> JoinConfig {
        if let Some(path) = &self.geojson_path {
            config.geojson_path = path.clone();
        }
        if let Some(path) = &self.sldu_csv_path {
            config.sldu_csv_path = path.clone();
        }
        if let Some(path) = &self.sldl_csv_path {
            config.sldl_csv_path = path.clone();
        }
        if let Some(path) = &self.output_path {
            config.output_path = path.clone();
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }
        if let Some(code) = &self.upper_chamber_mtfcc {
            config.upper_chamber_mtfcc = code.clone();
        }
        if !self.show_progress() {
            config.show_progress = false;
        }
        config
    }
}

/// Arguments for the sources command
#[derive(Debug, Clone, Parser)]
pub struct SourcesArgs {
    /// TIGER/Line vintage
    #[arg(long = "year", value_name = "YEAR", default_value_t = DEFAULT_TIGER_YEAR)]
    pub year: u16,

    /// Directory the archives should be saved into
    #[arg(long = "data-dir", value_name = "PATH", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Output format for the source listing
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fetch every archive into the data directory instead of listing them
    #[arg(long = "download")]
    pub download: bool,

    /// Disable the download progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `url -> destination` line per archive
    Text,
    /// JSON array for scripting
    Json,
}
