//! Error handling for the SLD OCD-ID join.
//!
//! Every variant here is fatal to a run. A feature without a matching
//! reference row is not an error: it is written with a null `ocdid`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for join operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error on '{}': {message}", path.display())]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Reference table could not be parsed
    #[error("CSV parsing error in file '{}': {message}", path.display())]
    CsvParsing {
        path: PathBuf,
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Reference table header lacks a required column
    #[error("Missing required column '{column}' in file '{}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// GeoJSON input is malformed
    #[error("GeoJSON parsing error in file '{}': {message}", path.display())]
    FeatureParsing {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Feature lacks a property the join depends on
    #[error("Feature #{feature_index} is missing property '{property}'")]
    MissingProperty {
        property: String,
        feature_index: usize,
    },

    /// No state or territory carries the feature's FIPS code
    #[error("No state or territory with FIPS code '{fips}' (feature #{feature_index})")]
    StateNotFound { fips: String, feature_index: usize },

    /// Output collection was already closed
    #[error("Feature collection writer is already closed")]
    WriterClosed,

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Background parse task failed to complete
    #[error("Feature reader task failed: {message}")]
    ReaderTask { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(path: impl AsRef<Path>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        path: impl AsRef<Path>,
        message: impl Into<String>,
        source: csv::Error,
    ) -> Self {
        Self::CsvParsing {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing column error
    pub fn missing_column(path: impl AsRef<Path>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            path: path.as_ref().to_path_buf(),
            column: column.into(),
        }
    }

    /// Create a GeoJSON parsing error with context
    pub fn feature_parsing(
        path: impl AsRef<Path>,
        message: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::FeatureParsing {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            source,
        }
    }

    /// Create a missing property error
    pub fn missing_property(property: impl Into<String>, feature_index: usize) -> Self {
        Self::MissingProperty {
            property: property.into(),
            feature_index,
        }
    }

    /// Create a state lookup error
    pub fn state_not_found(fips: impl Into<String>, feature_index: usize) -> Self {
        Self::StateNotFound {
            fips: fips.into(),
            feature_index,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a reader task error
    pub fn reader_task(message: impl Into<String>) -> Self {
        Self::ReaderTask {
            message: message.into(),
        }
    }

    /// Whether this error came from malformed input rather than the environment
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::CsvParsing { .. } | Self::MissingColumn { .. } | Self::FeatureParsing { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
