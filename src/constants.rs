//! Application constants for the SLD OCD-ID joiner
//!
//! Default file locations, feature class codes, and the fixed text used to
//! frame the streamed FeatureCollection output.

// =============================================================================
// Default File Locations
// =============================================================================

/// Combined state legislative district boundaries (GeoJSON FeatureCollection)
pub const DEFAULT_GEOJSON_PATH: &str = "./data/sld.geojson";

/// Upper chamber OCD-ID table
pub const DEFAULT_SLDU_CSV_PATH: &str = "./data/sldu-ocdid.csv";

/// Lower chamber OCD-ID table
pub const DEFAULT_SLDL_CSV_PATH: &str = "./data/sldl-ocdid.csv";

/// Enriched output FeatureCollection
pub const DEFAULT_OUTPUT_PATH: &str = "./data/sld-with-ocdid.geojson";

/// Directory the shapefile source planner targets
pub const DEFAULT_DATA_DIR: &str = "./data";

// =============================================================================
// TIGER/Line Feature Classes
// =============================================================================

/// MAF/TIGER feature class code for state legislative districts, upper chamber
pub const UPPER_CHAMBER_MTFCC: &str = "G5210";

/// MAF/TIGER feature class code for state legislative districts, lower chamber
pub const LOWER_CHAMBER_MTFCC: &str = "G5220";

/// Feature property names read by the enrichment stage
pub mod properties {
    pub const MTFCC: &str = "MTFCC";
    pub const GEOID: &str = "GEOID";
    pub const STATEFP: &str = "STATEFP";
}

// =============================================================================
// Reference Table Columns
// =============================================================================

/// Column holding the `{type}-{GEOID}` composite key
pub const KEY_COLUMN: &str = "census_geoid_14";

/// Column holding the OCD division identifier
pub const ID_COLUMN: &str = "id";

// =============================================================================
// Output Framing
// =============================================================================

/// Opening text of the streamed FeatureCollection
pub const COLLECTION_OPEN: &str = r#"{"type":"FeatureCollection","features":["#;

/// Written before the first feature
pub const FIRST_FEATURE_PREFIX: &str = "\n";

/// Written before every feature after the first
pub const FEATURE_SEPARATOR: &str = ",\n";

/// Closing text when at least one feature was written
pub const COLLECTION_CLOSE: &str = "\n]}";

/// Closing text for an empty collection
pub const EMPTY_COLLECTION_CLOSE: &str = "]}";

// =============================================================================
// Streaming
// =============================================================================

/// Features buffered between the parse task and the writer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Read buffer for the GeoJSON input
pub const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Write buffer for the GeoJSON output
pub const WRITE_BUFFER_SIZE: usize = 256 * 1024;

/// Progress spinner refresh granularity (features)
pub const PROGRESS_UPDATE_INTERVAL: u64 = 500;

// =============================================================================
// Census TIGER/Line Downloads
// =============================================================================

/// TIGER/Line vintage the joined dataset is built from
pub const DEFAULT_TIGER_YEAR: u16 = 2018;

/// Census download host and path root (URLs are case-sensitive)
pub const TIGER_BASE_URL: &str = "https://www2.census.gov/geo/tiger";

/// User agent sent with shapefile downloads
pub const DOWNLOAD_USER_AGENT: &str = concat!("sld-ocdid/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for shapefile downloads (seconds)
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Suffix of an archive that is still being written
pub const PARTIAL_DOWNLOAD_SUFFIX: &str = "part";
