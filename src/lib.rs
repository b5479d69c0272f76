//! SLD OCD-ID Library
//!
//! Joins U.S. state legislative district boundaries (Census TIGER/Line,
//! merged into one GeoJSON FeatureCollection) with Open Civic Data division
//! identifiers from the upper and lower chamber lookup tables.
//!
//! This library provides tools for:
//! - Loading the `census_geoid_14 -> id` reference tables with first-row-wins lookup
//! - Streaming features out of an arbitrarily large FeatureCollection
//! - Replacing each feature's properties with `{ocdid, type, state}`
//! - Writing the enriched collection incrementally, in input order
//! - Listing and downloading the TIGER/Line shapefile archives the input is built from

pub mod config;
pub mod constants;
pub mod error;
pub mod processor;

// Core application modules
pub mod app {
    pub mod models;
    pub mod states;
    pub mod services {
        pub mod collection_writer;
        pub mod enrichment;
        pub mod feature_stream;
        pub mod reference_table;
        pub mod shapefile_download;
        pub mod shapefile_sources;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DistrictType, EnrichedProperties, Feature, JoinStats};
pub use config::JoinConfig;
pub use error::{Error, Result};
pub use processor::JoinProcessor;
