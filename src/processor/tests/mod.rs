//! Integration tests for the processor module
//!
//! Tests the complete join pipeline against small on-disk fixtures.

pub mod basic_processing;

use crate::config::JoinConfig;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SLDU_CSV: &str = "id,census_geoid_14\n\
ocd-division/country:us/state:ca/sldu:1,sldu-06001\n\
ocd-division/country:us/state:tx/sldu:15,sldu-48015\n";

pub const SLDL_CSV: &str = "id,census_geoid_14\n\
ocd-division/country:us/state:ca/sldl:1,sldl-06001\n\
ocd-division/country:us/state:ca/sldl:shadowed,sldu-06001\n";

/// A legislative district feature as found in TIGER/Line derived GeoJSON
pub fn district(mtfcc: &str, geoid: &str, statefp: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "STATEFP": statefp,
            "GEOID": geoid,
            "NAMELSAD": format!("District {}", geoid),
            "MTFCC": mtfcc,
            "ALAND": 1234567
        },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[-122.5, 37.5], [-122.0, 37.5], [-122.0, 38.0], [-122.5, 37.5]]]
        }
    })
}

/// Write the reference tables and a collection of `features`; returns a
/// config pointing at them with progress output disabled
pub fn create_fixture(temp_dir: &TempDir, features: &[Value]) -> JoinConfig {
    let data = temp_dir.path().join("data");
    fs::create_dir_all(&data).unwrap();

    fs::write(data.join("sldu-ocdid.csv"), SLDU_CSV).unwrap();
    fs::write(data.join("sldl-ocdid.csv"), SLDL_CSV).unwrap();

    let collection = json!({"type": "FeatureCollection", "features": features});
    fs::write(
        data.join("sld.geojson"),
        serde_json::to_string_pretty(&collection).unwrap(),
    )
    .unwrap();

    JoinConfig::default()
        .with_geojson_path(data.join("sld.geojson"))
        .with_sldu_csv_path(data.join("sldu-ocdid.csv"))
        .with_sldl_csv_path(data.join("sldl-ocdid.csv"))
        .with_output_path(temp_dir.path().join("out").join("sld-with-ocdid.geojson"))
        .with_channel_capacity(2)
        .without_progress()
}

/// Parse an output file back into JSON
pub fn read_output(path: &Path) -> Value {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}
