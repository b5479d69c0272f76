//! Core data structures for the district join
//!
//! Defines the GeoJSON feature wrapper, the district type derived from a
//! feature's class code, the replacement property set, and run statistics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Legislative chamber a district belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistrictType {
    /// State legislative district, upper chamber
    Sldu,
    /// State legislative district, lower chamber
    Sldl,
}

impl DistrictType {
    /// Classify a feature by its MTFCC; anything other than the upper code is lower
    pub fn from_mtfcc(mtfcc: Option<&str>, upper_chamber_code: &str) -> Self {
        match mtfcc {
            Some(code) if code == upper_chamber_code => DistrictType::Sldu,
            _ => DistrictType::Sldl,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistrictType::Sldu => "sldu",
            DistrictType::Sldl => "sldl",
        }
    }

    /// Build the `{type}-{GEOID}` key used by the reference tables
    pub fn composite_key(&self, geoid: &str) -> String {
        format!("{}-{}", self.as_str(), geoid)
    }
}

impl fmt::Display for DistrictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single GeoJSON feature with its members kept in source order
///
/// Only `properties` is ever interpreted; geometry, `id`, `bbox` and any
/// foreign members are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(Map<String, Value>);

impl Feature {
    /// The feature's `properties` object, if it is one
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    /// A string-valued property
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.properties()
            .and_then(|properties| properties.get(name))
            .and_then(Value::as_str)
    }

    /// A scalar property in its text form: strings as-is, numbers and
    /// booleans as written in JSON. Null, arrays and objects yield `None`.
    pub fn property_text(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.properties()?.get(name)? {
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            Value::Number(number) => Some(Cow::Owned(number.to_string())),
            Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn geometry(&self) -> Option<&Value> {
        self.0.get("geometry")
    }

    pub fn member(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Replace the whole property set, keeping the member's position
    pub fn replace_properties(&mut self, properties: &EnrichedProperties) {
        let value = properties.to_value();
        match self.0.get_mut("properties") {
            Some(slot) => *slot = value,
            None => {
                self.0.insert("properties".to_string(), value);
            }
        }
    }
}

/// The property set written for every output feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedProperties {
    pub ocdid: Option<String>,
    #[serde(rename = "type")]
    pub district_type: DistrictType,
    pub state: String,
}

impl EnrichedProperties {
    fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(3);
        map.insert(
            "ocdid".to_string(),
            self.ocdid
                .as_ref()
                .map_or(Value::Null, |id| Value::String(id.clone())),
        );
        map.insert(
            "type".to_string(),
            Value::String(self.district_type.as_str().to_string()),
        );
        map.insert("state".to_string(), Value::String(self.state.clone()));
        Value::Object(map)
    }
}

/// Which reference table supplied a feature's identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Upper,
    Lower,
    Unmatched,
}

/// Result of enriching one feature
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentOutcome {
    pub district_type: DistrictType,
    pub match_source: MatchSource,
    pub state: String,
}

/// Statistics for one join run
#[derive(Debug, Clone, Default)]
pub struct JoinStats {
    pub features_written: usize,
    pub matched_upper: usize,
    pub matched_lower: usize,
    pub unmatched: usize,
    pub upper_chamber_features: usize,
    pub lower_chamber_features: usize,
    /// Features per lowercase state abbreviation
    pub features_by_state: BTreeMap<String, usize>,
    pub upper_reference_rows: usize,
    pub lower_reference_rows: usize,
    pub duplicate_reference_keys: usize,
    pub output_path: PathBuf,
    pub output_bytes: u64,
    pub processing_time: Duration,
}

impl JoinStats {
    /// Fold a single feature's outcome into the totals
    pub fn record(&mut self, outcome: &EnrichmentOutcome) {
        self.features_written += 1;
        match outcome.match_source {
            MatchSource::Upper => self.matched_upper += 1,
            MatchSource::Lower => self.matched_lower += 1,
            MatchSource::Unmatched => self.unmatched += 1,
        }
        match outcome.district_type {
            DistrictType::Sldu => self.upper_chamber_features += 1,
            DistrictType::Sldl => self.lower_chamber_features += 1,
        }
        *self
            .features_by_state
            .entry(outcome.state.clone())
            .or_insert(0) += 1;
    }

    pub fn matched(&self) -> usize {
        self.matched_upper + self.matched_lower
    }

    /// Share of features that received an identifier, as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.features_written == 0 {
            0.0
        } else {
            self.matched() as f64 / self.features_written as f64 * 100.0
        }
    }
}
