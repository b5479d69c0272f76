//! Push-style FeatureCollection parser
//!
//! Only the `features` array is materialized, and only one element at a time.
//! Every other top-level member is skipped with [`IgnoredAny`].

use crate::app::models::Feature;
use crate::error::{Error, Result};
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Whether the sink wants more features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Stop,
}

/// Outcome of a completed or stopped read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadSummary {
    pub features: usize,
    pub stopped_early: bool,
    pub had_features_member: bool,
}

/// Reads one FeatureCollection from a byte source
pub struct FeatureReader<R> {
    reader: R,
    path: PathBuf,
}

impl<R: Read> FeatureReader<R> {
    /// `path` is used only to label errors and logs
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
        }
    }

    /// Parse the collection, calling `sink` for each feature in document order
    ///
    /// Returns early, without error, if the sink answers [`SinkControl::Stop`].
    ///
    /// # Errors
    /// * `Error::FeatureParsing` if the input is not a well-formed JSON object
    ///   with an array `features` member, or has trailing data
    pub fn read_features<F>(self, mut sink: F) -> Result<ReadSummary>
    where
        F: FnMut(Feature) -> SinkControl,
    {
        let mut deserializer = serde_json::Deserializer::from_reader(self.reader);
        let mut state = SinkState {
            sink: &mut sink,
            summary: ReadSummary::default(),
        };

        let parsed = CollectionSeed { state: &mut state }.deserialize(&mut deserializer);
        let summary = state.summary;

        match parsed {
            Ok(()) => {}
            Err(_) if summary.stopped_early => {
                debug!(
                    "Feature sink stopped after {} features of {}",
                    summary.features,
                    self.path.display()
                );
                return Ok(summary);
            }
            Err(e) => {
                return Err(Error::feature_parsing(
                    &self.path,
                    format!("Malformed FeatureCollection after {} features", summary.features),
                    e,
                ));
            }
        }

        deserializer.end().map_err(|e| {
            Error::feature_parsing(&self.path, "Unexpected data after FeatureCollection", e)
        })?;

        if !summary.had_features_member {
            warn!(
                "{} has no 'features' member; treating it as empty",
                self.path.display()
            );
        }

        Ok(summary)
    }
}

struct SinkState<'s, F> {
    sink: &'s mut F,
    summary: ReadSummary,
}

/// Visits the top-level collection object
struct CollectionSeed<'a, 's, F> {
    state: &'a mut SinkState<'s, F>,
}

impl<'de, F> DeserializeSeed<'de> for CollectionSeed<'_, '_, F>
where
    F: FnMut(Feature) -> SinkControl,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, F> Visitor<'de> for CollectionSeed<'_, '_, F>
where
    F: FnMut(Feature) -> SinkControl,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a GeoJSON FeatureCollection object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let state = self.state;
        while let Some(key) = map.next_key::<String>()? {
            if key == "features" {
                if state.summary.had_features_member {
                    return Err(de::Error::duplicate_field("features"));
                }
                state.summary.had_features_member = true;
                map.next_value_seed(FeaturesSeed { state: &mut *state })?;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(())
    }
}

/// Visits the `features` array, forwarding each element to the sink
struct FeaturesSeed<'a, 's, F> {
    state: &'a mut SinkState<'s, F>,
}

impl<'de, F> DeserializeSeed<'de> for FeaturesSeed<'_, '_, F>
where
    F: FnMut(Feature) -> SinkControl,
{
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F> Visitor<'de> for FeaturesSeed<'_, '_, F>
where
    F: FnMut(Feature) -> SinkControl,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of GeoJSON features")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let state = self.state;
        while let Some(feature) = seq.next_element::<Feature>()? {
            state.summary.features += 1;
            if (state.sink)(feature) == SinkControl::Stop {
                state.summary.stopped_early = true;
                return Err(de::Error::custom("feature sink stopped"));
            }
        }
        Ok(())
    }
}
