//! OCD-ID and state enrichment for district features
//!
//! Replaces each feature's properties with `{ ocdid, type, state }`. The
//! identifier comes from the upper chamber table when the composite key is
//! there, otherwise from the lower chamber table, otherwise it is null. The
//! state abbreviation must always resolve; an unknown FIPS code is fatal.

use crate::app::models::{
    DistrictType, EnrichedProperties, EnrichmentOutcome, Feature, MatchSource,
};
use crate::app::services::reference_table::DistrictReferences;
use crate::app::states::{self, StateInfo};
use crate::constants::properties::{GEOID, MTFCC, STATEFP};
use crate::error::{Error, Result};
use tracing::trace;

/// Joins features against the chamber reference tables
#[derive(Debug, Clone, Copy)]
pub struct Enricher<'a> {
    references: &'a DistrictReferences,
    upper_chamber_code: &'a str,
}

impl<'a> Enricher<'a> {
    pub fn new(references: &'a DistrictReferences, upper_chamber_code: &'a str) -> Self {
        Self {
            references,
            upper_chamber_code,
        }
    }

    /// Enrich one feature, consuming it and returning the rewritten feature
    ///
    /// `feature_index` is the zero-based position in the input and is only
    /// used in error messages.
    ///
    /// # Errors
    /// * `Error::MissingProperty` if `properties` or `STATEFP` is absent, or
    ///   `GEOID` is absent or null
    /// * `Error::StateNotFound` if `STATEFP` names no known state or territory
    pub fn enrich(
        &self,
        mut feature: Feature,
        feature_index: usize,
    ) -> Result<(Feature, EnrichmentOutcome)> {
        let (properties, match_source) = self.properties_for(&feature, feature_index)?;
        feature.replace_properties(&properties);

        let outcome = EnrichmentOutcome {
            district_type: properties.district_type,
            match_source,
            state: properties.state,
        };
        Ok((feature, outcome))
    }

    /// Compute the replacement property set without touching the feature
    pub fn properties_for(
        &self,
        feature: &Feature,
        feature_index: usize,
    ) -> Result<(EnrichedProperties, MatchSource)> {
        if feature.properties().is_none() {
            return Err(Error::missing_property("properties", feature_index));
        }

        let district_type =
            DistrictType::from_mtfcc(feature.property_str(MTFCC), self.upper_chamber_code);
        let geoid = feature
            .property_text(GEOID)
            .ok_or_else(|| Error::missing_property(GEOID, feature_index))?;
        let key = district_type.composite_key(&geoid);

        let (match_source, ocdid) = match self.references.lookup(&key) {
            Some((source, id)) => (source, Some(id.to_string())),
            None => (MatchSource::Unmatched, None),
        };

        let fips = feature
            .property_str(STATEFP)
            .ok_or_else(|| Error::missing_property(STATEFP, feature_index))?;
        let state = resolve_state(fips, feature_index)?;

        trace!(
            "Feature #{} key {} -> {:?} ({:?}), state {}",
            feature_index,
            key,
            ocdid,
            match_source,
            state.abbr
        );

        Ok((
            EnrichedProperties {
                ocdid,
                district_type,
                state: state.postal_code(),
            },
            match_source,
        ))
    }
}

/// Find the single state or territory with the given FIPS code
pub fn resolve_state(fips: &str, feature_index: usize) -> Result<&'static StateInfo> {
    states::find_by_fips(fips).ok_or_else(|| Error::state_not_found(fips, feature_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::reference_table::{ReferenceRow, ReferenceTable};
    use crate::constants::UPPER_CHAMBER_MTFCC;
    use serde_json::{Value, json};

    fn table(rows: &[(&str, &str)]) -> ReferenceTable {
        let mut table =
            ReferenceTable::new("test.csv", vec!["census_geoid_14".into(), "id".into()]);
        for (key, id) in rows {
            table.push_row(ReferenceRow {
                census_geoid_14: key.to_string(),
                id: id.to_string(),
                values: vec![key.to_string(), id.to_string()],
            });
        }
        table
    }

    fn references() -> DistrictReferences {
        DistrictReferences::new(
            table(&[
                ("sldu-06001", "ocd-division/country:us/state:ca/sldu:1"),
                ("sldl-06005", "ocd-division/country:us/state:ca/sldu:shadow"),
            ]),
            table(&[
                ("sldl-06001", "ocd-division/country:us/state:ca/sldl:1"),
                ("sldl-06005", "ocd-division/country:us/state:ca/sldl:5"),
            ]),
        )
    }

    fn feature(properties: Value) -> Feature {
        serde_json::from_value(json!({
            "type": "Feature",
            "properties": properties,
            "geometry": {"type": "Point", "coordinates": [-122.27, 37.8]}
        }))
        .unwrap()
    }

    fn enriched_properties(feature: &Feature) -> &Value {
        feature.member("properties").unwrap()
    }

    #[test]
    fn test_upper_chamber_feature() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (out, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "G5210", "GEOID": "06001", "STATEFP": "06"})),
                0,
            )
            .unwrap();

        assert_eq!(
            enriched_properties(&out),
            &json!({
                "ocdid": "ocd-division/country:us/state:ca/sldu:1",
                "type": "sldu",
                "state": "ca"
            })
        );
        assert_eq!(outcome.match_source, MatchSource::Upper);
        assert_eq!(outcome.district_type, DistrictType::Sldu);
    }

    #[test]
    fn test_lower_chamber_feature() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (out, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "G5220", "GEOID": "06001", "STATEFP": "06"})),
                0,
            )
            .unwrap();

        assert_eq!(
            enriched_properties(&out)["ocdid"],
            json!("ocd-division/country:us/state:ca/sldl:1")
        );
        assert_eq!(enriched_properties(&out)["type"], json!("sldl"));
        assert_eq!(outcome.match_source, MatchSource::Lower);
    }

    #[test]
    fn test_upper_table_wins_over_lower() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (out, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "G5220", "GEOID": "06005", "STATEFP": "06"})),
                0,
            )
            .unwrap();

        assert_eq!(
            enriched_properties(&out)["ocdid"],
            json!("ocd-division/country:us/state:ca/sldu:shadow")
        );
        assert_eq!(outcome.match_source, MatchSource::Upper);
    }

    #[test]
    fn test_unmatched_feature_has_null_ocdid() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (out, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "G5210", "GEOID": "48150", "STATEFP": "48"})),
                0,
            )
            .unwrap();

        assert_eq!(
            enriched_properties(&out),
            &json!({"ocdid": null, "type": "sldu", "state": "tx"})
        );
        assert_eq!(outcome.match_source, MatchSource::Unmatched);
    }

    #[test]
    fn test_original_properties_do_not_leak() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (out, _) = enricher
            .enrich(
                feature(json!({
                    "MTFCC": "G5210", "GEOID": "06001", "STATEFP": "06",
                    "NAMELSAD": "State Senate District 1", "ALAND": 123456
                })),
                0,
            )
            .unwrap();

        let properties = enriched_properties(&out).as_object().unwrap();
        let mut keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["ocdid", "state", "type"]);
        assert_eq!(
            out.geometry().unwrap(),
            &json!({"type": "Point", "coordinates": [-122.27, 37.8]})
        );
    }

    #[test]
    fn test_missing_mtfcc_is_lower_chamber() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (_, outcome) = enricher
            .enrich(feature(json!({"GEOID": "06001", "STATEFP": "06"})), 0)
            .unwrap();

        assert_eq!(outcome.district_type, DistrictType::Sldl);
        assert_eq!(outcome.match_source, MatchSource::Lower);
    }

    #[test]
    fn test_unknown_fips_is_fatal() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let result = enricher.enrich(
            feature(json!({"MTFCC": "G5210", "GEOID": "99001", "STATEFP": "99"})),
            7,
        );

        match result {
            Err(Error::StateNotFound {
                fips,
                feature_index,
            }) => {
                assert_eq!(fips, "99");
                assert_eq!(feature_index, 7);
            }
            other => panic!("expected StateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_geoid_is_fatal() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let result = enricher.enrich(feature(json!({"MTFCC": "G5210", "STATEFP": "06"})), 3);
        assert!(matches!(
            result,
            Err(Error::MissingProperty { ref property, feature_index: 3 }) if property == "GEOID"
        ));
    }

    #[test]
    fn test_null_geoid_is_fatal() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let result = enricher.enrich(
            feature(json!({"MTFCC": "G5210", "GEOID": null, "STATEFP": "06"})),
            2,
        );
        assert!(matches!(
            result,
            Err(Error::MissingProperty { ref property, feature_index: 2 }) if property == "GEOID"
        ));
    }

    #[test]
    fn test_numeric_geoid_builds_key_from_its_text() {
        let refs = DistrictReferences::new(
            table(&[("sldu-6001", "ocd-division/country:us/state:ca/sldu:numeric")]),
            table(&[]),
        );
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let (out, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "G5210", "GEOID": 6001, "STATEFP": "06"})),
                0,
            )
            .unwrap();
        assert_eq!(
            enriched_properties(&out)["ocdid"],
            json!("ocd-division/country:us/state:ca/sldu:numeric")
        );
        assert_eq!(outcome.match_source, MatchSource::Upper);

        // Same shape, no row: an ordinary miss rather than an error
        let (out, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "G5220", "GEOID": 48150, "STATEFP": "48"})),
                1,
            )
            .unwrap();
        assert_eq!(
            enriched_properties(&out),
            &json!({"ocdid": null, "type": "sldl", "state": "tx"})
        );
        assert_eq!(outcome.match_source, MatchSource::Unmatched);
    }

    #[test]
    fn test_missing_statefp_is_fatal() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let result = enricher.enrich(feature(json!({"MTFCC": "G5210", "GEOID": "06001"})), 5);
        match result {
            Err(Error::MissingProperty {
                property,
                feature_index,
            }) => {
                assert_eq!(property, "STATEFP");
                assert_eq!(feature_index, 5);
            }
            other => panic!("expected MissingProperty, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_properties_object_is_fatal() {
        let refs = references();
        let enricher = Enricher::new(&refs, UPPER_CHAMBER_MTFCC);

        let bare: Feature = serde_json::from_value(json!({"type": "Feature"})).unwrap();
        assert!(matches!(
            enricher.enrich(bare, 0),
            Err(Error::MissingProperty { .. })
        ));
    }

    #[test]
    fn test_custom_upper_chamber_code() {
        let refs = references();
        let enricher = Enricher::new(&refs, "X0000");

        let (_, outcome) = enricher
            .enrich(
                feature(json!({"MTFCC": "X0000", "GEOID": "06001", "STATEFP": "06"})),
                0,
            )
            .unwrap();
        assert_eq!(outcome.district_type, DistrictType::Sldu);
    }

    #[test]
    fn test_resolve_state() {
        assert_eq!(resolve_state("72", 0).unwrap().postal_code(), "pr");
        assert!(resolve_state("00", 0).is_err());
    }
}
