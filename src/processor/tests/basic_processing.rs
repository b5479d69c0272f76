//! Basic processing integration tests

use super::*;
use crate::processor::JoinProcessor;
use tempfile::TempDir;

#[tokio::test]
async fn test_basic_join_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_fixture(
        &temp_dir,
        &[
            district("G5210", "06001", "06"),
            district("G5220", "06001", "06"),
            district("G5220", "48150", "48"),
        ],
    );
    let output_path = config.output_path.clone();

    let stats = JoinProcessor::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.features_written, 3);
    assert_eq!(stats.matched_upper, 1);
    assert_eq!(stats.matched_lower, 1);
    assert_eq!(stats.unmatched, 1);
    assert_eq!(stats.upper_chamber_features, 1);
    assert_eq!(stats.lower_chamber_features, 2);
    assert_eq!(stats.features_by_state["ca"], 2);
    assert_eq!(stats.features_by_state["tx"], 1);
    assert_eq!(stats.output_path, output_path);
    assert_eq!(
        stats.output_bytes,
        std::fs::metadata(&output_path).unwrap().len()
    );

    let output = read_output(&output_path);
    assert_eq!(output["type"], json!("FeatureCollection"));

    let features = output["features"].as_array().unwrap();
    assert_eq!(
        features[0]["properties"],
        json!({"ocdid": "ocd-division/country:us/state:ca/sldu:1", "type": "sldu", "state": "ca"})
    );
    assert_eq!(
        features[1]["properties"],
        json!({"ocdid": "ocd-division/country:us/state:ca/sldl:1", "type": "sldl", "state": "ca"})
    );
    assert_eq!(
        features[2]["properties"],
        json!({"ocdid": null, "type": "sldl", "state": "tx"})
    );
}

#[tokio::test]
async fn test_geometry_passes_through() {
    let temp_dir = TempDir::new().unwrap();
    let input = district("G5210", "06001", "06");
    let config = create_fixture(&temp_dir, &[input.clone()]);
    let output_path = config.output_path.clone();

    JoinProcessor::new(config).unwrap().run().await.unwrap();

    let output = read_output(&output_path);
    assert_eq!(output["features"][0]["geometry"], input["geometry"]);
    assert_eq!(output["features"][0]["type"], json!("Feature"));
}

#[tokio::test]
async fn test_empty_collection() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_fixture(&temp_dir, &[]);
    let output_path = config.output_path.clone();

    let stats = JoinProcessor::new(config).unwrap().run().await.unwrap();

    assert_eq!(stats.features_written, 0);
    assert_eq!(
        std::fs::read_to_string(&output_path).unwrap(),
        r#"{"type":"FeatureCollection","features":[]}"#
    );
}

#[tokio::test]
async fn test_output_order_matches_input() {
    let temp_dir = TempDir::new().unwrap();
    let inputs: Vec<Value> = (1..=200)
        .map(|i| {
            let mut feature = district("G5220", &format!("06{:03}", i), "06");
            feature["geometry"] = json!({"type": "Point", "coordinates": [i, 0]});
            feature
        })
        .collect();
    let config = create_fixture(&temp_dir, &inputs);
    let output_path = config.output_path.clone();

    let stats = JoinProcessor::new(config).unwrap().run().await.unwrap();
    assert_eq!(stats.features_written, 200);

    let output = read_output(&output_path);
    let features = output["features"].as_array().unwrap();
    assert_eq!(features.len(), 200);

    // Only sldl-06001 has a lower chamber row
    assert_eq!(
        features[0]["properties"]["ocdid"],
        json!("ocd-division/country:us/state:ca/sldl:1")
    );
    assert!(features[1..].iter().all(|f| f["properties"]["ocdid"].is_null()));

    let expected: Vec<Value> = inputs.iter().map(|f| f["geometry"].clone()).collect();
    let actual: Vec<Value> = features.iter().map(|f| f["geometry"].clone()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_every_output_has_exactly_three_properties() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_fixture(
        &temp_dir,
        &[
            district("G5210", "48015", "48"),
            district("G5220", "72001", "72"),
        ],
    );
    let output_path = config.output_path.clone();

    JoinProcessor::new(config).unwrap().run().await.unwrap();

    let output = read_output(&output_path);
    for feature in output["features"].as_array().unwrap() {
        let properties = feature["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 3);
        assert!(properties.contains_key("ocdid"));
        assert!(properties.contains_key("type"));
        assert!(properties.contains_key("state"));
    }
    assert_eq!(output["features"][1]["properties"]["state"], json!("pr"));
}
