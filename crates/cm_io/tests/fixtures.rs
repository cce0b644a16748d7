use std::path::PathBuf;

use assert_json_diff::assert_json_include;
use cm_io::canonical_json::write_canonical_file;
use cm_io::hasher::sha256_file;
use cm_io::loader::{load_dataset, load_params, read_json_value_with_limits};
use cm_io::IoError;
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures").join(name)
}

#[test]
fn dataset_fixture_loads_in_source_order() {
    let loaded = load_dataset(&fixture("dataset.json")).expect("fixture loads");
    let ds = &loaded.dataset;

    let goal_ids: Vec<&str> = ds.goals.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(goal_ids, ["g1", "g2", "g3"]);
    assert_eq!(ds.campaign_count(), 7);
    assert_eq!(ds.unassigned_campaigns[1].goal_id.as_ref().map(|g| g.as_str()), Some("g2"));
    assert_eq!(ds.new_goal.as_ref().map(|g| g.id.as_str()), Some("g4"));
    assert_eq!(loaded.sha256.len(), 64);
}

#[test]
fn reserialized_dataset_keeps_wire_shape() {
    let loaded = load_dataset(&fixture("dataset.json")).expect("fixture loads");
    let actual = serde_json::to_value(&loaded.dataset).expect("serialize");
    assert_json_include!(
        actual: actual,
        expected: json!({
            "goals": [
                { "id": "g1", "healthStatus": "on-track", "platforms": ["meta", "tiktok"], "connectedDsp": "The Trade Desk" },
                { "id": "g2", "healthStatus": "needs-attention", "mediaType": "video" }
            ],
            "unassignedCampaigns": [{ "id": "c6", "platform": "meta" }],
            "assignments": { "c6": "g3" }
        })
    );
}

#[test]
fn digest_matches_canonical_rewrite() {
    let loaded = load_dataset(&fixture("dataset.json")).expect("fixture loads");
    let raw = read_json_value_with_limits(&fixture("dataset.json")).expect("raw json");

    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("dataset.canonical.json");
    write_canonical_file(&out, &raw).expect("write");
    assert_eq!(sha256_file(&out).expect("hash"), loaded.sha256);

    // The canonical rewrite loads to the same snapshot.
    let again = load_dataset(&out).expect("reload");
    assert_eq!(again.dataset, loaded.dataset);
}

#[test]
fn params_fixture_carries_overlay() {
    let p = load_params(&fixture("params.json")).expect("params load");
    let ov = p.overlay.expect("overlay present");
    assert_eq!(ov.connected_dsp.as_deref(), Some("DV360"));
    assert_eq!(ov.name.as_deref(), Some("Summer Launch"));
    assert_eq!(p.thresholds.viewability, 70.0);
}

#[test]
fn out_of_range_params_are_rejected() {
    match load_params(&fixture("params_bad.json")) {
        Err(IoError::Invalid(msg)) => {
            assert!(msg.contains("thresholds.viewability"), "{msg}");
            assert!(msg.contains("bands.aarFair > bands.aarGood"), "{msg}");
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn missing_file_is_a_path_error() {
    let err = load_dataset(&fixture("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, IoError::Path(_)));
}
