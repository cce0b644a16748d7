use std::path::PathBuf;

use cm_core::{DisplayBands, Params};
use cm_io::loader::load_dataset;
use cm_pipeline::{build_dashboard, AssignmentOverrides, View, ViewQuery};
use cm_report::{build_report_model, render_report_json, render_report_text};

fn dataset() -> cm_io::loader::LoadedDataset {
    let p = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/dataset.json");
    load_dataset(&p).expect("fixture loads")
}

#[test]
fn text_report_covers_every_section() {
    let loaded = dataset();
    let ds = &loaded.dataset;
    let ov = AssignmentOverrides::from(ds.assignments.clone());
    let view = View { table: ViewQuery::parse("status=active&sort=spend&dir=desc").unwrap(), ..View::default() };
    let d = build_dashboard(&ds.goals, &ds.unassigned_campaigns, &ov, &Params::default(), view);
    let text = render_report_text(&build_report_model(&d, &DisplayBands::default(), Some(&loaded.sha256)));

    for needle in [
        "Overview",
        "1 goal needs attention.",
        "Total Spend   $94K",
        "Impressions   3,500,000",
        "Channel Mix",
        "Viewability (Below threshold)",
        "Fraud (Bot/SIVT traffic)",
        "Initiative Total",
        "Campaigns (status=active&sort=spend&dir=desc)",
        "3 campaigns",
        "CTV Retargeting",
        "Goals",
        "dataset sha256: ",
    ] {
        assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
    }

    // Spend descending among active rows: c1 ($30K), c3 ($15K), c6 ($900).
    let c1 = text.find("Awareness - Feed").unwrap();
    let c3 = text.find("Pre-roll 15s").unwrap();
    let c6 = text.find("Spring Teaser").unwrap();
    assert!(c1 < c3 && c3 < c6);
}

#[test]
fn json_report_links_and_flags() {
    let loaded = dataset();
    let ds = &loaded.dataset;
    let ov = AssignmentOverrides::from(ds.assignments.clone());
    let d = build_dashboard(&ds.goals, &ds.unassigned_campaigns, &ov, &Params::default(), View::default());
    let v = render_report_json(&build_report_model(&d, &DisplayBands::default(), None)).unwrap();

    let channels = v["channels"].as_array().unwrap();
    assert_eq!(channels[0]["platform"], "meta");
    assert_eq!(channels[1]["link"], "/goals?platform=youtube");
    assert_eq!(channels[1]["blockRate"]["warning"], true);
    assert_eq!(channels[1]["driver"], "Viewability");
    assert_eq!(v["initiativeTotal"]["driverLabel"], "All pillars passing");
    assert_eq!(v["initiativeTotal"]["blockRate"]["text"], "6.2%");

    let rows = v["campaigns"]["rows"].as_array().unwrap();
    let c6 = rows.iter().find(|r| r["id"] == "c6").unwrap();
    assert_eq!(c6["link"], "/goals/g3/campaigns/c6");
    assert_eq!(c6["goal"], "CTV Retargeting");
    let c7 = rows.iter().find(|r| r["id"] == "c7").unwrap();
    assert_eq!(c7["impressions"], "—");
    assert_eq!(c7["link"], "/goals/g2/campaigns/c7");
}
