//! Report data model + mapper from a built dashboard.
//! Values are pre-formatted strings so both renderers print the same text;
//! nothing here recomputes an aggregate.

use serde::Serialize;

use cm_core::{DisplayBands, Goal, Pillar};
use cm_pipeline::{ChannelAggregate, Dashboard, GoalQuery, HealthCounts, TableRow};

use crate::format::{
    aar_band, block_rate_warning, compact_currency, counted, grouped, nonzero, percent, percent_opt, AarBand,
};

/// Label shown when no pillar is failing.
pub const ALL_PILLARS_PASSING: &str = "All pillars passing";
pub const INITIATIVE_TOTAL: &str = "Initiative Total";
pub const NO_MATCHES: &str = "No campaigns match your filters";

// -------------------- Model root & sections (render order) --------------------

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    pub overview: OverviewBlock,
    pub channels: Vec<ChannelRow>,
    pub initiative_total: ChannelRow,
    pub campaigns: CampaignTable,
    pub goals: GoalListBlock,
    pub integrity: IntegrityBlock,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewBlock {
    pub insights: Vec<String>,
    /// Omitted unless at least one goal has a connected DSP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_spend: Option<String>,
    pub impressions: String,
    pub block_rate: RateCell,
}

/// A formatted rate plus its display flags.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<AarBand>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub warning: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRow {
    pub label: String,
    /// Platform wire token; `None` on the total row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<&'static str>,
    pub goals: String,
    pub impressions: String,
    pub aar: RateCell,
    pub block_rate: RateCell,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<Pillar>,
    pub driver_label: &'static str,
    /// Goal list query this row links to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignTable {
    pub query: String,
    pub count_label: String,
    pub rows: Vec<CampaignRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub id: String,
    pub name: String,
    pub platform: &'static str,
    pub status: &'static str,
    /// Empty when unassigned.
    pub goal: String,
    pub unassigned: bool,
    pub aar: RateCell,
    pub impressions: String,
    pub spend: String,
    pub viewability: String,
    pub link: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalListBlock {
    pub query: String,
    pub platforms: Vec<&'static str>,
    pub counts: HealthCounts,
    pub rows: Vec<GoalRow>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRow {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<&'static str>,
    pub media_type: &'static str,
    pub metric_focus: &'static str,
    pub health: &'static str,
    /// Present only when some goal has a connected DSP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spend: Option<String>,
    pub aar: RateCell,
    pub block_rate: RateCell,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_sha256: Option<String>,
}

// -------------------- Mapping --------------------

/// Map a built dashboard to the report model.
pub fn build_report_model(d: &Dashboard<'_>, bands: &DisplayBands, dataset_sha256: Option<&str>) -> ReportModel {
    let o = &d.overview;
    let overview = OverviewBlock {
        insights: o.insights.clone(),
        total_spend: o.has_any_dsp.then(|| compact_currency(o.total_spend)),
        impressions: grouped(o.total_impressions),
        block_rate: block_cell(o.block_rate, bands),
    };

    let initiative_total = ChannelRow {
        label: INITIATIVE_TOTAL.to_string(),
        platform: None,
        goals: counted(o.goal_count, "goal"),
        impressions: grouped(o.total_impressions),
        aar: aar_cell(o.authentic_ad_rate, bands),
        block_rate: block_cell(o.block_rate, bands),
        driver: o.driver,
        driver_label: driver_label(o.driver),
        link: None,
    };

    let rows: Vec<CampaignRow> = d.rows.iter().map(|r| campaign_row(r, bands)).collect();
    let campaigns = CampaignTable {
        query: d.view.table.to_query_string(),
        count_label: counted(rows.len(), "campaign"),
        empty_message: rows.is_empty().then_some(NO_MATCHES),
        rows,
    };

    let goals = GoalListBlock {
        query: d.view.goals.to_query_string(),
        platforms: d.goal_list.available_platforms.iter().map(|p| p.as_str()).collect(),
        counts: d.goal_list.health_counts,
        rows: d.goal_list.goals.iter().map(|g| goal_row(g, o.has_any_dsp, bands)).collect(),
    };

    ReportModel {
        overview,
        channels: d.channels.iter().map(|c| channel_row(c, bands)).collect(),
        initiative_total,
        campaigns,
        goals,
        integrity: IntegrityBlock { dataset_sha256: dataset_sha256.map(str::to_string) },
    }
}

pub fn driver_label(driver: Option<Pillar>) -> &'static str {
    driver.map_or(ALL_PILLARS_PASSING, Pillar::driver_label)
}

fn aar_cell(rate: Option<f64>, bands: &DisplayBands) -> RateCell {
    RateCell { text: percent_opt(rate), band: Some(aar_band(rate, bands)), warning: false }
}

fn block_cell(rate: Option<f64>, bands: &DisplayBands) -> RateCell {
    RateCell { text: percent_opt(rate), band: None, warning: block_rate_warning(rate, bands) }
}

fn channel_row(c: &ChannelAggregate, bands: &DisplayBands) -> ChannelRow {
    ChannelRow {
        label: c.platform.label().to_string(),
        platform: Some(c.platform.as_str()),
        goals: counted(c.goal_count, "goal"),
        impressions: grouped(c.impressions),
        aar: aar_cell(c.authentic_ad_rate, bands),
        block_rate: block_cell(c.block_rate, bands),
        driver: c.driver,
        driver_label: driver_label(c.driver),
        link: Some(format!("/goals?{}", GoalQuery::for_platform(c.platform))),
    }
}

fn campaign_row(r: &TableRow<'_>, bands: &DisplayBands) -> CampaignRow {
    let m = r.row.metrics();
    let aar = (m.authentic_ad_rate > 0.0).then_some(m.authentic_ad_rate);
    let id = r.row.id().as_str();
    let link = match r.route {
        Some(gid) => format!("/goals/{gid}/campaigns/{id}"),
        None => format!("/campaigns/{id}"),
    };
    CampaignRow {
        id: id.to_string(),
        name: r.row.name().to_string(),
        platform: r.row.platform().label(),
        status: r.row.status().as_str(),
        goal: r.goal_name.to_string(),
        unassigned: r.route.is_none(),
        aar: RateCell { text: percent_opt(aar), band: aar.map(|a| aar_band(Some(a), bands)), warning: false },
        impressions: nonzero(m.impressions, grouped),
        spend: nonzero(m.spend, compact_currency),
        viewability: nonzero(m.viewability_rate, percent),
        link,
    }
}

fn goal_row(g: &Goal, show_spend: bool, bands: &DisplayBands) -> GoalRow {
    let served = g.metrics.total_impressions > 0;
    let aar = served.then_some(g.metrics.authentic_ad_rate);
    let block = served.then_some(g.metrics.block_rate);
    GoalRow {
        id: g.id.to_string(),
        name: g.name.clone(),
        platform: g.effective_platform().map(|p| p.label()),
        media_type: g.media_type.label(),
        metric_focus: g.media_type.metric_focus(),
        health: g.health_status.as_str(),
        spend: show_spend.then(|| compact_currency(g.metrics.total_spend)),
        aar: aar_cell(aar, bands),
        block_rate: block_cell(block, bands),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_core::{Campaign, CampaignMetrics, EntityStatus, GoalMetrics, HealthStatus, MediaType, Params, Platform};
    use cm_pipeline::{build_dashboard, AssignmentOverrides, View};

    fn goal(id: &str, platform: Platform, imps: u64, view: f64, dsp: Option<&str>) -> Goal {
        Goal {
            id: id.parse().unwrap(),
            name: format!("Goal {id}"),
            status: EntityStatus::Active,
            health_status: HealthStatus::OnTrack,
            platform: Some(platform),
            platforms: vec![platform],
            media_type: MediaType::Video,
            metrics: GoalMetrics {
                total_impressions: imps,
                total_spend: 350_000.0,
                authentic_ad_rate: 80.0,
                block_rate: 12.0,
                fraud_rate: 1.0,
                viewability_rate: view,
                brand_suitability_rate: 99.0,
                in_geo_rate: 99.0,
            },
            connected_dsp: dsp.map(str::to_string),
            campaigns: vec![],
        }
    }

    fn orphan(id: &str) -> Campaign {
        Campaign {
            id: id.parse().unwrap(),
            name: "Orphan".into(),
            platform: Platform::Snapchat,
            status: EntityStatus::Draft,
            health_status: HealthStatus::OnTrack,
            metrics: CampaignMetrics::default(),
            goal_id: None,
            goal_name: None,
        }
    }

    #[test]
    fn channel_and_total_rows() {
        let goals = vec![goal("g1", Platform::YouTube, 1000, 50.0, None)];
        let ov = AssignmentOverrides::new();
        let d = build_dashboard(&goals, &[], &ov, &Params::default(), View::default());
        let m = build_report_model(&d, &DisplayBands::default(), Some("ab12"));

        let ch = &m.channels[0];
        assert_eq!(ch.label, "YouTube");
        assert_eq!(ch.goals, "1 goal");
        assert_eq!(ch.aar, RateCell { text: "80.0%".into(), band: Some(AarBand::Fair), warning: false });
        assert!(ch.block_rate.warning);
        assert_eq!(ch.driver_label, "Viewability (Below threshold)");
        assert_eq!(ch.link.as_deref(), Some("/goals?platform=youtube"));

        assert_eq!(m.initiative_total.label, INITIATIVE_TOTAL);
        assert_eq!(m.initiative_total.link, None);
        // No connected DSP anywhere: spend stays hidden.
        assert_eq!(m.overview.total_spend, None);
        assert_eq!(m.integrity.dataset_sha256.as_deref(), Some("ab12"));
    }

    #[test]
    fn spend_shown_with_dsp_and_undefined_rates_dash() {
        let goals = vec![goal("g1", Platform::Ctv, 0, 90.0, Some("DV360"))];
        let ov = AssignmentOverrides::new();
        let d = build_dashboard(&goals, &[], &ov, &Params::default(), View::default());
        let m = build_report_model(&d, &DisplayBands::default(), None);
        assert_eq!(m.overview.total_spend.as_deref(), Some("$350K"));
        assert_eq!(m.overview.block_rate.text, "—");
        assert_eq!(m.initiative_total.aar.band, Some(AarBand::None));
        assert_eq!(m.initiative_total.driver_label, ALL_PILLARS_PASSING);
    }

    #[test]
    fn unassigned_campaign_row_links_standalone() {
        let pool = vec![orphan("c9")];
        let ov = AssignmentOverrides::new();
        let d = build_dashboard(&[], &pool, &ov, &Params::default(), View::default());
        let m = build_report_model(&d, &DisplayBands::default(), None);
        let row = &m.campaigns.rows[0];
        assert!(row.unassigned);
        assert_eq!(row.goal, "");
        assert_eq!(row.link, "/campaigns/c9");
        assert_eq!((row.impressions.as_str(), row.spend.as_str(), row.aar.text.as_str()), ("—", "—", "—"));
        assert_eq!(m.campaigns.count_label, "1 campaign");
        assert_eq!(m.campaigns.empty_message, None);
    }

    #[test]
    fn override_to_missing_goal_renders_unassigned() {
        let goals = vec![goal("g1", Platform::Meta, 1000, 80.0, None)];
        let pool = vec![orphan("c9")];
        let ov: AssignmentOverrides = [("c9".parse().unwrap(), "ghost".parse().unwrap())].into_iter().collect();
        let d = build_dashboard(&goals, &pool, &ov, &Params::default(), View::default());
        let m = build_report_model(&d, &DisplayBands::default(), None);
        let row = &m.campaigns.rows[0];
        assert!(row.unassigned);
        assert_eq!(row.goal, "");
        assert_eq!(row.link, "/campaigns/c9");
    }

    #[test]
    fn goal_rows_carry_block_rate_and_gated_spend() {
        let goals = vec![goal("g1", Platform::YouTube, 1000, 50.0, None), goal("g2", Platform::Ctv, 0, 90.0, None)];
        let ov = AssignmentOverrides::new();
        let d = build_dashboard(&goals, &[], &ov, &Params::default(), View::default());
        let m = build_report_model(&d, &DisplayBands::default(), None);
        let rows = &m.goals.rows;
        assert_eq!(rows[0].block_rate, RateCell { text: "12.0%".into(), band: None, warning: true });
        assert_eq!(rows[0].spend, None);
        assert_eq!(rows[1].block_rate.text, "—");
        assert!(!rows[1].block_rate.warning);

        let goals = vec![goal("g1", Platform::YouTube, 1000, 50.0, Some("DV360")), goal("g2", Platform::Ctv, 0, 90.0, None)];
        let d = build_dashboard(&goals, &[], &ov, &Params::default(), View::default());
        let m = build_report_model(&d, &DisplayBands::default(), None);
        assert_eq!(m.goals.rows[0].spend.as_deref(), Some("$350K"));
        assert_eq!(m.goals.rows[1].spend.as_deref(), Some("$350K"));
    }
}
