//! Record builders shared by unit tests.

use cm_core::{
    Campaign, CampaignMetrics, EntityStatus, Goal, GoalMetrics, HealthStatus, MediaType, Platform,
};

pub fn campaign(id: &str) -> Campaign {
    Campaign {
        id: id.parse().unwrap(),
        name: id.to_string(),
        platform: Platform::Meta,
        status: EntityStatus::Active,
        health_status: HealthStatus::OnTrack,
        metrics: CampaignMetrics::default(),
        goal_id: None,
        goal_name: None,
    }
}

pub fn campaign_full(
    id: &str,
    name: &str,
    platform: Platform,
    status: EntityStatus,
    impressions: u64,
    spend: f64,
) -> Campaign {
    Campaign {
        name: name.to_string(),
        platform,
        status,
        metrics: CampaignMetrics {
            impressions,
            spend,
            authentic_ad_rate: 90.0,
            viewability_rate: 70.0,
        },
        ..campaign(id)
    }
}

pub fn goal_with(id: &str, name: &str, campaigns: Vec<Campaign>) -> Goal {
    Goal {
        id: id.parse().unwrap(),
        name: name.to_string(),
        status: EntityStatus::Active,
        health_status: HealthStatus::OnTrack,
        platform: Some(Platform::Meta),
        platforms: vec![Platform::Meta],
        media_type: MediaType::Social,
        metrics: GoalMetrics::default(),
        connected_dsp: None,
        campaigns,
    }
}

/// Goal with pillar-relevant metrics set; everything else default.
pub fn goal_metrics(
    id: &str,
    platform: Platform,
    impressions: u64,
    fraud: f64,
    viewability: f64,
    suitability: f64,
    geo: f64,
) -> Goal {
    Goal {
        platform: Some(platform),
        platforms: vec![platform],
        metrics: GoalMetrics {
            total_impressions: impressions,
            total_spend: impressions as f64 / 100.0,
            authentic_ad_rate: 90.0,
            block_rate: 5.0,
            fraud_rate: fraud,
            viewability_rate: viewability,
            brand_suitability_rate: suitability,
            in_geo_rate: geo,
        },
        ..goal_with(id, id, vec![])
    }
}
