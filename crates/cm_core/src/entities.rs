//! Entities: goals own campaigns; campaigns may point back at a goal.
//!
//! All records are read-only snapshots. The engine derives projections and
//! aggregates from them and never mutates them.

use alloc::string::String;
use alloc::vec::Vec;

use crate::tokens::{CampaignId, GoalId};
use crate::variables::{EntityStatus, HealthStatus, MediaType, Platform, RateMetric};

/// Aggregate delivery + quality metrics of a goal. Rates are percentages (0..=100).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GoalMetrics {
    pub total_impressions: u64,
    pub total_spend: f64,
    pub authentic_ad_rate: f64,
    pub block_rate: f64,
    pub fraud_rate: f64,
    pub viewability_rate: f64,
    pub brand_suitability_rate: f64,
    pub in_geo_rate: f64,
}

impl GoalMetrics {
    pub fn rate(&self, metric: RateMetric) -> f64 {
        match metric {
            RateMetric::AuthenticAdRate => self.authentic_ad_rate,
            RateMetric::BlockRate => self.block_rate,
            RateMetric::FraudRate => self.fraud_rate,
            RateMetric::ViewabilityRate => self.viewability_rate,
            RateMetric::BrandSuitabilityRate => self.brand_suitability_rate,
            RateMetric::InGeoRate => self.in_geo_rate,
        }
    }
}

/// An optimization objective. Owns its campaigns (in display order).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub status: EntityStatus,
    pub health_status: HealthStatus,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub platform: Option<Platform>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub platforms: Vec<Platform>,
    pub media_type: MediaType,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: GoalMetrics,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub connected_dsp: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub campaigns: Vec<Campaign>,
}

impl Goal {
    /// `platform` when set, else the first of `platforms`.
    pub fn effective_platform(&self) -> Option<Platform> {
        self.platform.or_else(|| self.platforms.first().copied())
    }

    /// A non-empty connected DSP label unlocks financial metrics.
    pub fn has_connected_dsp(&self) -> bool {
        self.connected_dsp.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CampaignMetrics {
    pub impressions: u64,
    pub spend: f64,
    pub authentic_ad_rate: f64,
    pub viewability_rate: f64,
}

/// A sub-unit of spend.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub platform: Platform,
    pub status: EntityStatus,
    pub health_status: HealthStatus,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: CampaignMetrics,
    /// Back-reference to the owning goal; absent means "unassigned".
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub goal_id: Option<GoalId>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub goal_name: Option<String>,
}

/// Read-only projection of a campaign with its resolved goal association.
///
/// Borrows the source records, so building, filtering and sorting rows can
/// never alter a `Campaign` or `Goal`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FlatCampaign<'a> {
    pub campaign: &'a Campaign,
    pub goal_id: Option<&'a GoalId>,
    pub goal_name: Option<&'a str>,
}

impl<'a> FlatCampaign<'a> {
    pub fn unassigned(campaign: &'a Campaign) -> Self {
        Self { campaign, goal_id: None, goal_name: None }
    }

    /// No resolved goal, but the campaign's own `goalName` is kept for display
    /// and sorting.
    pub fn detached(campaign: &'a Campaign) -> Self {
        Self { campaign, goal_id: None, goal_name: campaign.goal_name.as_deref() }
    }

    pub fn owned_by(campaign: &'a Campaign, goal: &'a Goal) -> Self {
        Self { campaign, goal_id: Some(&goal.id), goal_name: Some(goal.name.as_str()) }
    }

    pub fn id(&self) -> &'a CampaignId { &self.campaign.id }
    pub fn name(&self) -> &'a str { &self.campaign.name }
    pub fn status(&self) -> EntityStatus { self.campaign.status }
    pub fn platform(&self) -> Platform { self.campaign.platform }
    pub fn metrics(&self) -> &'a CampaignMetrics { &self.campaign.metrics }

    pub fn is_unassigned(&self) -> bool {
        self.goal_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn goal(platform: Option<Platform>, platforms: Vec<Platform>) -> Goal {
        Goal {
            id: "g1".parse().unwrap(),
            name: "Goal".into(),
            status: EntityStatus::Active,
            health_status: HealthStatus::OnTrack,
            platform,
            platforms,
            media_type: MediaType::Social,
            metrics: GoalMetrics::default(),
            connected_dsp: None,
            campaigns: vec![],
        }
    }

    #[test]
    fn effective_platform_prefers_primary() {
        assert_eq!(goal(Some(Platform::Meta), vec![Platform::TikTok]).effective_platform(), Some(Platform::Meta));
        assert_eq!(goal(None, vec![Platform::TikTok, Platform::Meta]).effective_platform(), Some(Platform::TikTok));
        assert_eq!(goal(None, vec![]).effective_platform(), None);
    }

    #[test]
    fn empty_dsp_label_is_not_connected() {
        let mut g = goal(None, vec![]);
        assert!(!g.has_connected_dsp());
        g.connected_dsp = Some(String::new());
        assert!(!g.has_connected_dsp());
        g.connected_dsp = Some("The Trade Desk".into());
        assert!(g.has_connected_dsp());
    }

    #[test]
    fn goal_metric_lookup_is_exhaustive() {
        let m = GoalMetrics { fraud_rate: 1.5, in_geo_rate: 97.0, ..GoalMetrics::default() };
        assert_eq!(m.rate(RateMetric::FraudRate), 1.5);
        assert_eq!(m.rate(RateMetric::InGeoRate), 97.0);
    }
}
