//! Channel mix: goals grouped by effective platform, one aggregate per group.

use std::collections::BTreeMap;

use cm_algo::{primary_driver_with, total_impressions, weighted_mean};
use cm_core::variables::PillarThresholds;
use cm_core::{Goal, Pillar, Platform, RateMetric};

/// One platform row of the channel mix.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelAggregate {
    pub platform: Platform,
    pub goal_count: usize,
    pub impressions: u64,
    pub spend: f64,
    /// `None` when the group has no impressions.
    pub authentic_ad_rate: Option<f64>,
    pub block_rate: Option<f64>,
    pub driver: Option<Pillar>,
}

/// Group goals by effective platform and aggregate each group.
///
/// Ordered by impressions descending; equal impressions keep platform
/// declaration order. Goals with no platform at all are left out.
pub fn channel_mix(goals: &[Goal], thresholds: &PillarThresholds) -> Vec<ChannelAggregate> {
    let mut groups: BTreeMap<Platform, Vec<&Goal>> = BTreeMap::new();
    for g in goals {
        match g.effective_platform() {
            Some(p) => groups.entry(p).or_default().push(g),
            None => tracing::debug!(goal = %g.id, "goal has no platform; left out of channel mix"),
        }
    }

    let mut out: Vec<ChannelAggregate> = groups
        .into_iter()
        .map(|(platform, members)| aggregate(platform, &members, thresholds))
        .collect();
    out.sort_by(|a, b| b.impressions.cmp(&a.impressions));
    out
}

fn aggregate(platform: Platform, members: &[&Goal], thresholds: &PillarThresholds) -> ChannelAggregate {
    let impressions = total_impressions(members);
    let authentic_ad_rate = weighted_mean(members, RateMetric::AuthenticAdRate).ok();
    let block_rate = weighted_mean(members, RateMetric::BlockRate).ok();
    if authentic_ad_rate.is_none() {
        tracing::debug!(platform = %platform, "channel has zero impressions; rates undefined");
    }
    ChannelAggregate {
        platform,
        goal_count: members.len(),
        impressions,
        spend: members.iter().map(|g| g.metrics.total_spend).sum(),
        authentic_ad_rate,
        block_rate,
        driver: primary_driver_with(members, thresholds),
    }
}
