//! Portfolio overview: totals, overall weighted rates, overall driver, goal
//! counts and the insight sentences shown above the dashboard.

use std::collections::BTreeSet;

use cm_algo::{primary_driver_with, total_impressions, weighted_mean};
use cm_core::variables::PillarThresholds;
use cm_core::{EntityStatus, Goal, HealthStatus, Pillar, RateMetric};

#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioOverview {
    pub goal_count: usize,
    pub total_impressions: u64,
    pub total_spend: f64,
    pub authentic_ad_rate: Option<f64>,
    pub block_rate: Option<f64>,
    pub driver: Option<Pillar>,
    pub needs_attention: usize,
    pub at_risk: usize,
    pub active: usize,
    /// Distinct platforms across every goal's `platforms` list.
    pub platform_count: usize,
    /// Spend figures are only meaningful when at least one goal has a connected DSP.
    pub has_any_dsp: bool,
    pub insights: Vec<String>,
}

pub fn overview(goals: &[Goal], thresholds: &PillarThresholds) -> PortfolioOverview {
    let refs: Vec<&Goal> = goals.iter().collect();
    let count = |h: HealthStatus| goals.iter().filter(|g| g.health_status == h).count();

    let needs_attention = count(HealthStatus::NeedsAttention);
    let at_risk = count(HealthStatus::AtRisk);
    let active = goals.iter().filter(|g| g.status == EntityStatus::Active).count();
    let platform_count = goals
        .iter()
        .flat_map(|g| g.platforms.iter().copied())
        .collect::<BTreeSet<_>>()
        .len();

    PortfolioOverview {
        goal_count: goals.len(),
        total_impressions: total_impressions(&refs),
        total_spend: goals.iter().map(|g| g.metrics.total_spend).sum(),
        authentic_ad_rate: weighted_mean(&refs, RateMetric::AuthenticAdRate).ok(),
        block_rate: weighted_mean(&refs, RateMetric::BlockRate).ok(),
        driver: primary_driver_with(&refs, thresholds),
        needs_attention,
        at_risk,
        active,
        platform_count,
        has_any_dsp: goals.iter().any(Goal::has_connected_dsp),
        insights: insights(needs_attention, at_risk, active, platform_count),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Insight sentences, in display order.
pub fn insights(needs_attention: usize, at_risk: usize, active: usize, platforms: usize) -> Vec<String> {
    let mut out = Vec::new();
    if needs_attention > 0 {
        let verb = if needs_attention == 1 { "needs" } else { "need" };
        out.push(format!("{needs_attention} goal{} {verb} attention.", plural(needs_attention)));
    }
    if at_risk > 0 {
        let tail = if at_risk == 1 { " is" } else { "s are" };
        out.push(format!("{at_risk} goal{tail} at risk."));
    }
    if active > 0 {
        out.push(format!(
            "You have {active} active goal{} running across {platforms} platforms.",
            plural(active)
        ));
    }
    if needs_attention == 0 && at_risk == 0 {
        out.push("All goals on track.".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::goal_metrics;
    use cm_core::Platform;

    #[test]
    fn totals_rates_and_counts() {
        let mut a = goal_metrics("a", Platform::Meta, 1000, 1.0, 60.0, 99.0, 99.0);
        a.metrics.block_rate = 4.0;
        a.platforms = vec![Platform::Meta, Platform::TikTok];
        a.health_status = HealthStatus::NeedsAttention;
        let mut b = goal_metrics("b", Platform::YouTube, 1000, 1.0, 90.0, 99.0, 99.0);
        b.metrics.block_rate = 12.0;
        b.status = EntityStatus::Paused;
        b.connected_dsp = Some("DV360".into());
        let goals = vec![a, b];

        let o = overview(&goals, &PillarThresholds::default());
        assert_eq!(o.total_impressions, 2000);
        assert_eq!(o.block_rate, Some(8.0));
        assert_eq!(o.driver, None);
        assert_eq!(o.needs_attention, 1);
        assert_eq!(o.active, 1);
        assert_eq!(o.platform_count, 3);
        assert!(o.has_any_dsp);
        assert_eq!(
            o.insights,
            vec![
                "1 goal needs attention.".to_string(),
                "You have 1 active goal running across 3 platforms.".to_string(),
            ]
        );
    }

    #[test]
    fn empty_portfolio_is_undefined_not_nan() {
        let o = overview(&[], &PillarThresholds::default());
        assert_eq!(o.total_impressions, 0);
        assert_eq!(o.authentic_ad_rate, None);
        assert_eq!(o.block_rate, None);
        assert_eq!(o.driver, None);
        assert_eq!(o.insights, vec!["All goals on track.".to_string()]);
    }

    #[test]
    fn insight_pluralization() {
        assert_eq!(
            insights(2, 3, 5, 4),
            vec![
                "2 goals need attention.".to_string(),
                "3 goals are at risk.".to_string(),
                "You have 5 active goals running across 4 platforms.".to_string(),
            ]
        );
        assert_eq!(insights(0, 1, 0, 0), vec!["1 goal is at risk.".to_string()]);
    }
}
