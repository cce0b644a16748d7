//! Conjunctive filters over campaign rows and goals.
//!
//! Each clause is a `Selector`: `All` is a no-op, `Only(v)` keeps exact
//! matches. Clauses combine with AND. An empty result is a valid result.

use std::collections::BTreeSet;

use cm_core::{EntityStatus, FlatCampaign, Goal, HealthStatus, Platform, Selector};

// ---------------- Campaign rows -----------------------------------------------------------------

/// Filter clauses for the campaign table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CampaignFilter {
    pub status: Selector<EntityStatus>,
    pub platform: Selector<Platform>,
}

impl CampaignFilter {
    pub fn matches(&self, row: &FlatCampaign<'_>) -> bool {
        self.status.matches(&row.status()) && self.platform.matches(&row.platform())
    }

    pub fn is_noop(&self) -> bool {
        self.status.is_all() && self.platform.is_all()
    }
}

/// Rows satisfying every clause, in input order.
pub fn filter_rows<'a>(rows: &[FlatCampaign<'a>], clauses: &CampaignFilter) -> Vec<FlatCampaign<'a>> {
    rows.iter().copied().filter(|r| clauses.matches(r)).collect()
}

// ---------------- Goals -------------------------------------------------------------------------

/// Filter clauses for the goal list: health status and effective platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoalFilter {
    pub health: Selector<HealthStatus>,
    pub platform: Selector<Platform>,
}

impl GoalFilter {
    pub fn matches(&self, goal: &Goal) -> bool {
        if !self.health.matches(&goal.health_status) {
            return false;
        }
        match self.platform {
            Selector::All => true,
            Selector::Only(p) => goal.effective_platform() == Some(p),
        }
    }
}

pub fn filter_goals<'a>(goals: &'a [Goal], clauses: &GoalFilter) -> Vec<&'a Goal> {
    goals.iter().filter(|g| clauses.matches(g)).collect()
}

/// Distinct effective platforms, first-seen order. Goals without one are skipped.
pub fn available_platforms(goals: &[Goal]) -> Vec<Platform> {
    let mut seen = BTreeSet::new();
    goals
        .iter()
        .filter_map(Goal::effective_platform)
        .filter(|p| seen.insert(*p))
        .collect()
}

/// Number of goals whose effective platform is `platform`.
pub fn platform_count(goals: &[Goal], platform: Platform) -> usize {
    goals.iter().filter(|g| g.effective_platform() == Some(platform)).count()
}

/// Per-health-status goal counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCounts {
    pub on_track: usize,
    pub at_risk: usize,
    pub needs_attention: usize,
}

impl HealthCounts {
    pub fn get(&self, status: HealthStatus) -> usize {
        match status {
            HealthStatus::OnTrack => self.on_track,
            HealthStatus::AtRisk => self.at_risk,
            HealthStatus::NeedsAttention => self.needs_attention,
        }
    }

    pub fn total(&self) -> usize {
        self.on_track + self.at_risk + self.needs_attention
    }
}

pub fn health_counts(goals: &[Goal]) -> HealthCounts {
    let mut c = HealthCounts::default();
    for g in goals {
        match g.health_status {
            HealthStatus::OnTrack => c.on_track += 1,
            HealthStatus::AtRisk => c.at_risk += 1,
            HealthStatus::NeedsAttention => c.needs_attention += 1,
        }
    }
    c
}
