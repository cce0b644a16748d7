//! Flatten goal → campaign hierarchies into one row sequence.
//!
//! Order: goal-owned campaigns first (goal order, then campaign order), then
//! the unassigned pool in its original order. Every campaign appears exactly
//! once. Rows borrow the source records.

use cm_core::{Campaign, FlatCampaign, Goal};

use crate::overrides::{AssignmentOverrides, GoalIndex};

/// Flatten with static associations only.
///
/// Pool campaigns carrying a static `goalId` are resolved against `goals`;
/// an id that names no goal falls back to "unassigned".
pub fn flatten<'a>(goals: &'a [Goal], unassigned: &'a [Campaign]) -> Vec<FlatCampaign<'a>> {
    let index = GoalIndex::new(goals);
    let total = goals.iter().map(|g| g.campaigns.len()).sum::<usize>() + unassigned.len();
    let mut rows = Vec::with_capacity(total);

    for g in goals {
        rows.extend(g.campaigns.iter().map(|c| FlatCampaign::owned_by(c, g)));
    }
    rows.extend(unassigned.iter().map(|c| pool_row(c, &index)));
    rows
}

/// Flatten, then apply the override table. Overrides take precedence over the
/// static association; an override naming an unknown goal yields an
/// unassigned row.
pub fn flatten_with_overrides<'a>(
    goals: &'a [Goal],
    unassigned: &'a [Campaign],
    overrides: &AssignmentOverrides,
) -> Vec<FlatCampaign<'a>> {
    let mut rows = flatten(goals, unassigned);
    if overrides.is_empty() {
        return rows;
    }
    let index = GoalIndex::new(goals);
    for row in &mut rows {
        if let Some(gid) = overrides.get(row.id()) {
            *row = match index.get(gid) {
                Some(goal) => FlatCampaign::owned_by(row.campaign, goal),
                None => {
                    tracing::warn!(campaign = %row.id(), goal = %gid, "unresolved goal override; treating campaign as unassigned");
                    FlatCampaign::unassigned(row.campaign)
                }
            };
        }
    }
    rows
}

fn pool_row<'a>(c: &'a Campaign, index: &GoalIndex<'a>) -> FlatCampaign<'a> {
    match &c.goal_id {
        None => FlatCampaign::detached(c),
        Some(gid) => match index.get(gid) {
            Some(goal) => FlatCampaign::owned_by(c, goal),
            None => {
                tracing::warn!(campaign = %c.id, goal = %gid, "campaign references unknown goal; treating as unassigned");
                FlatCampaign::unassigned(c)
            }
        },
    }
}
