//! Override side-table and goal lookup.
//!
//! `AssignmentOverrides` maps campaign id → goal id and is layered over the
//! immutable base records: it changes how a campaign is *resolved*, never the
//! `Campaign` or `Goal` values themselves.

use std::collections::BTreeMap;

use cm_core::{CampaignId, FlatCampaign, Goal, GoalId};

/// Caller-owned campaign → goal assignment table.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssignmentOverrides(BTreeMap<CampaignId, GoalId>);

impl AssignmentOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign (or re-assign) a campaign. Returns the previous goal, if any.
    pub fn assign(&mut self, campaign: CampaignId, goal: GoalId) -> Option<GoalId> {
        self.0.insert(campaign, goal)
    }

    pub fn get(&self, campaign: &CampaignId) -> Option<&GoalId> {
        self.0.get(campaign)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CampaignId, &GoalId)> {
        self.0.iter()
    }
}

impl From<BTreeMap<CampaignId, GoalId>> for AssignmentOverrides {
    fn from(m: BTreeMap<CampaignId, GoalId>) -> Self {
        Self(m)
    }
}

impl FromIterator<(CampaignId, GoalId)> for AssignmentOverrides {
    fn from_iter<I: IntoIterator<Item = (CampaignId, GoalId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Id → goal lookup over a borrowed goal list. First occurrence wins.
#[derive(Clone, Debug, Default)]
pub struct GoalIndex<'a> {
    by_id: BTreeMap<&'a GoalId, &'a Goal>,
}

impl<'a> GoalIndex<'a> {
    pub fn new(goals: &'a [Goal]) -> Self {
        let mut by_id = BTreeMap::new();
        for g in goals {
            by_id.entry(&g.id).or_insert(g);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &GoalId) -> Option<&'a Goal> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &GoalId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Goal name shown (and sorted on) for a row: override → static name → "".
///
/// An override naming an unknown goal resolves to "" rather than falling back
/// to the static name.
pub fn resolve_goal_name<'a>(
    row: &FlatCampaign<'a>,
    overrides: &AssignmentOverrides,
    goals: &GoalIndex<'a>,
) -> &'a str {
    match overrides.get(row.id()) {
        Some(gid) => goals.get(gid).map(|g| g.name.as_str()).unwrap_or(""),
        None => row.goal_name.unwrap_or(""),
    }
}

/// Goal a row routes to when opened: override id, else the row's own goal id.
/// `None` means the campaign opens standalone, including when the override
/// names a goal missing from `goals`.
pub fn effective_goal_id<'a>(
    row: &FlatCampaign<'a>,
    overrides: &AssignmentOverrides,
    goals: &GoalIndex<'a>,
) -> Option<&'a GoalId> {
    match overrides.get(row.id()) {
        Some(gid) => match goals.get(gid) {
            Some(goal) => Some(&goal.id),
            None => {
                tracing::warn!(campaign = %row.id(), goal = %gid, "unresolved goal override; routing campaign as unassigned");
                None
            }
        },
        None => row.goal_id,
    }
}
