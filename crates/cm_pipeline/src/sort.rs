//! Comparator sort over campaign rows, plus the header-click toggle rule.
//!
//! Strings compare case-insensitively, numbers numerically (rates under a
//! total order). The sort is stable: rows with equal keys keep their input
//! order, so re-sorting an already sorted sequence with the same key and
//! direction returns it unchanged.

use core::cmp::Ordering;

use cm_core::determinism::{cmp_rate, cmp_text_ci, directed};
use cm_core::{FlatCampaign, Goal, GoalSortKey, SortDirection, SortKey};

use crate::overrides::{resolve_goal_name, AssignmentOverrides, GoalIndex};

/// Active sort column and direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub dir: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, dir: SortDirection) -> Self {
        Self { key, dir }
    }

    /// Same key flips the direction; a different key resets to ascending.
    #[must_use]
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            Self { key, dir: self.dir.flipped() }
        } else {
            Self { key, dir: SortDirection::Asc }
        }
    }
}

/// Ascending comparison of two rows on `key`.
pub fn compare_rows<'a>(
    a: &FlatCampaign<'a>,
    b: &FlatCampaign<'a>,
    key: SortKey,
    overrides: &AssignmentOverrides,
    goals: &GoalIndex<'a>,
) -> Ordering {
    match key {
        SortKey::Name => cmp_text_ci(a.name(), b.name()),
        SortKey::GoalName => cmp_text_ci(
            resolve_goal_name(a, overrides, goals),
            resolve_goal_name(b, overrides, goals),
        ),
        SortKey::AuthenticAdRate => cmp_rate(a.metrics().authentic_ad_rate, b.metrics().authentic_ad_rate),
        SortKey::Impressions => a.metrics().impressions.cmp(&b.metrics().impressions),
        SortKey::Spend => cmp_rate(a.metrics().spend, b.metrics().spend),
        SortKey::ViewabilityRate => cmp_rate(a.metrics().viewability_rate, b.metrics().viewability_rate),
    }
}

/// Sorted copy of `rows`. Inputs are untouched.
pub fn sort_rows<'a>(
    rows: &[FlatCampaign<'a>],
    key: SortKey,
    dir: SortDirection,
    overrides: &AssignmentOverrides,
    goals: &GoalIndex<'a>,
) -> Vec<FlatCampaign<'a>> {
    let mut out = rows.to_vec();
    let desc = dir == SortDirection::Desc;
    out.sort_by(|a, b| directed(compare_rows(a, b, key, overrides, goals), desc));
    out
}

/// Ascending comparison of two goals on a goal list column.
pub fn compare_goals(a: &Goal, b: &Goal, key: GoalSortKey) -> Ordering {
    match key {
        GoalSortKey::Name => cmp_text_ci(&a.name, &b.name),
        GoalSortKey::TotalSpend => cmp_rate(a.metrics.total_spend, b.metrics.total_spend),
        GoalSortKey::AuthenticAdRate => cmp_rate(a.metrics.authentic_ad_rate, b.metrics.authentic_ad_rate),
        GoalSortKey::BlockRate => cmp_rate(a.metrics.block_rate, b.metrics.block_rate),
    }
}

/// Stable sort of a goal list on `key`.
pub fn sort_goals<'a>(goals: &[&'a Goal], key: GoalSortKey, dir: SortDirection) -> Vec<&'a Goal> {
    let mut out = goals.to_vec();
    let desc = dir == SortDirection::Desc;
    out.sort_by(|a, b| directed(compare_goals(a, b, key), desc));
    out
}
