//! cm_pipeline — deterministic dashboard surface (load→overlay→flatten→weight/classify→filter→sort)
//! This crate stays I/O-light: file reading, validation and digests go through `cm_io`,
//! weighting and pillar classification through `cm_algo`. Every stage is a pure function
//! of its inputs; callers memoize on the full input tuple if they need to.

#![forbid(unsafe_code)]

use core::fmt;
use std::path::Path;

use cm_core::variables::Params;
use cm_core::{Campaign, CoreError, FlatCampaign, Goal, GoalId, Platform};
use cm_io::loader::{self, Dataset};

pub mod channel;
pub mod filter;
pub mod flatten;
pub mod overlay;
pub mod overrides;
pub mod overview;
pub mod query;
pub mod sort;

#[cfg(test)]
mod test_support;

pub use channel::{channel_mix, ChannelAggregate};
pub use filter::{
    available_platforms, filter_goals, filter_rows, health_counts, platform_count, CampaignFilter, GoalFilter,
    HealthCounts,
};
pub use flatten::{flatten, flatten_with_overrides};
pub use overlay::{apply_overlay, goal_list};
pub use overrides::{effective_goal_id, resolve_goal_name, AssignmentOverrides, GoalIndex};
pub use overview::{insights, overview, PortfolioOverview};
pub use query::{GoalQuery, ViewQuery};
pub use sort::{compare_goals, compare_rows, sort_goals, sort_rows, SortState};

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Reading or writing failed (missing file, size limit, hashing).
    Io(String),
    /// Inputs parsed but violate a domain rule.
    Validate(String),
    /// Caller-supplied view state is malformed (e.g. unknown sort key).
    Contract(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
            PipelineError::Contract(m) => write!(f, "contract: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<cm_io::IoError> for PipelineError {
    fn from(e: cm_io::IoError) -> Self {
        use cm_io::IoError;
        match e {
            IoError::Path(m) => PipelineError::Io(format!("path: {m}")),
            IoError::Limit(m) => PipelineError::Io(format!("limit: {m}")),
            IoError::Hash(m) => PipelineError::Io(format!("hash: {m}")),
            IoError::Json { pointer, msg } => PipelineError::Validate(format!("json {pointer}: {msg}")),
            IoError::Invalid(m) => PipelineError::Validate(m),
        }
    }
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::DomainOutOfRange(_) => PipelineError::Validate(e.to_string()),
            _ => PipelineError::Contract(e.to_string()),
        }
    }
}

// -------------------------------------- Load --------------------------------------

/// Everything read from disk for one dashboard build.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub dataset: Dataset,
    /// SHA-256 of the dataset's canonical bytes.
    pub dataset_sha256: String,
    pub params: Params,
}

impl Inputs {
    /// Goal list with the session goal (if any) overlaid and prepended.
    pub fn goals(&self) -> Vec<Goal> {
        goal_list(&self.dataset.goals, self.dataset.new_goal.as_ref(), self.params.overlay.as_ref())
    }

    /// Override table seeded from the dataset's stored assignments.
    pub fn overrides(&self) -> AssignmentOverrides {
        AssignmentOverrides::from(self.dataset.assignments.clone())
    }
}

/// Load and validate the dataset and (optionally) a params file. Missing
/// params mean defaults.
pub fn load_inputs(dataset: &Path, params: Option<&Path>) -> Result<Inputs, PipelineError> {
    let loaded = loader::load_dataset(dataset)?;
    let params = match params {
        Some(p) => loader::load_params(p)?,
        None => Params::default(),
    };
    Ok(Inputs { dataset: loaded.dataset, dataset_sha256: loaded.sha256, params })
}

// -------------------------------------- Dashboard --------------------------------------

/// View state for both lists on the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct View {
    pub table: ViewQuery,
    pub goals: GoalQuery,
}

/// One campaign table row with its goal association resolved.
#[derive(Clone, Copy, Debug)]
pub struct TableRow<'a> {
    pub row: FlatCampaign<'a>,
    /// Override → static name → "".
    pub goal_name: &'a str,
    /// Goal the row opens into; `None` opens the campaign standalone.
    pub route: Option<&'a GoalId>,
}

/// Filtered goal list plus the facets the filter bar needs.
#[derive(Clone, Debug)]
pub struct GoalListView<'a> {
    pub goals: Vec<&'a Goal>,
    pub available_platforms: Vec<Platform>,
    pub health_counts: HealthCounts,
}

#[derive(Clone, Debug)]
pub struct Dashboard<'a> {
    pub view: View,
    pub overview: PortfolioOverview,
    pub channels: Vec<ChannelAggregate>,
    /// Filtered and sorted campaign table.
    pub rows: Vec<TableRow<'a>>,
    /// Row count before filtering.
    pub campaign_total: usize,
    pub goal_list: GoalListView<'a>,
}

/// Build every dashboard section from borrowed inputs. Nothing is mutated.
pub fn build_dashboard<'a>(
    goals: &'a [Goal],
    unassigned: &'a [Campaign],
    overrides: &'a AssignmentOverrides,
    params: &Params,
    view: View,
) -> Dashboard<'a> {
    let index = GoalIndex::new(goals);
    let all_rows = flatten(goals, unassigned);
    let filtered = filter_rows(&all_rows, &view.table.filter());
    let sorted = sort_rows(&filtered, view.table.sort, view.table.dir, overrides, &index);

    let rows = sorted
        .into_iter()
        .map(|row| TableRow {
            row,
            goal_name: resolve_goal_name(&row, overrides, &index),
            route: effective_goal_id(&row, overrides, &index),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        total = all_rows.len(),
        shown = rows.len(),
        query = %view.table,
        "campaign table built"
    );

    Dashboard {
        view,
        overview: overview(goals, &params.thresholds),
        channels: channel_mix(goals, &params.thresholds),
        rows,
        campaign_total: all_rows.len(),
        goal_list: GoalListView {
            goals: goal_rows(goals, &view.goals),
            available_platforms: available_platforms(goals),
            health_counts: health_counts(goals),
        },
    }
}

fn goal_rows<'a>(goals: &'a [Goal], q: &GoalQuery) -> Vec<&'a Goal> {
    let filtered = filter_goals(goals, &q.filter());
    match q.sort {
        Some(key) => sort_goals(&filtered, key, q.dir),
        None => filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{campaign_full, goal_with};
    use cm_core::EntityStatus;

    #[test]
    fn io_errors_map_to_stable_buckets() {
        let e: PipelineError = cm_io::IoError::Limit("too big".into()).into();
        assert_eq!(e, PipelineError::Io("limit: too big".into()));
        let e: PipelineError = cm_io::IoError::Invalid("duplicate goal id g1".into()).into();
        assert!(matches!(e, PipelineError::Validate(_)));
        let e: PipelineError = CoreError::InvalidSortKey.into();
        assert_eq!(e, PipelineError::Contract("invalid sort key".into()));
    }

    #[test]
    fn dashboard_routes_rows_through_overrides() {
        let goals = vec![
            goal_with("g1", "One", vec![campaign_full("c1", "a", Platform::Meta, EntityStatus::Active, 1, 1.0)]),
            goal_with("g2", "Two", vec![]),
        ];
        let pool = vec![campaign_full("c2", "b", Platform::Meta, EntityStatus::Active, 1, 1.0)];
        let ov: AssignmentOverrides = [("c2".parse().unwrap(), "g2".parse().unwrap())].into_iter().collect();

        let d = build_dashboard(&goals, &pool, &ov, &Params::default(), View::default());
        assert_eq!(d.campaign_total, 2);
        assert_eq!(d.rows[1].goal_name, "Two");
        assert_eq!(d.rows[1].route.map(|g| g.as_str()), Some("g2"));
        assert!(d.rows[1].row.is_unassigned());
        assert_eq!(d.goal_list.goals.len(), 2);
        assert_eq!(d.goal_list.available_platforms, vec![Platform::Meta]);
    }

    #[test]
    fn dangling_override_routes_unassigned() {
        let goals = vec![goal_with("g1", "One", vec![])];
        let pool = vec![campaign_full("c9", "z", Platform::Meta, EntityStatus::Active, 1, 1.0)];
        let ov: AssignmentOverrides = [("c9".parse().unwrap(), "ghost".parse().unwrap())].into_iter().collect();

        let d = build_dashboard(&goals, &pool, &ov, &Params::default(), View::default());
        assert_eq!(d.rows[0].route, None);
        assert_eq!(d.rows[0].goal_name, "");
    }

    #[test]
    fn static_goal_name_survives_on_pool_rows() {
        let mut legacy = campaign_full("c1", "a", Platform::Meta, EntityStatus::Active, 1, 1.0);
        legacy.goal_name = Some("Legacy".into());
        let pool = vec![legacy, campaign_full("c2", "b", Platform::Meta, EntityStatus::Active, 1, 1.0)];
        let table = ViewQuery::parse("sort=goalName").unwrap();

        let ov = AssignmentOverrides::new();
        let d = build_dashboard(&[], &pool, &ov, &Params::default(), View { table, ..View::default() });
        let names: Vec<&str> = d.rows.iter().map(|r| r.goal_name).collect();
        assert_eq!(names, ["", "Legacy"]);
        assert_eq!(d.rows[1].route, None);
    }
}
