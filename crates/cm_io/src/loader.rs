//! Loader: read local JSON inputs (dataset, params), enforce a size limit,
//! validate domains, and return typed values for the pipeline. No network I/O.
//!
//! Record order inside the dataset is semantically significant (goal order,
//! campaign order within a goal, pool order) and is never normalized here.

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cm_core::variables::{self, Params};
use cm_core::{Campaign, CampaignId, Goal, GoalId};

use crate::IoError;

/// Inputs above this size are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

// ----------------------------- Public wire-facing types -----------------------------

/// Dataset snapshot as stored on disk (camelCase keys).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub goals: Vec<Goal>,
    pub unassigned_campaigns: Vec<Campaign>,
    /// Caller-owned campaign → goal assignments (session overrides).
    pub assignments: BTreeMap<CampaignId, GoalId>,
    /// Template for a goal created in the current session; only shown when a
    /// `GoalOverlay` is supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_goal: Option<Goal>,
}

impl Dataset {
    pub fn campaign_count(&self) -> usize {
        self.goals.iter().map(|g| g.campaigns.len()).sum::<usize>() + self.unassigned_campaigns.len()
    }
}

/// A validated dataset plus the digest of its canonical bytes.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub sha256: String,
}

// ----------------------------- Loaders -----------------------------

/// Load, parse, and validate a dataset file.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset, IoError> {
    let v = read_json_value_with_limits(path)?;
    let loaded = dataset_from_value(v)?;
    tracing::info!(
        path = %path.display(),
        goals = loaded.dataset.goals.len(),
        campaigns = loaded.dataset.campaign_count(),
        assignments = loaded.dataset.assignments.len(),
        sha256 = %loaded.sha256,
        "dataset loaded"
    );
    Ok(loaded)
}

/// Parse and validate an in-memory dataset value (digest computed over canonical bytes).
pub fn dataset_from_value(v: Value) -> Result<LoadedDataset, IoError> {
    let sha256 = digest_of(&v)?;
    let dataset: Dataset = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;
    validate_dataset(&dataset)?;
    Ok(LoadedDataset { dataset, sha256 })
}

/// Load a params file; missing fields take their defaults.
pub fn load_params(path: &Path) -> Result<Params, IoError> {
    let v = read_json_value_with_limits(path)?;
    let ps: Params = serde_json::from_value(v)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })?;
    variables::validate_domains(&ps).map_err(|errs| {
        let joined: Vec<String> = errs.iter().map(|e| e.to_string()).collect();
        IoError::Invalid(format!("parameter domain error: {}", joined.join("; ")))
    })?;
    Ok(ps)
}

/// Read a JSON file, refusing anything larger than `MAX_INPUT_BYTES`.
pub fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("{} ({e})", path.display())))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::Limit(format!(
            "{} exceeds {} bytes",
            path.display(),
            MAX_INPUT_BYTES
        )));
    }
    serde_json::from_slice(&buf).map_err(|e| IoError::Json {
        pointer: "/".into(),
        msg: format!("{} ({e})", path.display()),
    })
}

#[cfg(feature = "hash")]
fn digest_of(v: &Value) -> Result<String, IoError> {
    crate::hasher::sha256_canonical_value(v)
}

#[cfg(not(feature = "hash"))]
fn digest_of(_v: &Value) -> Result<String, IoError> {
    Err(IoError::Hash("hash feature disabled".into()))
}

// ----------------------------- Validation -----------------------------

fn check_pct(v: f64, pointer: impl FnOnce() -> String) -> Result<(), IoError> {
    if v.is_finite() && (0.0..=100.0).contains(&v) {
        Ok(())
    } else {
        Err(IoError::Json { pointer: pointer(), msg: format!("rate {v} outside 0..=100") })
    }
}

fn check_spend(v: f64, pointer: impl FnOnce() -> String) -> Result<(), IoError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(IoError::Json { pointer: pointer(), msg: format!("spend {v} must be finite and non-negative") })
    }
}

fn check_goal(g: &Goal, at: &str) -> Result<(), IoError> {
    let m = &g.metrics;
    check_spend(m.total_spend, || format!("{at}/totalSpend"))?;
    for (v, key) in [
        (m.authentic_ad_rate, "authenticAdRate"),
        (m.block_rate, "blockRate"),
        (m.fraud_rate, "fraudRate"),
        (m.viewability_rate, "viewabilityRate"),
        (m.brand_suitability_rate, "brandSuitabilityRate"),
        (m.in_geo_rate, "inGeoRate"),
    ] {
        check_pct(v, || format!("{at}/{key}"))?;
    }
    Ok(())
}

fn check_campaign(c: &Campaign, at: &str) -> Result<(), IoError> {
    let m = &c.metrics;
    check_spend(m.spend, || format!("{at}/spend"))?;
    check_pct(m.authentic_ad_rate, || format!("{at}/authenticAdRate"))?;
    check_pct(m.viewability_rate, || format!("{at}/viewabilityRate"))?;
    Ok(())
}

/// Structural + domain checks. Hard errors: duplicate ids, out-of-range rates,
/// negative or non-finite spend. Dangling references only warn (they are
/// resolved to "unassigned" downstream).
pub fn validate_dataset(ds: &Dataset) -> Result<(), IoError> {
    let mut goal_ids: BTreeSet<&GoalId> = BTreeSet::new();
    let mut campaign_ids: BTreeSet<&CampaignId> = BTreeSet::new();

    let goals = ds.goals.iter().enumerate().map(|(i, g)| (format!("/goals/{i}"), g));
    let new_goal = ds.new_goal.iter().map(|g| ("/newGoal".to_string(), g));

    for (at, g) in goals.chain(new_goal) {
        if !goal_ids.insert(&g.id) {
            return Err(IoError::Invalid(format!("duplicate goal id {} at {at}", g.id)));
        }
        check_goal(g, &at)?;
        for (j, c) in g.campaigns.iter().enumerate() {
            let cat = format!("{at}/campaigns/{j}");
            if !campaign_ids.insert(&c.id) {
                return Err(IoError::Invalid(format!("duplicate campaign id {} at {cat}", c.id)));
            }
            check_campaign(c, &cat)?;
            if c.goal_id.as_ref().is_some_and(|gid| gid != &g.id) {
                tracing::warn!(campaign = %c.id, goal = %g.id, "campaign goalId disagrees with owning goal; owner wins");
            }
        }
    }

    for (i, c) in ds.unassigned_campaigns.iter().enumerate() {
        let cat = format!("/unassignedCampaigns/{i}");
        if !campaign_ids.insert(&c.id) {
            return Err(IoError::Invalid(format!("duplicate campaign id {} at {cat}", c.id)));
        }
        check_campaign(c, &cat)?;
    }

    for (cid, gid) in &ds.assignments {
        if !campaign_ids.contains(cid) {
            tracing::warn!(campaign = %cid, "assignment for unknown campaign is ignored");
        }
        if !goal_ids.contains(gid) {
            tracing::warn!(campaign = %cid, goal = %gid, "assignment names unknown goal; campaign stays unassigned");
        }
    }

    Ok(())
}
