// crates/cm_algo/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use core::fmt;

pub use cm_core::{Goal, Pillar, RateMetric};

// ----------------------------- Errors --------------------------------------------------------

/// A weighted mean was requested over zero total impressions.
///
/// Callers recover locally (e.g. render a placeholder); it is never fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UndefinedAggregate;

impl fmt::Display for UndefinedAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("undefined aggregate: total impressions is zero")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UndefinedAggregate {}

// ----------------------------- Weighting & pillars -------------------------------------------

pub mod weighting;
pub mod pillars;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use weighting::{
    total_impressions, weighted_mean, weighted_mean_by, CampaignRate, Sample, Weighted,
};
pub use pillars::{
    evaluate_pillars, pillar_value, primary_driver, primary_driver_with, select_primary_driver,
    PillarOutcome, PillarPanel,
};
