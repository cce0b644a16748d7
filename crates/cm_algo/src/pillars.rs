//! crates/cm_algo/src/pillars.rs
//! Quality pillars (fraud → viewability → suitability → geography) and the
//! primary-driver selection. Pure float math over impression-weighted means;
//! ties resolve by pillar declaration order.

use cm_core::variables::PillarThresholds;
use cm_core::{Goal, Pillar, RateMetric};

use crate::weighting::weighted_mean;
use crate::UndefinedAggregate;

// ---------------- Types -------------------------------------------------------------------------

/// One pillar's weighted value against its threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PillarOutcome {
    pub pillar: Pillar,
    pub value: f64,
    pub threshold: f64,
    pub pass: bool,
}

impl PillarOutcome {
    pub fn new(pillar: Pillar, value: f64, threshold: f64) -> Self {
        Self { pillar, value, threshold, pass: value >= threshold }
    }

    /// `value − threshold`; negative when failing.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.value - self.threshold
    }
}

/// All four pillar outcomes for one group, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PillarPanel {
    pub outcomes: [PillarOutcome; 4],
}

impl PillarPanel {
    pub fn all_pass(&self) -> bool {
        self.outcomes.iter().all(|o| o.pass)
    }

    pub fn failing(&self) -> impl Iterator<Item = &PillarOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.pass)
    }

    pub fn get(&self, pillar: Pillar) -> &PillarOutcome {
        // Outcomes are stored in declaration order.
        &self.outcomes[pillar as usize]
    }

    /// Worst failing pillar, if any.
    pub fn primary_driver(&self) -> Option<Pillar> {
        select_primary_driver(&self.outcomes)
    }
}

// ---------------- Evaluation --------------------------------------------------------------------

/// Weighted pillar value for `goals`. Fraud is expressed as fraud-free rate.
pub fn pillar_value(goals: &[&Goal], pillar: Pillar) -> Result<f64, UndefinedAggregate> {
    match pillar {
        Pillar::Fraud => weighted_mean(goals, RateMetric::FraudRate).map(|f| 100.0 - f),
        Pillar::Viewability => weighted_mean(goals, RateMetric::ViewabilityRate),
        Pillar::Suitability => weighted_mean(goals, RateMetric::BrandSuitabilityRate),
        Pillar::Geography => weighted_mean(goals, RateMetric::InGeoRate),
    }
}

/// Evaluate all four pillars for a goal group. Zero impressions ⇒ `UndefinedAggregate`.
pub fn evaluate_pillars(
    goals: &[&Goal],
    thresholds: &PillarThresholds,
) -> Result<PillarPanel, UndefinedAggregate> {
    let eval = |p: Pillar| -> Result<PillarOutcome, UndefinedAggregate> {
        Ok(PillarOutcome::new(p, pillar_value(goals, p)?, thresholds.get(p)))
    };
    Ok(PillarPanel {
        outcomes: [
            eval(Pillar::Fraud)?,
            eval(Pillar::Viewability)?,
            eval(Pillar::Suitability)?,
            eval(Pillar::Geography)?,
        ],
    })
}

/// Among failing outcomes, the one with the most negative margin.
/// Equal margins keep the earlier outcome, so callers passing declaration
/// order get declaration-order tie-break.
pub fn select_primary_driver(outcomes: &[PillarOutcome]) -> Option<Pillar> {
    let mut best: Option<&PillarOutcome> = None;
    for o in outcomes.iter().filter(|o| !o.pass) {
        match best {
            Some(b) if o.margin() >= b.margin() => {}
            _ => best = Some(o),
        }
    }
    best.map(|o| o.pillar)
}

/// Primary driver under default thresholds. `None` for "all passing" and for
/// zero-impression groups alike.
pub fn primary_driver(goals: &[&Goal]) -> Option<Pillar> {
    primary_driver_with(goals, &PillarThresholds::default())
}

pub fn primary_driver_with(goals: &[&Goal], thresholds: &PillarThresholds) -> Option<Pillar> {
    evaluate_pillars(goals, thresholds).ok()?.primary_driver()
}

// ---------------- Tests -------------------------------------------------------------------------
