//! Impression-weighted means (deterministic, single pass).
//!
//!   weighted_mean(m) = Σ(rate_m × impressions) / Σ(impressions)
//!
//! Rules in this layer:
//! - Zero total impressions (including an empty set) ⇒ `UndefinedAggregate`, never NaN.
//! - Each item contributes exactly once per call; calls have no side effects.
//! - The result is clamped to the [min, max] of the contributing rates so that
//!   floating-point rounding can never push it outside the observed range.
//!
//! Items with zero impressions carry no weight and do not widen that range.

use cm_core::{Campaign, FlatCampaign, Goal, RateMetric};

use crate::UndefinedAggregate;

/// Anything carrying an impression count and rate-type metrics.
pub trait Weighted {
    type Metric: Copy;

    fn impressions(&self) -> u64;
    fn rate(&self, metric: Self::Metric) -> f64;
}

impl<T: Weighted + ?Sized> Weighted for &T {
    type Metric = T::Metric;

    #[inline]
    fn impressions(&self) -> u64 { (**self).impressions() }
    #[inline]
    fn rate(&self, metric: Self::Metric) -> f64 { (**self).rate(metric) }
}

impl Weighted for Goal {
    type Metric = RateMetric;

    fn impressions(&self) -> u64 { self.metrics.total_impressions }
    fn rate(&self, metric: RateMetric) -> f64 { self.metrics.rate(metric) }
}

/// Rates carried by a single campaign.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignRate {
    AuthenticAdRate,
    ViewabilityRate,
}

impl Weighted for Campaign {
    type Metric = CampaignRate;

    fn impressions(&self) -> u64 { self.metrics.impressions }
    fn rate(&self, metric: CampaignRate) -> f64 {
        match metric {
            CampaignRate::AuthenticAdRate => self.metrics.authentic_ad_rate,
            CampaignRate::ViewabilityRate => self.metrics.viewability_rate,
        }
    }
}

impl Weighted for FlatCampaign<'_> {
    type Metric = CampaignRate;

    fn impressions(&self) -> u64 { self.campaign.impressions() }
    fn rate(&self, metric: CampaignRate) -> f64 { self.campaign.rate(metric) }
}

/// Bare `{metric, impressions}` pair, for callers holding pre-extracted values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub impressions: u64,
    pub value: f64,
}

impl Weighted for Sample {
    type Metric = ();

    fn impressions(&self) -> u64 { self.impressions }
    fn rate(&self, _metric: ()) -> f64 { self.value }
}

/// Σ impressions over `items`, saturating at `u64::MAX`.
pub fn total_impressions<T: Weighted>(items: &[T]) -> u64 {
    let sum: u128 = items.iter().map(|x| x.impressions() as u128).sum();
    u64::try_from(sum).unwrap_or(u64::MAX)
}

/// Impression-weighted mean of `metric` over `items`.
pub fn weighted_mean<T: Weighted>(items: &[T], metric: T::Metric) -> Result<f64, UndefinedAggregate> {
    weighted_mean_by(items.iter(), |x| x.impressions(), |x| x.rate(metric))
}

/// Weighted mean with caller-supplied accessors (any subset, any grouping).
pub fn weighted_mean_by<I, W, V>(items: I, weight: W, value: V) -> Result<f64, UndefinedAggregate>
where
    I: IntoIterator,
    W: Fn(&I::Item) -> u64,
    V: Fn(&I::Item) -> f64,
{
    let mut num = 0.0f64;
    let mut den: u128 = 0;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    for item in items {
        let w = weight(&item);
        if w == 0 {
            continue;
        }
        let v = value(&item);
        num += v * (w as f64);
        den += w as u128;
        if v < lo { lo = v; }
        if v > hi { hi = v; }
    }

    if den == 0 {
        return Err(UndefinedAggregate);
    }

    let mean = num / (den as f64);
    Ok(if mean < lo { lo } else if mean > hi { hi } else { mean })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn s(impressions: u64, value: f64) -> Sample {
        Sample { impressions, value }
    }

    #[test]
    fn weights_by_impressions() {
        let xs = [s(1000, 60.0), s(3000, 80.0)];
        assert_eq!(weighted_mean(&xs, ()), Ok(75.0));
    }

    #[test]
    fn equal_weights_average() {
        let xs = [s(1000, 60.0), s(1000, 90.0)];
        assert_eq!(weighted_mean(&xs, ()), Ok(75.0));
    }

    #[test]
    fn zero_impressions_is_undefined_not_nan() {
        let xs = [s(0, 50.0), s(0, 70.0)];
        assert_eq!(weighted_mean(&xs, ()), Err(UndefinedAggregate));
        let empty: [Sample; 0] = [];
        assert_eq!(weighted_mean(&empty, ()), Err(UndefinedAggregate));
    }

    #[test]
    fn zero_weight_items_do_not_contribute() {
        let xs = [s(0, 0.0), s(500, 42.0)];
        assert_eq!(weighted_mean(&xs, ()), Ok(42.0));
    }

    #[test]
    fn repeated_calls_agree() {
        let xs = [s(7, 33.3), s(11, 91.1), s(13, 12.5)];
        let a = weighted_mean(&xs, ()).unwrap();
        let b = weighted_mean(&xs, ()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn total_impressions_saturates() {
        let xs = [s(u64::MAX, 1.0), s(10, 1.0)];
        assert_eq!(total_impressions(&xs), u64::MAX);
    }

    #[test]
    fn by_accessor_works_on_subsets() {
        let xs: Vec<(u64, f64)> = vec![(10, 1.0), (30, 5.0), (60, 9.0)];
        let subset = xs.iter().filter(|(w, _)| *w >= 30);
        let m = weighted_mean_by(subset, |x| x.0, |x| x.1).unwrap();
        assert!((m - (5.0 * 30.0 + 9.0 * 60.0) / 90.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn mean_lies_within_observed_range(
            items in proptest::collection::vec((1u64..10_000_000, 0.0f64..=100.0), 1..40)
        ) {
            let xs: Vec<Sample> = items.iter().map(|(w, v)| s(*w, *v)).collect();
            let m = weighted_mean(&xs, ()).unwrap();
            let lo = xs.iter().map(|x| x.value).fold(f64::INFINITY, f64::min);
            let hi = xs.iter().map(|x| x.value).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= lo && m <= hi, "{m} not in [{lo}, {hi}]");
        }
    }
}
