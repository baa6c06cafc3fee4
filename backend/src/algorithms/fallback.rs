//! Mean-based fallback estimator.
//!
//! Used whenever a model prediction is unavailable. It never fails and never
//! reports fewer than one outbreak.

use crate::models::{Granularity, PredictionTarget};
use crate::preprocessing::ForecastSnapshot;

/// Floor applied to every fallback estimate.
pub const MIN_FALLBACK: u32 = 1;

/// Months per year, used to derive annual values from monthly ones.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Arithmetic mean, or `None` for an empty input.
pub fn mean_count<I>(counts: I) -> Option<f64>
where
    I: IntoIterator<Item = u32>,
{
    let (sum, n) = counts
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, n), c| (sum + f64::from(c), n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Round to the nearest integer (ties to even) and clamp into `u32` with a
/// lower bound of `floor`.
pub fn round_count(value: f64, floor: u32) -> u32 {
    if !value.is_finite() {
        return floor;
    }
    let rounded = value.round_ties_even();
    if rounded <= f64::from(floor) {
        floor
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Estimates outbreak counts from aggregate means.
pub struct FallbackEstimator<'a> {
    snapshot: &'a ForecastSnapshot,
}

impl<'a> FallbackEstimator<'a> {
    pub fn new(snapshot: &'a ForecastSnapshot) -> Self {
        Self { snapshot }
    }

    /// `max(1, round(mean))` over the country's (or every country's) series.
    ///
    /// Annual estimates come from the monthly series. For `all` this is
    /// `round(monthly mean × 12)`; for a country it is the monthly estimate
    /// × 12. An empty series or a country with no buckets yields exactly 1.
    pub fn estimate(&self, granularity: Granularity, target: &PredictionTarget) -> u32 {
        let series = self.snapshot.series(granularity.model_granularity());
        let mean = match target {
            PredictionTarget::All => mean_count(series.counts()),
            PredictionTarget::Country(country) => mean_count(series.country_counts(country)),
        };

        let Some(mean) = mean else {
            return MIN_FALLBACK;
        };
        match (granularity, target) {
            (Granularity::Annual, PredictionTarget::All) => {
                round_count(mean * f64::from(MONTHS_PER_YEAR), MIN_FALLBACK)
            }
            (Granularity::Annual, PredictionTarget::Country(_)) => {
                round_count(mean, MIN_FALLBACK).saturating_mul(MONTHS_PER_YEAR)
            }
            _ => round_count(mean, MIN_FALLBACK),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{monthly_records, table, weekly_records};
    use crate::models::CountryRegistry;
    use crate::preprocessing::{build_snapshot, DEFAULT_MIN_RECORDS};

    fn country(name: &str) -> PredictionTarget {
        PredictionTarget::Country(name.to_string())
    }

    #[test]
    fn test_mean_count() {
        assert_eq!(mean_count(Vec::new()), None);
        assert_eq!(mean_count(vec![1, 2, 3, 4]), Some(2.5));
    }

    #[test]
    fn test_round_count() {
        assert_eq!(round_count(2.5, 1), 2);
        assert_eq!(round_count(3.5, 1), 4);
        assert_eq!(round_count(2.6, 1), 3);
        assert_eq!(round_count(0.2, 1), 1);
        assert_eq!(round_count(-4.0, 0), 0);
        assert_eq!(round_count(f64::NAN, 1), 1);
        assert_eq!(round_count(1e20, 0), u32::MAX);
    }

    #[test]
    fn test_empty_snapshot_returns_one() {
        let snapshot = ForecastSnapshot::empty();
        let estimator = FallbackEstimator::new(&snapshot);
        for g in Granularity::ALL {
            assert_eq!(estimator.estimate(g, &PredictionTarget::All), 1);
            assert_eq!(estimator.estimate(g, &country("Chile")), 1);
        }
    }

    #[test]
    fn test_country_and_all_means() {
        let registry = CountryRegistry::supported();
        let mut records = weekly_records("Chile", 4, |_| 3);
        records.extend(weekly_records("Spain", 4, |_| 7));
        let snapshot = build_snapshot(&table(records), &registry, DEFAULT_MIN_RECORDS);
        let estimator = FallbackEstimator::new(&snapshot);

        assert_eq!(estimator.estimate(Granularity::Weekly, &country("Chile")), 3);
        assert_eq!(estimator.estimate(Granularity::Weekly, &country("Spain")), 7);
        assert_eq!(estimator.estimate(Granularity::Weekly, &PredictionTarget::All), 5);
        assert_eq!(estimator.estimate(Granularity::Weekly, &country("Brazil")), 1);
    }

    #[test]
    fn test_country_annual_is_twelve_monthly_estimates() {
        let registry = CountryRegistry::supported();
        // monthly counts alternate 1, 2 -> mean 1.5 -> monthly 2
        let records = monthly_records("Norway", 12, |m| 1 + m % 2);
        let snapshot = build_snapshot(&table(records), &registry, DEFAULT_MIN_RECORDS);
        let estimator = FallbackEstimator::new(&snapshot);

        let monthly = estimator.estimate(Granularity::Monthly, &country("Norway"));
        assert_eq!(monthly, 2);
        assert_eq!(estimator.estimate(Granularity::Annual, &country("Norway")), monthly * 12);
    }

    #[test]
    fn test_all_annual_rounds_scaled_mean() {
        let registry = CountryRegistry::supported();
        let records = monthly_records("Norway", 12, |m| 1 + m % 2);
        let snapshot = build_snapshot(&table(records), &registry, DEFAULT_MIN_RECORDS);
        let estimator = FallbackEstimator::new(&snapshot);

        // 1.5 * 12
        assert_eq!(estimator.estimate(Granularity::Annual, &PredictionTarget::All), 18);
        assert_eq!(estimator.estimate(Granularity::Annual, &country("Sweden")), 1);
    }
}
