//! Fixed-length feature windows for the sequence models.
//!
//! Each timestep carries five features:
//!
//! | index | feature |
//! |-------|---------|
//! | 0 | scaled outbreak count |
//! | 1 | country id |
//! | 2 | normalized target year |
//! | 3 | target month / 12 |
//! | 4 | ISO week / 52 (weekly) or 0.5 (monthly) |
//!
//! Temporal features describe the prediction target, not the historical
//! buckets, so they are identical across every timestep of a window.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{ForecastError, ForecastResult};
use crate::models::{CountryId, CountryRegistry, Granularity};
use crate::preprocessing::ForecastSnapshot;

/// Number of features per timestep.
pub const FEATURES_PER_STEP: usize = 5;

/// Sub-period feature for monthly windows (mid-month).
pub const MONTHLY_SUB_PERIOD: f64 = 0.5;

/// Observed span of start-date years, used to normalize the year feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Widen the range to contain `year`.
    pub fn including(self, year: i32) -> Self {
        Self::new(self.min.min(year), self.max.max(year))
    }

    /// `(year - min) / (max - min)`, or 0 when the range is a single year.
    /// Years outside the range extrapolate.
    pub fn normalize(&self, year: i32) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        f64::from(year - self.min) / f64::from(self.max - self.min)
    }
}

/// Temporal features of a prediction target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemporalFeatures {
    pub year: f64,
    pub month: f64,
    pub sub_period: f64,
}

impl TemporalFeatures {
    pub fn for_target(target: NaiveDate, granularity: Granularity, years: Option<YearRange>) -> Self {
        let sub_period = match granularity {
            Granularity::Weekly => f64::from(target.iso_week().week()) / 52.0,
            _ => MONTHLY_SUB_PERIOD,
        };
        Self {
            year: years.map_or(0.0, |r| r.normalize(target.year())),
            month: f64::from(target.month()) / 12.0,
            sub_period,
        }
    }
}

/// Model input for one country and target date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWindow {
    pub granularity: Granularity,
    pub country: String,
    pub country_id: CountryId,
    pub target_date: NaiveDate,
    steps: Vec<[f64; FEATURES_PER_STEP]>,
}

impl FeatureWindow {
    /// `(timesteps, features)`
    pub fn shape(&self) -> (usize, usize) {
        (self.steps.len(), FEATURES_PER_STEP)
    }

    pub fn steps(&self) -> &[[f64; FEATURES_PER_STEP]] {
        &self.steps
    }

    /// Feature 0 of every timestep.
    pub fn scaled_counts(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s[0]).collect()
    }

    /// Row-major `timesteps × features` buffer, for models that take a flat tensor.
    pub fn to_flat(&self) -> Vec<f64> {
        self.steps.iter().flat_map(|s| s.iter().copied()).collect()
    }
}

/// Builds feature windows from a snapshot.
pub struct WindowBuilder<'a> {
    snapshot: &'a ForecastSnapshot,
    registry: &'a CountryRegistry,
}

impl<'a> WindowBuilder<'a> {
    pub fn new(snapshot: &'a ForecastSnapshot, registry: &'a CountryRegistry) -> Self {
        Self { snapshot, registry }
    }

    /// Build the window for `country` predicting the period containing
    /// `target_date`. Annual requests use the monthly window.
    ///
    /// # Errors
    /// - `InsufficientHistory` if the country is unknown or has fewer buckets
    ///   than the window length
    /// - `ScalerNotFit` if the granularity's scaler was never fit
    pub fn build(
        &self,
        country: &str,
        target_date: NaiveDate,
        granularity: Granularity,
    ) -> ForecastResult<FeatureWindow> {
        let granularity = granularity.model_granularity();
        let required = granularity.window_len().unwrap_or_default();
        let counts = self.snapshot.series(granularity).country_counts(country);

        let insufficient = || ForecastError::InsufficientHistory {
            country: country.to_string(),
            granularity,
            found: counts.len(),
            required,
        };
        let country_id = self.registry.id_of(country).ok_or_else(insufficient)?;
        if counts.len() < required {
            return Err(insufficient());
        }

        let scaler = self
            .snapshot
            .scaler(granularity)
            .ok_or(ForecastError::ScalerNotFit { granularity })?;
        let temporal = TemporalFeatures::for_target(target_date, granularity, self.snapshot.year_range());

        let steps = counts[counts.len() - required..]
            .iter()
            .map(|&count| {
                [
                    scaler.scale(f64::from(count)),
                    country_id.as_feature(),
                    temporal.year,
                    temporal.month,
                    temporal.sub_period,
                ]
            })
            .collect();

        Ok(FeatureWindow {
            granularity,
            country: country.to_string(),
            country_id,
            target_date,
            steps,
        })
    }
}
