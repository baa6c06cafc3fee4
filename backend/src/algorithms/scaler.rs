//! Min-max scaling of outbreak counts.
//!
//! A scaler is a value produced by [`MinMaxScaler::fit`] from one aggregate
//! snapshot. It is never mutated afterwards: a data refresh fits a new one,
//! so scaled windows cannot mix state from two snapshots.

use serde::Serialize;

use crate::error::{ForecastError, ForecastResult};
use crate::preprocessing::AggregateSeries;

/// Min/max normalizer fit over all in-sample counts of one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit over every bucket count in `series`.
    ///
    /// Fails with `InsufficientHistory` when the series has fewer rows than the
    /// window length of its granularity.
    pub fn fit(series: &AggregateSeries) -> ForecastResult<Self> {
        let granularity = series.granularity();
        let required = granularity.min_fit_rows().unwrap_or(1);
        let found = series.len();
        if found < required {
            return Err(ForecastError::InsufficientHistory {
                country: "all".to_string(),
                granularity,
                found,
                required,
            });
        }

        let (min, max) = series
            .counts()
            .map(f64::from)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        Ok(Self { min, max })
    }

    /// Scaler over a known range. `min` and `max` are swapped if reversed.
    pub fn from_range(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// All observed counts were identical.
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Map a count into `[0, 1]`. Counts outside the fitted range clamp to
    /// the nearest bound; a degenerate scaler maps everything to 0.
    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Inverse of [`scale`](Self::scale). Values outside `[0, 1]` extrapolate
    /// linearly, since model outputs are not bounded.
    pub fn unscale(&self, value: f64) -> f64 {
        self.min + value * (self.max - self.min)
    }
}
