//! Time granularities and the interval names that select them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForecastError;

/// Bucket width used for aggregation and prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Weekly,
    Monthly,
    Annual,
}

impl Granularity {
    /// All granularities, in aggregation order.
    pub const ALL: [Granularity; 3] = [Granularity::Weekly, Granularity::Monthly, Granularity::Annual];

    /// Number of timesteps in a model input window.
    ///
    /// Annual requests are answered from the monthly model, so they have no
    /// window of their own.
    pub fn window_len(self) -> Option<usize> {
        match self {
            Granularity::Weekly => Some(24),
            Granularity::Monthly => Some(12),
            Granularity::Annual => None,
        }
    }

    /// Minimum in-sample rows required before the scaler may be fit.
    pub fn min_fit_rows(self) -> Option<usize> {
        self.window_len()
    }

    /// The granularity whose model and scaler serve this one.
    pub fn model_granularity(self) -> Granularity {
        match self {
            Granularity::Annual => Granularity::Monthly,
            other => other,
        }
    }

    /// Canonical lowercase name, used in cache keys and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Annual => "annual",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ForecastError;

    /// Parse an interval name from a prediction request.
    ///
    /// `"annual"` and `"annually"` are the same granularity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            "annual" | "annually" => Ok(Granularity::Annual),
            _ => Err(ForecastError::InvalidInterval(s.to_string())),
        }
    }
}
