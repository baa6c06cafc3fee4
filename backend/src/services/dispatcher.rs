//! Prediction dispatcher.
//!
//! Routes one request through either the all-countries path (fallback only)
//! or the single-country path (window → model → unscale, falling back on any
//! failure). [`Dispatcher::predict`] has no error branch: every request ends
//! in a count.

use chrono::NaiveDate;
use log::{debug, error, warn};
use serde::Serialize;

use crate::algorithms::{round_count, FallbackEstimator, WindowBuilder, MONTHS_PER_YEAR};
use crate::error::{ForecastError, ForecastResult};
use crate::models::{CountryRegistry, Granularity, PredictionTarget};
use crate::preprocessing::ForecastSnapshot;

use super::model::ModelSlots;

/// Where a predicted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Model,
    Fallback,
}

/// Outcome of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub value: u32,
    pub source: PredictionSource,
    pub granularity: Granularity,
}

pub struct Dispatcher<'a> {
    snapshot: &'a ForecastSnapshot,
    registry: &'a CountryRegistry,
    models: &'a ModelSlots,
}

impl<'a> Dispatcher<'a> {
    pub fn new(snapshot: &'a ForecastSnapshot, registry: &'a CountryRegistry, models: &'a ModelSlots) -> Self {
        Self {
            snapshot,
            registry,
            models,
        }
    }

    /// Predict the outbreak count for `target` in the period containing
    /// `target_date`.
    pub fn predict(&self, target: &PredictionTarget, granularity: Granularity, target_date: NaiveDate) -> Prediction {
        let country = match target {
            PredictionTarget::All => return self.fallback(target, granularity),
            PredictionTarget::Country(country) => country,
        };

        match self.model_prediction(country, granularity, target_date) {
            Ok(value) => Prediction {
                value,
                source: PredictionSource::Model,
                granularity,
            },
            Err(e) => {
                match &e {
                    ForecastError::ScalerNotFit { .. } => error!("Scaler used before fit for {}: {}", country, e),
                    ForecastError::ModelInvocation(_) => warn!("Model failed for {}, using fallback: {}", country, e),
                    _ => debug!("Using fallback for {} ({}): {}", country, granularity, e),
                }
                self.fallback(target, granularity)
            }
        }
    }

    fn fallback(&self, target: &PredictionTarget, granularity: Granularity) -> Prediction {
        Prediction {
            value: FallbackEstimator::new(self.snapshot).estimate(granularity, target),
            source: PredictionSource::Fallback,
            granularity,
        }
    }

    fn model_prediction(&self, country: &str, granularity: Granularity, target_date: NaiveDate) -> ForecastResult<u32> {
        let model_granularity = granularity.model_granularity();
        let slot = self.models.slot(model_granularity);
        if !slot.is_loaded() {
            return Err(ForecastError::ModelUnavailable {
                granularity: model_granularity,
                reason: "no model loaded".to_string(),
            });
        }

        let window = WindowBuilder::new(self.snapshot, self.registry).build(country, target_date, model_granularity)?;
        let scaled = slot.invoke(&window)?;
        let scaler = self
            .snapshot
            .scaler(model_granularity)
            .ok_or(ForecastError::ScalerNotFit {
                granularity: model_granularity,
            })?;

        let count = round_count(scaler.unscale(scaled), 0);
        Ok(match granularity {
            Granularity::Annual => count.saturating_mul(MONTHS_PER_YEAR),
            _ => count,
        })
    }
}
