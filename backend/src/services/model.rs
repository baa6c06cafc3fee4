//! Model invoker: optional sequence models behind an explicit slot.
//!
//! A model is a black box mapping a [`FeatureWindow`] to one scaled scalar.
//! Whether a granularity has a model is decided once, when the slots are
//! built; every invocation failure is contained to the request that hit it.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::{info, warn};

use crate::algorithms::FeatureWindow;
use crate::error::{ForecastError, ModelError};
use crate::models::Granularity;

/// A trained sequence model.
pub trait SequenceModel: Send + Sync {
    /// Predict the next scaled count for the window.
    fn predict(&self, window: &FeatureWindow) -> Result<f64, ModelError>;

    /// Expected `(timesteps, features)`, if the model enforces one.
    fn input_shape(&self) -> Option<(usize, usize)> {
        None
    }
}

impl<F> SequenceModel for F
where
    F: Fn(&FeatureWindow) -> Result<f64, ModelError> + Send + Sync,
{
    fn predict(&self, window: &FeatureWindow) -> Result<f64, ModelError> {
        self(window)
    }
}

/// Per-granularity model state. `Absent` is a normal state, not an error.
#[derive(Clone, Default)]
pub enum ModelSlot {
    Loaded(Arc<dyn SequenceModel>),
    #[default]
    Absent,
}

impl fmt::Debug for ModelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSlot::Loaded(model) => f
                .debug_struct("Loaded")
                .field("input_shape", &model.input_shape())
                .finish(),
            ModelSlot::Absent => f.write_str("Absent"),
        }
    }
}

impl ModelSlot {
    pub fn loaded<M>(model: M) -> Self
    where
        M: SequenceModel + 'static,
    {
        ModelSlot::Loaded(Arc::new(model))
    }

    /// Turn the outcome of a model load into a slot. A failed load leaves the
    /// slot absent for the lifetime of the service.
    pub fn from_load_result<E>(granularity: Granularity, result: Result<Arc<dyn SequenceModel>, E>) -> Self
    where
        E: fmt::Display,
    {
        match result {
            Ok(model) => {
                info!("{} model loaded", granularity);
                ModelSlot::Loaded(model)
            }
            Err(e) => {
                let err = ForecastError::ModelUnavailable {
                    granularity,
                    reason: e.to_string(),
                };
                warn!("{}; {} predictions will use the fallback", err, granularity);
                ModelSlot::Absent
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelSlot::Loaded(_))
    }

    /// Run the model once on `window`.
    ///
    /// Shape mismatches, panics and non-finite outputs are all reported as
    /// [`ModelError`]. No retry is attempted.
    pub fn invoke(&self, window: &FeatureWindow) -> Result<f64, ForecastError> {
        let model = match self {
            ModelSlot::Loaded(model) => model,
            ModelSlot::Absent => {
                return Err(ForecastError::ModelUnavailable {
                    granularity: window.granularity,
                    reason: "no model loaded".to_string(),
                })
            }
        };

        if let Some(expected) = model.input_shape() {
            let actual = window.shape();
            if expected != actual {
                return Err(ModelError::ShapeMismatch { expected, actual }.into());
            }
        }

        let output = catch_unwind(AssertUnwindSafe(|| model.predict(window)))
            .map_err(|payload| ModelError::Panicked(panic_message(payload.as_ref())))??;

        if !output.is_finite() {
            return Err(ModelError::NonFinite(output).into());
        }
        Ok(output)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Model slots for the granularities that have models. Annual requests are
/// served by the monthly slot.
#[derive(Debug, Clone, Default)]
pub struct ModelSlots {
    pub weekly: ModelSlot,
    pub monthly: ModelSlot,
}

impl ModelSlots {
    pub fn new(weekly: ModelSlot, monthly: ModelSlot) -> Self {
        Self { weekly, monthly }
    }

    /// Both slots absent; every prediction uses the fallback.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn slot(&self, granularity: Granularity) -> &ModelSlot {
        match granularity.model_granularity() {
            Granularity::Weekly => &self.weekly,
            _ => &self.monthly,
        }
    }
}
