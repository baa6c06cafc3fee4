//! Error types for the forecasting pipeline.
//!
//! Data- and history-related errors are absorbed by the dispatcher, which falls
//! through to the fallback estimator. Only request errors and
//! [`ForecastError::NotInitialized`] ever reach an external caller.

use crate::models::Granularity;

/// Result type for forecasting operations
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Errors raised while loading, aggregating, windowing, or predicting.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// The source table is missing or unreadable.
    #[error("Data unavailable: {message} (path={path})")]
    DataUnavailable { path: String, message: String },

    /// Too few usable records to aggregate anything.
    #[error("Insufficient sample: {found} records, need at least {required}")]
    InsufficientSample { found: usize, required: usize },

    /// A country has fewer buckets than the window length for a granularity.
    #[error("Insufficient history for {country} ({granularity}): {found} buckets, need {required}")]
    InsufficientHistory {
        country: String,
        granularity: Granularity,
        found: usize,
        required: usize,
    },

    /// `scale`/`unscale` requested for a granularity whose scaler was never fit.
    #[error("Scaler for {granularity} data has not been fit")]
    ScalerNotFit { granularity: Granularity },

    /// No sequence model is loaded for the granularity.
    #[error("Model unavailable for {granularity}: {reason}")]
    ModelUnavailable {
        granularity: Granularity,
        reason: String,
    },

    /// The sequence model was present but failed for this request.
    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] ModelError),

    /// Unrecognized interval name in a request.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Unparsable target date in a request.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The prediction subsystem has not been initialized yet.
    #[error("Models not loaded. Please check if the model files exist and are accessible.")]
    NotInitialized,

    /// Configuration file or environment could not be read.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ForecastError {
    /// Create a data-unavailable error for the given source path.
    pub fn data_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by a malformed request rather than the
    /// state of the system.
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::InvalidInterval(_) | Self::InvalidDate(_))
    }

    /// Whether the dispatcher resolves this error by falling back to the
    /// mean-based estimator.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable { .. }
                | Self::InsufficientSample { .. }
                | Self::InsufficientHistory { .. }
                | Self::ScalerNotFit { .. }
                | Self::ModelUnavailable { .. }
                | Self::ModelInvocation(_)
        )
    }
}

/// Failures raised by a sequence model during a single invocation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The window does not match the model's expected `(timesteps, features)`.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// The model produced NaN or an infinite value.
    #[error("Non-finite model output: {0}")]
    NonFinite(f64),

    /// Any other model-side failure.
    #[error("Inference error: {0}")]
    Inference(String),

    /// The model panicked while running.
    #[error("Model panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors() {
        assert!(ForecastError::InvalidInterval("daily".into()).is_request_error());
        assert!(ForecastError::InvalidDate("soon".into()).is_request_error());
        assert!(!ForecastError::NotInitialized.is_request_error());
    }

    #[test]
    fn test_recoverable_errors() {
        let err = ForecastError::InsufficientHistory {
            country: "Chile".into(),
            granularity: Granularity::Weekly,
            found: 3,
            required: 24,
        };
        assert!(err.is_recoverable());
        assert!(ForecastError::from(ModelError::NonFinite(f64::NAN)).is_recoverable());
        assert!(!ForecastError::NotInitialized.is_recoverable());
        assert!(!ForecastError::InvalidInterval("x".into()).is_recoverable());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let err = ForecastError::InsufficientHistory {
            country: "Chile".into(),
            granularity: Granularity::Monthly,
            found: 4,
            required: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("Chile"));
        assert!(msg.contains("monthly"));
        assert!(msg.contains("12"));

        let err = ForecastError::data_unavailable("data/missing.csv", "No such file");
        assert!(err.to_string().contains("data/missing.csv"));
    }
}
