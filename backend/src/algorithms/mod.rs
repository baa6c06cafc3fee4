//! Numeric building blocks of the forecasting pipeline: count scaling,
//! feature windows, and the mean-based fallback estimator.

pub mod fallback;
pub mod scaler;
pub mod window;

pub use fallback::{mean_count, round_count, FallbackEstimator, MIN_FALLBACK, MONTHS_PER_YEAR};
pub use scaler::MinMaxScaler;
pub use window::{
    FeatureWindow, TemporalFeatures, WindowBuilder, YearRange, FEATURES_PER_STEP, MONTHLY_SUB_PERIOD,
};
