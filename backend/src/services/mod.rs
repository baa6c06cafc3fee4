//! Service layer: model invocation, prediction dispatch and caching.
//!
//! [`ForecastService`] is the entry point used by the HTTP layer. It owns the
//! current [`ForecastSnapshot`](crate::preprocessing::ForecastSnapshot), the
//! model slots and the prediction cache, and sequences refresh → dispatch →
//! cache write for each request.

pub mod availability;
pub mod cache;
pub mod dispatcher;
pub mod forecast;
pub mod geo;
pub mod model;

pub use availability::{check_country_data_availability, AvailabilityIssue};
pub use cache::{PredictionCache, PredictionKey};
pub use dispatcher::{Dispatcher, Prediction, PredictionSource};
pub use forecast::{
    default_target_date, parse_request_date, ForecastService, PredictionRequest, PredictionResponse,
};
pub use geo::{country_center, prediction_markers, PredictionMarker};
pub use model::{ModelSlot, ModelSlots, SequenceModel};
