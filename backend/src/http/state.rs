//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::ForecastService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Prediction service, shared across requests
    pub service: Arc<ForecastService>,
}

impl AppState {
    /// Create a new application state around an initialized service.
    pub fn new(service: Arc<ForecastService>) -> Self {
        Self { service }
    }
}
