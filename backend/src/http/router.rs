//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/predict", post(handlers::predict))
        .route("/predictions", get(handlers::list_predictions))
        .route("/clear_predictions", post(handlers::clear_predictions))
        .route("/has_predictions", get(handlers::has_predictions))
        .route("/session", post(handlers::start_session))
        .route("/data", get(handlers::get_map_data));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::config::ForecastConfig;
    use crate::models::CountryRegistry;
    use crate::services::{ForecastService, ModelSlots};

    #[test]
    fn test_router_creation() {
        let service = ForecastService::new(
            ForecastConfig::default(),
            CountryRegistry::supported(),
            ModelSlots::absent(),
        );
        let state = AppState::new(Arc::new(service));
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
