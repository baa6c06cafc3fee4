//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! [`ForecastService`](crate::services::ForecastService). The prediction
//! pipeline is synchronous, so it runs on the blocking pool.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::dto::{
    ActualMarker, HasPredictionsResponse, HealthResponse, MapDataResponse, ModelStatus,
    PredictionRequest, PredictionResponse, StatusResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::Granularity;
use crate::services::prediction_markers;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let models = state.service.models();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        initialized: state.service.is_initialized(),
        models: ModelStatus {
            weekly: models.slot(Granularity::Weekly).is_loaded(),
            monthly: models.slot(Granularity::Monthly).is_loaded(),
        },
    }))
}

// =============================================================================
// Predictions
// =============================================================================

/// POST /api/predict
///
/// Predict the outbreak count for a country (or `all`) and interval.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> HandlerResult<PredictionResponse> {
    let Json(request) = payload?;
    let service = state.service.clone();
    let response = tokio::task::spawn_blocking(move || service.predict(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(response))
}

/// GET /api/predictions
///
/// Every cached prediction keyed by `country_interval_date`.
pub async fn list_predictions(
    State(state): State<AppState>,
) -> HandlerResult<std::collections::BTreeMap<String, u32>> {
    Ok(Json(state.service.cached_predictions()))
}

/// POST /api/clear_predictions
pub async fn clear_predictions(State(state): State<AppState>) -> HandlerResult<StatusResponse> {
    state.service.clear_predictions();
    Ok(Json(StatusResponse::success("Predictions cleared")))
}

/// GET /api/has_predictions
pub async fn has_predictions(State(state): State<AppState>) -> HandlerResult<HasPredictionsResponse> {
    Ok(Json(HasPredictionsResponse {
        has_predictions: state.service.has_cached_predictions(),
    }))
}

/// POST /api/session
///
/// Start a new client session; clears every cached prediction.
pub async fn start_session(State(state): State<AppState>) -> HandlerResult<StatusResponse> {
    state.service.clear_predictions();
    tracing::debug!("New session, prediction cache cleared");
    Ok(Json(StatusResponse::success("Session started")))
}

// =============================================================================
// Map Data
// =============================================================================

/// GET /api/data
///
/// Observed outbreaks plus markers for the cached predictions.
pub async fn get_map_data(State(state): State<AppState>) -> HandlerResult<MapDataResponse> {
    let table = state.service.records()?;
    let actual = table.records.iter().map(ActualMarker::from).collect();
    let prediction = prediction_markers(&state.service.cached_entries());

    Ok(Json(MapDataResponse { actual, prediction }))
}
