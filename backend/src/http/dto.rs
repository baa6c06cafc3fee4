//! Data Transfer Objects for the HTTP API.
//!
//! Prediction request/response bodies are the service types re-exported
//! unchanged; the rest are response envelopes specific to HTTP.

use serde::{Deserialize, Serialize};

pub use crate::services::{PredictionMarker, PredictionRequest, PredictionResponse};

use crate::models::OutbreakRecord;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub initialized: bool,
    pub models: ModelStatus,
}

/// Which granularities have a loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub weekly: bool,
    pub monthly: bool,
}

/// Generic `{status, message}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// GET /api/has_predictions response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HasPredictionsResponse {
    pub has_predictions: bool,
}

/// An observed outbreak as shown on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualMarker {
    pub country: String,
    pub location: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub cases: u64,
    pub deaths: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&OutbreakRecord> for ActualMarker {
    fn from(record: &OutbreakRecord) -> Self {
        let format = |d: chrono::NaiveDate| d.format("%Y-%m-%d").to_string();
        Self {
            country: record.country.clone(),
            location: record.location.clone(),
            start_date: record.start_date.map(format),
            end_date: record.end_date.map(format),
            cases: record.cases,
            deaths: record.deaths,
            lat: record.coordinates.map(|c| c.lat),
            lon: record.coordinates.map(|c| c.lon),
            kind: "actual".to_string(),
        }
    }
}

/// GET /api/data response.
#[derive(Debug, Clone, Serialize)]
pub struct MapDataResponse {
    pub actual: Vec<ActualMarker>,
    pub prediction: Vec<PredictionMarker>,
}
