//! # Outbreak Forecast
//!
//! Forecasting core for disease-outbreak counts per country.
//!
//! Outbreak reports are loaded from a CSV table, bucketed into weekly, monthly
//! and annual counts per country, scaled, and turned into fixed-length feature
//! windows for optional sequence models. Whenever a model cannot answer, a
//! mean-based fallback does, so every request yields a count.
//!
//! ## Architecture
//!
//! - [`io`]: CSV loading and record normalization
//! - [`models`]: domain types (records, periods, granularities, countries)
//! - [`preprocessing`]: time-bucket aggregation and the refresh pipeline
//! - [`algorithms`]: scaler, feature windows, fallback estimator
//! - [`services`]: model invoker, dispatcher, prediction cache, service context
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based REST API (feature `http-server`)

pub mod algorithms;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod preprocessing;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

#[cfg(test)]
mod fixtures;

pub use error::{ForecastError, ForecastResult, ModelError};
