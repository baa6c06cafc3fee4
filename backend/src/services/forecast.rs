//! Forecast service: the context object owning the registry, model slots,
//! current snapshot and prediction cache.
//!
//! Lifecycle: [`ForecastService::new`] → [`ForecastService::initialize`] →
//! [`ForecastService::predict`] and cache operations. Predicting before
//! initialization fails with [`ForecastError::NotInitialized`].

use chrono::{Duration, NaiveDate, Utc};
use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ForecastResult};
use crate::io::{load_records_or_sample, LoadedTable};
use crate::models::{CountryRegistry, Granularity, PredictionTarget};
use crate::preprocessing::{build_snapshot, ForecastSnapshot};

use super::availability::{check_country_data_availability, log_availability, AvailabilityIssue};
use super::cache::{PredictionCache, PredictionKey};
use super::dispatcher::{Dispatcher, Prediction};
use super::model::ModelSlots;

/// Incoming prediction request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Target date; absent or blank selects the interval's default horizon.
    #[serde(default)]
    pub date: Option<String>,
    pub interval: String,
    /// Country name or `"all"`; absent means `"all"`.
    #[serde(default)]
    pub country: Option<String>,
}

impl PredictionRequest {
    pub fn new(date: impl Into<String>, interval: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            interval: interval.into(),
            country: Some(country.into()),
        }
    }

    pub fn granularity(&self) -> ForecastResult<Granularity> {
        self.interval.parse()
    }

    pub fn target(&self) -> PredictionTarget {
        PredictionTarget::from(self.country.as_deref().unwrap_or("all"))
    }

    /// Resolve the target date, defaulting relative to `today`.
    pub fn target_date(&self, granularity: Granularity, today: NaiveDate) -> ForecastResult<NaiveDate> {
        match self.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_request_date(raw),
            _ => Ok(default_target_date(granularity, today)),
        }
    }
}

/// Successful prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub status: String,
    pub date: String,
    pub predicted_outbreaks: u32,
    pub country: String,
}

/// Parse `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM` (first of month) or `YYYY`
/// (1 January).
pub fn parse_request_date(raw: &str) -> ForecastResult<NaiveDate> {
    let raw = raw.trim();
    let invalid = || ForecastError::InvalidDate(raw.to_string());

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    if let Some((year, month)) = raw.split_once('-') {
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid);
    }
    if raw.len() == 4 {
        let year: i32 = raw.parse().map_err(|_| invalid())?;
        return NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid);
    }
    Err(invalid())
}

/// One week, thirty days, or one year ahead of `today`.
pub fn default_target_date(granularity: Granularity, today: NaiveDate) -> NaiveDate {
    let days = match granularity {
        Granularity::Weekly => 7,
        Granularity::Monthly => 30,
        Granularity::Annual => 365,
    };
    today + Duration::days(days)
}

/// Table and the snapshot built from it, published together.
#[derive(Clone)]
struct Loaded {
    table: Arc<LoadedTable>,
    snapshot: Arc<ForecastSnapshot>,
}

/// Prediction service shared by every request handler.
pub struct ForecastService {
    config: ForecastConfig,
    registry: CountryRegistry,
    models: ModelSlots,
    /// `None` when the table was injected and is never reloaded.
    source: RwLock<Option<PathBuf>>,
    loaded: RwLock<Option<Loaded>>,
    cache: PredictionCache,
    /// Serializes refresh → dispatch → cache write.
    request_guard: Mutex<()>,
}

impl ForecastService {
    pub fn new(config: ForecastConfig, registry: CountryRegistry, models: ModelSlots) -> Self {
        Self {
            config,
            registry,
            models,
            source: RwLock::new(None),
            loaded: RwLock::new(None),
            cache: PredictionCache::new(),
            request_guard: Mutex::new(()),
        }
    }

    /// Load the configured table (or the built-in sample if it is
    /// unavailable) and publish the first snapshot.
    pub fn initialize(&self) -> Vec<AvailabilityIssue> {
        let path = self.config.data.csv_path.clone();
        let table = load_records_or_sample(&path);
        *self.source.write() = Some(path);
        self.publish(table)
    }

    /// Publish a snapshot built from an already-loaded table. Later refreshes
    /// reuse this table instead of reading the configured path.
    pub fn initialize_with_table(&self, table: LoadedTable) -> Vec<AvailabilityIssue> {
        *self.source.write() = None;
        self.publish(table)
    }

    fn publish(&self, table: LoadedTable) -> Vec<AvailabilityIssue> {
        let snapshot = build_snapshot(&table, &self.registry, self.config.data.min_records);
        let issues = check_country_data_availability(&snapshot, &self.registry);
        log_availability(&issues, &self.registry);
        *self.loaded.write() = Some(Loaded {
            table: Arc::new(table),
            snapshot: Arc::new(snapshot),
        });
        issues
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.read().is_some()
    }

    fn current(&self) -> ForecastResult<Loaded> {
        self.loaded.read().clone().ok_or(ForecastError::NotInitialized)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ForecastResult<Arc<ForecastSnapshot>> {
        Ok(self.current()?.snapshot)
    }

    /// Records of the current table.
    pub fn records(&self) -> ForecastResult<Arc<LoadedTable>> {
        Ok(self.current()?.table)
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    pub fn models(&self) -> &ModelSlots {
        &self.models
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub(crate) fn cache(&self) -> &PredictionCache {
        &self.cache
    }

    /// Cached predictions keyed by `country_interval_date`.
    pub fn cached_predictions(&self) -> BTreeMap<String, u32> {
        let _guard = self.request_guard.lock();
        self.cache.get_all()
    }

    pub fn cached_entries(&self) -> Vec<(PredictionKey, u32)> {
        let _guard = self.request_guard.lock();
        self.cache.entries()
    }

    pub fn has_cached_predictions(&self) -> bool {
        let _guard = self.request_guard.lock();
        self.cache.has_entries()
    }

    /// Drop every cached prediction. Waits for an in-flight prediction to
    /// finish its cache write.
    pub fn clear_predictions(&self) {
        let _guard = self.request_guard.lock();
        self.cache.clear();
    }

    /// Reload the source and republish the snapshot. An unchanged checksum
    /// keeps the current snapshot. Returns the record count.
    pub fn refresh(&self) -> ForecastResult<usize> {
        let _guard = self.request_guard.lock();
        self.refresh_locked()
    }

    fn refresh_locked(&self) -> ForecastResult<usize> {
        let current = self.current()?;
        let source = self.source.read().clone();
        let table = match source {
            Some(path) => load_records_or_sample(&path),
            None => (*current.table).clone(),
        };

        if table.checksum == current.snapshot.checksum() {
            debug!("Source unchanged (checksum {}), keeping snapshot", table.checksum);
            return Ok(current.snapshot.record_count());
        }

        let snapshot = build_snapshot(&table, &self.registry, self.config.data.min_records);
        let count = snapshot.record_count();
        *self.loaded.write() = Some(Loaded {
            table: Arc::new(table),
            snapshot: Arc::new(snapshot),
        });
        Ok(count)
    }

    /// Dispatch one prediction against the current snapshot without touching
    /// the cache.
    pub fn dispatch(
        &self,
        target: &PredictionTarget,
        granularity: Granularity,
        target_date: NaiveDate,
    ) -> ForecastResult<Prediction> {
        let snapshot = self.snapshot()?;
        Ok(Dispatcher::new(&snapshot, &self.registry, &self.models).predict(target, granularity, target_date))
    }

    /// Handle a prediction request end to end.
    ///
    /// # Errors
    /// - `InvalidInterval` / `InvalidDate` for a malformed request
    /// - `NotInitialized` before [`initialize`](Self::initialize)
    pub fn predict(&self, request: &PredictionRequest) -> ForecastResult<PredictionResponse> {
        let granularity = request.granularity()?;
        let target_date = request.target_date(granularity, Utc::now().date_naive())?;
        let target = request.target();

        let _guard = self.request_guard.lock();
        if !self.is_initialized() {
            return Err(ForecastError::NotInitialized);
        }
        if self.config.prediction.refresh_on_predict {
            self.refresh_locked()?;
        }
        if self.config.prediction.clear_cache_on_predict {
            self.cache.clear();
        }

        let prediction = self.dispatch(&target, granularity, target_date)?;
        self.cache
            .put(PredictionKey::new(&target, granularity, target_date), prediction.value);
        info!(
            "Predicted {} outbreaks for {} ({}, {}) via {:?}",
            prediction.value, target, granularity, target_date, prediction.source
        );

        Ok(PredictionResponse {
            status: "success".to_string(),
            date: request
                .date
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| target_date.format("%Y-%m-%d").to_string()),
            predicted_outbreaks: prediction.value,
            country: target.as_str().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "forecast_tests.rs"]
mod forecast_tests;
