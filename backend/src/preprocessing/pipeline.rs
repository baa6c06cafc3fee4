//! Refresh pipeline: records → aggregates → fitted scalers.
//!
//! [`build_snapshot`] always runs the full sequence (aggregate, then fit) and
//! returns an immutable [`ForecastSnapshot`]. Consumers only ever see complete
//! snapshots, so a window can never be scaled with a scaler from an older
//! aggregate.

use chrono::{DateTime, Datelike, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::algorithms::{MinMaxScaler, YearRange};
use crate::error::ForecastError;
use crate::io::LoadedTable;
use crate::models::{CountryRegistry, Granularity, OutbreakRecord};

use super::aggregation::{AggregateSeries, Aggregates};

/// Minimum number of records before any aggregation is attempted.
pub const DEFAULT_MIN_RECORDS: usize = 10;

/// Immutable result of one data refresh.
#[derive(Debug, Clone)]
pub struct ForecastSnapshot {
    aggregates: Aggregates,
    weekly_scaler: Option<MinMaxScaler>,
    monthly_scaler: Option<MinMaxScaler>,
    year_range: Option<YearRange>,
    record_count: usize,
    checksum: String,
    built_at: DateTime<Utc>,
    notes: Vec<String>,
}

/// Serializable summary of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub record_count: usize,
    pub weekly_rows: usize,
    pub monthly_rows: usize,
    pub annual_rows: usize,
    pub weekly_scaler: Option<MinMaxScaler>,
    pub monthly_scaler: Option<MinMaxScaler>,
    pub year_range: Option<YearRange>,
    pub checksum: String,
    pub built_at: DateTime<Utc>,
    pub notes: Vec<String>,
}

impl ForecastSnapshot {
    /// A snapshot with no data. Every prediction against it falls back to 1.
    pub fn empty() -> Self {
        Self {
            aggregates: Aggregates::empty(),
            weekly_scaler: None,
            monthly_scaler: None,
            year_range: None,
            record_count: 0,
            checksum: String::new(),
            built_at: Utc::now(),
            notes: Vec::new(),
        }
    }

    pub fn series(&self, granularity: Granularity) -> &AggregateSeries {
        self.aggregates.series(granularity)
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Fitted scaler for a granularity; annual shares the monthly scaler.
    pub fn scaler(&self, granularity: Granularity) -> Option<&MinMaxScaler> {
        match granularity.model_granularity() {
            Granularity::Weekly => self.weekly_scaler.as_ref(),
            _ => self.monthly_scaler.as_ref(),
        }
    }

    pub fn year_range(&self) -> Option<YearRange> {
        self.year_range
    }

    /// Number of records in the source table, before registry filtering.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Degradations hit while building (insufficient sample, unfit scalers).
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            record_count: self.record_count,
            weekly_rows: self.aggregates.weekly.len(),
            monthly_rows: self.aggregates.monthly.len(),
            annual_rows: self.aggregates.annual.len(),
            weekly_scaler: self.weekly_scaler,
            monthly_scaler: self.monthly_scaler,
            year_range: self.year_range,
            checksum: self.checksum.clone(),
            built_at: self.built_at,
            notes: self.notes.clone(),
        }
    }
}

/// Smallest and largest start-date year among registry records.
pub fn observed_year_range(records: &[OutbreakRecord], registry: &CountryRegistry) -> Option<YearRange> {
    records
        .iter()
        .filter(|r| registry.contains(&r.country))
        .filter_map(|r| r.start_date.map(|d| d.year()))
        .fold(None, |acc, year| match acc {
            None => Some(YearRange::new(year, year)),
            Some(range) => Some(range.including(year)),
        })
}

/// Run the full refresh over a loaded table.
///
/// Never fails: an insufficient sample yields empty series, and a granularity
/// with too few rows keeps an unfit scaler. Both are recorded in the
/// snapshot's notes and logged.
pub fn build_snapshot(table: &LoadedTable, registry: &CountryRegistry, min_records: usize) -> ForecastSnapshot {
    let records = &table.records;
    let mut snapshot = ForecastSnapshot {
        record_count: records.len(),
        checksum: table.checksum.clone(),
        ..ForecastSnapshot::empty()
    };

    if records.len() < min_records {
        let err = ForecastError::InsufficientSample {
            found: records.len(),
            required: min_records,
        };
        warn!("{}; all aggregate series are empty", err);
        snapshot.notes.push(err.to_string());
        return snapshot;
    }

    snapshot.aggregates = Aggregates::build(records, registry);
    snapshot.year_range = observed_year_range(records, registry);

    for granularity in [Granularity::Weekly, Granularity::Monthly] {
        let fitted = match MinMaxScaler::fit(snapshot.aggregates.series(granularity)) {
            Ok(scaler) => Some(scaler),
            Err(e) => {
                warn!("Not enough {} data for model prediction, fallback only: {}", granularity, e);
                snapshot.notes.push(e.to_string());
                None
            }
        };
        match granularity {
            Granularity::Weekly => snapshot.weekly_scaler = fitted,
            _ => snapshot.monthly_scaler = fitted,
        }
    }

    info!(
        "Prepared forecast data: {} records, {} weekly / {} monthly / {} annual buckets",
        snapshot.record_count,
        snapshot.aggregates.weekly.len(),
        snapshot.aggregates.monthly.len(),
        snapshot.aggregates.annual.len()
    );
    snapshot
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod pipeline_tests;
