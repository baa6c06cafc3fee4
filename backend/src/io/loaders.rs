//! Outbreak table loading and record normalization.
//!
//! Rows that fail to parse coordinates, dates or counts degrade to records with
//! absent fields instead of being rejected. A missing or unreadable table is
//! reported as [`ForecastError::DataUnavailable`]; callers that must keep
//! serving can use [`load_records_or_sample`] to get the built-in sample table.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, ForecastResult};
use crate::models::{Coordinates, OutbreakRecord};

/// Where a loaded table came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    File(PathBuf),
    Sample,
}

/// Result of loading the outbreak table
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub records: Vec<OutbreakRecord>,
    /// SHA-256 of the raw table content, used to skip rebuilding unchanged data.
    pub checksum: String,
    pub source: TableSource,
}

impl LoadedTable {
    pub fn is_sample(&self) -> bool {
        self.source == TableSource::Sample
    }
}

/// One CSV row as it appears in the source table. Every column is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOutbreakRow {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub lat_long: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub cases: String,
    #[serde(default)]
    pub deaths: String,
}

/// Calculate the SHA-256 checksum of raw table content as lowercase hex.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a table date. Accepts `YYYY/MM/DD` and `YYYY-MM-DD`; `-`, empty
/// input and invalid calendar dates are absent.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Parse a case/death count. Fractional values truncate toward zero;
/// negative, non-numeric and missing values become 0.
pub fn parse_count(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

/// Convert a raw row into a normalized record.
pub fn normalize_row(raw: RawOutbreakRow) -> OutbreakRecord {
    OutbreakRecord {
        country: raw.country.trim().to_string(),
        location: raw.location.trim().to_string(),
        coordinates: Coordinates::parse(&raw.lat_long),
        start_date: parse_date(&raw.start_date),
        end_date: parse_date(&raw.end_date),
        cases: parse_count(&raw.cases),
        deaths: parse_count(&raw.deaths),
    }
}

/// Parse CSV content (header row required) into normalized records.
pub fn parse_records(content: &str) -> ForecastResult<Vec<OutbreakRecord>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .headers()
        .map_err(|e| ForecastError::data_unavailable("<table>", format!("Invalid CSV header: {}", e)))?;

    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<RawOutbreakRow>().enumerate() {
        match row {
            Ok(raw) => records.push(normalize_row(raw)),
            Err(e) => warn!("Skipping unreadable outbreak row {}: {}", line + 1, e),
        }
    }
    Ok(records)
}

/// Load and normalize the outbreak table at `path`.
pub fn load_records(path: &Path) -> ForecastResult<LoadedTable> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .map_err(|e| ForecastError::data_unavailable(&display, e.to_string()))?;

    let records = parse_records(&content).map_err(|e| match e {
        ForecastError::DataUnavailable { message, .. } => {
            ForecastError::data_unavailable(&display, message)
        }
        other => other,
    })?;

    debug!("Loaded {} outbreak records from {}", records.len(), display);
    Ok(LoadedTable {
        records,
        checksum: calculate_checksum(&content),
        source: TableSource::File(path.to_path_buf()),
    })
}

/// Load the table at `path`, or the built-in sample table if it is unavailable.
pub fn load_records_or_sample(path: &Path) -> LoadedTable {
    match load_records(path) {
        Ok(table) => table,
        Err(e) => {
            warn!("{}; serving sample dataset", e);
            sample_table()
        }
    }
}

/// The sample table served when the real source cannot be read.
pub fn sample_table() -> LoadedTable {
    LoadedTable {
        records: sample_records(),
        checksum: calculate_checksum("sample"),
        source: TableSource::Sample,
    }
}

/// Built-in sample outbreak records.
pub fn sample_records() -> Vec<OutbreakRecord> {
    let rows = [
        ("United States", "California", "2023/06/01", "2023/06/15", 450, 45, 37.09, -95.71),
        ("Brazil", "Amazonas", "2023/07/10", "2023/07/25", 380, 38, -14.24, -51.93),
        ("India", "Mumbai", "2023/09/05", "2023/09/20", 620, 62, 20.59, 78.96),
        ("Australia", "Outback", "2023/05/15", "2023/05/30", 290, 29, -25.27, 133.78),
        ("South Africa", "Northern Cape", "2023/08/01", "2023/08/15", 460, 46, -30.56, 22.94),
    ];

    rows.iter()
        .map(|&(country, location, start, end, cases, deaths, lat, lon)| OutbreakRecord {
            country: country.to_string(),
            location: location.to_string(),
            coordinates: Some(Coordinates { lat, lon }),
            start_date: parse_date(start),
            end_date: parse_date(end),
            cases,
            deaths,
        })
        .collect()
}
