#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use chrono::{Duration, Months, NaiveDate};
use tempfile::NamedTempFile;

use outbreak_forecast::config::ForecastConfig;
use outbreak_forecast::io::{calculate_checksum, LoadedTable, TableSource};
use outbreak_forecast::models::{CountryRegistry, OutbreakRecord};
use outbreak_forecast::services::{ForecastService, ModelSlots};

pub const CSV_HEADER: &str = "country,location,lat_long,start_date,end_date,cases,deaths";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(country: &str, start: NaiveDate) -> OutbreakRecord {
    OutbreakRecord {
        country: country.to_string(),
        location: format!("{} farm", country),
        coordinates: None,
        start_date: Some(start),
        end_date: None,
        cases: 12,
        deaths: 2,
    }
}

/// `counts[i]` records in week `i`, weeks starting Monday 2023-01-02.
pub fn weekly(country: &str, counts: &[usize]) -> Vec<OutbreakRecord> {
    let start = date(2023, 1, 2);
    counts
        .iter()
        .enumerate()
        .flat_map(|(w, &n)| std::iter::repeat(start + Duration::weeks(w as i64)).take(n))
        .map(|d| record(country, d))
        .collect()
}

/// `counts[i]` records in month `i`, months starting January 2022.
pub fn monthly(country: &str, counts: &[usize]) -> Vec<OutbreakRecord> {
    let start = date(2022, 1, 15);
    counts
        .iter()
        .enumerate()
        .flat_map(|(m, &n)| std::iter::repeat(start + Months::new(m as u32)).take(n))
        .map(|d| record(country, d))
        .collect()
}

pub fn table(records: Vec<OutbreakRecord>) -> LoadedTable {
    LoadedTable {
        checksum: calculate_checksum(&format!("{:?}", records)),
        records,
        source: TableSource::Sample,
    }
}

/// Service initialized from an in-memory table.
pub fn service_with(records: Vec<OutbreakRecord>, models: ModelSlots) -> ForecastService {
    let service = ForecastService::new(ForecastConfig::default(), CountryRegistry::supported(), models);
    service.initialize_with_table(table(records));
    service
}

/// Write CSV rows (without header) to a temporary file.
pub fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", CSV_HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
