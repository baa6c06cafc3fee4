//! Record builders shared by unit tests.

use chrono::{Duration, Months, NaiveDate};

use crate::io::{calculate_checksum, LoadedTable, TableSource};
use crate::models::OutbreakRecord;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(country: &str, start: Option<NaiveDate>) -> OutbreakRecord {
    OutbreakRecord {
        country: country.to_string(),
        location: format!("{} outbreak site", country),
        coordinates: None,
        start_date: start,
        end_date: None,
        cases: 10,
        deaths: 1,
    }
}

/// `per_week(i)` records in each of `weeks` consecutive weeks starting Monday 2023-01-02.
pub fn weekly_records(country: &str, weeks: usize, per_week: impl Fn(usize) -> usize) -> Vec<OutbreakRecord> {
    let start = date(2023, 1, 2);
    (0..weeks)
        .flat_map(|w| {
            let day = start + Duration::weeks(w as i64);
            (0..per_week(w)).map(move |_| day)
        })
        .map(|d| record(country, Some(d)))
        .collect()
}

/// `per_month(i)` records in each of `months` consecutive months starting 2022-01.
pub fn monthly_records(country: &str, months: usize, per_month: impl Fn(usize) -> usize) -> Vec<OutbreakRecord> {
    let start = date(2022, 1, 10);
    (0..months)
        .flat_map(|m| {
            let day = start + Months::new(m as u32);
            (0..per_month(m)).map(move |_| day)
        })
        .map(|d| record(country, Some(d)))
        .collect()
}

pub fn table(records: Vec<OutbreakRecord>) -> LoadedTable {
    let checksum = calculate_checksum(&format!("{:?}", records));
    LoadedTable {
        records,
        checksum,
        source: TableSource::Sample,
    }
}
