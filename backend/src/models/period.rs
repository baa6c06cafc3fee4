//! Aggregation periods (ISO-aligned weeks, calendar months, calendar years).

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Granularity;

/// A discrete time bucket used as the aggregation key.
///
/// Weeks run Monday through Sunday and are identified by their Monday.
/// Periods of one granularity order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Week { start: NaiveDate },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    /// The period of the given granularity that contains `date`.
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Weekly => {
                let offset = date.weekday().num_days_from_monday() as i64;
                Period::Week {
                    start: date - Duration::days(offset),
                }
            }
            Granularity::Monthly => Period::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Annual => Period::Year { year: date.year() },
        }
    }

    /// Granularity this period belongs to.
    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Week { .. } => Granularity::Weekly,
            Period::Month { .. } => Granularity::Monthly,
            Period::Year { .. } => Granularity::Annual,
        }
    }

    /// First calendar day of the period.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            Period::Week { start } => Some(start),
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Period::Year { year } => NaiveDate::from_ymd_opt(year, 1, 1),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Period::Week { start } => {
                let iso = start.iso_week();
                write!(f, "{}-W{:02}", iso.year(), iso.week())
            }
            Period::Month { year, month } => write!(f, "{}-{:02}", year, month),
            Period::Year { year } => write!(f, "{}", year),
        }
    }
}
