//! Time-bucket aggregation of outbreak records.
//!
//! Each series maps `(country, period)` to the number of records whose start
//! date falls in that period. Buckets exist only where at least one record
//! landed; there is no zero-filling.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{CountryRegistry, Granularity, OutbreakRecord, Period};

/// One aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucketAggregate {
    pub period: Period,
    pub country: String,
    pub outbreak_count: u32,
}

/// Outbreak counts per country and period for a single granularity.
///
/// Per-country buckets are kept in chronological order, so any view of one
/// country's history is strictly increasing in period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSeries {
    granularity: Granularity,
    buckets: BTreeMap<String, BTreeMap<Period, u32>>,
}

impl AggregateSeries {
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            buckets: BTreeMap::new(),
        }
    }

    /// Aggregate `records` into buckets of `granularity`.
    ///
    /// Records outside the registry or without a start date are skipped.
    pub fn from_records<'a, I>(records: I, granularity: Granularity, registry: &CountryRegistry) -> Self
    where
        I: IntoIterator<Item = &'a OutbreakRecord>,
    {
        let mut series = Self::empty(granularity);
        for record in records {
            let Some(start) = record.start_date else {
                continue;
            };
            if !registry.contains(&record.country) {
                continue;
            }
            let period = Period::containing(start, granularity);
            *series
                .buckets
                .entry(record.country.clone())
                .or_default()
                .entry(period)
                .or_insert(0) += 1;
        }
        series
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Total number of `(country, period)` rows.
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Countries with at least one bucket, in name order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Number of buckets recorded for `country`.
    pub fn country_len(&self, country: &str) -> usize {
        self.buckets.get(country).map_or(0, BTreeMap::len)
    }

    /// `country`'s bucket counts in chronological order.
    pub fn country_counts(&self, country: &str) -> Vec<u32> {
        self.buckets
            .get(country)
            .map(|b| b.values().copied().collect())
            .unwrap_or_default()
    }

    /// `country`'s buckets in chronological order.
    pub fn country_buckets(&self, country: &str) -> impl Iterator<Item = (Period, u32)> + '_ {
        self.buckets
            .get(country)
            .into_iter()
            .flat_map(|b| b.iter().map(|(p, c)| (*p, *c)))
    }

    /// Every bucket count across all countries.
    pub fn counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.values().flat_map(|b| b.values().copied())
    }

    /// All rows, ordered by country then period.
    pub fn rows(&self) -> Vec<TimeBucketAggregate> {
        self.buckets
            .iter()
            .flat_map(|(country, b)| {
                b.iter().map(move |(period, count)| TimeBucketAggregate {
                    period: *period,
                    country: country.clone(),
                    outbreak_count: *count,
                })
            })
            .collect()
    }
}

/// The three aggregate series built from one record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregates {
    pub weekly: AggregateSeries,
    pub monthly: AggregateSeries,
    pub annual: AggregateSeries,
}

impl Aggregates {
    pub fn empty() -> Self {
        Self {
            weekly: AggregateSeries::empty(Granularity::Weekly),
            monthly: AggregateSeries::empty(Granularity::Monthly),
            annual: AggregateSeries::empty(Granularity::Annual),
        }
    }

    pub fn build(records: &[OutbreakRecord], registry: &CountryRegistry) -> Self {
        Self {
            weekly: AggregateSeries::from_records(records, Granularity::Weekly, registry),
            monthly: AggregateSeries::from_records(records, Granularity::Monthly, registry),
            annual: AggregateSeries::from_records(records, Granularity::Annual, registry),
        }
    }

    pub fn series(&self, granularity: Granularity) -> &AggregateSeries {
        match granularity {
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
            Granularity::Annual => &self.annual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(country: &str, date: Option<(i32, u32, u32)>) -> OutbreakRecord {
        OutbreakRecord {
            country: country.to_string(),
            location: String::new(),
            coordinates: None,
            start_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            end_date: None,
            cases: 0,
            deaths: 0,
        }
    }

    #[test]
    fn test_counts_per_period() {
        let registry = CountryRegistry::supported();
        let records = vec![
            record("Chile", Some((2024, 1, 1))),
            record("Chile", Some((2024, 1, 3))),
            record("Chile", Some((2024, 1, 9))),
            record("Chile", Some((2024, 2, 1))),
        ];
        let agg = Aggregates::build(&records, &registry);

        assert_eq!(agg.weekly.country_counts("Chile"), vec![2, 1, 1]);
        assert_eq!(agg.monthly.country_counts("Chile"), vec![3, 1]);
        assert_eq!(agg.annual.country_counts("Chile"), vec![4]);
    }

    #[test]
    fn test_excludes_unregistered_and_undated() {
        let registry = CountryRegistry::supported();
        let records = vec![
            record("Brazil", Some((2024, 1, 1))),
            record("Chile", None),
            record("Chile", Some((2024, 1, 1))),
        ];
        let agg = Aggregates::build(&records, &registry);

        assert_eq!(agg.monthly.len(), 1);
        assert_eq!(agg.monthly.country_len("Brazil"), 0);
        assert_eq!(agg.monthly.country_counts("Chile"), vec![1]);
        assert_eq!(agg.monthly.countries().collect::<Vec<_>>(), vec!["Chile"]);
    }

    #[test]
    fn test_no_zero_filled_gaps() {
        let registry = CountryRegistry::supported();
        let records = vec![
            record("Spain", Some((2023, 1, 15))),
            record("Spain", Some((2023, 6, 15))),
        ];
        let series = AggregateSeries::from_records(&records, Granularity::Monthly, &registry);
        let periods: Vec<Period> = series.country_buckets("Spain").map(|(p, _)| p).collect();
        assert_eq!(
            periods,
            vec![
                Period::Month { year: 2023, month: 1 },
                Period::Month { year: 2023, month: 6 }
            ]
        );
    }

    #[test]
    fn test_periods_strictly_increasing_regardless_of_input_order() {
        let registry = CountryRegistry::supported();
        let records = vec![
            record("Norway", Some((2024, 3, 1))),
            record("Norway", Some((2023, 11, 1))),
            record("Norway", Some((2024, 1, 1))),
        ];
        let series = AggregateSeries::from_records(&records, Granularity::Monthly, &registry);
        let periods: Vec<Period> = series.country_buckets("Norway").map(|(p, _)| p).collect();
        assert!(periods.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let registry = CountryRegistry::supported();
        let records: Vec<OutbreakRecord> = (1..=28)
            .map(|d| record(if d % 2 == 0 { "Chile" } else { "Peru" }, Some((2024, 2, d))))
            .collect();
        let first = Aggregates::build(&records, &registry);
        let second = Aggregates::build(&records, &registry);
        assert_eq!(first, second);
        assert_eq!(first.weekly.rows(), second.weekly.rows());
    }

    #[test]
    fn test_rows_are_ordered_by_country_then_period() {
        let registry = CountryRegistry::supported();
        let records = vec![
            record("Spain", Some((2024, 2, 1))),
            record("Chile", Some((2024, 3, 1))),
            record("Chile", Some((2024, 1, 1))),
        ];
        let rows = AggregateSeries::from_records(&records, Granularity::Monthly, &registry).rows();
        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.country.clone(), r.period.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Chile".to_string(), "2024-01".to_string()),
                ("Chile".to_string(), "2024-03".to_string()),
                ("Spain".to_string(), "2024-02".to_string()),
            ]
        );
    }
}
