use std::hint::black_box;

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use outbreak_forecast::algorithms::WindowBuilder;
use outbreak_forecast::io::{calculate_checksum, parse_records, LoadedTable, TableSource};
use outbreak_forecast::models::{CountryRegistry, Granularity, OutbreakRecord, PredictionTarget, SUPPORTED_COUNTRIES};
use outbreak_forecast::preprocessing::{build_snapshot, Aggregates, DEFAULT_MIN_RECORDS};
use outbreak_forecast::services::{Dispatcher, ModelSlots};

fn synthetic_records(n: usize) -> Vec<OutbreakRecord> {
    let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    (0..n)
        .map(|i| OutbreakRecord {
            country: SUPPORTED_COUNTRIES[i % SUPPORTED_COUNTRIES.len()].to_string(),
            location: format!("site {}", i),
            coordinates: None,
            start_date: Some(start + Duration::days((i * 7 % 1800) as i64)),
            end_date: None,
            cases: (i % 40) as u64,
            deaths: (i % 7) as u64,
        })
        .collect()
}

fn synthetic_csv(n: usize) -> String {
    let mut csv = String::from("country,location,lat_long,start_date,end_date,cases,deaths\n");
    for r in synthetic_records(n) {
        let start = r.start_date.map_or("-".to_string(), |d| d.format("%Y/%m/%d").to_string());
        csv.push_str(&format!("{},{},\"1.0,2.0\",{},-,{},{}\n", r.country, r.location, start, r.cases, r.deaths));
    }
    csv
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parsing");

    for size in [1_000, 10_000] {
        let csv = synthetic_csv(size);
        group.bench_with_input(BenchmarkId::new("parse_records", size), &csv, |b, input| {
            b.iter(|| parse_records(black_box(input)));
        });
    }

    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let registry = CountryRegistry::supported();

    for size in [1_000, 10_000, 50_000] {
        let records = synthetic_records(size);
        group.bench_with_input(BenchmarkId::new("aggregates", size), &records, |b, input| {
            b.iter(|| Aggregates::build(black_box(input), &registry));
        });
    }

    group.finish();
}

fn bench_window_and_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");
    let registry = CountryRegistry::supported();
    let records = synthetic_records(20_000);
    let table = LoadedTable {
        checksum: calculate_checksum("bench"),
        records,
        source: TableSource::Sample,
    };
    let snapshot = build_snapshot(&table, &registry, DEFAULT_MIN_RECORDS);
    let target_date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    group.bench_function("build_snapshot", |b| {
        b.iter(|| build_snapshot(black_box(&table), &registry, DEFAULT_MIN_RECORDS));
    });

    group.bench_function("weekly_window", |b| {
        let builder = WindowBuilder::new(&snapshot, &registry);
        b.iter(|| builder.build(black_box("Chile"), target_date, Granularity::Weekly));
    });

    let models = ModelSlots::absent();
    let dispatcher = Dispatcher::new(&snapshot, &registry, &models);
    let chile = PredictionTarget::from("Chile");
    group.bench_function("dispatch_fallback", |b| {
        b.iter(|| dispatcher.predict(black_box(&chile), Granularity::Monthly, target_date));
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_aggregation, bench_window_and_dispatch);
criterion_main!(benches);
