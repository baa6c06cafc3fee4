//! Data preparation: time-bucket aggregation and the refresh pipeline.

pub mod aggregation;
pub mod pipeline;

pub use aggregation::{AggregateSeries, Aggregates, TimeBucketAggregate};
pub use pipeline::{build_snapshot, observed_year_range, ForecastSnapshot, SnapshotSummary, DEFAULT_MIN_RECORDS};
