//! Outbreak table loading.
//!
//! Turns the raw outbreak CSV into normalized [`OutbreakRecord`]s, degrading
//! malformed fields rather than rejecting rows.
//!
//! # Example
//!
//! ```no_run
//! use outbreak_forecast::io::load_records_or_sample;
//! use std::path::Path;
//!
//! let table = load_records_or_sample(Path::new("data/wahis_outbreak_details.csv"));
//! println!("Loaded {} records", table.records.len());
//! ```
//!
//! [`OutbreakRecord`]: crate::models::OutbreakRecord

pub mod loaders;


pub use loaders::{
    calculate_checksum, load_records, load_records_or_sample, parse_records, sample_records,
    sample_table, LoadedTable, RawOutbreakRow, TableSource,
};
