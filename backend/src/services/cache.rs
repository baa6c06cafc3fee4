//! In-memory prediction cache.
//!
//! Entries live until the caller clears them; there is no TTL and no eviction.

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::models::{Granularity, PredictionTarget};

/// Composite cache key, rendered as `country_interval_date`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PredictionKey {
    pub country: String,
    pub interval: Granularity,
    pub date: NaiveDate,
}

impl PredictionKey {
    pub fn new(target: &PredictionTarget, interval: Granularity, date: NaiveDate) -> Self {
        Self {
            country: target.as_str().to_string(),
            interval,
            date,
        }
    }
}

impl fmt::Display for PredictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.country, self.interval, self.date.format("%Y-%m-%d"))
    }
}

/// Process-wide prediction store.
#[derive(Clone, Default)]
pub struct PredictionCache {
    entries: Arc<RwLock<BTreeMap<PredictionKey, u32>>>,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite.
    pub fn put(&self, key: PredictionKey, value: u32) {
        self.entries.write().insert(key, value);
    }

    pub fn get(&self, key: &PredictionKey) -> Option<u32> {
        self.entries.read().get(key).copied()
    }

    /// Snapshot of every entry keyed by its rendered key.
    pub fn get_all(&self) -> BTreeMap<String, u32> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    /// Snapshot of every entry with structured keys.
    pub fn entries(&self) -> Vec<(PredictionKey, u32)> {
        self.entries.read().iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_entries()
    }
}
