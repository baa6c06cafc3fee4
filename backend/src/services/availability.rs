//! Per-country data availability report.

use log::{info, warn};
use serde::Serialize;

use crate::models::{CountryRegistry, Granularity};
use crate::preprocessing::ForecastSnapshot;

/// A registry country with too little history for model predictions at one
/// granularity. Requests for it fall back to the mean estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityIssue {
    pub country: String,
    pub granularity: Granularity,
    pub found: usize,
    pub required: usize,
}

/// Every registry country whose weekly or monthly series is shorter than the
/// window length.
pub fn check_country_data_availability(
    snapshot: &ForecastSnapshot,
    registry: &CountryRegistry,
) -> Vec<AvailabilityIssue> {
    let mut issues = Vec::new();
    for country in registry.names() {
        for granularity in [Granularity::Weekly, Granularity::Monthly] {
            let Some(required) = granularity.window_len() else {
                continue;
            };
            let found = snapshot.series(granularity).country_len(country);
            if found < required {
                issues.push(AvailabilityIssue {
                    country: country.to_string(),
                    granularity,
                    found,
                    required,
                });
            }
        }
    }
    issues
}

/// Log a report once, summarised with per-country detail at debug level.
pub fn log_availability(issues: &[AvailabilityIssue], registry: &CountryRegistry) {
    if issues.is_empty() {
        info!("All {} countries have enough history for model predictions", registry.len());
        return;
    }
    warn!(
        "{} country/granularity pairs lack history and will use the fallback",
        issues.len()
    );
    for issue in issues {
        log::debug!(
            "{} ({}): {} buckets, need {}",
            issue.country,
            issue.granularity,
            issue.found,
            issue.required
        );
    }
}
