//! Normalized outbreak records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Geographic coordinates of an outbreak location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Parse a `"lat,lon"` pair. Returns `None` for `"-"`, empty input, or
    /// anything that is not two finite numbers.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "-" {
            return None;
        }
        let (lat, lon) = raw.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// A single outbreak report after normalization. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakRecord {
    pub country: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cases: u64,
    pub deaths: u64,
}

impl OutbreakRecord {
    /// Whether the record can be placed in a time bucket.
    pub fn is_dated(&self) -> bool {
        self.start_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinates() {
        let c = Coordinates::parse("37.09, -95.71").unwrap();
        assert_eq!(c.lat, 37.09);
        assert_eq!(c.lon, -95.71);
    }

    #[test]
    fn test_parse_coordinates_absent() {
        assert!(Coordinates::parse("-").is_none());
        assert!(Coordinates::parse("").is_none());
        assert!(Coordinates::parse("37.09").is_none());
        assert!(Coordinates::parse("north,south").is_none());
        assert!(Coordinates::parse("NaN,1.0").is_none());
    }
}
