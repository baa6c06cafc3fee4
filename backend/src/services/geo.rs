//! Country centres and map markers for cached predictions.

use serde::Serialize;

use crate::models::Coordinates;

use super::cache::PredictionKey;

/// Approximate centre of every registry country, plus a few common aliases
/// found in the source data.
pub const COUNTRY_CENTERS: [(&str, f64, f64); 52] = [
    ("Albania", 41.1533, 20.1683),
    ("Argentina", -38.4161, -63.6167),
    ("Armenia", 40.0691, 45.0382),
    ("Bangladesh", 23.6850, 90.3563),
    ("Belgium", 50.5039, 4.4699),
    ("Bhutan", 27.5142, 90.4336),
    ("Bosnia and Herzegovina", 43.9159, 17.6791),
    ("Burkina Faso", 12.2383, -1.5616),
    ("Cambodia", 12.5657, 104.9910),
    ("Canada", 56.1304, -106.3468),
    ("Ceuta", 35.8883, -5.3162),
    ("Chile", -35.6751, -71.5429),
    ("Chinese Taipei", 23.6978, 120.9605),
    ("Congo (Rep. of the)", -0.2280, 15.8277),
    ("Ecuador", -1.8312, -78.1834),
    ("Egypt", 26.8206, 30.8025),
    ("El Salvador", 13.7942, -88.8965),
    ("Finland", 61.9241, 25.7482),
    ("France", 46.6034, 1.8883),
    ("French Guiana", 3.9339, -53.1258),
    ("Germany", 51.1657, 10.4515),
    ("Greece", 39.0742, 21.8243),
    ("Honduras", 15.2000, -86.2419),
    ("Hungary", 47.1625, 19.5033),
    ("Indonesia", -0.7893, 113.9213),
    ("Italy", 41.8719, 12.5674),
    ("Kazakhstan", 48.0196, 66.9237),
    ("Liberia", 6.4281, -9.4295),
    ("Libya", 26.3351, 17.2283),
    ("Lithuania", 55.1694, 23.8813),
    ("Malaysia", 4.2105, 101.9758),
    ("Melilla", 35.2939, -2.9383),
    ("Moldova", 47.4116, 28.3699),
    ("Myanmar", 21.9162, 95.9560),
    ("Namibia", -22.9576, 18.4904),
    ("Netherlands", 52.1326, 5.2913),
    ("Nigeria", 9.0820, 8.6753),
    ("North Macedonia", 41.6086, 21.7453),
    ("Norway", 60.4720, 8.4689),
    ("Palestine", 31.9522, 35.2332),
    ("Slovakia", 48.6690, 19.6990),
    ("South Africa", -30.5595, 22.9375),
    ("Spain", 40.4637, -3.7492),
    ("Sweden", 60.1282, 18.6435),
    ("Thailand", 15.8700, 100.9925),
    ("Timor-Leste", -8.8742, 125.7275),
    ("United States of America", 37.0902, -95.7129),
    ("Uruguay", -32.5228, -55.7658),
    ("United States", 37.0902, -95.7129),
    ("Brazil", -14.2350, -51.9253),
    ("India", 20.5937, 78.9629),
    ("Australia", -25.2744, 133.7751),
];

pub fn country_center(country: &str) -> Option<Coordinates> {
    COUNTRY_CENTERS
        .iter()
        .find(|(name, _, _)| *name == country)
        .map(|&(_, lat, lon)| Coordinates { lat, lon })
}

/// Map marker for one predicted outbreak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionMarker {
    pub country: String,
    pub location: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub cases: String,
    pub deaths: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl PredictionMarker {
    fn new(country: &str, coordinates: Option<Coordinates>, start_date: String, value: u32) -> Self {
        Self {
            country: country.to_string(),
            location: format!("Predicted Outbreak in {}", country),
            start_date,
            end_date: None,
            cases: value.to_string(),
            deaths: (value / 10).max(1).to_string(),
            lat: coordinates.map(|c| c.lat),
            lon: coordinates.map(|c| c.lon),
            kind: "prediction",
        }
    }
}

/// Convert cached predictions into markers.
///
/// An `all` entry becomes one marker per known country centre. A country
/// without a known centre gets a marker with no coordinates.
pub fn prediction_markers(entries: &[(PredictionKey, u32)]) -> Vec<PredictionMarker> {
    let mut markers = Vec::new();
    for (key, value) in entries {
        let date = key.date.format("%Y-%m-%d").to_string();
        if key.country == "all" {
            markers.extend(COUNTRY_CENTERS.iter().map(|&(name, lat, lon)| {
                PredictionMarker::new(name, Some(Coordinates { lat, lon }), date.clone(), *value)
            }));
        } else {
            markers.push(PredictionMarker::new(&key.country, country_center(&key.country), date, *value));
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::date;
    use crate::models::{CountryRegistry, Granularity, PredictionTarget};

    fn key(country: &str) -> PredictionKey {
        PredictionKey::new(&PredictionTarget::from(country), Granularity::Weekly, date(2025, 3, 3))
    }

    #[test]
    fn test_every_registry_country_has_a_centre() {
        let registry = CountryRegistry::supported();
        assert!(registry.names().all(|name| country_center(name).is_some()));
    }

    #[test]
    fn test_country_marker() {
        let markers = prediction_markers(&[(key("Chile"), 25)]);
        assert_eq!(markers.len(), 1);
        let m = &markers[0];
        assert_eq!(m.location, "Predicted Outbreak in Chile");
        assert_eq!(m.start_date, "2025-03-03");
        assert_eq!(m.cases, "25");
        assert_eq!(m.deaths, "2");
        assert_eq!(m.lat, Some(-35.6751));
        assert_eq!(m.kind, "prediction");
    }

    #[test]
    fn test_deaths_floor_and_unknown_country() {
        let markers = prediction_markers(&[(key("Atlantis"), 3)]);
        assert_eq!(markers[0].deaths, "1");
        assert_eq!(markers[0].lat, None);
        assert_eq!(markers[0].lon, None);
    }

    #[test]
    fn test_all_expands_to_every_centre() {
        let markers = prediction_markers(&[(key("all"), 7)]);
        assert_eq!(markers.len(), COUNTRY_CENTERS.len());
        assert!(markers.iter().all(|m| m.cases == "7" && m.lat.is_some()));
    }

    #[test]
    fn test_marker_json_shape() {
        let markers = prediction_markers(&[(key("Spain"), 12)]);
        let json = serde_json::to_value(&markers[0]).unwrap();
        assert_eq!(json["type"], "prediction");
        assert!(json["end_date"].is_null());
    }
}
