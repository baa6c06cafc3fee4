//! Country registry and prediction targets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

crate::define_index_type!(usize, CountryId);

/// Countries the sequence models were trained on.
pub const SUPPORTED_COUNTRIES: [&str; 48] = [
    "Albania",
    "Argentina",
    "Armenia",
    "Bangladesh",
    "Belgium",
    "Bhutan",
    "Bosnia and Herzegovina",
    "Burkina Faso",
    "Cambodia",
    "Canada",
    "Ceuta",
    "Chile",
    "Chinese Taipei",
    "Congo (Rep. of the)",
    "Ecuador",
    "Egypt",
    "El Salvador",
    "Finland",
    "France",
    "French Guiana",
    "Germany",
    "Greece",
    "Honduras",
    "Hungary",
    "Indonesia",
    "Italy",
    "Kazakhstan",
    "Liberia",
    "Libya",
    "Lithuania",
    "Malaysia",
    "Melilla",
    "Moldova",
    "Myanmar",
    "Namibia",
    "Netherlands",
    "Nigeria",
    "North Macedonia",
    "Norway",
    "Palestine",
    "Slovakia",
    "South Africa",
    "Spain",
    "Sweden",
    "Thailand",
    "Timor-Leste",
    "United States of America",
    "Uruguay",
];

/// Fixed ordered set of supported countries with a stable zero-based id.
///
/// Ids follow lexicographic (byte-wise) order of the names, which is the
/// encoding the trained models expect.
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    ids: BTreeMap<String, CountryId>,
}

impl CountryRegistry {
    /// Build a registry from an arbitrary list of names. Duplicates collapse.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeMap<String, ()> = names.into_iter().map(|n| (n.into(), ())).collect();
        let ids = sorted
            .into_keys()
            .enumerate()
            .map(|(i, name)| (name, CountryId::new(i)))
            .collect();
        Self { ids }
    }

    /// Registry of the production country list.
    pub fn supported() -> Self {
        Self::new(SUPPORTED_COUNTRIES)
    }

    pub fn id_of(&self, country: &str) -> Option<CountryId> {
        self.ids.get(country).copied()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.ids.contains_key(country)
    }

    /// Country names in id order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::supported()
    }
}

/// Who a prediction is for: one named country or the all-countries aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PredictionTarget {
    All,
    Country(String),
}

impl PredictionTarget {
    pub fn as_str(&self) -> &str {
        match self {
            PredictionTarget::All => "all",
            PredictionTarget::Country(name) => name,
        }
    }
}

impl From<&str> for PredictionTarget {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            PredictionTarget::All
        } else {
            PredictionTarget::Country(trimmed.to_string())
        }
    }
}

impl From<String> for PredictionTarget {
    fn from(raw: String) -> Self {
        PredictionTarget::from(raw.as_str())
    }
}

impl From<PredictionTarget> for String {
    fn from(target: PredictionTarget) -> Self {
        target.as_str().to_string()
    }
}

impl fmt::Display for PredictionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
