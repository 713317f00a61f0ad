//! The fixed city-to-dataset mapping.
//!
//! Three cities ship with the project. Adding a city means adding a row to
//! [`CITY_FILES`]; the registry itself carries no other state.

use std::path::{Path, PathBuf};

/// Known cities and their dataset file names, in prompt order.
pub const CITY_FILES: [(&str, &str); 3] = [
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

/// One selectable city and the CSV file that backs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// Canonical lowercase city name, e.g. `"new york city"`.
    pub name: String,
    /// Full path to the city's trip CSV.
    pub path: PathBuf,
}

/// Immutable lookup table from city name to dataset location.
///
/// Built once from the data directory and passed explicitly to the prompt
/// loop and the dataset loader.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    cities: Vec<City>,
}

impl CityRegistry {
    /// Build the registry for datasets living under `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        let cities = CITY_FILES
            .iter()
            .map(|(name, file)| City {
                name: (*name).to_string(),
                path: data_dir.join(file),
            })
            .collect();
        Self { cities }
    }

    /// Resolve user input to a city, case-insensitively and ignoring
    /// surrounding whitespace. Returns `None` for unknown names.
    pub fn resolve(&self, input: &str) -> Option<&City> {
        let lower = input.trim().to_lowercase();
        self.cities.iter().find(|c| c.name == lower)
    }

    /// Canonical city names in prompt order.
    pub fn names(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
