//! Mountain registry.
//!
//! Loads the set of mountains served by the API from a JSON data file at
//! startup, with a built-in fallback set of well-known peaks when no file is
//! present. Entries get stable slug identifiers derived from their names.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::models::{DifficultyTier, Mountain};

/// Errors that can occur while loading the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error reading mountain file: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Mountain file contains no entries")]
    Empty,
}

/// One entry in the JSON data file.
#[derive(Debug, Deserialize)]
struct MountainRecord {
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    elevation_m: Option<f64>,
    tier: DifficultyTier,
}

/// Immutable set of mountains, addressable by slug id.
pub struct MountainRegistry {
    mountains: Vec<Mountain>,
    by_id: HashMap<String, usize>,
}

impl MountainRegistry {
    /// Load from a JSON file: an array of `{name, lat, lng, elevation_m, tier}`.
    pub fn load_from_file(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<MountainRecord> = serde_json::from_str(&raw)?;
        if records.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self::from_records(records))
    }

    /// Built-in fallback set, used when no data file is found.
    pub fn builtin() -> Self {
        let records = vec![
            record("Rishiri", 45.178, 141.241, 1721.0, DifficultyTier::Intermediate),
            record("Rausu", 44.075, 145.122, 1661.0, DifficultyTier::Advanced),
            record("Iwate", 39.853, 141.001, 2038.0, DifficultyTier::Intermediate),
            record("Zao", 38.144, 140.439, 1841.0, DifficultyTier::Beginner),
            record("Tanigawa", 36.835, 138.930, 1977.0, DifficultyTier::Advanced),
            record("Yarigatake", 36.342, 137.648, 3180.0, DifficultyTier::Advanced),
            record("Kitadake", 35.674, 138.239, 3193.0, DifficultyTier::Advanced),
            record("Fuji", 35.361, 138.727, 3776.0, DifficultyTier::Intermediate),
            record("Takao", 35.625, 139.243, 599.0, DifficultyTier::Beginner),
            record("Ishizuchi", 33.767, 133.115, 1982.0, DifficultyTier::Intermediate),
        ];
        Self::from_records(records)
    }

    fn from_records(records: Vec<MountainRecord>) -> Self {
        let mut mountains = Vec::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());

        for r in records {
            let mut id = slugify(&r.name);
            // Disambiguate duplicate names rather than dropping entries
            let mut n = 2;
            while by_id.contains_key(&id) {
                id = format!("{}-{}", slugify(&r.name), n);
                n += 1;
            }
            by_id.insert(id.clone(), mountains.len());
            mountains.push(Mountain {
                id,
                name: r.name,
                lat: r.lat,
                lng: r.lng,
                elevation_m: r.elevation_m.filter(|e| e.is_finite()),
                tier: r.tier,
            });
        }

        Self { mountains, by_id }
    }

    pub fn list(&self) -> &[Mountain] {
        &self.mountains
    }

    pub fn get(&self, id: &str) -> Option<&Mountain> {
        self.by_id.get(id).map(|&i| &self.mountains[i])
    }

    pub fn len(&self) -> usize {
        self.mountains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }
}

fn record(name: &str, lat: f64, lng: f64, elevation_m: f64, tier: DifficultyTier) -> MountainRecord {
    MountainRecord {
        name: name.to_string(),
        lat,
        lng,
        elevation_m: Some(elevation_m),
        tier,
    }
}

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else become a
/// single hyphen.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
