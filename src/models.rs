//! Domain types shared across services and routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Difficulty tier of a mountain's standard route.
///
/// Drives the precipitation thresholds in the scorer: beginner routes get
/// stricter thresholds, advanced routes looser ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

/// A mountain in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Mountain {
    /// Stable slug identifier, e.g. "yarigatake"
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Summit elevation in metres. None when the registry has no value.
    pub elevation_m: Option<f64>,
    /// Route difficulty tier
    pub tier: DifficultyTier,
}

/// One hourly forecast point.
///
/// Any field may be unknown: absent or non-finite provider values become
/// `None` at the provider boundary and are never coerced to 0 in the scoring
/// path. A quantity that is absent contributes no penalty; a quantity that is
/// 0 contributes its normal score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSample {
    pub precipitation_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_gust_ms: Option<f64>,
    pub temperature_c: Option<f64>,
}

/// Advisory category for one time slot.
///
/// Ordered by severity: `Good < Caution < Poor`, so `max` picks the worse of
/// two categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Good,
    Caution,
    Poor,
}
