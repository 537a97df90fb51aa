//! Elevation extrapolation.
//!
//! Forecast providers model one surface elevation per grid cell; a hiker
//! cares about conditions at mid-slope and at the summit. This module
//! projects a raw forecast sample from the provider's modeled elevation to an
//! arbitrary target elevation:
//!
//! - temperature follows the standard-atmosphere lapse rate (6.5 °C / 1000 m)
//! - wind and gusts are scaled by a bounded exposure factor (higher places
//!   are windier, but never implausibly so)
//! - precipitation is treated as uniform across the slope and passes through

use crate::models::RawSample;

/// Standard-atmosphere temperature lapse rate, °C per 1000 m of ascent.
pub const LAPSE_RATE_C_PER_KM: f64 = 6.5;

/// Wind exposure ramp: +15% per 1000 m of positive elevation delta.
pub const EXPOSURE_RAMP_PER_KM: f64 = 0.15;

/// Exposure factor clamp bounds. The factor never drops below 1.0 (descending
/// does not predict calmer wind than the model surface) and never exceeds
/// 1.30 regardless of how large the elevation delta is.
pub const EXPOSURE_FACTOR_MIN: f64 = 1.0;
pub const EXPOSURE_FACTOR_MAX: f64 = 1.30;

/// A raw sample projected to a target elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedSample {
    pub sample: RawSample,
    /// False when either elevation was unknown and the raw values passed
    /// through unchanged.
    pub adjusted: bool,
}

/// Project a raw forecast sample to `target_m`, given that it was modeled at
/// `source_m`.
///
/// If either elevation is unknown the sample is returned unchanged and
/// flagged unadjusted; an elevation is never fabricated.
pub fn project(sample: &RawSample, target_m: Option<f64>, source_m: Option<f64>) -> AdjustedSample {
    let (Some(target), Some(source)) = (target_m, source_m) else {
        return AdjustedSample {
            sample: *sample,
            adjusted: false,
        };
    };

    let delta_km = (target - source) / 1000.0;
    let factor = exposure_factor(delta_km);

    AdjustedSample {
        sample: RawSample {
            precipitation_mm: sample.precipitation_mm,
            wind_speed_ms: sample.wind_speed_ms.map(|w| w * factor),
            wind_gust_ms: sample.wind_gust_ms.map(|g| g * factor),
            temperature_c: sample
                .temperature_c
                .map(|t| t - LAPSE_RATE_C_PER_KM * delta_km),
        },
        adjusted: true,
    }
}

fn exposure_factor(delta_km: f64) -> f64 {
    (1.0 + EXPOSURE_RAMP_PER_KM * delta_km).clamp(EXPOSURE_FACTOR_MIN, EXPOSURE_FACTOR_MAX)
}
