//! Open-Meteo forecast client.
//!
//! Fetches hourly weather forecasts from the Open-Meteo API.
//! See: https://open-meteo.com/en/docs
//!
//! The response covers a 4-day horizon of hourly precipitation, wind, gusts
//! and temperature, plus the provider's modeled surface elevation for the
//! grid cell, the reference point for lapse-rate extrapolation. Non-finite
//! or absent values become `None` here, at the boundary, so the scoring path
//! never has to guess whether 0 means "calm" or "unknown".

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::RawSample;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOURLY_FIELDS: &str = "precipitation,wind_speed_10m,wind_gusts_10m,temperature_2m";
const FORECAST_DAYS: u8 = 4;
const TIMEZONE: &str = "Asia/Tokyo";

/// Client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

/// Hourly forecast series for one coordinate.
///
/// Parallel arrays, exactly as the provider ships them. Timestamps are local
/// ("YYYY-MM-DDTHH:MM" in the requested timezone) and are matched exactly,
/// no interpolation between hours.
#[derive(Debug, Clone)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub precipitation_mm: Vec<Option<f64>>,
    pub wind_speed_ms: Vec<Option<f64>>,
    pub wind_gust_ms: Vec<Option<f64>>,
    pub temperature_c: Vec<Option<f64>>,
    /// Provider's modeled surface elevation for the grid cell, if reported.
    pub source_elevation_m: Option<f64>,
}

impl HourlySeries {
    /// Extract the sample at an exact local timestamp ("YYYY-MM-DDTHH:MM").
    ///
    /// Returns `None` when the timestamp is not present in the series; that
    /// means "no data for this slot", not an approximation target.
    pub fn sample_at(&self, timestamp: &str) -> Option<RawSample> {
        let i = self.time.iter().position(|t| t == timestamp)?;
        Some(RawSample {
            precipitation_mm: finite(self.precipitation_mm.get(i).copied().flatten()),
            wind_speed_ms: finite(self.wind_speed_ms.get(i).copied().flatten()),
            wind_gust_ms: finite(self.wind_gust_ms.get(i).copied().flatten()),
            temperature_c: finite(self.temperature_c.get(i).copied().flatten()),
        })
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

// --- Open-Meteo JSON response types ---

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    elevation: Option<f64>,
    hourly: OpenMeteoHourly,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoHourly {
    time: Vec<String>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default, rename = "wind_speed_10m")]
    wind_speed: Vec<Option<f64>>,
    #[serde(default, rename = "wind_gusts_10m")]
    wind_gusts: Vec<Option<f64>>,
    #[serde(default, rename = "temperature_2m")]
    temperature: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// Fetch the hourly series for a coordinate, covering the 4-day horizon.
    ///
    /// Wind speeds are requested in m/s (`wind_speed_unit=ms`); the provider
    /// default is km/h. Failure is reported as an error, never as a partial
    /// payload; the caller decides whether to fall back to synthetic data.
    pub async fn fetch_hourly(&self, lat: f64, lng: f64) -> Result<HourlySeries, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| AppError::InternalError(format!("Invalid User-Agent: {}", e)))?,
        );

        let response = self
            .client
            .get(&self.base_url)
            .headers(headers)
            .query(&[
                ("latitude", format!("{:.5}", lat)),
                ("longitude", format!("{:.5}", lng)),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("wind_speed_unit", "ms".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("timezone", TIMEZONE.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Open-Meteo request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Open-Meteo returned HTTP {}",
                response.status()
            )));
        }

        let parsed: OpenMeteoResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Open-Meteo JSON parse error: {}", e))
        })?;

        if parsed.hourly.time.is_empty() {
            return Err(AppError::ExternalServiceError(
                "Open-Meteo returned empty hourly series".to_string(),
            ));
        }

        Ok(HourlySeries {
            time: parsed.hourly.time,
            precipitation_mm: parsed.hourly.precipitation,
            wind_speed_ms: parsed.hourly.wind_speed,
            wind_gust_ms: parsed.hourly.wind_gusts,
            temperature_c: parsed.hourly.temperature,
            source_elevation_m: parsed.elevation.filter(|e| e.is_finite()),
        })
    }
}
