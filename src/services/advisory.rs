//! Advisory assembly.
//!
//! Orchestrates per-day, per-slot evaluation across the 4-day horizon:
//! for each calendar day and fixed time slot, the raw sample is located by
//! exact timestamp, projected to mid-slope and summit elevations, scored
//! against the regional baselines, and recorded in an advisory grid with a
//! parallel detail grid holding the numeric justification for each cell.
//!
//! When the forecast provider is unreachable the assembler substitutes a
//! synthetic series of well-formed, benign constants and tags the report
//! `source: synthetic` so a placeholder can never masquerade as a live
//! forecast.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::models::{Category, Mountain, RawSample};
use crate::services::baseline::{self, Baseline, ElevationBand, Region};
use crate::services::cache::{self, ForecastCache};
use crate::services::elevation;
use crate::services::open_meteo::{HourlySeries, OpenMeteoClient};
use crate::services::scorer;

/// Fixed time slots evaluated per day, local time (matches the UI).
pub const TIME_SLOTS: [&str; 6] = ["06:00", "08:00", "10:00", "12:00", "14:00", "16:00"];

/// Forecast horizon: today plus three more days.
pub const HORIZON_DAYS: i64 = 4;

/// Offset of the forecast timezone (Asia/Tokyo, no DST).
const JST_OFFSET_HOURS: i64 = 9;

/// Where the underlying series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForecastOrigin {
    /// Fetched from the weather provider (possibly via cache)
    Live,
    /// Placeholder substituted after a provider failure
    Synthetic,
}

/// Numeric inputs behind one advisory cell, for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SlotDetail {
    pub precipitation_mm: Option<f64>,
    pub summit_wind_ms: Option<f64>,
    pub mid_wind_ms: Option<f64>,
    pub summit_gust_ms: Option<f64>,
    pub mid_gust_ms: Option<f64>,
    pub summit_temperature_c: Option<f64>,
    pub mid_temperature_c: Option<f64>,
    /// Baseline used at the summit band, if the region was recognised
    pub summit_baseline: Option<Baseline>,
    /// Baseline used at the mid-slope band, if the region was recognised
    pub mid_baseline: Option<Baseline>,
}

/// Date → slot label → category. `None` means no data for that slot.
pub type AdvisoryGrid = BTreeMap<String, BTreeMap<String, Option<Category>>>;

/// Parallel structure holding the numeric justification per cell.
pub type DetailGrid = BTreeMap<String, BTreeMap<String, Option<SlotDetail>>>;

/// Report metadata: provenance and the elevations used.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvisoryMeta {
    pub source: ForecastOrigin,
    pub fetched_at: DateTime<Utc>,
    /// Provider's modeled surface elevation (lapse-rate reference point)
    pub source_elevation_m: Option<f64>,
    /// Mid-slope elevation the samples were projected to
    pub mid_elevation_m: Option<f64>,
    /// Summit elevation from the registry
    pub summit_elevation_m: Option<f64>,
}

/// Full advisory output for one mountain.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdvisoryReport {
    pub advisory: AdvisoryGrid,
    pub detail: DetailGrid,
    pub meta: AdvisoryMeta,
}

/// Today's date in the forecast timezone. The provider returns local
/// timestamps, so date keys must be local too.
pub fn today_local() -> NaiveDate {
    (Utc::now() + Duration::hours(JST_OFFSET_HOURS)).date_naive()
}

/// Resolve the advisory for one mountain: cache → provider → synthetic.
///
/// Never fails. A provider error is recovered locally by substituting a
/// synthetic series; the only trace of it is `meta.source` and a warning in
/// the log.
pub async fn resolve_advisory(
    client: &OpenMeteoClient,
    forecast_cache: &dyn ForecastCache,
    mountain: &Mountain,
    today: NaiveDate,
) -> AdvisoryReport {
    let key = cache::coordinate_key(mountain.lat, mountain.lng);

    let series = match forecast_cache.get(&key) {
        Some(series) => Some(series),
        None => match client.fetch_hourly(mountain.lat, mountain.lng).await {
            Ok(series) => {
                forecast_cache.set(&key, series.clone());
                Some(series)
            }
            Err(e) => {
                tracing::warn!(
                    "Open-Meteo unavailable for {} ({}, {}), serving synthetic forecast: {}",
                    mountain.id,
                    mountain.lat,
                    mountain.lng,
                    e
                );
                None
            }
        },
    };

    match series {
        Some(series) => build(mountain, &series, ForecastOrigin::Live, Utc::now(), today),
        None => build(
            mountain,
            &synthetic_series(today),
            ForecastOrigin::Synthetic,
            Utc::now(),
            today,
        ),
    }
}

/// Build the advisory and detail grids from an hourly series.
///
/// Deterministic for fixed inputs: `today` is an explicit parameter and the
/// real-data path contains no randomness.
pub fn build(
    mountain: &Mountain,
    series: &HourlySeries,
    origin: ForecastOrigin,
    fetched_at: DateTime<Utc>,
    today: NaiveDate,
) -> AdvisoryReport {
    let source_elevation = series.source_elevation_m;
    let summit_elevation = mountain.elevation_m;
    let mid_elevation = mid_elevation(source_elevation, summit_elevation);
    let region = Region::from_coords(mountain.lat, mountain.lng);

    let mut advisory: AdvisoryGrid = BTreeMap::new();
    let mut detail: DetailGrid = BTreeMap::new();

    for day in 0..HORIZON_DAYS {
        let date = today + Duration::days(day);
        let date_key = date.format("%Y-%m-%d").to_string();
        let month = date.month();

        let mut day_advisory = BTreeMap::new();
        let mut day_detail = BTreeMap::new();

        for slot in TIME_SLOTS {
            let timestamp = format!("{}T{}", date_key, slot);
            match series.sample_at(&timestamp) {
                None => {
                    // No matching timestamp means no data, not an approximation
                    day_advisory.insert(slot.to_string(), None);
                    day_detail.insert(slot.to_string(), None);
                }
                Some(raw) => {
                    let summit =
                        elevation::project(&raw, summit_elevation, source_elevation);
                    let mid = elevation::project(&raw, mid_elevation, source_elevation);

                    let summit_baseline = baseline_at(region, summit_elevation, source_elevation, month);
                    let mid_baseline = baseline_at(region, mid_elevation, source_elevation, month);

                    let category = scorer::score(
                        mountain.tier,
                        &summit.sample,
                        &mid.sample,
                        summit_baseline,
                        mid_baseline,
                    );

                    day_advisory.insert(slot.to_string(), Some(category));
                    day_detail.insert(
                        slot.to_string(),
                        Some(slot_detail(&summit.sample, &mid.sample, summit_baseline, mid_baseline)),
                    );
                }
            }
        }

        advisory.insert(date_key.clone(), day_advisory);
        detail.insert(date_key, day_detail);
    }

    AdvisoryReport {
        advisory,
        detail,
        meta: AdvisoryMeta {
            source: origin,
            fetched_at,
            source_elevation_m: source_elevation,
            mid_elevation_m: mid_elevation,
            summit_elevation_m: summit_elevation,
        },
    }
}

/// Mid-slope elevation: midpoint of source and summit, or half the summit
/// when the provider reported no surface elevation. None when the summit
/// elevation itself is unknown.
fn mid_elevation(source_m: Option<f64>, summit_m: Option<f64>) -> Option<f64> {
    match (source_m, summit_m) {
        (Some(source), Some(summit)) => Some(((source + summit) / 2.0).round()),
        (None, Some(summit)) => Some((summit * 0.5).round()),
        _ => None,
    }
}

/// Baseline for the band at the given target elevation. Falls back to the
/// provider's surface elevation, then to sea level, for band selection when
/// the target is unknown; returns None only when the region is unrecognised.
fn baseline_at(
    region: Option<Region>,
    target_m: Option<f64>,
    source_m: Option<f64>,
    month: u32,
) -> Option<Baseline> {
    let band = ElevationBand::of(target_m.or(source_m).unwrap_or(0.0));
    region.map(|r| baseline::lookup(r, band, month))
}

fn slot_detail(
    summit: &RawSample,
    mid: &RawSample,
    summit_baseline: Option<Baseline>,
    mid_baseline: Option<Baseline>,
) -> SlotDetail {
    SlotDetail {
        precipitation_mm: summit.precipitation_mm,
        summit_wind_ms: summit.wind_speed_ms,
        mid_wind_ms: mid.wind_speed_ms,
        summit_gust_ms: summit.wind_gust_ms,
        mid_gust_ms: mid.wind_gust_ms,
        summit_temperature_c: summit.temperature_c,
        mid_temperature_c: mid.temperature_c,
        summit_baseline,
        mid_baseline,
    }
}

/// Well-formed placeholder series covering every day and slot in the
/// horizon. Benign constants; no provider elevation, so samples pass through
/// unadjusted.
pub fn synthetic_series(today: NaiveDate) -> HourlySeries {
    let mut time = Vec::with_capacity(HORIZON_DAYS as usize * TIME_SLOTS.len());
    for day in 0..HORIZON_DAYS {
        let date_key = (today + Duration::days(day)).format("%Y-%m-%d").to_string();
        for slot in TIME_SLOTS {
            time.push(format!("{}T{}", date_key, slot));
        }
    }
    let n = time.len();
    HourlySeries {
        time,
        precipitation_mm: vec![Some(0.0); n],
        wind_speed_ms: vec![Some(2.0); n],
        wind_gust_ms: vec![Some(4.0); n],
        temperature_c: vec![Some(15.0); n],
        source_elevation_m: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DifficultyTier;

    fn yarigatake() -> Mountain {
        Mountain {
            id: "yarigatake".to_string(),
            name: "Yarigatake".to_string(),
            lat: 36.342,
            lng: 137.648,
            elevation_m: Some(3180.0),
            tier: DifficultyTier::Advanced,
        }
    }

    /// A live-style series covering only the first day's 06:00 and 08:00.
    fn partial_series(today: NaiveDate) -> HourlySeries {
        let date_key = today.format("%Y-%m-%d").to_string();
        HourlySeries {
            time: vec![
                format!("{}T06:00", date_key),
                format!("{}T08:00", date_key),
            ],
            precipitation_mm: vec![Some(0.0), Some(6.0)],
            wind_speed_ms: vec![Some(3.0), Some(3.0)],
            wind_gust_ms: vec![Some(5.0), Some(5.0)],
            temperature_c: vec![Some(10.0), Some(10.0)],
            source_elevation_m: Some(2100.0),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn test_missing_timestamps_yield_unknown_cells() {
        let mountain = yarigatake();
        let report = build(
            &mountain,
            &partial_series(today()),
            ForecastOrigin::Live,
            Utc::now(),
            today(),
        );

        let first_day = report.advisory.get("2026-08-30").unwrap();
        assert!(first_day.get("06:00").unwrap().is_some());
        assert!(first_day.get("08:00").unwrap().is_some());
        // 10:00 has no matching timestamp, so unknown in both grids
        assert!(first_day.get("10:00").unwrap().is_none());
        assert!(report
            .detail
            .get("2026-08-30")
            .unwrap()
            .get("10:00")
            .unwrap()
            .is_none());

        // Day 2 has no data at all
        let day2 = report.advisory.get("2026-08-31").unwrap();
        assert!(day2.values().all(|cell| cell.is_none()));
    }

    #[test]
    fn test_grid_shape_covers_horizon_and_slots() {
        let report = build(
            &yarigatake(),
            &partial_series(today()),
            ForecastOrigin::Live,
            Utc::now(),
            today(),
        );
        assert_eq!(report.advisory.len(), HORIZON_DAYS as usize);
        for day in report.advisory.values() {
            assert_eq!(day.len(), TIME_SLOTS.len());
        }
        assert_eq!(report.detail.len(), HORIZON_DAYS as usize);
    }

    #[test]
    fn test_heavy_rain_slot_scores_poor() {
        let report = build(
            &yarigatake(),
            &partial_series(today()),
            ForecastOrigin::Live,
            Utc::now(),
            today(),
        );
        let first_day = report.advisory.get("2026-08-30").unwrap();
        // 6.0 mm at 08:00 exceeds even the advanced caution threshold
        assert_eq!(first_day.get("08:00").unwrap(), &Some(Category::Poor));
    }

    #[test]
    fn test_detail_cell_records_baselines_and_elevations() {
        let report = build(
            &yarigatake(),
            &partial_series(today()),
            ForecastOrigin::Live,
            Utc::now(),
            today(),
        );
        let cell = report
            .detail
            .get("2026-08-30")
            .unwrap()
            .get("06:00")
            .unwrap()
            .as_ref()
            .unwrap();

        // Yarigatake is in the Alps region, so baselines must be present
        assert!(cell.summit_baseline.is_some());
        assert!(cell.mid_baseline.is_some());
        // Summit is ~1080 m above the model surface: colder and windier
        assert!(cell.summit_temperature_c.unwrap() < 10.0);
        assert!(cell.summit_wind_ms.unwrap() > 3.0);

        // Midpoint of 2100 and 3180
        assert_eq!(report.meta.mid_elevation_m, Some(2640.0));
        assert_eq!(report.meta.summit_elevation_m, Some(3180.0));
        assert_eq!(report.meta.source_elevation_m, Some(2100.0));
    }

    #[test]
    fn test_build_is_deterministic() {
        let mountain = yarigatake();
        let series = partial_series(today());
        let fetched = Utc::now();
        let a = build(&mountain, &series, ForecastOrigin::Live, fetched, today());
        let b = build(&mountain, &series, ForecastOrigin::Live, fetched, today());
        assert_eq!(a.advisory, b.advisory);
        assert_eq!(a.detail, b.detail);
    }

    #[test]
    fn test_synthetic_series_fully_populates_grid() {
        let mountain = yarigatake();
        let report = build(
            &mountain,
            &synthetic_series(today()),
            ForecastOrigin::Synthetic,
            Utc::now(),
            today(),
        );

        assert_eq!(report.meta.source, ForecastOrigin::Synthetic);
        // The failure itself must not produce unknown cells
        for day in report.advisory.values() {
            for cell in day.values() {
                assert!(cell.is_some());
            }
        }
        // No provider elevation: samples pass through, mid = summit / 2
        assert_eq!(report.meta.source_elevation_m, None);
        assert_eq!(report.meta.mid_elevation_m, Some(1590.0));
    }

    #[test]
    fn test_mid_elevation_rules() {
        assert_eq!(mid_elevation(Some(1000.0), Some(3000.0)), Some(2000.0));
        assert_eq!(mid_elevation(None, Some(3001.0)), Some(1501.0));
        assert_eq!(mid_elevation(Some(1000.0), None), None);
        assert_eq!(mid_elevation(None, None), None);
    }

    #[tokio::test]
    async fn test_provider_failure_yields_synthetic_report() {
        use crate::services::cache::MemoryCache;
        use std::time::Duration as StdDuration;

        // Nothing listens on the discard port, so the fetch fails fast
        let client = OpenMeteoClient::new("http://127.0.0.1:9/v1/forecast", "test-agent");
        let cache = MemoryCache::new(StdDuration::from_secs(60));

        let report = resolve_advisory(&client, &cache, &yarigatake(), today()).await;

        assert_eq!(report.meta.source, ForecastOrigin::Synthetic);
        // The failure itself causes no unknown cells
        for day in report.advisory.values() {
            for cell in day.values() {
                assert!(cell.is_some());
            }
        }
    }

    #[tokio::test]
    async fn test_cached_series_avoids_provider_entirely() {
        use crate::services::cache::{coordinate_key, ForecastCache, MemoryCache};
        use std::time::Duration as StdDuration;

        let mountain = yarigatake();
        let client = OpenMeteoClient::new("http://127.0.0.1:9/v1/forecast", "test-agent");
        let cache = MemoryCache::new(StdDuration::from_secs(60));
        cache.set(
            &coordinate_key(mountain.lat, mountain.lng),
            partial_series(today()),
        );

        let report = resolve_advisory(&client, &cache, &mountain, today()).await;

        // Served from cache, so the dead provider endpoint never mattered
        assert_eq!(report.meta.source, ForecastOrigin::Live);
        assert_eq!(report.meta.source_elevation_m, Some(2100.0));
    }

    #[test]
    fn test_unknown_summit_elevation_still_scores() {
        let mut mountain = yarigatake();
        mountain.elevation_m = None;
        let report = build(
            &mountain,
            &partial_series(today()),
            ForecastOrigin::Live,
            Utc::now(),
            today(),
        );
        // Samples pass through unadjusted but slots with data still score
        let first_day = report.advisory.get("2026-08-30").unwrap();
        assert!(first_day.get("06:00").unwrap().is_some());
        assert_eq!(report.meta.mid_elevation_m, None);
        assert_eq!(report.meta.summit_elevation_m, None);
    }
}
