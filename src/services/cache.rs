//! TTL-bounded forecast cache.
//!
//! An explicit, injectable cache boundary: the advisory service reads and
//! writes through the `ForecastCache` trait and never knows where entries
//! live. Entries are keyed by rounded coordinates; cached content is derived
//! data, so concurrent writers racing on the same key are fine,
//! last-write-wins.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::services::open_meteo::HourlySeries;

/// Default entry lifetime: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache key for a coordinate, rounded to 5 decimal places (~1 m).
pub fn coordinate_key(lat: f64, lng: f64) -> String {
    format!("{:.5},{:.5}", lat, lng)
}

/// Storage interface for fetched hourly series.
pub trait ForecastCache: Send + Sync {
    fn get(&self, key: &str) -> Option<HourlySeries>;
    fn set(&self, key: &str, series: HourlySeries);
}

/// In-memory implementation with per-cache TTL.
pub struct MemoryCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

struct Entry {
    stored_at: Instant,
    series: HourlySeries,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ForecastCache for MemoryCache {
    fn get(&self, key: &str) -> Option<HourlySeries> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.series.clone())
    }

    fn set(&self, key: &str, series: HourlySeries) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            Entry {
                stored_at: Instant::now(),
                series,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> HourlySeries {
        HourlySeries {
            time: vec!["2026-08-30T06:00".to_string()],
            precipitation_mm: vec![Some(0.0)],
            wind_speed_ms: vec![Some(2.0)],
            wind_gust_ms: vec![Some(4.0)],
            temperature_c: vec![Some(15.0)],
            source_elevation_m: Some(1000.0),
        }
    }

    #[test]
    fn test_coordinate_key_rounding() {
        assert_eq!(coordinate_key(36.34199999, 137.648), "36.34200,137.64800");
        assert_eq!(coordinate_key(36.342, 137.648), "36.34200,137.64800");
    }

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let key = coordinate_key(36.342, 137.648);
        assert!(cache.get(&key).is_none());

        cache.set(&key, series());
        let hit = cache.get(&key).unwrap();
        assert_eq!(hit.time.len(), 1);
        assert_eq!(hit.source_elevation_m, Some(1000.0));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new(Duration::from_secs(0));
        let key = coordinate_key(36.342, 137.648);
        cache.set(&key, series());
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let key = coordinate_key(35.0, 138.0);
        cache.set(&key, series());
        let mut newer = series();
        newer.source_elevation_m = Some(2000.0);
        cache.set(&key, newer);
        assert_eq!(cache.get(&key).unwrap().source_elevation_m, Some(2000.0));
    }
}
