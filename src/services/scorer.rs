//! Advisory scoring.
//!
//! Converts raw meteorological variables into a three-level advisory
//! category. Precipitation is the primary signal; wind, gusts and
//! temperature contribute secondary penalties measured against the regional
//! baseline. Each factor is evaluated at both the summit and mid-slope and
//! the worse of the two counts; mid-slope turbulence can exceed summit
//! conditions in constrained terrain, so the summit is not unconditionally
//! authoritative.
//!
//! Every input field may be independently missing. Missing data degrades
//! field by field: no information means no penalty, and a missing
//! precipitation reading defaults the base category to Caution rather than
//! silently reading as dry.

use crate::models::{Category, DifficultyTier, RawSample};
use crate::services::baseline::Baseline;

/// Wind deviation over baseline (m/s) for a 2-point / 1-point penalty.
const WIND_DELTA_SEVERE_MS: f64 = 8.0;
const WIND_DELTA_NOTABLE_MS: f64 = 4.0;

/// Absolute gust thresholds (m/s). Gust baselines are too noisy to be
/// useful, so gusts are judged on absolute magnitude.
const GUST_SEVERE_MS: f64 = 25.0;
const GUST_NOTABLE_MS: f64 = 18.0;

/// Temperature drop below baseline (°C) for a 2-point / 1-point penalty.
/// Colder than the seasonal norm is the risk signal; warm deviations are not
/// penalised.
const TEMP_DROP_SEVERE_C: f64 = 10.0;
const TEMP_DROP_NOTABLE_C: f64 = 6.0;

/// Total penalty at which the category becomes Poor outright.
const PENALTY_POOR_THRESHOLD: u8 = 3;

/// Tier-dependent precipitation thresholds (mm per hour).
#[derive(Debug, Clone, Copy)]
pub struct RainThresholds {
    /// At or below this, the base category is Good
    pub good_mm: f64,
    /// At or below this (but above `good_mm`), the base category is Caution
    pub caution_mm: f64,
}

impl DifficultyTier {
    /// Beginner routes get the strictest thresholds, advanced the loosest.
    pub fn rain_thresholds(self) -> RainThresholds {
        match self {
            DifficultyTier::Beginner => RainThresholds {
                good_mm: 0.3,
                caution_mm: 3.0,
            },
            DifficultyTier::Intermediate => RainThresholds {
                good_mm: 0.5,
                caution_mm: 4.0,
            },
            DifficultyTier::Advanced => RainThresholds {
                good_mm: 0.8,
                caution_mm: 4.5,
            },
        }
    }
}

/// Score one time slot.
///
/// `summit` and `mid` are the extrapolated samples at the two elevations;
/// the baselines are the table entries for the matching elevation bands, or
/// `None` when the mountain's region is unrecognised.
pub fn score(
    tier: DifficultyTier,
    summit: &RawSample,
    mid: &RawSample,
    summit_baseline: Option<Baseline>,
    mid_baseline: Option<Baseline>,
) -> Category {
    let base = base_category(summit.precipitation_mm, tier.rain_thresholds());
    if base == Category::Poor {
        // Precipitation dominates; penalties cannot make it worse
        return Category::Poor;
    }

    let penalty = total_penalty(summit, mid, summit_baseline, mid_baseline);

    if penalty >= PENALTY_POOR_THRESHOLD {
        Category::Poor
    } else if penalty >= 1 {
        // Good is downgraded to Caution; Caution stays Caution
        base.max(Category::Caution)
    } else {
        base
    }
}

/// Base category from summit precipitation alone.
///
/// Missing precipitation is conservative Caution, never silently Good.
fn base_category(precipitation_mm: Option<f64>, thresholds: RainThresholds) -> Category {
    match precipitation_mm {
        None => Category::Caution,
        Some(p) if p <= thresholds.good_mm => Category::Good,
        Some(p) if p <= thresholds.caution_mm => Category::Caution,
        Some(_) => Category::Poor,
    }
}

/// Sum of the three secondary penalties, each taking the worse of summit and
/// mid-slope. Range 0–6 in principle, 0–4 in practice.
fn total_penalty(
    summit: &RawSample,
    mid: &RawSample,
    summit_baseline: Option<Baseline>,
    mid_baseline: Option<Baseline>,
) -> u8 {
    let wind = wind_penalty(summit.wind_speed_ms, summit_baseline)
        .max(wind_penalty(mid.wind_speed_ms, mid_baseline));
    let gust = gust_penalty(summit.wind_gust_ms).max(gust_penalty(mid.wind_gust_ms));
    let temp = temp_penalty(summit.temperature_c, summit_baseline)
        .max(temp_penalty(mid.temperature_c, mid_baseline));
    wind + gust + temp
}

/// Penalty for wind above the regional baseline.
///
/// Baseline-relative, not absolute: a normally-windy mountain is not flagged
/// for being windy in its normal range. Missing observation or baseline
/// contributes nothing.
fn wind_penalty(observed_ms: Option<f64>, baseline: Option<Baseline>) -> u8 {
    match (observed_ms, baseline) {
        (Some(wind), Some(base)) => {
            let delta = wind - base.expected_wind_ms;
            if delta >= WIND_DELTA_SEVERE_MS {
                2
            } else if delta >= WIND_DELTA_NOTABLE_MS {
                1
            } else {
                0
            }
        }
        _ => 0,
    }
}

fn gust_penalty(observed_ms: Option<f64>) -> u8 {
    match observed_ms {
        Some(gust) if gust >= GUST_SEVERE_MS => 2,
        Some(gust) if gust >= GUST_NOTABLE_MS => 1,
        _ => 0,
    }
}

/// Penalty for temperature below the seasonal baseline.
fn temp_penalty(observed_c: Option<f64>, baseline: Option<Baseline>) -> u8 {
    match (observed_c, baseline) {
        (Some(temp), Some(base)) => {
            let drop = base.expected_temp_c - temp;
            if drop >= TEMP_DROP_SEVERE_C {
                2
            } else if drop >= TEMP_DROP_NOTABLE_C {
                1
            } else {
                0
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASELINE: Baseline = Baseline {
        expected_wind_ms: 6.0,
        expected_temp_c: 10.0,
    };

    /// Sample exactly at baseline, dry.
    fn calm_sample() -> RawSample {
        RawSample {
            precipitation_mm: Some(0.0),
            wind_speed_ms: Some(BASELINE.expected_wind_ms),
            wind_gust_ms: Some(8.0),
            temperature_c: Some(BASELINE.expected_temp_c),
        }
    }

    #[test]
    fn test_dry_at_baseline_is_good() {
        // End-to-end scenario: 0.0 mm, wind/gust/temp at baseline ⇒ Good
        let s = calm_sample();
        let cat = score(
            DifficultyTier::Intermediate,
            &s,
            &s,
            Some(BASELINE),
            Some(BASELINE),
        );
        assert_eq!(cat, Category::Good);
    }

    #[test]
    fn test_heavy_rain_is_poor_for_every_tier() {
        // 5.0 mm exceeds the caution threshold of all tiers
        let mut s = calm_sample();
        s.precipitation_mm = Some(5.0);
        for tier in [
            DifficultyTier::Beginner,
            DifficultyTier::Intermediate,
            DifficultyTier::Advanced,
        ] {
            let cat = score(tier, &s, &s, Some(BASELINE), Some(BASELINE));
            assert_eq!(cat, Category::Poor, "tier {:?}", tier);
        }
    }

    #[test]
    fn test_severe_wind_penalty_alone_yields_caution() {
        // Wind at baseline + 9 m/s ⇒ 2 penalty points ⇒ Caution, not Poor
        // (Poor requires a total of 3)
        let mut s = calm_sample();
        s.wind_speed_ms = Some(BASELINE.expected_wind_ms + 9.0);
        let cat = score(
            DifficultyTier::Intermediate,
            &s,
            &s,
            Some(BASELINE),
            Some(BASELINE),
        );
        assert_eq!(cat, Category::Caution);
    }

    #[test]
    fn test_penalty_three_yields_poor() {
        // Wind +9 (2 points) and temp 7 °C below baseline (1 point) ⇒ Poor
        let mut s = calm_sample();
        s.wind_speed_ms = Some(BASELINE.expected_wind_ms + 9.0);
        s.temperature_c = Some(BASELINE.expected_temp_c - 7.0);
        let cat = score(
            DifficultyTier::Intermediate,
            &s,
            &s,
            Some(BASELINE),
            Some(BASELINE),
        );
        assert_eq!(cat, Category::Poor);
    }

    #[test]
    fn test_single_notable_penalty_downgrades_good_to_caution() {
        let mut s = calm_sample();
        s.wind_speed_ms = Some(BASELINE.expected_wind_ms + 4.0);
        let cat = score(
            DifficultyTier::Intermediate,
            &s,
            &s,
            Some(BASELINE),
            Some(BASELINE),
        );
        assert_eq!(cat, Category::Caution);
    }

    #[test]
    fn test_monotonic_in_precipitation() {
        // Increasing precipitation never improves the category
        let mut prev = Category::Good;
        for precip in [0.0, 0.2, 0.5, 1.0, 2.0, 4.0, 4.5, 6.0, 20.0] {
            let mut s = calm_sample();
            s.precipitation_mm = Some(precip);
            let cat = score(
                DifficultyTier::Intermediate,
                &s,
                &s,
                Some(BASELINE),
                Some(BASELINE),
            );
            assert!(cat >= prev, "category improved when rain increased");
            prev = cat;
        }
        assert_eq!(prev, Category::Poor);
    }

    #[test]
    fn test_all_missing_except_dry_precip_is_good() {
        // No penalty without data: only precipitation present, below the
        // good threshold ⇒ Good
        let s = RawSample {
            precipitation_mm: Some(0.1),
            ..RawSample::default()
        };
        let cat = score(DifficultyTier::Intermediate, &s, &s, None, None);
        assert_eq!(cat, Category::Good);
    }

    #[test]
    fn test_missing_precipitation_defaults_to_caution() {
        let s = RawSample {
            precipitation_mm: None,
            ..calm_sample()
        };
        let cat = score(
            DifficultyTier::Intermediate,
            &s,
            &s,
            Some(BASELINE),
            Some(BASELINE),
        );
        assert_eq!(cat, Category::Caution);
    }

    #[test]
    fn test_missing_baseline_means_no_wind_or_temp_penalty() {
        // Hurricane-force wind and brutal cold, but no baseline to compare
        // against ⇒ zero penalty from those factors
        let s = RawSample {
            precipitation_mm: Some(0.0),
            wind_speed_ms: Some(40.0),
            wind_gust_ms: Some(10.0),
            temperature_c: Some(-30.0),
        };
        let cat = score(DifficultyTier::Intermediate, &s, &s, None, None);
        assert_eq!(cat, Category::Good);
    }

    #[test]
    fn test_gust_penalty_is_absolute() {
        // Gusts are penalised on magnitude even without a baseline
        let s = RawSample {
            precipitation_mm: Some(0.0),
            wind_speed_ms: None,
            wind_gust_ms: Some(26.0),
            temperature_c: None,
        };
        let cat = score(DifficultyTier::Intermediate, &s, &s, None, None);
        assert_eq!(cat, Category::Caution);
    }

    #[test]
    fn test_worse_of_summit_and_mid_counts() {
        // Calm summit, violent mid-slope: the mid-slope penalty wins
        let summit = calm_sample();
        let mut mid = calm_sample();
        mid.wind_speed_ms = Some(BASELINE.expected_wind_ms + 9.0);
        mid.temperature_c = Some(BASELINE.expected_temp_c - 11.0);
        let cat = score(
            DifficultyTier::Intermediate,
            &summit,
            &mid,
            Some(BASELINE),
            Some(BASELINE),
        );
        // 2 (wind) + 2 (temp) = 4 ⇒ Poor
        assert_eq!(cat, Category::Poor);
    }

    #[test]
    fn test_rain_poor_ignores_calm_secondary_factors() {
        let mut s = calm_sample();
        s.precipitation_mm = Some(10.0);
        let cat = score(
            DifficultyTier::Advanced,
            &s,
            &s,
            Some(BASELINE),
            Some(BASELINE),
        );
        assert_eq!(cat, Category::Poor);
    }

    #[test]
    fn test_tier_thresholds_ordering() {
        // 0.4 mm: rain for beginners, still Good for intermediate+
        let mut s = calm_sample();
        s.precipitation_mm = Some(0.4);
        assert_eq!(
            score(DifficultyTier::Beginner, &s, &s, Some(BASELINE), Some(BASELINE)),
            Category::Caution
        );
        assert_eq!(
            score(
                DifficultyTier::Intermediate,
                &s,
                &s,
                Some(BASELINE),
                Some(BASELINE)
            ),
            Category::Good
        );
    }
}
