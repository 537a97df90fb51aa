//! Regional baseline tables.
//!
//! Expected wind speed and temperature per (region, elevation band, month).
//! The scorer flags
//! deviations from these baselines rather than absolute values, so a mountain
//! that is normally windy is not penalised for being windy in its normal
//! range.
//!
//! Values are climatological placeholders with the right seasonal shape:
//! coldest in Dec–Feb, warmest in Jul–Aug, windier at altitude and in the
//! north. They are tuning data, not code: swap the tables, not the lookup.

use serde::Serialize;
use utoipa::ToSchema;

/// Expected wind and temperature for a (region, band, month) cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Baseline {
    /// Typical sustained wind speed in m/s
    pub expected_wind_ms: f64,
    /// Typical air temperature in °C
    pub expected_temp_c: f64,
}

/// Coarse geographic region, derived from coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Hokkaido,
    Tohoku,
    /// Kanto and Joshinetsu
    East,
    /// Central highlands: Northern, Central and Southern Alps
    Alps,
    /// Western Honshu, Shikoku, Kyushu
    West,
}

impl Region {
    /// Bucket a coordinate into a region.
    ///
    /// Returns `None` for coordinates far outside the Japanese archipelago;
    /// downstream, a missing region means a missing baseline, which means
    /// zero wind/temperature penalties.
    pub fn from_coords(lat: f64, lng: f64) -> Option<Region> {
        if !(20.0..=50.0).contains(&lat) || !(120.0..=150.0).contains(&lng) {
            return None;
        }
        Some(if lat >= 41.5 {
            Region::Hokkaido
        } else if lat >= 37.4 {
            Region::Tohoku
        } else if lat >= 35.2 && (136.5..138.4).contains(&lng) {
            Region::Alps
        } else if lng >= 138.4 {
            Region::East
        } else {
            Region::West
        })
    }

    pub const ALL: [Region; 5] = [
        Region::Hokkaido,
        Region::Tohoku,
        Region::East,
        Region::Alps,
        Region::West,
    ];

    fn normals(self) -> &'static RegionNormals {
        match self {
            Region::Hokkaido => &HOKKAIDO,
            Region::Tohoku => &TOHOKU,
            Region::East => &EAST,
            Region::Alps => &ALPS,
            Region::West => &WEST,
        }
    }
}

/// Elevation band used to index the baseline tables.
///
/// Lapse-rate math stays continuous; the band is a table index only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElevationBand {
    /// Below 1500 m
    Low,
    /// 1500–2499 m
    Mid,
    /// 2500 m and above
    High,
}

impl ElevationBand {
    pub fn of(elevation_m: f64) -> ElevationBand {
        if elevation_m < 1500.0 {
            ElevationBand::Low
        } else if elevation_m < 2500.0 {
            ElevationBand::Mid
        } else {
            ElevationBand::High
        }
    }

    pub const ALL: [ElevationBand; 3] = [ElevationBand::Low, ElevationBand::Mid, ElevationBand::High];
}

/// Look up the baseline for a region, band and month (1–12).
///
/// Total over the declared domain. A month outside 1–12 is a programmer
/// error, not a data-quality issue, and panics.
pub fn lookup(region: Region, band: ElevationBand, month: u32) -> Baseline {
    assert!(
        (1..=12).contains(&month),
        "baseline month must be 1-12, got {}",
        month
    );
    let normals = region.normals();
    let b = band as usize;
    let m = (month - 1) as usize;
    Baseline {
        expected_wind_ms: normals.wind_ms[b][m],
        expected_temp_c: normals.temp_c[b][m],
    }
}

/// Per-region monthly normals, indexed [band][month - 1].
struct RegionNormals {
    wind_ms: [[f64; 12]; 3],
    temp_c: [[f64; 12]; 3],
}

const HOKKAIDO: RegionNormals = RegionNormals {
    wind_ms: [
        [6.0, 6.0, 5.5, 5.0, 4.5, 4.0, 4.0, 4.0, 4.5, 5.0, 5.5, 6.0],
        [8.5, 8.5, 8.0, 7.5, 7.0, 6.5, 6.0, 6.0, 6.5, 7.5, 8.0, 8.5],
        [11.5, 11.5, 11.0, 10.0, 9.0, 8.0, 7.5, 7.5, 8.5, 9.5, 10.5, 11.5],
    ],
    temp_c: [
        [-7.0, -6.0, -2.0, 5.0, 11.0, 15.0, 19.0, 20.0, 16.0, 9.0, 2.0, -4.0],
        [-14.0, -13.0, -9.0, -2.0, 4.0, 8.0, 12.0, 13.0, 9.0, 2.0, -5.0, -11.0],
        [-19.0, -18.0, -14.0, -7.0, -1.0, 3.0, 7.0, 8.0, 4.0, -3.0, -10.0, -16.0],
    ],
};

const TOHOKU: RegionNormals = RegionNormals {
    wind_ms: [
        [5.0, 5.0, 4.5, 4.5, 4.0, 3.5, 3.5, 3.5, 4.0, 4.5, 5.0, 5.0],
        [7.5, 7.5, 7.0, 7.0, 6.5, 6.0, 6.0, 6.0, 6.5, 7.0, 7.5, 7.5],
        [10.5, 10.5, 10.0, 9.5, 9.0, 8.0, 8.0, 8.0, 8.5, 9.0, 10.0, 10.5],
    ],
    temp_c: [
        [-2.0, -1.0, 2.0, 8.0, 14.0, 18.0, 22.0, 23.0, 19.0, 12.0, 6.0, 1.0],
        [-9.0, -8.0, -5.0, 1.0, 7.0, 11.0, 15.0, 16.0, 12.0, 5.0, -1.0, -6.0],
        [-15.0, -14.0, -11.0, -5.0, 1.0, 5.0, 9.0, 10.0, 6.0, -1.0, -7.0, -12.0],
    ],
};

const EAST: RegionNormals = RegionNormals {
    wind_ms: [
        [4.0, 4.0, 4.0, 3.5, 3.5, 3.0, 3.0, 3.0, 3.5, 3.5, 4.0, 4.0],
        [6.5, 6.5, 6.5, 6.0, 6.0, 5.5, 5.5, 5.5, 6.0, 6.0, 6.5, 6.5],
        [9.5, 9.5, 9.0, 8.5, 8.0, 7.5, 7.5, 7.5, 8.0, 8.5, 9.0, 9.5],
    ],
    temp_c: [
        [2.0, 3.0, 6.0, 12.0, 17.0, 20.0, 24.0, 26.0, 22.0, 16.0, 10.0, 5.0],
        [-5.0, -4.0, -1.0, 5.0, 10.0, 13.0, 17.0, 19.0, 15.0, 9.0, 3.0, -2.0],
        [-11.0, -10.0, -7.0, -1.0, 4.0, 7.0, 11.0, 13.0, 9.0, 3.0, -3.0, -8.0],
    ],
};

const ALPS: RegionNormals = RegionNormals {
    wind_ms: [
        [3.5, 3.5, 3.5, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 3.5, 3.5],
        [6.5, 6.5, 6.0, 6.0, 5.5, 5.0, 5.0, 5.0, 5.5, 6.0, 6.5, 6.5],
        [12.0, 12.0, 11.0, 10.0, 9.0, 8.0, 8.0, 8.0, 9.0, 10.0, 11.0, 12.0],
    ],
    temp_c: [
        [0.0, 1.0, 4.0, 10.0, 15.0, 18.0, 22.0, 23.0, 19.0, 13.0, 7.0, 2.0],
        [-7.0, -6.0, -3.0, 3.0, 8.0, 11.0, 15.0, 16.0, 12.0, 6.0, 0.0, -5.0],
        [-13.0, -12.0, -9.0, -3.0, 2.0, 5.0, 9.0, 10.0, 6.0, 0.0, -6.0, -11.0],
    ],
};

const WEST: RegionNormals = RegionNormals {
    wind_ms: [
        [4.0, 4.0, 4.0, 3.5, 3.0, 3.0, 3.0, 3.0, 3.5, 3.5, 4.0, 4.0],
        [6.0, 6.0, 6.0, 5.5, 5.0, 5.0, 5.0, 5.0, 5.5, 5.5, 6.0, 6.0],
        [9.0, 9.0, 8.5, 8.0, 7.5, 7.0, 7.0, 7.0, 7.5, 8.0, 8.5, 9.0],
    ],
    temp_c: [
        [4.0, 5.0, 8.0, 13.0, 18.0, 21.0, 26.0, 27.0, 23.0, 17.0, 11.0, 6.0],
        [-3.0, -2.0, 1.0, 6.0, 11.0, 14.0, 19.0, 20.0, 16.0, 10.0, 4.0, -1.0],
        [-9.0, -8.0, -5.0, 0.0, 5.0, 8.0, 13.0, 14.0, 10.0, 4.0, -2.0, -7.0],
    ],
};
