//! # Moon Visibility Heuristic
//!
//! Scores how much of the Moon a user pointing their phone at the sky can
//! expect to see, from an immutable [`SkySnapshot`] of externally supplied
//! readings.
//!
//! ## Model
//! The score is the product of four factors, each on a 0-100 scale:
//! - **Alignment**: cosine falloff from the device heading to the Moon's
//!   azimuth, reaching zero at the edge of the field of view
//! - **Elevation**: sine of the Moon's altitude (0 at the horizon, 100 at zenith)
//! - **Clear sky**: `100 - cloud cover`
//! - **Phase**: illuminated fraction × 100
//!
//! Outside the field of view, or with the Moon at or below the minimum
//! elevation, the score is 0. None of the inputs are range-checked.

use crate::config::ViewingConfig;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Sensor and weather readings at one moment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkySnapshot {
    /// Compass heading of the device (deg, 0-360); `None` until a sensor reading arrives
    pub device_heading_deg: Option<f64>,
    /// Moon azimuth (deg, 0 = north, clockwise)
    pub moon_azimuth_deg: f64,
    /// Moon altitude above the horizon (deg, -90 to 90)
    pub moon_elevation_deg: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover_pct: f64,
    /// Illuminated fraction of the Moon (0-1)
    pub illumination: f64,
}

/// The eight compass points used for direction labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    /// All points clockwise from north.
    pub const ALL: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Bearing of this point in degrees.
    pub fn azimuth(self) -> f64 {
        match self {
            CompassPoint::N => 0.0,
            CompassPoint::NE => 45.0,
            CompassPoint::E => 90.0,
            CompassPoint::SE => 135.0,
            CompassPoint::S => 180.0,
            CompassPoint::SW => 225.0,
            CompassPoint::W => 270.0,
            CompassPoint::NW => 315.0,
        }
    }

    /// Nearest compass point to `azimuth_deg`, wrapping around 360°.
    /// An azimuth exactly between two points takes the one earlier in
    /// clockwise-from-north order.
    pub fn from_azimuth(azimuth_deg: f64) -> Self {
        let mut closest = CompassPoint::N;
        let mut min_diff = f64::INFINITY;
        for point in Self::ALL {
            let diff = angular_separation(azimuth_deg, point.azimuth());
            if diff < min_diff {
                min_diff = diff;
                closest = point;
            }
        }
        closest
    }

    /// Short label, e.g. `"SW"`.
    pub fn as_str(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shortest angle between two bearings, in `[0, 180]`.
pub fn angular_separation(a_deg: f64, b_deg: f64) -> f64 {
    let diff = (a_deg - b_deg).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Signed shortest turn from `to_deg` to `from_deg`, in `(-180, 180]`.
/// Positive when `from_deg` lies clockwise of `to_deg`.
pub fn signed_offset(from_deg: f64, to_deg: f64) -> f64 {
    let diff = (from_deg - to_deg).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Rotation (deg) to apply to the Moon disk so it tracks the device heading.
///
/// Within the field of view this is the signed offset of the heading from the
/// Moon's azimuth; otherwise, or without a heading, the disk stays at 0.
pub fn disk_rotation(snapshot: &SkySnapshot, viewing: &ViewingConfig) -> f64 {
    match snapshot.device_heading_deg {
        Some(heading)
            if angular_separation(heading, snapshot.moon_azimuth_deg)
                <= viewing.field_of_view_deg =>
        {
            signed_offset(heading, snapshot.moon_azimuth_deg)
        }
        _ => 0.0,
    }
}

/// Whether the device is pointed within the field of view of the Moon.
pub fn is_in_view(snapshot: &SkySnapshot, viewing: &ViewingConfig) -> bool {
    snapshot.device_heading_deg.is_some_and(|heading| {
        angular_separation(heading, snapshot.moon_azimuth_deg) <= viewing.field_of_view_deg
    })
}

/// Expected visible share of the Moon, 0-100.
pub fn visibility_percent(snapshot: &SkySnapshot, viewing: &ViewingConfig) -> u8 {
    let Some(heading) = snapshot.device_heading_deg else {
        return 0;
    };

    let diff = angular_separation(heading, snapshot.moon_azimuth_deg);
    if diff > viewing.field_of_view_deg || snapshot.moon_elevation_deg <= viewing.min_elevation_deg
    {
        return 0;
    }

    let alignment = (diff / viewing.field_of_view_deg * FRAC_PI_2).cos() * 100.0;
    let elevation = (snapshot.moon_elevation_deg / 90.0 * FRAC_PI_2).sin() * 100.0;
    let clear_sky = 100.0 - snapshot.cloud_cover_pct;
    let phase = snapshot.illumination * 100.0;

    let score = alignment * elevation * clear_sky * phase / (100.0 * 100.0 * 100.0);
    log::debug!(
        "visibility: alignment={alignment:.1} elevation={elevation:.1} clear={clear_sky:.1} phase={phase:.1} -> {score:.2}"
    );

    // NaN inputs saturate to 0
    score.clamp(0.0, 100.0).round() as u8
}
