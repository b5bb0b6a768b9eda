//! Moon phase & illuminated fraction (Meeus, *Astronomical Algorithms*, ch. 7 & 49)
//!
//! Converts an instant into a Julian Day, locates the most recent true new moon
//! with the truncated periodic series for the new-moon phase, and derives the
//! Moon's age, illuminated fraction and named phase from that.
//!
//! Accuracy: the new-moon instant lands within a few minutes of published
//! tables for dates in the Gregorian era. Illumination uses the mean synodic
//! month as its period, so the curve is a cosine proxy rather than a true
//! phase-angle computation.
//!
//! Everything here is a pure function of time.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use core::f64::consts::TAU;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean synodic month in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_67;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2_451_545.0;

/// Mean new moon of 2000-01-06, the zero point of the lunation index `k`.
pub const MEAN_NEW_MOON_EPOCH: f64 = 2_451_550.097_66;

/// Below this illuminated fraction the Moon is reported as new regardless of age.
pub const NEW_MOON_ILLUMINATION: f64 = 0.01;

const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Largest age reported before the next new moon.
const LAST_AGE: f64 = SYNODIC_MONTH - 1e-9;

/// One term of the new-moon correction series:
/// `amplitude · E^e_power · sin(moon·M′ + sun·M + lat·F)`.
struct CorrectionTerm {
    amplitude: f64,
    e_power: i32,
    moon: i8,
    sun: i8,
    lat: i8,
}

const fn term(amplitude: f64, e_power: i32, moon: i8, sun: i8, lat: i8) -> CorrectionTerm {
    CorrectionTerm {
        amplitude,
        e_power,
        moon,
        sun,
        lat,
    }
}

/// Periodic corrections (days) from mean to true new moon.
/// Data, not logic: do not "fix" individual entries.
#[rustfmt::skip]
static NEW_MOON_CORRECTIONS: [CorrectionTerm; 24] = [
    //   amplitude  E^  M′   M   F
    term(-0.407_20, 0,  1,  0,  0),
    term( 0.172_41, 1,  0,  1,  0),
    term( 0.016_08, 0,  2,  0,  0),
    term( 0.010_39, 0,  0,  0,  2),
    term( 0.007_39, 1,  1, -1,  0),
    term(-0.005_14, 1,  1,  1,  0),
    term( 0.002_08, 2,  0,  2,  0),
    term(-0.001_11, 0,  1,  0, -2),
    term(-0.000_57, 0,  1,  0,  2),
    term( 0.000_56, 1,  2,  1,  0),
    term(-0.000_42, 0,  3,  0,  0),
    term( 0.000_42, 1,  0,  1,  2),
    term( 0.000_38, 1,  0,  1, -2),
    term(-0.000_24, 1,  2, -1,  0),
    term(-0.000_17, 0,  0,  1,  0),
    term(-0.000_07, 0,  1,  2,  0),
    term( 0.000_04, 0,  2,  0, -2),
    term( 0.000_04, 0,  0,  3,  0),
    term( 0.000_03, 0,  1,  1, -2),
    term( 0.000_03, 0,  0,  2, -2),
    term(-0.000_03, 0,  1,  1,  2),
    term( 0.000_03, 0,  1, -1,  2),
    term(-0.000_02, 0,  1, -1, -2),
    term(-0.000_02, 0,  3,  1,  0),
];

/// The eight named phases, in cycle order starting at new moon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseName {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

/// Upper (exclusive) bounds of the age-ratio buckets. Ratios at or above the
/// last bound are Waning Crescent. The first two buckets share a name so the
/// table keeps its eighth/quarter spacing.
static PHASE_BOUNDARIES: [(f64, PhaseName); 7] = [
    (0.0625, PhaseName::WaxingCrescent),
    (0.25, PhaseName::WaxingCrescent),
    (0.375, PhaseName::FirstQuarter),
    (0.5, PhaseName::WaxingGibbous),
    (0.625, PhaseName::FullMoon),
    (0.75, PhaseName::WaningGibbous),
    (0.875, PhaseName::LastQuarter),
];

impl PhaseName {
    /// All phases in cycle order.
    pub const ALL: [PhaseName; 8] = [
        PhaseName::NewMoon,
        PhaseName::WaxingCrescent,
        PhaseName::FirstQuarter,
        PhaseName::WaxingGibbous,
        PhaseName::FullMoon,
        PhaseName::WaningGibbous,
        PhaseName::LastQuarter,
        PhaseName::WaningCrescent,
    ];

    /// Display label, e.g. `"Waxing Gibbous"`.
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }

    /// Classify an age/synodic-month ratio in `[0, 1)` with the eight-bucket
    /// table. Boundaries are lower-inclusive: `0.375` is Waxing Gibbous.
    pub fn from_ratio(ratio: f64) -> Self {
        PHASE_BOUNDARIES
            .iter()
            .find(|(upper, _)| ratio < *upper)
            .map(|&(_, phase)| phase)
            .unwrap_or(PhaseName::WaningCrescent)
    }

    /// Classify a lunar age in days. A nearly dark disk is always New Moon,
    /// which catches ages just after 0 and just before a full synodic month.
    pub fn from_age(age_days: f64) -> Self {
        if illumination_for_age(age_days) < NEW_MOON_ILLUMINATION {
            PhaseName::NewMoon
        } else {
            Self::from_ratio(age_days / SYNODIC_MONTH)
        }
    }

    /// Legacy classifier working from the illuminated fraction alone.
    ///
    /// An illuminated fraction cannot tell waxing from waning, so this always
    /// answers with a waxing name (or New/Full Moon) and disagrees with
    /// [`PhaseName::from_age`] for half of every cycle. It is kept for callers
    /// that only have a fraction to go on; [`phase_name`] never uses it.
    pub fn from_illumination(illumination: f64) -> Self {
        if illumination < NEW_MOON_ILLUMINATION {
            PhaseName::NewMoon
        } else if illumination < 0.5 {
            PhaseName::WaxingCrescent
        } else if illumination < 0.99 {
            PhaseName::WaxingGibbous
        } else {
            PhaseName::FullMoon
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Julian Day for proleptic-Gregorian UTC calendar fields.
///
/// Fields are not validated; out-of-range values give unspecified results.
pub fn julian_day_from_calendar(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> f64 {
    let decimal_day = day as f64
        + hour as f64 / 24.0
        + minute as f64 / 1_440.0
        + second as f64 / 86_400.0;

    // ---------- Jan/Feb belong to the previous March-based year ----------
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };

    // ---------- Gregorian century correction ----------
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y + 4_716.0)).floor() + (30.6001 * (m + 1.0)).floor() + decimal_day + b - 1_524.5
}

/// Julian Day of an instant. Any time zone is accepted and normalized to UTC.
/// Sub-second precision is dropped.
pub fn to_julian_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let utc = instant.with_timezone(&Utc);
    julian_day_from_calendar(
        utc.year(),
        utc.month(),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
    )
}

/// Julian Day of the true new moon of lunation `k` (`k = 0` is 2000-01-06).
fn true_new_moon(k: f64) -> f64 {
    // ---------- 1. Mean new moon of the lunation ----------
    let jde = MEAN_NEW_MOON_EPOCH + SYNODIC_MONTH * k;

    // ---------- 2. Fundamental arguments at that lunation ----------
    let t = (jde - J2000) / DAYS_PER_CENTURY;
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;
    let sun = ((357.529_109_2 + 129_596_581.048_1 * t / 3_600.0) % 360.0).to_radians();
    let moon = ((134.963_402_51 + 1_717_915_923.217_8 * t / 3_600.0) % 360.0).to_radians();
    let lat = ((93.272_095_0 + 1_739_527_262.847_8 * t / 3_600.0) % 360.0).to_radians();

    // ---------- 3. Periodic terms ----------
    let correction: f64 = NEW_MOON_CORRECTIONS
        .iter()
        .map(|c| {
            let arg = f64::from(c.moon) * moon + f64::from(c.sun) * sun + f64::from(c.lat) * lat;
            c.amplitude * e.powi(c.e_power) * arg.sin()
        })
        .sum();

    jde + correction
}

/// Julian Day of the true new moon closest to `jd`.
pub fn nearest_new_moon(jd: f64) -> f64 {
    true_new_moon(((jd - MEAN_NEW_MOON_EPOCH) / SYNODIC_MONTH + 0.5).floor())
}

/// Julian Day of the most recent true new moon at or before `jd`.
///
/// Starts from the mean lunation and steps to the neighbouring one when the
/// periodic terms move the true new moon across `jd`. The terms stay well
/// under a day, so one step either way is enough.
pub fn previous_new_moon(jd: f64) -> f64 {
    let mut k = ((jd - MEAN_NEW_MOON_EPOCH) / SYNODIC_MONTH).floor();
    let mut new_moon = true_new_moon(k);

    if jd < new_moon {
        k -= 1.0;
        new_moon = true_new_moon(k);
    }
    let next = true_new_moon(k + 1.0);
    if jd >= next {
        next
    } else {
        new_moon
    }
}

/// Age of the Moon in days since the most recent new moon, in
/// `[0, SYNODIC_MONTH)`.
///
/// True lunations run a few hours either side of the mean month. In the tail
/// of a long one the age holds just below `SYNODIC_MONTH` until the next new
/// moon resets it, so it never runs backwards.
pub fn days_since_new_moon(jd: f64) -> f64 {
    (jd - previous_new_moon(jd)).clamp(0.0, LAST_AGE)
}

/// Illuminated fraction for a lunar age, clamped to `[0, 1]`.
pub fn illumination_for_age(age_days: f64) -> f64 {
    let phase_angle = TAU * age_days / SYNODIC_MONTH;
    ((1.0 - phase_angle.cos()) / 2.0).clamp(0.0, 1.0)
}

/// Illuminated fraction of the Moon at `instant` (0 = new, 1 = full).
pub fn illumination<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    illumination_for_age(days_since_new_moon(to_julian_day(instant)))
}

/// Named phase of the Moon at `instant`.
pub fn phase_name<Tz: TimeZone>(instant: &DateTime<Tz>) -> PhaseName {
    PhaseName::from_age(days_since_new_moon(to_julian_day(instant)))
}
