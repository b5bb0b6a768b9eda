//! # Moon Tracker Core Library
//!
//! Pure computations behind a "where is the moon, and can I see it" screen.
//!
//! ## Design Philosophy
//!
//! ### Pure Functions of Time
//! The phase engine in [`lunar`] takes an instant and nothing else. There is
//! no cached state, so every call is idempotent and safe to share across
//! threads.
//!
//! ### Snapshots In, Numbers Out
//! Sensor and weather readings (compass heading, moon azimuth and elevation,
//! cloud cover) arrive from outside the crate. They are passed around as
//! immutable [`visibility::SkySnapshot`] values rather than live state, and
//! every consumer ([`visibility`], [`countdown`]) is a pure function of its
//! snapshot.
//!
//! ### Data Flow
//! 1. **Instant** → [`lunar::to_julian_day`] → [`lunar::days_since_new_moon`]
//! 2. **Age** → illuminated fraction + [`lunar::PhaseName`] → [`MoonReading`]
//! 3. **Reading + sky snapshot** → visibility percentage, compass direction
//! 4. **Rise/set clock strings** → [`countdown::Countdown`]
//!
//! ## Core Types
//! - [`MoonReading`]: everything the engine knows about one instant
//! - [`lunar::PhaseName`]: the eight named phases

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod countdown;
pub mod lunar;
pub mod report;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use lunar::PhaseName;

/// The Moon's phase state at a single instant.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use moon_clock_lib::{MoonReading, PhaseName};
///
/// let t = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
/// let reading = MoonReading::at(&t);
///
/// assert_eq!(reading.phase, PhaseName::NewMoon);
/// assert!(reading.illumination < 0.02);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonReading {
    /// Julian Day of the (UTC-normalized) instant
    pub julian_day: f64,
    /// Days since the last new moon, in `[0, SYNODIC_MONTH)`
    pub age_days: f64,
    /// Illuminated fraction, 0 = new, 1 = full
    pub illumination: f64,
    /// Named phase from the age-ratio classifier
    pub phase: PhaseName,
}

impl MoonReading {
    /// Compute the reading for `instant` (any time zone).
    pub fn at<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let julian_day = lunar::to_julian_day(instant);
        let age_days = lunar::days_since_new_moon(julian_day);
        Self {
            julian_day,
            age_days,
            illumination: lunar::illumination_for_age(age_days),
            phase: PhaseName::from_age(age_days),
        }
    }

    /// Fraction of the synodic month elapsed, in `[0, 1)`.
    pub fn cycle_fraction(&self) -> f64 {
        self.age_days / lunar::SYNODIC_MONTH
    }
}
