//! # Moonrise / Moonset Countdown
//!
//! Astronomy services report moonrise and moonset as local wall-clock strings
//! (`"18:42"`) for the current day. This module turns those into the next
//! matching instant and a short "The moon will rise in 3 hours" style label.
//!
//! Which event is shown follows the Moon's current elevation: while it is up
//! the countdown targets moonset, otherwise moonrise.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Placeholder astronomy services send for a day without moonrise or moonset.
pub const NO_EVENT: &str = "-:-";

/// Errors that can occur while building a countdown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// Clock string was not `HH:MM` (or `HH:MM:SS`)
    #[error("invalid clock time {0:?}: expected HH:MM")]
    Malformed(String),

    /// Wall-clock time falls in a DST gap or overlap
    #[error("local time {0} is missing or ambiguous in this time zone")]
    LocalTime(NaiveDateTime),
}

/// The event a countdown points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoonEvent {
    Rise,
    Set,
}

impl MoonEvent {
    /// Sentence prefix for the countdown.
    pub fn label(self) -> &'static str {
        match self {
            MoonEvent::Rise => "The moon will rise in",
            MoonEvent::Set => "The moon will set in",
        }
    }
}

/// Time remaining until the next moonrise or moonset.
#[derive(Clone, Debug, PartialEq)]
pub struct Countdown<Tz: TimeZone> {
    pub event: MoonEvent,
    /// Instant of the event in the caller's time zone
    pub target: DateTime<Tz>,
    /// Never negative
    pub remaining: Duration,
}

impl<Tz: TimeZone> Countdown<Tz> {
    /// Remaining time in whole hours, or in whole minutes when under an hour.
    /// Only values above one take a plural: `"1 hour"`, `"0 minute"`.
    pub fn remaining_text(&self) -> String {
        let hours = self.remaining.num_hours();
        let minutes = self.remaining.num_minutes() % 60;
        if hours > 0 {
            format!("{} hour{}", hours, if hours > 1 { "s" } else { "" })
        } else {
            format!("{} minute{}", minutes, if minutes > 1 { "s" } else { "" })
        }
    }
}

impl<Tz: TimeZone> fmt::Display for Countdown<Tz> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.event.label(), self.remaining_text())
    }
}

/// Parse an `HH:MM` wall-clock string. Trailing seconds are accepted and
/// dropped.
pub fn parse_clock_time(text: &str) -> Result<NaiveTime, CountdownError> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map(|t| t.with_second(0).unwrap_or(t))
        .map_err(|_| CountdownError::Malformed(text.to_string()))
}

/// Next instant at or after `now` whose wall-clock time in `now`'s zone is
/// `time`: today if still ahead, otherwise tomorrow.
pub fn next_occurrence<Tz: TimeZone>(
    now: &DateTime<Tz>,
    time: NaiveTime,
) -> Result<DateTime<Tz>, CountdownError> {
    let tz = now.timezone();
    let resolve = |naive: NaiveDateTime| {
        tz.from_local_datetime(&naive)
            .single()
            .ok_or(CountdownError::LocalTime(naive))
    };

    let today = now.date_naive().and_time(time);
    let target = resolve(today)?;
    if target < *now {
        resolve(today + Duration::days(1))
    } else {
        Ok(target)
    }
}

/// Countdown to the next relevant moon event.
///
/// With the Moon above the horizon and a moonset time known, counts down to
/// moonset; otherwise to moonrise if known. Blank strings and [`NO_EVENT`]
/// count as unknown.
/// Returns `Ok(None)` when neither applies.
pub fn countdown<Tz: TimeZone>(
    now: &DateTime<Tz>,
    moon_elevation_deg: f64,
    moonrise: Option<&str>,
    moonset: Option<&str>,
) -> Result<Option<Countdown<Tz>>, CountdownError> {
    fn known(clock: Option<&str>) -> Option<&str> {
        clock.filter(|s| !matches!(s.trim(), "" | NO_EVENT))
    }

    let (event, clock) = match (known(moonrise), known(moonset)) {
        (_, Some(set)) if moon_elevation_deg > 0.0 => (MoonEvent::Set, set),
        (Some(rise), _) => (MoonEvent::Rise, rise),
        _ => return Ok(None),
    };

    let target = next_occurrence(now, parse_clock_time(clock)?)?;
    let remaining = target.clone().signed_duration_since(now.clone());
    log::debug!("{:?} at {} ({} min away)", event, clock, remaining.num_minutes());

    Ok(Some(Countdown {
        event,
        target,
        remaining,
    }))
}
