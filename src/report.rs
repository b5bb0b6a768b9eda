//! # Moon Report Assembly
//!
//! Collects a [`MoonReading`], an optional sky snapshot and an optional
//! countdown into one [`Report`], which the binary prints either as plain
//! text (development/terminal use) or as JSON for other programs.

use crate::config::{Config, ViewingConfig};
use crate::countdown::{Countdown, MoonEvent};
use crate::visibility::{self, CompassPoint, SkySnapshot};
use crate::MoonReading;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Width of the text illumination bar in characters.
const BAR_WIDTH: usize = 20;

/// Where the Moon is relative to the device and how much of it shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisibilityReport {
    pub direction: CompassPoint,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub cloud_cover_pct: f64,
    /// `None` until the device reports a heading
    pub heading_deg: Option<f64>,
    pub in_view: bool,
    pub disk_rotation_deg: f64,
    pub percent: u8,
}

impl VisibilityReport {
    pub fn from_snapshot(sky: &SkySnapshot, viewing: &ViewingConfig) -> Self {
        Self {
            direction: CompassPoint::from_azimuth(sky.moon_azimuth_deg),
            azimuth_deg: sky.moon_azimuth_deg,
            elevation_deg: sky.moon_elevation_deg,
            cloud_cover_pct: sky.cloud_cover_pct,
            heading_deg: sky.device_heading_deg,
            in_view: visibility::is_in_view(sky, viewing),
            disk_rotation_deg: visibility::disk_rotation(sky, viewing),
            percent: visibility::visibility_percent(sky, viewing),
        }
    }
}

/// Countdown flattened to display strings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountdownReport {
    pub event: MoonEvent,
    /// Local wall-clock time of the event, `HH:MM`
    pub at: String,
    pub remaining_minutes: i64,
    pub text: String,
}

impl<Tz: TimeZone> From<&Countdown<Tz>> for CountdownReport
where
    Tz::Offset: std::fmt::Display,
{
    fn from(cd: &Countdown<Tz>) -> Self {
        Self {
            event: cd.event,
            at: cd.target.format("%H:%M").to_string(),
            remaining_minutes: cd.remaining.num_minutes(),
            text: cd.to_string(),
        }
    }
}

/// Everything shown for one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub observer: String,
    pub latitude: f64,
    pub longitude: f64,
    pub instant: DateTime<Utc>,
    pub moon: MoonReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownReport>,
}

impl Report {
    /// Start a report with the engine reading for `instant`.
    pub fn new(config: &Config, instant: DateTime<Utc>) -> Self {
        Self {
            observer: config.observer.name.clone(),
            latitude: config.observer.latitude,
            longitude: config.observer.longitude,
            instant,
            moon: MoonReading::at(&instant),
            visibility: None,
            countdown: None,
        }
    }

    pub fn with_visibility(mut self, visibility: VisibilityReport) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_countdown(mut self, countdown: CountdownReport) -> Self {
        self.countdown = Some(countdown);
        self
    }

    /// Multi-line plain-text rendering.
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!(
                "{} ({:.4}, {:.4})  {}",
                self.observer,
                self.latitude,
                self.longitude,
                self.instant.format("%Y-%m-%d %H:%M UTC")
            ),
            format!("Phase:        {}", self.moon.phase),
            format!(
                "Illumination: {:>5.1}%  {}",
                self.moon.illumination * 100.0,
                illumination_bar(self.moon.illumination, BAR_WIDTH)
            ),
            format!(
                "Age:          {:.2} days (JD {:.4})",
                self.moon.age_days, self.moon.julian_day
            ),
        ];

        if let Some(v) = &self.visibility {
            lines.push(format!(
                "Direction:    {} (az {:.1}°, el {:.1}°)",
                v.direction, v.azimuth_deg, v.elevation_deg
            ));
            lines.push(match v.heading_deg {
                Some(heading) if v.in_view => format!(
                    "Visible:      {}%  (heading {:.1}°, disk {:+.1}°, cloud {:.0}%)",
                    v.percent, heading, v.disk_rotation_deg, v.cloud_cover_pct
                ),
                Some(heading) => format!(
                    "Visible:      {}%  (heading {:.1}° is off target)",
                    v.percent, heading
                ),
                None => "Visible:      no compass heading".to_string(),
            });
        }

        if let Some(cd) = &self.countdown {
            lines.push(format!("{} ({})", cd.text, cd.at));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Text bar such as `[#####-----]` for a fraction in `[0, 1]`.
pub fn illumination_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
