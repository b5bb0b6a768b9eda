//! # Moon Tracker Application Entry Point
//!
//! Command-line front end for the moon tracker library. Computes the phase for
//! an instant (now by default) and, when sky readings are supplied on the
//! command line, the visibility score and the moonrise/moonset countdown.
//!
//! ```text
//! moon-tracker [--at 2025-03-14T12:00:00Z] [--heading 130] [--azimuth 135]
//!              [--elevation 40] [--cloud 20] [--rise 20:45] [--set 08:10]
//!              [--config moon-config.toml] [--json]
//! ```
//!
//! Logging goes to stderr via `env_logger`; set `RUST_LOG=debug` for detail.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

use moon_clock_lib::config::Config;
use moon_clock_lib::countdown::countdown;
use moon_clock_lib::report::{CountdownReport, Report, VisibilityReport};
use moon_clock_lib::visibility::SkySnapshot;

#[derive(Parser, Debug)]
#[command(name = "moon-tracker")]
#[command(about = "Moon phase, illumination and visibility for an instant", long_about = None)]
#[command(version)]
struct Args {
    /// Instant to report on, RFC 3339 (default: now)
    #[arg(long, value_parser = parse_instant)]
    at: Option<DateTime<Utc>>,

    /// Compass heading the device points at, degrees
    #[arg(long, allow_negative_numbers = true)]
    heading: Option<f64>,

    /// Moon azimuth, degrees clockwise from north
    #[arg(long, allow_negative_numbers = true)]
    azimuth: Option<f64>,

    /// Moon elevation above the horizon, degrees
    #[arg(long, allow_negative_numbers = true)]
    elevation: Option<f64>,

    /// Cloud cover, percent
    #[arg(long, default_value_t = 0.0)]
    cloud: f64,

    /// Local moonrise time, HH:MM
    #[arg(long)]
    rise: Option<String>,

    /// Local moonset time, HH:MM
    #[arg(long)]
    set: Option<String>,

    /// Config file (default: moon-config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| format!("{value:?} is not an RFC 3339 timestamp: {e}"))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let instant = args.at.unwrap_or_else(Utc::now);
    let mut report = Report::new(&config, instant);
    log::info!(
        "JD {:.5}: age {:.3} d, illumination {:.4}, {}",
        report.moon.julian_day,
        report.moon.age_days,
        report.moon.illumination,
        report.moon.phase
    );

    let elevation = args.elevation.unwrap_or(0.0);

    // Visibility needs at least the Moon's azimuth; the heading may be absent
    if let Some(azimuth) = args.azimuth {
        let sky = SkySnapshot {
            device_heading_deg: args.heading,
            moon_azimuth_deg: azimuth,
            moon_elevation_deg: elevation,
            cloud_cover_pct: args.cloud,
            illumination: report.moon.illumination,
        };
        report = report.with_visibility(VisibilityReport::from_snapshot(&sky, &config.viewing));
    } else if args.heading.is_some() {
        log::warn!("--heading given without --azimuth; skipping visibility");
    }

    if args.rise.is_some() || args.set.is_some() {
        let tz = config.observer.utc_offset().with_context(|| {
            format!(
                "utc_offset_minutes = {} is out of range",
                config.observer.utc_offset_minutes
            )
        })?;
        let local_now = instant.with_timezone(&tz);
        match countdown(&local_now, elevation, args.rise.as_deref(), args.set.as_deref()) {
            Ok(Some(cd)) => report = report.with_countdown(CountdownReport::from(&cd)),
            Ok(None) => log::debug!("no moonrise/moonset time known"),
            Err(e) => log::warn!("skipping countdown: {e}"),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("moon-tracker").chain(list.iter().copied()))
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let parsed = args(&[]).unwrap();
        assert!(parsed.at.is_none());
        assert!(parsed.heading.is_none());
        assert_eq!(parsed.cloud, 0.0);
        assert!(parsed.config.is_none());
        assert!(!parsed.json);
    }

    #[test]
    fn test_full_command_line() {
        let parsed = args(&[
            "--at",
            "2025-03-14T20:00:00+08:00",
            "--heading=130",
            "--azimuth",
            "135.5",
            "--elevation",
            "-3",
            "--cloud",
            "40",
            "--rise",
            "21:10",
            "--set",
            "09:00",
            "--config",
            "observer.toml",
            "--json",
        ])
        .unwrap();
        assert_eq!(
            parsed.at,
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap())
        );
        assert_eq!(parsed.heading, Some(130.0));
        assert_eq!(parsed.azimuth, Some(135.5));
        assert_eq!(parsed.elevation, Some(-3.0));
        assert_eq!(parsed.cloud, 40.0);
        assert_eq!(parsed.rise.as_deref(), Some("21:10"));
        assert_eq!(parsed.set.as_deref(), Some("09:00"));
        assert_eq!(parsed.config, Some(PathBuf::from("observer.toml")));
        assert!(parsed.json);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(args(&["--heading"]).is_err());
        assert!(args(&["--heading", "north"]).is_err());
        assert!(args(&["--at", "yesterday"]).is_err());
        assert!(args(&["--frobnicate"]).is_err());
        // A following flag is never taken as the value
        assert!(args(&["--cloud", "--json"]).is_err());
    }
}
