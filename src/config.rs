//! # Configuration Management
//!
//! Loads observer and viewing settings from `moon-config.toml`. A missing or
//! malformed file is never fatal: the defaults below are used instead and the
//! reason is logged.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "moon-config.toml";

/// Errors from writing configuration back to disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be written
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    /// Configuration could not be rendered as TOML
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from moon-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Where the observer is
    pub observer: ObserverConfig,
    /// How visibility is judged
    pub viewing: ViewingConfig,
}

/// Observer location and civil time zone
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Human-readable place name for the report header
    pub name: String,
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
    /// Offset of local civil time from UTC in minutes (e.g. 480 for UTC+8).
    /// Moonrise/moonset clock strings are read in this zone.
    pub utc_offset_minutes: i32,
}

/// Visibility heuristic tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ViewingConfig {
    /// Half-angle (deg) around the device heading within which the Moon counts as in view
    pub field_of_view_deg: f64,
    /// The Moon must be strictly above this elevation (deg) to be visible
    pub min_elevation_deg: f64,
}

impl Default for ViewingConfig {
    fn default() -> Self {
        ViewingConfig {
            field_of_view_deg: 30.0,
            min_elevation_deg: 0.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: ObserverConfig {
                name: "Beijing".to_string(),
                latitude: 39.9042,
                longitude: 116.4074,
                utc_offset_minutes: 480,
            },
            viewing: ViewingConfig::default(),
        }
    }
}

impl ObserverConfig {
    /// Observer's civil time zone, or `None` if the offset is out of range.
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }
}

impl Config {
    /// Load configuration from moon-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration for observer: {}", config.observer.name);
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file {}: {}", path.display(), e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save current configuration to moon-config.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}
