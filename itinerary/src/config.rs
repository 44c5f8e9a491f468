use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{errors::ConfigError, feed::DEFAULT_FEED_URL};

/// Settings of the tracker. Every field has a default, so a missing or empty
/// file yields a working configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub feed: FeedConfig,
    pub refresh: RefreshConfig,
    pub map: MapConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub url: String,
    /// Reads the itinerary from this file instead of `url`.
    pub file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            file: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 0.0,
            center_lon: 0.0,
            zoom: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Directory for the log file; no file is written when unset.
    pub dir: Option<PathBuf>,
    pub level: String,
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: "info".to_string(),
            console: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: TrackerConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "refresh.interval_secs must be greater than zero".to_string(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.map.center_lat)
            || !(-180.0..=180.0).contains(&self.map.center_lon)
        {
            return Err(ConfigError::InvalidValue(format!(
                "map center ({}, {}) is out of range",
                self.map.center_lat, self.map.center_lon
            )));
        }
        if self.feed.url.trim().is_empty() && self.feed.file.is_none() {
            return Err(ConfigError::InvalidValue(
                "feed.url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
