use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::Date;

use super::channel_selection::ChannelSelection;
use super::constants::{DEFAULT_CLOCK_HZ, DEFAULT_OUTPUT_EXTENSION};
use super::dat_file::TrailingBytes;
use super::error::ConfigError;
use super::layout::parse_pivot;

/// Structure representing the extraction configuration.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub clock_hz: f64,
    pub channels: ChannelSelection,
    pub sort: bool,
    pub layout_pivot: Option<String>,
    pub trailing_bytes: TrailingBytes,
    pub output: Option<PathBuf>,
    pub extension: String,
    pub n_threads: i32,
}

impl Default for Config {
    /// Generate a new Config object with the acquisition defaults
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            channels: ChannelSelection::default(),
            sort: true,
            layout_pivot: None,
            trailing_bytes: TrailingBytes::default(),
            output: None,
            extension: String::from(DEFAULT_OUTPUT_EXTENSION),
            n_threads: 1,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Check the values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.clock_hz.is_finite() && self.clock_hz > 0.0) {
            return Err(ConfigError::InvalidClock(self.clock_hz));
        }
        if !self.is_n_threads_valid() {
            return Err(ConfigError::InvalidThreads(self.n_threads));
        }
        self.get_pivot()?;
        Ok(())
    }

    /// Get the explicit layout pivot, if one was given
    pub fn get_pivot(&self) -> Result<Option<Date>, ConfigError> {
        match &self.layout_pivot {
            Some(pivot) => Ok(Some(parse_pivot(pivot)?)),
            None => Ok(None),
        }
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }
}
