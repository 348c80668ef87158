//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geofix/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::position::SamplerPolicy;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Best-fix acquisition policy
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Reverse-geocoding provider settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Nearby-place provider settings
    #[serde(default)]
    pub places: PlacesConfig,

    /// Position source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Best-fix acquisition policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Accuracy (meters) accepted immediately as a satellite fix
    #[serde(default = "default_tight_accuracy")]
    pub tight_accuracy_m: f64,

    /// Accuracy (meters) accepted after min_samples have been observed
    #[serde(default = "default_loose_accuracy")]
    pub loose_accuracy_m: f64,

    /// Samples that must be observed before the loose threshold applies
    #[serde(default = "default_min_samples")]
    pub min_samples: u32,

    /// Hard cap on observed samples
    #[serde(default = "default_max_samples")]
    pub max_samples: u32,

    /// Wall-clock budget for the whole acquisition, in seconds
    #[serde(default = "default_wall_clock")]
    pub wall_clock_secs: u64,
}

/// Reverse-geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Provider API key (empty = geocoding unavailable)
    #[serde(default)]
    pub api_key: String,

    /// Address-formatting language hint
    #[serde(default = "default_language")]
    pub language: String,

    /// Regional bias for address formatting
    #[serde(default = "default_region")]
    pub region: String,
}

/// Nearby-place provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Provider API key (empty = landmarks disabled)
    #[serde(default)]
    pub api_key: String,

    /// Proximity-search radius in meters
    #[serde(default = "default_landmark_radius")]
    pub radius_m: f64,
}

/// Position source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source kind: "sim", "replay", or "none"
    #[serde(default = "default_source")]
    pub kind: String,

    /// Simulated-source center latitude
    #[serde(default = "default_sim_latitude")]
    pub latitude: f64,

    /// Simulated-source center longitude
    #[serde(default = "default_sim_longitude")]
    pub longitude: f64,

    /// Replay file path (for kind = "replay")
    #[serde(default)]
    pub replay_file: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_tight_accuracy() -> f64 {
    DEFAULT_TIGHT_ACCURACY_M
}
fn default_loose_accuracy() -> f64 {
    DEFAULT_LOOSE_ACCURACY_M
}
fn default_min_samples() -> u32 {
    DEFAULT_MIN_SAMPLES
}
fn default_max_samples() -> u32 {
    DEFAULT_MAX_SAMPLES
}
fn default_wall_clock() -> u64 {
    DEFAULT_WALL_CLOCK_SECS
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_region() -> String {
    DEFAULT_REGION.to_string()
}
fn default_landmark_radius() -> f64 {
    DEFAULT_LANDMARK_RADIUS_M
}
fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
fn default_sim_latitude() -> f64 {
    DEFAULT_SIM_LATITUDE
}
fn default_sim_longitude() -> f64 {
    DEFAULT_SIM_LONGITUDE
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

// Implement Default traits
impl Default for Config {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            geocoder: GeocoderConfig::default(),
            places: PlacesConfig::default(),
            source: SourceConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            tight_accuracy_m: default_tight_accuracy(),
            loose_accuracy_m: default_loose_accuracy(),
            min_samples: default_min_samples(),
            max_samples: default_max_samples(),
            wall_clock_secs: default_wall_clock(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            region: default_region(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            radius_m: default_landmark_radius(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source(),
            latitude: default_sim_latitude(),
            longitude: default_sim_longitude(),
            replay_file: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: default_format() }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Build the sampler policy from the configured thresholds
    pub fn sampler_policy(&self) -> SamplerPolicy {
        SamplerPolicy {
            tight_accuracy_m: self.sampler.tight_accuracy_m,
            loose_accuracy_m: self.sampler.loose_accuracy_m,
            min_samples: self.sampler.min_samples,
            max_samples: self.sampler.max_samples,
            wall_clock: Duration::from_secs(self.sampler.wall_clock_secs),
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["sampler", "tight_accuracy_m"] => Some(self.sampler.tight_accuracy_m.to_string()),
            ["sampler", "loose_accuracy_m"] => Some(self.sampler.loose_accuracy_m.to_string()),
            ["sampler", "min_samples"] => Some(self.sampler.min_samples.to_string()),
            ["sampler", "max_samples"] => Some(self.sampler.max_samples.to_string()),
            ["sampler", "wall_clock_secs"] => Some(self.sampler.wall_clock_secs.to_string()),

            ["geocoder", "api_key"] => Some(self.geocoder.api_key.clone()),
            ["geocoder", "language"] => Some(self.geocoder.language.clone()),
            ["geocoder", "region"] => Some(self.geocoder.region.clone()),

            ["places", "api_key"] => Some(self.places.api_key.clone()),
            ["places", "radius_m"] => Some(self.places.radius_m.to_string()),

            ["source", "kind"] => Some(self.source.kind.clone()),
            ["source", "latitude"] => Some(self.source.latitude.to_string()),
            ["source", "longitude"] => Some(self.source.longitude.to_string()),
            ["source", "replay_file"] => Some(self.source.replay_file.clone()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["sampler", "tight_accuracy_m"] => {
                self.sampler.tight_accuracy_m = parse_num(key, value)?;
            }
            ["sampler", "loose_accuracy_m"] => {
                self.sampler.loose_accuracy_m = parse_num(key, value)?;
            }
            ["sampler", "min_samples"] => {
                self.sampler.min_samples = parse_num(key, value)?;
            }
            ["sampler", "max_samples"] => {
                self.sampler.max_samples = parse_num(key, value)?;
            }
            ["sampler", "wall_clock_secs"] => {
                self.sampler.wall_clock_secs = parse_num(key, value)?;
            }

            ["geocoder", "api_key"] => {
                self.geocoder.api_key = value.to_string();
            }
            ["geocoder", "language"] => {
                self.geocoder.language = value.to_string();
            }
            ["geocoder", "region"] => {
                self.geocoder.region = value.to_string();
            }

            ["places", "api_key"] => {
                self.places.api_key = value.to_string();
            }
            ["places", "radius_m"] => {
                self.places.radius_m = parse_num(key, value)?;
            }

            ["source", "kind"] => {
                self.source.kind = value.to_string();
            }
            ["source", "latitude"] => {
                self.source.latitude = parse_num(key, value)?;
            }
            ["source", "longitude"] => {
                self.source.longitude = parse_num(key, value)?;
            }
            ["source", "replay_file"] => {
                self.source.replay_file = value.to_string();
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "sampler.tight_accuracy_m",
            "sampler.loose_accuracy_m",
            "sampler.min_samples",
            "sampler.max_samples",
            "sampler.wall_clock_secs",
            "geocoder.api_key",
            "geocoder.language",
            "geocoder.region",
            "places.api_key",
            "places.radius_m",
            "source.kind",
            "source.latitude",
            "source.longitude",
            "source.replay_file",
            "output.format",
        ]
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
