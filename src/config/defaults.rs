//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{geocode, landmarks, policy};

/// Default position source kind
pub const DEFAULT_SOURCE: &str = "sim";

/// Default simulated-source center latitude (Bengaluru)
pub const DEFAULT_SIM_LATITUDE: f64 = 12.9716;

/// Default simulated-source center longitude (Bengaluru)
pub const DEFAULT_SIM_LONGITUDE: f64 = 77.5946;

/// Default simulated-source starting accuracy in meters
pub const DEFAULT_SIM_INITIAL_ACCURACY_M: f64 = 45.0;

/// Default simulated-source best achievable accuracy in meters
pub const DEFAULT_SIM_FLOOR_ACCURACY_M: f64 = 4.0;

/// Default simulated-source delivery cadence in milliseconds
pub const DEFAULT_SIM_INTERVAL_MS: u64 = 250;

/// Default tight accuracy threshold in meters
pub const DEFAULT_TIGHT_ACCURACY_M: f64 = policy::TIGHT_ACCURACY_M;

/// Default loose accuracy threshold in meters
pub const DEFAULT_LOOSE_ACCURACY_M: f64 = policy::LOOSE_ACCURACY_M;

/// Default minimum observed samples for the loose threshold
pub const DEFAULT_MIN_SAMPLES: u32 = policy::MIN_SAMPLES;

/// Default maximum observed samples
pub const DEFAULT_MAX_SAMPLES: u32 = policy::MAX_SAMPLES;

/// Default acquisition wall-clock budget in seconds
pub const DEFAULT_WALL_CLOCK_SECS: u64 = policy::WALL_CLOCK_SECS;

/// Default geocoder language hint
pub const DEFAULT_LANGUAGE: &str = geocode::LANGUAGE;

/// Default geocoder region hint
pub const DEFAULT_REGION: &str = geocode::REGION;

/// Default landmark search radius in meters
pub const DEFAULT_LANDMARK_RADIUS_M: f64 = landmarks::DEFAULT_RADIUS_M;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geofix";
