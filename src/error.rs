//! Error types for geofix

use thiserror::Error;

/// Main error type for geofix operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Positioning is not supported on this platform")]
    UnsupportedCapability,

    #[error("Location access denied")]
    PermissionDenied,

    #[error("Location signal unavailable")]
    SignalUnavailable,

    #[error("Timed out waiting for a position fix")]
    AcquisitionTimeout,

    #[error("Geocoding provider not available")]
    GeocodingUnavailable,

    #[error("Geocoding failed: {0}")]
    GeocodingFailed(String),

    #[error("Places lookup failed: {0}")]
    Places(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Replay error: {0}")]
    Replay(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geofix operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for acquisition failures where the UI should offer a retry control
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::PermissionDenied | Error::SignalUnavailable | Error::AcquisitionTimeout
        )
    }

    /// Human-readable cause shown next to the retry control
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::UnsupportedCapability => Some("This device has no positioning support."),
            Error::PermissionDenied => {
                Some("Allow location access in your settings and try again.")
            }
            Error::SignalUnavailable => {
                Some("Location signal is weak. Move somewhere with a clearer view of the sky.")
            }
            Error::AcquisitionTimeout => Some("Could not get a position fix in time. Try again."),
            _ => None,
        }
    }
}
