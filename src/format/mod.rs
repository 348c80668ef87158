//! Display formatting
//!
//! Pure, stateless functions over a resolved location or a bare accuracy
//! value. Nothing here touches providers or the clock beyond converting an
//! already-captured timestamp to local time.

use crate::engine::ResolvedLocation;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative classification of a fix's accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AccuracyTier {
    /// Classify an accuracy radius in meters
    pub fn from_accuracy(accuracy_m: f64) -> Self {
        if accuracy_m <= 20.0 {
            AccuracyTier::Excellent
        } else if accuracy_m <= 100.0 {
            AccuracyTier::Good
        } else if accuracy_m <= 1000.0 {
            AccuracyTier::Fair
        } else {
            AccuracyTier::Poor
        }
    }

    /// Fixed human description of the tier
    pub fn description(&self) -> &'static str {
        match self {
            AccuracyTier::Excellent => "Pinpoint fix suitable for exact reporting",
            AccuracyTier::Good => "Reliable fix for street-level reporting",
            AccuracyTier::Fair => "Approximate fix at neighborhood scale",
            AccuracyTier::Poor => "Rough network-level estimate",
        }
    }

    /// Actionable recommendation shown with the tier
    pub fn recommendation(&self) -> &'static str {
        match self {
            AccuracyTier::Excellent => "Location is ready to submit.",
            AccuracyTier::Good => "Accuracy is sufficient for most reports.",
            AccuracyTier::Fair => "Consider moving away from buildings for a better fix.",
            AccuracyTier::Poor => {
                "Move to an open outdoor area and make sure GPS is enabled, then try again."
            }
        }
    }
}

impl fmt::Display for AccuracyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccuracyTier::Excellent => "excellent",
            AccuracyTier::Good => "good",
            AccuracyTier::Fair => "fair",
            AccuracyTier::Poor => "poor",
        };
        write!(f, "{}", name)
    }
}

/// Coordinates with hemisphere letters, 6 decimal places
pub fn format_coordinates(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.6}°{}, {:.6}°{}", lat.abs(), ns, lon.abs(), ew)
}

/// Capture time in the local timezone: day/month/year, 12-hour clock, GMT offset
pub fn format_timestamp(captured_at: DateTime<Utc>) -> String {
    format_timestamp_in(captured_at.with_timezone(&Local))
}

/// Timezone-explicit variant of [`format_timestamp`]
pub fn format_timestamp_in<Tz: TimeZone>(captured_at: DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    captured_at.format("%-d/%-m/%Y, %-I:%M:%S %p GMT%:z").to_string()
}

/// Accuracy label with a tiered qualitative prefix
///
/// Monotonic and total: every non-negative accuracy maps to exactly one
/// label, boundary values rounding down to the stricter tier.
pub fn accuracy_label(accuracy_m: f64) -> String {
    if accuracy_m <= 5.0 {
        "Very High (±5m)".to_string()
    } else if accuracy_m <= 10.0 {
        "High (±10m)".to_string()
    } else if accuracy_m <= 20.0 {
        "Good (±20m)".to_string()
    } else if accuracy_m <= 50.0 {
        "Fair (±50m)".to_string()
    } else if accuracy_m <= 100.0 {
        "Moderate (±100m)".to_string()
    } else if accuracy_m <= 500.0 {
        format!("Low (±{}m)", accuracy_m.round())
    } else if accuracy_m <= 1000.0 {
        format!("Poor (±{}m)", accuracy_m.round())
    } else if accuracy_m <= 10000.0 {
        format!("Very Poor (±{}m)", accuracy_m.round())
    } else {
        format!("Network-based (±{}km)", (accuracy_m / 1000.0).round())
    }
}

/// One-line display string for a resolved location
///
/// Address parts joined by commas, a "(Near: …)" suffix when landmarks
/// exist, raw coordinates when no address part is available.
pub fn display_location(location: &ResolvedLocation) -> String {
    let parts: Vec<&str> = [
        location.address.as_deref(),
        location.city.as_deref(),
        location.state.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut display = if parts.is_empty() {
        format_coordinates(location.latitude, location.longitude)
    } else {
        parts.join(", ")
    };

    if !location.nearby_landmarks.is_empty() {
        display.push_str(&format!(" (Near: {})", location.nearby_landmarks.join(", ")));
    }

    display
}
