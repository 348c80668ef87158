//! geofix: Location Resolution Engine
//!
//! A library and CLI for turning a noisy stream of positioning-sensor
//! samples into a single resolved location: a best-effort fix, a structured
//! human-readable address, and up to three nearby landmarks.
//!
//! ## Features
//!
//! - Best-fix sampling over a continuous position subscription with
//!   tight/loose accuracy thresholds, sample caps, and a racing wall clock
//! - Reverse geocoding with deterministic candidate selection
//! - Landmark enrichment through an ephemeral, timeout-bounded query context
//! - Pure display formatting (coordinates, timestamps, accuracy tiers)
//!
//! ## Quick Start
//!
//! ```no_run
//! use geofix::engine::LocationEngine;
//! use geofix::geocode::google::GoogleGeocoder;
//! use geofix::places::google::GooglePlaces;
//! use geofix::position::sim::SimSource;
//!
//! # async fn demo() -> geofix::Result<()> {
//! let source = SimSource::new(12.9716, 77.5946);
//! let geocoder = Some(GoogleGeocoder::new("api-key"));
//! let places = GooglePlaces::new("api-key");
//!
//! let engine = LocationEngine::new(source, geocoder, places);
//! let resolved = engine.assemble_complete().await?;
//! println!("{}", geofix::format::display_location(&resolved));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod format;
pub mod geocode;
pub mod places;
pub mod position;

// Re-export commonly used types
pub use config::Config;
pub use engine::{LocationEngine, ResolvedLocation};
pub use error::{Error, Result};
pub use format::AccuracyTier;
pub use position::{RawSample, SamplerPolicy};
