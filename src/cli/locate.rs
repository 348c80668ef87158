//! Locate command handler
//!
//! Runs one full acquisition against the configured position source and
//! prints the resolved location.

use crate::config::Config;
use crate::engine::{LocationEngine, ResolvedLocation};
use crate::error::{Error, Result};
use crate::format;
use crate::geocode::google::GoogleGeocoder;
use crate::places::google::GooglePlaces;
use crate::position::scripted::ScriptedSource;
use crate::position::sim::SimSource;
use crate::position::{NoPositioning, PositionSource};
use clap::Args;
use std::time::Duration;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Simulated source center latitude
    #[arg(long)]
    pub lat: Option<f64>,

    /// Simulated source center longitude
    #[arg(long)]
    pub lng: Option<f64>,

    /// Replay a recorded acquisition from a JSON file
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub replay: Option<String>,

    /// Landmark search radius in meters
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Acquisition wall-clock budget in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format: text or json
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;

    let source = build_source(&args, &config)?;

    let geocoder = match GoogleGeocoder::from_config(&config.geocoder) {
        Ok(geocoder) => Some(geocoder),
        Err(_) => {
            eprintln!("Warning: geocoder not configured; showing coordinates only");
            None
        }
    };
    let places = GooglePlaces::from_config(&config.places);

    let mut policy = config.sampler_policy();
    if let Some(timeout) = args.timeout {
        policy.wall_clock = Duration::from_secs(timeout);
    }
    let radius = args.radius.unwrap_or(config.places.radius_m);

    let engine = LocationEngine::new(source, geocoder, places)
        .with_policy(policy)
        .with_landmark_radius(radius);

    match engine.assemble_complete().await {
        Ok(resolved) => {
            let format_name = args.format.unwrap_or_else(|| config.output.format.clone());
            match format_name.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&resolved)?),
                "text" => print_text(&resolved),
                other => return Err(Error::Config(format!("Unknown format: {}", other))),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.user_hint() {
                eprintln!("{}", hint);
            }
            if e.is_retryable() {
                eprintln!("Run `geofix locate` again to retry.");
            }
            std::process::exit(1);
        }
    }
}

/// Pick the position source from flags, falling back to configuration
fn build_source(args: &LocateArgs, config: &Config) -> Result<Box<dyn PositionSource>> {
    if let Some(path) = &args.replay {
        return Ok(Box::new(ScriptedSource::from_file(path)?));
    }
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        return Ok(Box::new(SimSource::new(lat, lng)));
    }

    match config.source.kind.as_str() {
        "sim" => Ok(Box::new(SimSource::new(config.source.latitude, config.source.longitude))),
        "replay" => {
            if config.source.replay_file.is_empty() {
                Err(Error::Config("source.replay_file is not set".to_string()))
            } else {
                Ok(Box::new(ScriptedSource::from_file(&config.source.replay_file)?))
            }
        }
        "none" => Ok(Box::new(NoPositioning)),
        other => Err(Error::Config(format!("Unknown source kind: {}", other))),
    }
}

fn print_text(resolved: &ResolvedLocation) {
    let tier = format::AccuracyTier::from_accuracy(resolved.accuracy_m);

    println!("Location:    {}", format::display_location(resolved));
    println!(
        "Coordinates: {}",
        format::format_coordinates(resolved.latitude, resolved.longitude)
    );
    if let Some(formatted) = &resolved.formatted_address {
        println!("Address:     {}", formatted);
    }
    if let Some(postal_code) = &resolved.postal_code {
        println!("Postal code: {}", postal_code);
    }
    println!("Captured:    {}", format::format_timestamp(resolved.captured_at));
    println!("Accuracy:    {}", format::accuracy_label(resolved.accuracy_m));
    println!("Quality:     {} - {}", tier, tier.description());
    println!("             {}", tier.recommendation());
}
