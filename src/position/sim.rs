//! Simulated position source
//!
//! Emits jittered samples around a configured coordinate with accuracy
//! improving geometrically toward a floor, mimicking a receiver settling
//! into a fix. Drives the CLI without positioning hardware.

use crate::config::defaults::{
    DEFAULT_SIM_FLOOR_ACCURACY_M, DEFAULT_SIM_INITIAL_ACCURACY_M, DEFAULT_SIM_INTERVAL_MS,
};
use crate::constants::geo::METERS_PER_DEGREE_LAT;
use crate::error::Result;
use crate::position::{PositionSource, RawSample, SourceHandle, SubscribeOptions, Subscription};
use chrono::Utc;
use rand::Rng;
use std::time::Duration;

/// Per-tick geometric accuracy improvement factor
const ACCURACY_DECAY: f64 = 0.85;

/// Simulated position source centered on a fixed coordinate
#[derive(Debug, Clone)]
pub struct SimSource {
    latitude: f64,
    longitude: f64,
    initial_accuracy_m: f64,
    floor_accuracy_m: f64,
    interval: Duration,
}

impl SimSource {
    /// Create a simulated source centered on the given coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            initial_accuracy_m: DEFAULT_SIM_INITIAL_ACCURACY_M,
            floor_accuracy_m: DEFAULT_SIM_FLOOR_ACCURACY_M,
            interval: Duration::from_millis(DEFAULT_SIM_INTERVAL_MS),
        }
    }

    /// Override the starting accuracy
    pub fn starting_at(mut self, accuracy_m: f64) -> Self {
        self.initial_accuracy_m = accuracy_m;
        self
    }

    /// Override the best achievable accuracy
    pub fn settling_to(mut self, accuracy_m: f64) -> Self {
        self.floor_accuracy_m = accuracy_m;
        self
    }

    /// Override the delivery cadence
    pub fn every(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl PositionSource for SimSource {
    fn name(&self) -> &'static str {
        "sim"
    }

    fn subscribe(&self, _opts: &SubscribeOptions) -> Result<Subscription> {
        let (handle, subscription) = Subscription::channel(16);
        let sim = self.clone();
        tokio::spawn(run_sim(sim, handle));
        Ok(subscription)
    }
}

async fn run_sim(sim: SimSource, handle: SourceHandle) {
    let SourceHandle { updates, mut cancelled, .. } = handle;

    let mut interval = tokio::time::interval(sim.interval);
    let mut accuracy = sim.initial_accuracy_m;

    loop {
        tokio::select! {
            _ = &mut cancelled => return,
            _ = interval.tick() => {
                let sample = jittered_sample(&sim, accuracy);
                if updates.send(sample).await.is_err() {
                    return;
                }
                accuracy = (accuracy * ACCURACY_DECAY).max(sim.floor_accuracy_m);
            }
        }
    }
}

fn jittered_sample(sim: &SimSource, accuracy: f64) -> RawSample {
    let mut rng = rand::thread_rng();

    // Scatter the reported position within the current accuracy radius
    let offset_deg = accuracy / METERS_PER_DEGREE_LAT;
    let latitude = sim.latitude + rng.gen_range(-offset_deg..=offset_deg);
    let longitude = sim.longitude + rng.gen_range(-offset_deg..=offset_deg);
    let reported = accuracy * rng.gen_range(0.9..1.1);

    RawSample {
        latitude,
        longitude,
        accuracy_m: reported,
        altitude_m: Some(rng.gen_range(880.0..920.0)),
        heading_deg: None,
        speed_mps: None,
        captured_at: Utc::now(),
    }
}
