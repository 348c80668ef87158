//! Scripted position source
//!
//! Plays back a fixed sequence of delayed samples and, optionally, an
//! injected delivery failure. Used as the test backbone and for replaying
//! recorded acquisition runs from JSON files.

use crate::error::{Error, Result};
use crate::position::{
    PositionSource, RawSample, SourceFailure, SourceHandle, SubscribeOptions, Subscription,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One scripted delivery event
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Deliver a sample after the given delay
    Sample { after: Duration, sample: RawSample },
    /// Report a terminal failure after the given delay
    Fail { after: Duration, failure: SourceFailure },
}

impl ScriptStep {
    /// Sample step with only the mandatory fields set
    pub fn sample(delay_ms: u64, latitude: f64, longitude: f64, accuracy_m: f64) -> Self {
        ScriptStep::Sample {
            after: Duration::from_millis(delay_ms),
            sample: RawSample::new(latitude, longitude, accuracy_m),
        }
    }

    /// Failure step
    pub fn fail(delay_ms: u64, failure: SourceFailure) -> Self {
        ScriptStep::Fail { after: Duration::from_millis(delay_ms), failure }
    }
}

/// Position source that replays a fixed script
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    steps: Vec<ScriptStep>,
    hold_open: bool,
}

/// One entry of a JSON replay file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayStep {
    /// Delay before this event, in milliseconds
    #[serde(default)]
    pub delay_ms: u64,
    /// Sample to deliver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<ReplaySample>,
    /// Failure to report instead of a sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<SourceFailure>,
}

/// Sample fields as stored in a replay file (timestamp assigned at delivery)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaySample {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_mps: Option<f64>,
}

impl ScriptedSource {
    /// Create a source from explicit steps; the stream closes after the last one
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps, hold_open: false }
    }

    /// Keep the stream open (silent) after the script instead of closing it
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Load a script from a JSON replay file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let steps: Vec<ReplayStep> = serde_json::from_str(&content)?;
        Self::from_replay(steps)
    }

    /// Build a source from deserialized replay steps
    pub fn from_replay(steps: Vec<ReplayStep>) -> Result<Self> {
        let mut script = Vec::with_capacity(steps.len());
        for (index, step) in steps.into_iter().enumerate() {
            let after = Duration::from_millis(step.delay_ms);
            match (step.sample, step.fail) {
                (Some(sample), None) => script.push(ScriptStep::Sample {
                    after,
                    sample: RawSample {
                        latitude: sample.latitude,
                        longitude: sample.longitude,
                        accuracy_m: sample.accuracy_m,
                        altitude_m: sample.altitude_m,
                        heading_deg: sample.heading_deg,
                        speed_mps: sample.speed_mps,
                        captured_at: Utc::now(),
                    },
                }),
                (None, Some(failure)) => script.push(ScriptStep::Fail { after, failure }),
                _ => {
                    return Err(Error::Replay(format!(
                        "step {} must carry exactly one of `sample` or `fail`",
                        index
                    )));
                }
            }
        }
        Ok(Self::new(script))
    }
}

impl PositionSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn subscribe(&self, _opts: &SubscribeOptions) -> Result<Subscription> {
        let (handle, subscription) = Subscription::channel(16);
        let steps = self.steps.clone();
        let hold_open = self.hold_open;
        tokio::spawn(run_script(steps, hold_open, handle));
        Ok(subscription)
    }
}

async fn run_script(steps: Vec<ScriptStep>, hold_open: bool, handle: SourceHandle) {
    let SourceHandle { updates, mut failure, mut cancelled } = handle;

    for step in steps {
        match step {
            ScriptStep::Sample { after, mut sample } => {
                tokio::select! {
                    _ = &mut cancelled => return,
                    _ = tokio::time::sleep(after) => {
                        sample.captured_at = Utc::now();
                        if updates.send(sample).await.is_err() {
                            return;
                        }
                    }
                }
            }
            ScriptStep::Fail { after, failure: reported } => {
                tokio::select! {
                    _ = &mut cancelled => return,
                    _ = tokio::time::sleep(after) => {
                        if let Some(tx) = failure.take() {
                            let _ = tx.send(reported);
                        }
                        return;
                    }
                }
            }
        }
    }

    if hold_open {
        // Stay silent until the subscriber goes away
        let _ = (&mut cancelled).await;
    }
    // Dropping `updates` closes the stream
}
