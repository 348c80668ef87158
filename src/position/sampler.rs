//! Best-fix sample acquisition
//!
//! Consumes a continuous position subscription and reduces it to a single
//! sample. Event delivery races the wall-clock timer; once one sample exists
//! the policy always prefers some answer over no answer.

use crate::constants::policy;
use crate::error::{Error, Result};
use crate::position::{PositionSource, RawSample, SubscribeOptions};
use std::time::Duration;
use tracing::{debug, warn};

/// Tunable thresholds for one acquisition
#[derive(Debug, Clone)]
pub struct SamplerPolicy {
    /// Accuracy (meters) treated as a genuine satellite fix; accept immediately
    pub tight_accuracy_m: f64,
    /// Accuracy (meters) accepted once `min_samples` have been observed
    pub loose_accuracy_m: f64,
    /// Samples that must be observed before the loose threshold applies
    pub min_samples: u32,
    /// Hard cap on observed samples; the best seen is returned afterwards
    pub max_samples: u32,
    /// Wall-clock budget racing the whole acquisition
    pub wall_clock: Duration,
}

impl Default for SamplerPolicy {
    fn default() -> Self {
        Self {
            tight_accuracy_m: policy::TIGHT_ACCURACY_M,
            loose_accuracy_m: policy::LOOSE_ACCURACY_M,
            min_samples: policy::MIN_SAMPLES,
            max_samples: policy::MAX_SAMPLES,
            wall_clock: Duration::from_secs(policy::WALL_CLOCK_SECS),
        }
    }
}

/// Acquire a single best-effort sample from a continuous source
///
/// Subscribes fresh-only, tracks the running best (a later, less accurate
/// sample never replaces a better one) and stops at the first of: tight
/// accuracy reached, loose accuracy reached after `min_samples`, the sample
/// cap, or the wall clock. Delivery failures after at least one sample
/// degrade to the best sample seen. The subscription and the timer are torn
/// down on every exit path, including cancellation of the returned future.
pub async fn acquire(source: &dyn PositionSource, policy: &SamplerPolicy) -> Result<RawSample> {
    let mut subscription = source.subscribe(&SubscribeOptions::default())?;

    let deadline = tokio::time::sleep(policy.wall_clock);
    tokio::pin!(deadline);

    let mut best: Option<RawSample> = None;
    let mut observed: u32 = 0;
    let mut stream_done = false;
    let mut failure_done = false;

    loop {
        tokio::select! {
            maybe = subscription.updates.recv(), if !stream_done => {
                match maybe {
                    Some(sample) => {
                        observed += 1;
                        debug!(
                            source = source.name(),
                            observed,
                            accuracy_m = sample.accuracy_m,
                            "position_sample_received"
                        );
                        if best.as_ref().map_or(true, |b| sample.accuracy_m < b.accuracy_m) {
                            best = Some(sample);
                        }
                        let accuracy = best.as_ref().map_or(f64::INFINITY, |b| b.accuracy_m);
                        let accept = accuracy <= policy.tight_accuracy_m
                            || (observed >= policy.min_samples
                                && accuracy <= policy.loose_accuracy_m)
                            || observed >= policy.max_samples;
                        if accept {
                            if let Some(sample) = best.take() {
                                debug!(
                                    source = source.name(),
                                    observed,
                                    accuracy_m = sample.accuracy_m,
                                    "position_fix_accepted"
                                );
                                return Ok(sample);
                            }
                        }
                    }
                    None => stream_done = true,
                }
            }
            result = &mut subscription.failure, if !failure_done => {
                failure_done = true;
                if let Ok(failure) = result {
                    return match best.take() {
                        Some(sample) => {
                            warn!(
                                source = source.name(),
                                ?failure,
                                accuracy_m = sample.accuracy_m,
                                "position_source_failed_returning_best"
                            );
                            Ok(sample)
                        }
                        None => Err(failure.into()),
                    };
                }
                // Producer went away without a report; the stream close decides.
            }
            _ = &mut deadline => {
                return match best.take() {
                    Some(sample) => {
                        warn!(
                            source = source.name(),
                            accuracy_m = sample.accuracy_m,
                            "acquisition_deadline_returning_best"
                        );
                        Ok(sample)
                    }
                    None => Err(Error::AcquisitionTimeout),
                };
            }
        }

        if stream_done && failure_done {
            return match best.take() {
                Some(sample) => Ok(sample),
                None => Err(Error::SignalUnavailable),
            };
        }
    }
}
