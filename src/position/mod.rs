//! Positioning sources
//!
//! Defines the `PositionSource` trait and the subscription plumbing shared by
//! its implementations. A source delivers a continuous push stream of raw
//! samples plus a one-shot failure channel; the subscription tears the
//! producer down when dropped, so every exit path cleans up.

pub mod sampler;
pub mod scripted;
pub mod sim;

pub use sampler::{acquire, SamplerPolicy};

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

/// A single raw positioning-sensor sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSample {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Estimated accuracy radius in meters (lower is better)
    pub accuracy_m: f64,
    /// Altitude above the WGS84 ellipsoid in meters, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_m: Option<f64>,
    /// Heading in degrees clockwise from true north, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    /// Ground speed in meters per second, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_mps: Option<f64>,
    /// When the sample was captured
    pub captured_at: DateTime<Utc>,
}

impl RawSample {
    /// Minimal sample with only the mandatory fields set
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            altitude_m: None,
            heading_deg: None,
            speed_mps: None,
            captured_at: Utc::now(),
        }
    }
}

/// Why a source stopped delivering samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFailure {
    /// The user or platform refused location access
    PermissionDenied,
    /// The positioning hardware could not produce a fix
    Unavailable,
    /// The source's own internal deadline expired
    Timeout,
}

impl From<SourceFailure> for Error {
    fn from(failure: SourceFailure) -> Self {
        match failure {
            SourceFailure::PermissionDenied => Error::PermissionDenied,
            SourceFailure::Unavailable => Error::SignalUnavailable,
            SourceFailure::Timeout => Error::AcquisitionTimeout,
        }
    }
}

/// Delivery options passed to [`PositionSource::subscribe`]
#[derive(Debug, Clone, Copy)]
pub struct SubscribeOptions {
    /// Request the most accurate positioning mode the source offers
    pub high_accuracy: bool,
    /// Reject cached fixes; only freshly captured samples may be delivered
    pub fresh_only: bool,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self { high_accuracy: true, fresh_only: true }
    }
}

/// Consumer half of an active position subscription
///
/// Dropping the subscription cancels the producer, so teardown happens on
/// every exit path, including when the consuming future itself is dropped.
pub struct Subscription {
    pub(crate) updates: mpsc::Receiver<RawSample>,
    pub(crate) failure: oneshot::Receiver<SourceFailure>,
    cancel: Option<oneshot::Sender<()>>,
}

/// Producer half handed to a source's delivery task
pub struct SourceHandle {
    /// Sample delivery channel
    pub updates: mpsc::Sender<RawSample>,
    /// One-shot failure report; consumed by [`SourceHandle::fail`]
    pub failure: Option<oneshot::Sender<SourceFailure>>,
    /// Resolves when the subscriber has gone away
    pub cancelled: oneshot::Receiver<()>,
}

impl Subscription {
    /// Create a subscription and its producer half
    pub fn channel(buffer: usize) -> (SourceHandle, Subscription) {
        let (update_tx, update_rx) = mpsc::channel(buffer);
        let (failure_tx, failure_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let handle = SourceHandle {
            updates: update_tx,
            failure: Some(failure_tx),
            cancelled: cancel_rx,
        };
        let subscription = Subscription {
            updates: update_rx,
            failure: failure_rx,
            cancel: Some(cancel_tx),
        };
        (handle, subscription)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

impl SourceHandle {
    /// Deliver one sample; returns false once the subscriber is gone
    pub async fn deliver(&self, sample: RawSample) -> bool {
        self.updates.send(sample).await.is_ok()
    }

    /// Report a terminal failure. Subsequent calls are no-ops.
    pub fn fail(&mut self, failure: SourceFailure) {
        if let Some(tx) = self.failure.take() {
            let _ = tx.send(failure);
        }
    }
}

/// A continuous positioning source
///
/// Implementations spawn their delivery task in `subscribe` and stop it when
/// the returned subscription is dropped.
pub trait PositionSource: Send + Sync {
    /// Source name for logs
    fn name(&self) -> &'static str;

    /// Start continuous delivery
    ///
    /// Fails with `UnsupportedCapability` when the platform exposes no
    /// positioning API at all.
    fn subscribe(&self, opts: &SubscribeOptions) -> Result<Subscription>;
}

impl<T: PositionSource + ?Sized> PositionSource for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn subscribe(&self, opts: &SubscribeOptions) -> Result<Subscription> {
        (**self).subscribe(opts)
    }
}

/// Placeholder source for platforms without positioning support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPositioning;

impl PositionSource for NoPositioning {
    fn name(&self) -> &'static str {
        "none"
    }

    fn subscribe(&self, _opts: &SubscribeOptions) -> Result<Subscription> {
        Err(Error::UnsupportedCapability)
    }
}
