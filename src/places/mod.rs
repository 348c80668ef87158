//! Nearby-place search
//!
//! The proximity-search provider demands an ephemeral query context created
//! before querying and destroyed after. `QueryContext` models that handle as
//! a scoped acquisition: its release hook runs on drop, so the context
//! cannot outlive the call that opened it.

pub mod finder;
pub mod google;

use crate::error::Result;
use serde::Deserialize;
use uuid::Uuid;

pub use finder::{find_nearby, wait_until_ready};

/// A named place returned by a proximity search
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: String,
    /// Short human locality description, when the provider supplies one
    #[serde(default)]
    pub vicinity: Option<String>,
}

/// One proximity-search request
#[derive(Debug, Clone)]
pub struct NearbyRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    /// Provider category filter
    pub categories: Vec<String>,
}

impl NearbyRequest {
    /// Standard points-of-interest request used for landmark enrichment
    pub fn points_of_interest(latitude: f64, longitude: f64, radius_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_m,
            categories: vec!["point_of_interest".to_string(), "establishment".to_string()],
        }
    }
}

/// Ephemeral provider handle scoped to one search call
///
/// The release hook runs exactly once, when the context is dropped.
pub struct QueryContext {
    id: Uuid,
    on_release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl QueryContext {
    /// Create a context with a release hook
    pub fn new(on_release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { id: Uuid::new_v4(), on_release: Some(Box::new(on_release)) }
    }

    /// Session token identifying this context to the provider
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for QueryContext {
    fn drop(&mut self) {
        if let Some(release) = self.on_release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryContext").field("id", &self.id).finish()
    }
}

/// Trait for proximity-search providers
pub trait PlacesProvider: Send + Sync {
    /// Whether the provider has finished initializing
    fn is_ready(&self) -> bool;

    /// Create the ephemeral context required for querying
    fn open_context(&self) -> impl std::future::Future<Output = Result<QueryContext>> + Send;

    /// Search for named places near a coordinate
    fn nearby_search(
        &self,
        context: &QueryContext,
        request: &NearbyRequest,
    ) -> impl std::future::Future<Output = Result<Vec<Place>>> + Send;
}
