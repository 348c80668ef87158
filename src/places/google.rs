//! Google-style nearby-search backend
//!
//! Each search runs through a session-scoped query context; the backend
//! counts open contexts so leaks are observable.

use crate::config::PlacesConfig;
use crate::constants::api::PLACES_NEARBY_URL;
use crate::constants::geocode::HTTP_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::places::{NearbyRequest, Place, PlacesProvider, QueryContext};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = "geofix/0.1.0";

/// Proximity-search backend over the provider's JSON HTTP API
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    client: reqwest::Client,
    api_key: String,
    open_contexts: Arc<AtomicUsize>,
}

/// Provider response envelope
#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<Place>,
}

impl GooglePlaces {
    /// Create a backend; an empty key leaves the provider unusable
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            open_contexts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a backend from configuration
    pub fn from_config(config: &PlacesConfig) -> Self {
        Self::new(config.api_key.clone())
    }

    /// Number of query contexts currently open
    pub fn open_context_count(&self) -> usize {
        self.open_contexts.load(Ordering::SeqCst)
    }

    fn build_url(&self, context: &QueryContext, request: &NearbyRequest) -> String {
        format!(
            "{}?location={:.6},{:.6}&radius={}&type={}&sessiontoken={}&key={}",
            PLACES_NEARBY_URL,
            request.latitude,
            request.longitude,
            request.radius_m,
            urlencoding::encode(&request.categories.join("|")),
            context.id(),
            self.api_key,
        )
    }

    fn interpret(body: PlacesResponse) -> Result<Vec<Place>> {
        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.results),
            other => Err(Error::Places(other.to_string())),
        }
    }
}

impl PlacesProvider for GooglePlaces {
    fn is_ready(&self) -> bool {
        true
    }

    async fn open_context(&self) -> Result<QueryContext> {
        if self.api_key.is_empty() {
            return Err(Error::Places("no API key configured".to_string()));
        }

        let counter = self.open_contexts.clone();
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(QueryContext::new(move || {
            counter.fetch_sub(1, Ordering::SeqCst);
        }))
    }

    async fn nearby_search(
        &self,
        context: &QueryContext,
        request: &NearbyRequest,
    ) -> Result<Vec<Place>> {
        let url = self.build_url(context, request);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Places(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Places(format!(
                "provider returned status: {}",
                response.status()
            )));
        }

        let body: PlacesResponse = response
            .json()
            .await
            .map_err(|e| Error::Places(format!("invalid response: {}", e)))?;

        Self::interpret(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_accounting() {
        let backend = GooglePlaces::new("test-key");
        assert_eq!(backend.open_context_count(), 0);

        let context = backend.open_context().await.unwrap();
        assert_eq!(backend.open_context_count(), 1);

        drop(context);
        assert_eq!(backend.open_context_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_key_refuses_context() {
        let backend = GooglePlaces::from_config(&PlacesConfig::default());
        assert!(backend.open_context().await.is_err());
        assert_eq!(backend.open_context_count(), 0);
    }

    #[tokio::test]
    async fn test_build_url() {
        let backend = GooglePlaces::new("test-key");
        let context = backend.open_context().await.unwrap();
        let request = NearbyRequest::points_of_interest(12.9716, 77.5946, 500.0);

        let url = backend.build_url(&context, &request);
        assert!(url.starts_with(PLACES_NEARBY_URL));
        assert!(url.contains("location=12.971600,77.594600"));
        assert!(url.contains("radius=500"));
        assert!(url.contains("point_of_interest%7Cestablishment"));
        assert!(url.contains(&context.id().to_string()));
    }

    #[test]
    fn test_interpret_ok_and_empty() {
        let body: PlacesResponse = serde_json::from_str(
            r#"{"status": "OK", "results": [{"name": "Cubbon Park"}]}"#,
        )
        .unwrap();
        let places = GooglePlaces::interpret(body).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Cubbon Park");

        let empty: PlacesResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert!(GooglePlaces::interpret(empty).unwrap().is_empty());
    }

    #[test]
    fn test_interpret_failure_status() {
        let body: PlacesResponse =
            serde_json::from_str(r#"{"status": "OVER_QUERY_LIMIT", "results": []}"#).unwrap();
        assert!(matches!(
            GooglePlaces::interpret(body),
            Err(Error::Places(status)) if status == "OVER_QUERY_LIMIT"
        ));
    }
}
