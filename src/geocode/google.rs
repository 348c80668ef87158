//! Google-style reverse-geocoding backend
//!
//! Issues one reverse-geocoding request per resolution, asking for the full
//! range of address result types with fixed language/region hints so the
//! provider formats addresses for the product's locale.

use crate::config::GeocoderConfig;
use crate::constants::{api::GEOCODE_URL, geocode};
use crate::error::{Error, Result};
use crate::geocode::{AddressCandidate, GeocodeProvider};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "geofix/0.1.0";

/// Result types requested from the provider, most specific first
const RESULT_TYPES: &str = "street_address|premise|subpremise|route|sublocality|\
sublocality_level_1|sublocality_level_2|locality|administrative_area_level_1|\
administrative_area_level_2|postal_code";

/// Reverse-geocoding backend over the provider's JSON HTTP API
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    language: String,
    region: String,
}

/// Provider response envelope
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<AddressCandidate>,
    #[serde(default)]
    error_message: Option<String>,
}

impl GoogleGeocoder {
    /// Create a backend with the default language/region hints
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(geocode::HTTP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key: api_key.into(),
            language: geocode::LANGUAGE.to_string(),
            region: geocode::REGION.to_string(),
        }
    }

    /// Create a backend from configuration
    ///
    /// Fails with `GeocodingUnavailable` when no API key is configured,
    /// mirroring a provider that never finished loading.
    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::GeocodingUnavailable);
        }
        let mut backend = Self::new(config.api_key.clone());
        backend.language = config.language.clone();
        backend.region = config.region.clone();
        Ok(backend)
    }

    fn build_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}?latlng={:.6},{:.6}&language={}&region={}&result_type={}&key={}",
            GEOCODE_URL,
            lat,
            lon,
            self.language,
            self.region,
            urlencoding::encode(RESULT_TYPES),
            self.api_key,
        )
    }

    /// Map the provider envelope to candidates or a typed failure
    fn interpret(body: GeocodeResponse) -> Result<Vec<AddressCandidate>> {
        if body.status != "OK" && body.results.is_empty() {
            let status = match body.error_message {
                Some(message) => format!("{}: {}", body.status, message),
                None => body.status,
            };
            return Err(Error::GeocodingFailed(status));
        }
        Ok(body.results)
    }
}

impl GeocodeProvider for GoogleGeocoder {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<AddressCandidate>> {
        let url = self.build_url(lat, lon);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::GeocodingFailed(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::GeocodingFailed(format!(
                "provider returned status: {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| Error::GeocodingFailed(format!("invalid response: {}", e)))?;

        Self::interpret(body)
    }
}
