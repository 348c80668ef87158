//! Reverse geocoding
//!
//! Turns a coordinate pair into structured address fields by querying a
//! geocoding provider, scoring its candidates, and extracting the typed
//! components of the winner.

pub mod candidate;
pub mod google;

use crate::error::{Error, Result};
pub use candidate::{
    extract_address, select_candidate, AddressCandidate, AddressComponent, AddressExtract,
    ComponentKind,
};

/// Trait for reverse-geocoding providers
pub trait GeocodeProvider: Send + Sync {
    /// Query the provider for ranked address candidates at a coordinate
    fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl std::future::Future<Output = Result<Vec<AddressCandidate>>> + Send;
}

/// Resolve a coordinate into extracted address fields
///
/// Issues one provider query, selects the best candidate and extracts its
/// components. A response with no usable candidate fails like a provider
/// rejection; the caller decides whether that is fatal.
pub async fn resolve<G: GeocodeProvider>(geocoder: &G, lat: f64, lon: f64) -> Result<AddressExtract> {
    let candidates = geocoder.reverse_geocode(lat, lon).await?;
    let selected = select_candidate(&candidates)
        .ok_or_else(|| Error::GeocodingFailed("ZERO_RESULTS".to_string()))?;
    Ok(extract_address(selected))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGeocoder(Vec<AddressCandidate>);

    impl GeocodeProvider for FixedGeocoder {
        async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Vec<AddressCandidate>> {
            Ok(self.0.clone())
        }
    }

    struct FailingGeocoder;

    impl GeocodeProvider for FailingGeocoder {
        async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Vec<AddressCandidate>> {
            Err(Error::GeocodingFailed("OVER_QUERY_LIMIT".to_string()))
        }
    }

    #[tokio::test]
    async fn test_resolve_extracts_selected_candidate() {
        let json = r#"{
            "types": ["street_address"],
            "formatted_address": "14 MG Road, Indiranagar, Bengaluru",
            "address_components": [
                {"long_name": "14", "short_name": "14", "types": ["street_number"]},
                {"long_name": "MG Road", "short_name": "MG Rd", "types": ["route"]},
                {"long_name": "Indiranagar", "short_name": "Indiranagar",
                 "types": ["sublocality_level_1", "sublocality"]},
                {"long_name": "Bengaluru", "short_name": "Bengaluru", "types": ["locality"]}
            ]
        }"#;
        let candidate: AddressCandidate = serde_json::from_str(json).unwrap();
        let geocoder = FixedGeocoder(vec![candidate]);

        let extract = resolve(&geocoder, 12.97, 77.59).await.unwrap();
        assert_eq!(extract.address.as_deref(), Some("14 MG Road"));
        assert_eq!(extract.city.as_deref(), Some("Indiranagar, Bengaluru"));
    }

    #[tokio::test]
    async fn test_resolve_empty_candidates_fails() {
        let geocoder = FixedGeocoder(vec![]);
        let result = resolve(&geocoder, 12.97, 77.59).await;
        assert!(matches!(result, Err(Error::GeocodingFailed(_))));
    }

    #[tokio::test]
    async fn test_resolve_propagates_provider_error() {
        let result = resolve(&FailingGeocoder, 12.97, 77.59).await;
        assert!(matches!(result, Err(Error::GeocodingFailed(status)) if status == "OVER_QUERY_LIMIT"));
    }
}
