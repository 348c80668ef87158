//! Location assembly
//!
//! Orchestrates the pipeline: acquire a best-fix sample, resolve its address,
//! enrich with nearby landmarks, and hand back one immutable result. Only
//! sampler failures cross this boundary; everything downstream degrades.

use crate::error::Result;
use crate::geocode::{self, AddressExtract, GeocodeProvider};
use crate::places::{self, PlacesProvider};
use crate::position::sampler::{self, SamplerPolicy};
use crate::position::{PositionSource, RawSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One fully assembled location fix
///
/// Constructed from exactly one raw sample and at most one selected address
/// candidate. An empty landmark list is a legitimate value, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub nearby_landmarks: Vec<String>,
    pub captured_at: DateTime<Utc>,
}

impl ResolvedLocation {
    fn from_sample(sample: &RawSample) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            accuracy_m: sample.accuracy_m,
            address: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
            formatted_address: None,
            nearby_landmarks: Vec::new(),
            captured_at: sample.captured_at,
        }
    }

    fn apply_address(&mut self, extract: AddressExtract) {
        self.address = extract.address;
        self.city = extract.city;
        self.state = extract.state;
        self.country = extract.country;
        self.postal_code = extract.postal_code;
        self.formatted_address = extract.formatted_address;
    }
}

/// The location resolution pipeline
///
/// One engine per call site; two concurrent callers get two independent
/// pipelines with their own subscription and query context.
pub struct LocationEngine<S, G, P> {
    source: S,
    geocoder: Option<G>,
    places: P,
    policy: SamplerPolicy,
    landmark_radius_m: f64,
}

impl<S, G, P> LocationEngine<S, G, P>
where
    S: PositionSource,
    G: GeocodeProvider,
    P: PlacesProvider,
{
    /// Create an engine with default policy and landmark radius
    ///
    /// `geocoder` is `None` when the provider is unavailable; assembly then
    /// degrades to coordinate-only results.
    pub fn new(source: S, geocoder: Option<G>, places: P) -> Self {
        Self {
            source,
            geocoder,
            places,
            policy: SamplerPolicy::default(),
            landmark_radius_m: crate::constants::landmarks::DEFAULT_RADIUS_M,
        }
    }

    /// Override the acquisition policy
    pub fn with_policy(mut self, policy: SamplerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the landmark search radius
    pub fn with_landmark_radius(mut self, radius_m: f64) -> Self {
        self.landmark_radius_m = radius_m;
        self
    }

    /// Run the full pipeline once
    ///
    /// Fails only with the sampler's typed errors; address and landmark
    /// lookups degrade to absent fields. Dropping the returned future
    /// cancels the subscription and any pending provider timer.
    pub async fn assemble_complete(&self) -> Result<ResolvedLocation> {
        let acquisition = Uuid::new_v4();
        info!(
            acquisition = %acquisition,
            source = self.source.name(),
            "location_acquisition_started"
        );

        let sample = sampler::acquire(&self.source, &self.policy).await?;
        let mut resolved = ResolvedLocation::from_sample(&sample);

        match &self.geocoder {
            Some(geocoder) => {
                match geocode::resolve(geocoder, sample.latitude, sample.longitude).await {
                    Ok(extract) => resolved.apply_address(extract),
                    Err(e) => {
                        warn!(acquisition = %acquisition, error = %e, "reverse_geocoding_degraded");
                    }
                }
            }
            None => debug!(acquisition = %acquisition, "geocoder_not_configured"),
        }

        resolved.nearby_landmarks = places::find_nearby(
            &self.places,
            sample.latitude,
            sample.longitude,
            self.landmark_radius_m,
        )
        .await;

        info!(
            acquisition = %acquisition,
            accuracy_m = resolved.accuracy_m,
            has_address = resolved.address.is_some(),
            landmarks = resolved.nearby_landmarks.len(),
            "location_assembled"
        );
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::geocode::AddressCandidate;
    use crate::places::{NearbyRequest, Place, QueryContext};
    use crate::position::scripted::{ScriptStep, ScriptedSource};
    use crate::position::SourceFailure;

    struct StubGeocoder {
        candidates: Vec<AddressCandidate>,
        fail: bool,
    }

    impl GeocodeProvider for StubGeocoder {
        async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Vec<AddressCandidate>> {
            if self.fail {
                Err(Error::GeocodingFailed("UNKNOWN_ERROR".to_string()))
            } else {
                Ok(self.candidates.clone())
            }
        }
    }

    struct StubPlaces(Vec<&'static str>);

    impl PlacesProvider for StubPlaces {
        fn is_ready(&self) -> bool {
            true
        }

        async fn open_context(&self) -> Result<QueryContext> {
            Ok(QueryContext::new(|| {}))
        }

        async fn nearby_search(
            &self,
            _context: &QueryContext,
            _request: &NearbyRequest,
        ) -> Result<Vec<Place>> {
            Ok(self
                .0
                .iter()
                .map(|n| Place { name: n.to_string(), vicinity: None })
                .collect())
        }
    }

    fn street_candidate() -> AddressCandidate {
        serde_json::from_str(
            r#"{
                "types": ["street_address"],
                "formatted_address": "14 MG Road, Indiranagar, Bengaluru",
                "address_components": [
                    {"long_name": "14", "short_name": "14", "types": ["street_number"]},
                    {"long_name": "MG Road", "short_name": "MG Rd", "types": ["route"]},
                    {"long_name": "Indiranagar", "short_name": "Indiranagar",
                     "types": ["sublocality_level_1", "sublocality"]},
                    {"long_name": "Bengaluru", "short_name": "Bengaluru", "types": ["locality"]},
                    {"long_name": "Karnataka", "short_name": "KA",
                     "types": ["administrative_area_level_1"]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn good_source() -> ScriptedSource {
        ScriptedSource::new(vec![ScriptStep::sample(10, 12.9716, 77.5946, 8.0)]).hold_open()
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_assembly() {
        let engine = LocationEngine::new(
            good_source(),
            Some(StubGeocoder { candidates: vec![street_candidate()], fail: false }),
            StubPlaces(vec!["Cubbon Park", "UB City"]),
        );

        let resolved = engine.assemble_complete().await.unwrap();
        assert_eq!(resolved.latitude, 12.9716);
        assert_eq!(resolved.accuracy_m, 8.0);
        assert_eq!(resolved.address.as_deref(), Some("14 MG Road"));
        assert_eq!(resolved.city.as_deref(), Some("Indiranagar, Bengaluru"));
        assert_eq!(resolved.state.as_deref(), Some("Karnataka"));
        assert_eq!(resolved.nearby_landmarks, vec!["Cubbon Park", "UB City"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_geocoder_failure_degrades_to_coordinates() {
        let engine = LocationEngine::new(
            good_source(),
            Some(StubGeocoder { candidates: vec![], fail: true }),
            StubPlaces(vec!["Cubbon Park"]),
        );

        let resolved = engine.assemble_complete().await.unwrap();
        assert!(resolved.address.is_none());
        assert!(resolved.city.is_none());
        assert_eq!(resolved.latitude, 12.9716);
        // Landmarks still attach even without an address
        assert_eq!(resolved.nearby_landmarks, vec!["Cubbon Park"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_geocoder_degrades_to_coordinates() {
        let engine = LocationEngine::<_, StubGeocoder, _>::new(
            good_source(),
            None,
            StubPlaces(vec![]),
        );

        let resolved = engine.assemble_complete().await.unwrap();
        assert!(resolved.address.is_none());
        assert!(resolved.nearby_landmarks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampler_failure_propagates() {
        let source = ScriptedSource::new(vec![ScriptStep::fail(10, SourceFailure::PermissionDenied)]);
        let engine = LocationEngine::new(
            source,
            Some(StubGeocoder { candidates: vec![], fail: false }),
            StubPlaces(vec![]),
        );

        let result = engine.assemble_complete().await;
        assert!(matches!(result, Err(Error::PermissionDenied)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_landmarks_is_not_an_error() {
        let engine = LocationEngine::new(
            good_source(),
            Some(StubGeocoder { candidates: vec![street_candidate()], fail: false }),
            StubPlaces(vec![]),
        );

        let resolved = engine.assemble_complete().await.unwrap();
        assert!(resolved.nearby_landmarks.is_empty());
        assert!(resolved.address.is_some());
    }

    #[test]
    fn test_resolved_location_serialization() {
        let sample = RawSample::new(12.9716, 77.5946, 8.0);
        let resolved = ResolvedLocation::from_sample(&sample);

        let json = serde_json::to_string(&resolved).unwrap();
        // Absent optional fields are omitted entirely
        assert!(!json.contains("address"));
        let parsed: ResolvedLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.latitude, 12.9716);
    }
}
