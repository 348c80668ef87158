//! Landmark lookup
//!
//! Best-effort enrichment: every failure mode resolves to an empty list.
//! The provider-readiness wait is a bounded backoff poll, and the search
//! itself races an independent timeout that forces the query context to be
//! released even if the provider never answers.

use crate::constants::landmarks;
use crate::places::{NearbyRequest, Place, PlacesProvider};
use std::time::Duration;
use tracing::{debug, warn};

/// Find up to three named places near a coordinate
///
/// Never fails outward: a provider that is not ready, errors, or times out
/// yields an empty list. The query context is dropped on every exit path.
pub async fn find_nearby<P: PlacesProvider>(
    provider: &P,
    lat: f64,
    lon: f64,
    radius_m: f64,
) -> Vec<String> {
    let budget = Duration::from_secs(landmarks::READINESS_BUDGET_SECS);
    if !wait_until_ready(provider, budget).await {
        warn!("places_provider_not_ready");
        return Vec::new();
    }

    let context = match provider.open_context().await {
        Ok(context) => context,
        Err(e) => {
            warn!(error = %e, "places_context_unavailable");
            return Vec::new();
        }
    };
    debug!(context = %context.id(), "places_context_opened");

    let request = NearbyRequest::points_of_interest(lat, lon, radius_m);
    let search = provider.nearby_search(&context, &request);
    let timeout = Duration::from_secs(landmarks::SEARCH_TIMEOUT_SECS);

    // The context drops at the end of this scope whichever branch wins
    match tokio::time::timeout(timeout, search).await {
        Ok(Ok(places)) => top_names(places),
        Ok(Err(e)) => {
            warn!(error = %e, "places_search_failed");
            Vec::new()
        }
        Err(_) => {
            warn!(timeout_secs = landmarks::SEARCH_TIMEOUT_SECS, "places_search_timed_out");
            Vec::new()
        }
    }
}

/// Poll the provider with bounded exponential backoff until it is ready
///
/// Returns false once the budget is exhausted without a ready signal.
pub async fn wait_until_ready<P: PlacesProvider>(provider: &P, budget: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + budget;
    let mut delay = Duration::from_millis(landmarks::POLL_INITIAL_MS);

    loop {
        if provider.is_ready() {
            return true;
        }
        let now = tokio::time::Instant::now();
        if now >= deadline {
            return false;
        }
        tokio::time::sleep(delay.min(deadline - now)).await;
        delay = (delay * 2).min(Duration::from_millis(landmarks::POLL_MAX_MS));
    }
}

/// Up to the three most relevant non-empty names, provider order preserved
fn top_names(places: Vec<Place>) -> Vec<String> {
    places
        .into_iter()
        .map(|place| place.name)
        .filter(|name| !name.is_empty())
        .take(landmarks::MAX_LANDMARKS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::places::QueryContext;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Copy)]
    enum SearchBehavior {
        Return,
        Error,
        Hang,
    }

    struct MockPlaces {
        ready_after_polls: usize,
        polls: AtomicUsize,
        behavior: SearchBehavior,
        places: Vec<Place>,
        searches: AtomicUsize,
        open_contexts: Arc<AtomicUsize>,
    }

    impl MockPlaces {
        fn new(behavior: SearchBehavior, places: Vec<Place>) -> Self {
            Self {
                ready_after_polls: 0,
                polls: AtomicUsize::new(0),
                behavior,
                places,
                searches: AtomicUsize::new(0),
                open_contexts: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn ready_after(mut self, polls: usize) -> Self {
            self.ready_after_polls = polls;
            self
        }

        fn never_ready(mut self) -> Self {
            self.ready_after_polls = usize::MAX;
            self
        }
    }

    impl PlacesProvider for MockPlaces {
        fn is_ready(&self) -> bool {
            self.polls.fetch_add(1, Ordering::SeqCst) >= self.ready_after_polls
        }

        async fn open_context(&self) -> Result<QueryContext> {
            let counter = self.open_contexts.clone();
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(QueryContext::new(move || {
                counter.fetch_sub(1, Ordering::SeqCst);
            }))
        }

        async fn nearby_search(
            &self,
            _context: &QueryContext,
            _request: &NearbyRequest,
        ) -> Result<Vec<Place>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                SearchBehavior::Return => Ok(self.places.clone()),
                SearchBehavior::Error => Err(Error::Places("UNKNOWN_ERROR".to_string())),
                SearchBehavior::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    fn named(names: &[&str]) -> Vec<Place> {
        names
            .iter()
            .map(|n| Place { name: n.to_string(), vicinity: None })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_top_three_nonempty() {
        let provider = MockPlaces::new(
            SearchBehavior::Return,
            named(&["Cubbon Park", "", "Vidhana Soudha", "UB City", "Lalbagh"]),
        );

        let landmarks = find_nearby(&provider, 12.97, 77.59, 500.0).await;
        assert_eq!(landmarks, vec!["Cubbon Park", "Vidhana Soudha", "UB City"]);
        assert_eq!(provider.open_contexts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_ready_skips_search() {
        let provider = MockPlaces::new(SearchBehavior::Return, named(&["Cubbon Park"])).never_ready();

        let landmarks = find_nearby(&provider, 12.97, 77.59, 500.0).await;
        assert!(landmarks.is_empty());
        assert_eq!(provider.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_readiness_still_searches() {
        let provider = MockPlaces::new(SearchBehavior::Return, named(&["Cubbon Park"])).ready_after(3);

        let landmarks = find_nearby(&provider, 12.97, 77.59, 500.0).await;
        assert_eq!(landmarks, vec!["Cubbon Park"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_error_resolves_empty_and_releases_context() {
        let provider = MockPlaces::new(SearchBehavior::Error, vec![]);

        let landmarks = find_nearby(&provider, 12.97, 77.59, 500.0).await;
        assert!(landmarks.is_empty());
        assert_eq!(provider.open_contexts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_search_times_out_and_releases_context() {
        let provider = MockPlaces::new(SearchBehavior::Hang, vec![]);

        let landmarks = find_nearby(&provider, 12.97, 77.59, 500.0).await;
        assert!(landmarks.is_empty());
        assert_eq!(provider.searches.load(Ordering::SeqCst), 1);
        assert_eq!(provider.open_contexts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_ready_respects_budget() {
        let provider = MockPlaces::new(SearchBehavior::Return, vec![]).never_ready();

        let start = tokio::time::Instant::now();
        let ready = wait_until_ready(&provider, Duration::from_secs(10)).await;
        assert!(!ready);
        // The poll never sleeps past its deadline
        assert!(start.elapsed() <= Duration::from_secs(10) + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_ready_immediate() {
        let provider = MockPlaces::new(SearchBehavior::Return, vec![]);

        let start = tokio::time::Instant::now();
        assert!(wait_until_ready(&provider, Duration::from_secs(10)).await);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
