// web-server/src/resolution.rs
//! Maps an opaque trip id to its owning vehicle and time window.

use async_trait::async_trait;
use common::models::trip::Trip;
use common::models::vehicle::Vehicle;
use common::TripLookupFallback;

use crate::cache::TripIndex;
use crate::error::{ApiError, Result};

pub const TRIP_NOT_FOUND: &str = "Trip not found";
pub const NO_VEHICLES_FOUND: &str = "No vehicles found";

/// A trip pinned to a vehicle and a telemetry window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrip {
    pub trip_id: String,
    pub token_id: i64,
    pub start: String,
    pub end: String,
}

impl ResolvedTrip {
    fn from_trip(trip: &Trip, token_id: i64) -> Self {
        Self {
            trip_id: trip.id.clone(),
            token_id,
            start: trip.start.time.clone(),
            end: trip.end.time.clone(),
        }
    }
}

/// Where resolution gets vehicles and trips from.
///
/// Implementations are expected to record every listed trip in the index.
#[async_trait]
pub trait TripCatalog: Send + Sync {
    async fn vehicles(&self) -> Result<Vec<Vehicle>>;
    async fn trips(&self, token_id: i64) -> Result<Vec<Trip>>;
}

/// Resolve `trip_id` through the reverse index, falling back per `fallback`.
///
/// `window` is the caller-supplied `(start, end)`; it is only honored on an
/// index hit, where it saves re-listing the vehicle's trips.
pub async fn resolve_trip(
    index: &dyn TripIndex,
    catalog: &dyn TripCatalog,
    trip_id: &str,
    window: Option<(String, String)>,
    fallback: TripLookupFallback,
) -> Result<ResolvedTrip> {
    if let Some(token_id) = index.lookup(trip_id) {
        tracing::debug!(trip_id, token_id, "Trip index hit");

        if let Some((start, end)) = window {
            return Ok(ResolvedTrip {
                trip_id: trip_id.to_string(),
                token_id,
                start,
                end,
            });
        }

        let trips = catalog.trips(token_id).await?;
        return trips
            .iter()
            .find(|trip| trip.id == trip_id)
            .map(|trip| ResolvedTrip::from_trip(trip, token_id))
            .ok_or_else(|| ApiError::NotFound(TRIP_NOT_FOUND.to_string()));
    }

    match fallback {
        TripLookupFallback::Fail => {
            tracing::debug!(trip_id, "Trip index miss");
            Err(ApiError::NotFound(TRIP_NOT_FOUND.to_string()))
        },
        TripLookupFallback::Scan => scan_for_trip(catalog, trip_id).await,
    }
}

async fn scan_for_trip(catalog: &dyn TripCatalog, trip_id: &str) -> Result<ResolvedTrip> {
    let vehicles = catalog.vehicles().await?;
    if vehicles.is_empty() {
        return Err(ApiError::NotFound(NO_VEHICLES_FOUND.to_string()));
    }

    for vehicle in &vehicles {
        let trips = match catalog.trips(vehicle.token_id).await {
            Ok(trips) => trips,
            Err(e) => {
                tracing::warn!(token_id = vehicle.token_id, "Skipping vehicle during trip scan: {}", e);
                continue;
            }
        };

        if let Some(trip) = trips.iter().find(|trip| trip.id == trip_id) {
            tracing::info!(trip_id, token_id = vehicle.token_id, "Trip found by scan");
            return Ok(ResolvedTrip::from_trip(trip, vehicle.token_id));
        }
    }

    Err(ApiError::NotFound(TRIP_NOT_FOUND.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryTripIndex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeCatalog {
        index: Arc<InMemoryTripIndex>,
        trips: HashMap<i64, Vec<Trip>>,
        failing: Vec<i64>,
        listings: AtomicUsize,
    }

    impl FakeCatalog {
        fn new(index: Arc<InMemoryTripIndex>) -> Self {
            Self {
                index,
                trips: HashMap::new(),
                failing: Vec::new(),
                listings: AtomicUsize::new(0),
            }
        }

        fn with_vehicle(mut self, token_id: i64, trips: Vec<Trip>) -> Self {
            self.trips.insert(token_id, trips);
            self
        }
    }

    #[async_trait]
    impl TripCatalog for FakeCatalog {
        async fn vehicles(&self) -> Result<Vec<Vehicle>> {
            let mut ids: Vec<_> = self.trips.keys().copied().collect();
            ids.sort();
            Ok(ids
                .into_iter()
                .map(|token_id| Vehicle {
                    token_id,
                    ..Default::default()
                })
                .collect())
        }

        async fn trips(&self, token_id: i64) -> Result<Vec<Trip>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&token_id) {
                return Err(ApiError::UpstreamStatus { service: "trips API", status: 502 });
            }
            let trips = self.trips.get(&token_id).cloned().unwrap_or_default();
            for trip in &trips {
                self.index.record(&trip.id, token_id);
            }
            Ok(trips)
        }
    }

    fn trip(id: &str) -> Trip {
        Trip::new(id, format!("{}-start", id), format!("{}-end", id))
    }

    #[tokio::test]
    async fn test_index_hit_relists_owner_for_window() {
        let index = Arc::new(InMemoryTripIndex::new());
        index.record("a", 7);
        let catalog = FakeCatalog::new(index.clone()).with_vehicle(7, vec![trip("a")]);

        let resolved = resolve_trip(index.as_ref(), &catalog, "a", None, TripLookupFallback::Fail)
            .await
            .unwrap();

        assert_eq!(resolved.token_id, 7);
        assert_eq!(resolved.start, "a-start");
        assert_eq!(resolved.end, "a-end");
    }

    #[tokio::test]
    async fn test_index_hit_with_window_skips_listing() {
        let index = Arc::new(InMemoryTripIndex::new());
        index.record("a", 7);
        let catalog = FakeCatalog::new(index.clone());

        let window = Some(("s".to_string(), "e".to_string()));
        let resolved = resolve_trip(index.as_ref(), &catalog, "a", window, TripLookupFallback::Fail)
            .await
            .unwrap();

        assert_eq!(resolved.start, "s");
        assert_eq!(resolved.end, "e");
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_miss_fails_without_scan() {
        let index = Arc::new(InMemoryTripIndex::new());
        let catalog = FakeCatalog::new(index.clone()).with_vehicle(7, vec![trip("a")]);

        let result = resolve_trip(index.as_ref(), &catalog, "a", None, TripLookupFallback::Fail).await;

        match result {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, TRIP_NOT_FOUND),
            other => panic!("expected not found, got {:?}", other),
        }
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scan_finds_trip_and_populates_index() {
        let index = Arc::new(InMemoryTripIndex::new());
        let mut catalog = FakeCatalog::new(index.clone())
            .with_vehicle(7, vec![trip("a")])
            .with_vehicle(8, vec![trip("b")])
            .with_vehicle(9, vec![trip("c")]);
        catalog.failing.push(7);

        let resolved = resolve_trip(index.as_ref(), &catalog, "b", None, TripLookupFallback::Scan)
            .await
            .unwrap();
        assert_eq!(resolved.token_id, 8);

        // later lookups hit the index and keep resolving to the same vehicle
        for _ in 0..3 {
            let again = resolve_trip(index.as_ref(), &catalog, "b", None, TripLookupFallback::Fail)
                .await
                .unwrap();
            assert_eq!(again.token_id, 8);
        }
    }

    #[tokio::test]
    async fn test_scan_without_vehicles() {
        let index = Arc::new(InMemoryTripIndex::new());
        let catalog = FakeCatalog::new(index.clone());

        let result = resolve_trip(index.as_ref(), &catalog, "unknown-id", None, TripLookupFallback::Scan).await;

        match result {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, NO_VEHICLES_FOUND),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scan_exhausted() {
        let index = Arc::new(InMemoryTripIndex::new());
        let catalog = FakeCatalog::new(index.clone()).with_vehicle(7, vec![trip("a")]);

        let result = resolve_trip(index.as_ref(), &catalog, "zzz", None, TripLookupFallback::Scan).await;
        assert!(matches!(result, Err(ApiError::NotFound(msg)) if msg == TRIP_NOT_FOUND));
    }
}
