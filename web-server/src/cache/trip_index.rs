// web-server/src/cache/trip_index.rs
use dashmap::DashMap;

/// Reverse index from trip id to the vehicle that owns it.
///
/// Populated whenever trips are listed. A miss only means the trip has not
/// been seen in a listing yet.
pub trait TripIndex: Send + Sync {
    fn lookup(&self, trip_id: &str) -> Option<i64>;
    fn record(&self, trip_id: &str, token_id: i64);
}

#[derive(Default)]
pub struct InMemoryTripIndex {
    trips: DashMap<String, i64>,
}

impl InMemoryTripIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

impl TripIndex for InMemoryTripIndex {
    fn lookup(&self, trip_id: &str) -> Option<i64> {
        self.trips.get(trip_id).map(|entry| *entry.value())
    }

    fn record(&self, trip_id: &str, token_id: i64) {
        self.trips.insert(trip_id.to_string(), token_id);
    }
}
