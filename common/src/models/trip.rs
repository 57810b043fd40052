// common/src/models/trip.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub start: TimeEntry,
    pub end: TimeEntry,
}

/// Upstream timestamp, kept exactly as received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripsResponse {
    #[serde(default)]
    pub trips: Vec<Trip>,
}

impl Trip {
    pub fn new(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: TimeEntry { time: start.into() },
            end: TimeEntry { time: end.into() },
        }
    }
}
