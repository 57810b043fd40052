// common/src/models/telemetry.rs
use serde::{Deserialize, Serialize};

/// One aggregated value of a telemetry signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub timestamp: String,
    pub value: f64,
}

/// `signals` block of the telemetry GraphQL response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSeries {
    #[serde(default)]
    pub current_location_longitude: Vec<SignalPoint>,
    #[serde(default)]
    pub current_location_latitude: Vec<SignalPoint>,
    #[serde(default)]
    pub speed: Vec<SignalPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalsData {
    #[serde(default)]
    pub signals: Option<SignalSeries>,
}

/// A located, timed speed reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub timestamp: String,
}

impl SignalSeries {
    /// Pair the three series by position. Ragged series are cut to the shortest.
    pub fn zip(&self) -> Vec<LocationSample> {
        let lon = &self.current_location_longitude;
        let lat = &self.current_location_latitude;
        let speed = &self.speed;

        if lon.len() != lat.len() || lat.len() != speed.len() {
            tracing::warn!(
                longitude = lon.len(),
                latitude = lat.len(),
                speed = speed.len(),
                "Telemetry series have different lengths, truncating to the shortest"
            );
        }

        lon.iter()
            .zip(lat.iter())
            .zip(speed.iter())
            .map(|((lon, lat), speed)| LocationSample {
                latitude: lat.value,
                longitude: lon.value,
                speed: speed.value,
                timestamp: speed.timestamp.clone(),
            })
            .collect()
    }
}
