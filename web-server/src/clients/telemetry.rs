// web-server/src/clients/telemetry.rs
use common::models::telemetry::{LocationSample, SignalsData};
use reqwest::Client;
use serde_json::json;

use crate::error::{ApiError, Result};

const SERVICE: &str = "telemetry API";

const TRIP_SIGNALS_QUERY: &str = r#"
query TripSignals($tokenId: Int!, $from: Time!, $to: Time!) {
    signals(tokenID: $tokenId, from: $from, to: $to) {
        currentLocationLongitude(agg: { type: AVG, interval: "1h" }) {
            timestamp
            value
        }
        currentLocationLatitude(agg: { type: AVG, interval: "1h" }) {
            timestamp
            value
        }
        speed(agg: { type: MAX, interval: "1h" }) {
            timestamp
            value
        }
    }
}"#;

/// Time-windowed signal queries
#[derive(Clone)]
pub struct TelemetryClient {
    http: Client,
    url: String,
}

impl TelemetryClient {
    pub fn new(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }

    /// Hourly location and top speed of a vehicle between `from` and `to`
    pub async fn location_samples(
        &self,
        token_id: i64,
        from: &str,
        to: &str,
        privilege_token: &str,
    ) -> Result<Vec<LocationSample>> {
        let data: SignalsData = super::post_graphql(
            &self.http,
            SERVICE,
            &self.url,
            privilege_token,
            TRIP_SIGNALS_QUERY,
            json!({ "tokenId": token_id, "from": from, "to": to }),
        )
        .await?;

        let series = data
            .signals
            .ok_or_else(|| ApiError::Protocol("Telemetry response has no signals".to_string()))?;

        let samples = series.zip();
        if samples.is_empty() {
            tracing::warn!(token_id, from, to, "No location data received");
        }
        Ok(samples)
    }
}
