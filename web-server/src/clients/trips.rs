// web-server/src/clients/trips.rs
use common::models::trip::{Trip, TripsResponse};
use reqwest::Client;

use crate::error::{ApiError, Result};

const SERVICE: &str = "trips API";

/// Per-vehicle trip listings
#[derive(Clone)]
pub struct TripsClient {
    http: Client,
    base_url: String,
    max_trips: usize,
}

impl TripsClient {
    pub fn new(http: Client, base_url: &str, max_trips: usize) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            max_trips,
        }
    }

    /// Most recent trips of a vehicle, newest end time first
    pub async fn list_trips(&self, token_id: i64, privilege_token: &str) -> Result<Vec<Trip>> {
        let url = super::join_url(&self.base_url, &format!("vehicle/{}/trips", token_id));

        let response = self
            .http
            .get(&url)
            .bearer_auth(privilege_token)
            .send()
            .await
            .map_err(|e| ApiError::transport("Failed to fetch trips", e))?;

        let body: TripsResponse = super::decode_json(SERVICE, response).await?;

        Ok(latest_trips(body.trips, self.max_trips))
    }
}

/// Sort by end time descending and keep the newest `limit`.
/// End times are compared as the upstream strings.
pub fn latest_trips(mut trips: Vec<Trip>, limit: usize) -> Vec<Trip> {
    trips.sort_by(|a, b| b.end.time.cmp(&a.end.time));
    trips.truncate(limit);
    trips
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_latest_trips_orders_and_truncates() {
        let trips = (0..25)
            .map(|i| Trip::new(format!("t{:02}", i), "s", format!("2024-01-{:02}T00:00:00Z", i + 1)))
            .collect();

        let latest = latest_trips(trips, 20);
        assert_eq!(latest.len(), 20);
        assert_eq!(latest[0].id, "t24");
        assert_eq!(latest[19].id, "t05");
    }

    #[tokio::test]
    async fn test_list_trips_uses_privilege_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vehicle/17/trips"))
            .and(header("authorization", "Bearer priv-17"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "trips": [
                    { "id": "old", "start": { "time": "2024-01-01T08:00:00Z" }, "end": { "time": "2024-01-01T09:00:00Z" } },
                    { "id": "new", "start": { "time": "2024-02-01T08:00:00Z" }, "end": { "time": "2024-02-01T09:00:00Z" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = TripsClient::new(Client::new(), &server.uri(), 20);
        let trips = client.list_trips(17, "priv-17").await.unwrap();

        assert_eq!(trips.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["new", "old"]);
        assert_eq!(trips[1].start.time, "2024-01-01T08:00:00Z");
    }

    #[tokio::test]
    async fn test_list_trips_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = TripsClient::new(Client::new(), &server.uri(), 20);
        assert!(matches!(client.list_trips(17, "priv").await, Err(ApiError::Protocol(_))));
    }
}
