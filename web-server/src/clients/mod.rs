// web-server/src/clients/mod.rs
//! Adapters for the upstream services the API proxies to.
//!
//! Every adapter issues a single request per call. Nothing is retried;
//! failures surface as [`ApiError`] and abort the calling request.

pub mod auth;
pub mod device_data;
pub mod exchange;
pub mod identity;
pub mod telemetry;
pub mod trips;

use std::time::Duration;

use common::Config;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

pub use auth::Web3AuthClient;
pub use device_data::DeviceDataClient;
pub use exchange::TokenExchangeClient;
pub use identity::IdentityClient;
pub use telemetry::TelemetryClient;
pub use trips::TripsClient;

/// All upstream adapters, sharing one connection pool
#[derive(Clone)]
pub struct Upstream {
    pub auth: Web3AuthClient,
    pub exchange: TokenExchangeClient,
    pub identity: IdentityClient,
    pub trips: TripsClient,
    pub telemetry: TelemetryClient,
    pub device_data: Option<DeviceDataClient>,
    http: Client,
}

impl Upstream {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.upstream.request_timeout_secs))
            .user_agent(concat!("trips-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            auth: Web3AuthClient::new(http.clone(), config.auth.clone()),
            exchange: TokenExchangeClient::new(
                http.clone(),
                &config.upstream.token_exchange_api_url,
                config.exchange.clone(),
            ),
            identity: IdentityClient::new(http.clone(), &config.upstream.identity_api_url),
            trips: TripsClient::new(http.clone(), &config.upstream.trips_api_base_url, config.trips.max_trips),
            telemetry: TelemetryClient::new(http.clone(), &config.upstream.telemetry_api_url),
            device_data: config
                .upstream
                .device_data_api_base_url
                .as_deref()
                .map(|url| DeviceDataClient::new(http.clone(), url)),
            http,
        })
    }

    /// The shared client, for callers outside the adapters (key set fetches)
    pub fn http(&self) -> &Client {
        &self.http
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// POST a GraphQL query and return its `data` block
pub(crate) async fn post_graphql<V, T>(
    http: &Client,
    service: &'static str,
    url: &str,
    bearer: &str,
    query: &str,
    variables: V,
) -> Result<T>
where
    V: Serialize,
    T: DeserializeOwned,
{
    let response = http
        .post(url)
        .bearer_auth(bearer)
        .json(&GraphQlRequest { query, variables })
        .send()
        .await
        .map_err(|e| ApiError::transport(format!("Failed to reach {}", service), e))?;

    let body: GraphQlResponse<T> = decode_json(service, response).await?;
    let errors = body.errors.unwrap_or_default();

    match body.data {
        Some(data) => {
            if let Some(first) = errors.first() {
                tracing::warn!(service, "GraphQL returned partial data: {}", first.message);
            }
            Ok(data)
        },
        None => {
            let reason = errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "no data".to_string());
            Err(ApiError::Protocol(format!("{} query failed: {}", service, reason)))
        }
    }
}

/// Check the status and decode the JSON body
pub(crate) async fn decode_json<T: DeserializeOwned>(service: &'static str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), "Upstream returned non-success status");
        return Err(ApiError::UpstreamStatus {
            service,
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::from_reqwest(&format!("Error processing response from {}", service), e))
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
