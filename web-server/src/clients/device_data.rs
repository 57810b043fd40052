// web-server/src/clients/device_data.rs
use reqwest::Client;

use crate::error::{ApiError, Result};
use crate::status::RawDeviceStatus;

const SERVICE: &str = "device data API";

/// Raw device status lookups
#[derive(Clone)]
pub struct DeviceDataClient {
    http: Client,
    base_url: String,
}

impl DeviceDataClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    pub async fn raw_status(&self, token_id: i64, privilege_token: &str) -> Result<RawDeviceStatus> {
        let url = super::join_url(&self.base_url, &format!("vehicle/{}/status-raw", token_id));

        let response = self
            .http
            .get(&url)
            .bearer_auth(privilege_token)
            .send()
            .await
            .map_err(|e| ApiError::transport("Failed to get raw device status", e))?;

        super::decode_json(SERVICE, response).await
    }
}
