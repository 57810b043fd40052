// web-server/src/clients/auth.rs
use common::{AuthConfig, ChallengeResponse};
use reqwest::Client;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

const SERVICE: &str = "auth service";

/// Client for the wallet challenge endpoints of the auth service
#[derive(Clone)]
pub struct Web3AuthClient {
    http: Client,
    config: AuthConfig,
}

impl Web3AuthClient {
    pub fn new(http: Client, config: AuthConfig) -> Self {
        Self { http, config }
    }

    /// Ask the auth service for a challenge the wallet at `address` must sign
    pub async fn generate_challenge(&self, address: &str) -> Result<ChallengeResponse> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("domain", self.config.domain.as_str()),
            ("scope", self.config.scope.as_str()),
            ("response_type", self.config.response_type.as_str()),
            ("address", address),
        ];

        let response = self
            .http
            .post(&self.config.generate_challenge_url)
            .form(&form[..])
            .send()
            .await
            .map_err(|e| ApiError::transport("Failed to make request to external service", e))?;

        let challenge: ChallengeResponse = super::decode_json(SERVICE, response).await?;

        if challenge.state.is_empty() || challenge.challenge.is_empty() {
            return Err(ApiError::Protocol(
                "State or Challenge incomplete from external service".to_string(),
            ));
        }

        Ok(challenge)
    }

    /// Submit the signed challenge and return the issued identity token
    pub async fn submit_challenge(&self, state: &str, signature: &str) -> Result<String> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("domain", self.config.domain.as_str()),
            ("grant_type", self.config.grant_type.as_str()),
            ("state", state),
            ("signature", signature),
        ];

        let response = self
            .http
            .post(&self.config.submit_challenge_url)
            .form(&form[..])
            .send()
            .await
            .map_err(|e| ApiError::transport("Failed to make request to external service", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Protocol(format!(
                "Received non-success status code: {}",
                status.as_u16()
            )));
        }

        let body: Map<String, Value> = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest("Error processing response", e))?;

        match body.get("id_token") {
            Some(Value::String(token)) if !token.is_empty() => Ok(token.clone()),
            None | Some(Value::String(_)) | Some(Value::Null) => {
                Err(ApiError::Protocol("Token not found in response".to_string()))
            },
            Some(_) => Err(ApiError::Protocol("Token in response is not a string".to_string())),
        }
    }
}
