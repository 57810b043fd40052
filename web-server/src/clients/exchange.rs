// web-server/src/clients/exchange.rs
use common::ExchangeConfig;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

const SERVICE: &str = "token exchange API";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeRequest<'a> {
    nft_contract_address: &'a str,
    privileges: &'a [u32],
    token_id: i64,
}

/// Trades an identity token for a vehicle-scoped privilege token
#[derive(Clone)]
pub struct TokenExchangeClient {
    http: Client,
    url: String,
    config: ExchangeConfig,
}

impl TokenExchangeClient {
    pub fn new(http: Client, url: &str, config: ExchangeConfig) -> Self {
        Self {
            http,
            url: url.to_string(),
            config,
        }
    }

    pub async fn exchange(&self, id_token: &str, token_id: i64) -> Result<String> {
        let request = ExchangeRequest {
            nft_contract_address: &self.config.nft_contract_address,
            privileges: &self.config.privileges,
            token_id,
        };

        tracing::debug!(token_id, "Requesting privilege token");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(id_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::transport("Error sending request to token exchange API", e))?;

        let body: Map<String, Value> = super::decode_json(SERVICE, response).await?;

        match body.get("token") {
            Some(Value::String(token)) if !token.is_empty() => Ok(token.clone()),
            _ => Err(ApiError::Protocol(
                "Token not found in response from token exchange API".to_string(),
            )),
        }
    }
}
