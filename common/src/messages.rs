// common/src/messages.rs
use serde::{Deserialize, Serialize};

use crate::models::geojson::FeatureCollection;

/// Form posted to `/auth/web3/generate_challenge`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChallengeForm {
    pub address: Option<String>,
}

/// Form posted to `/auth/web3/submit_challenge`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitChallengeForm {
    pub state: Option<String>,
    pub signature: Option<String>,
}

/// Challenge issued by the auth service, relayed unchanged to the wallet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub challenge: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartedResponse {
    pub message: String,
    pub id_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenExchangeResponse {
    pub token: String,
}

/// Optional trip window supplied by the caller of `/api/trip/{tripID}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripWindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Map payload for a single trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripMapResponse {
    pub geojson: FeatureCollection,
    #[serde(rename = "speedGradient")]
    pub speed_gradient: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}
