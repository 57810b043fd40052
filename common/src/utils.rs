// common/src/utils.rs
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Setup tracing. `RUST_LOG` wins over the configured level when set.
pub fn setup_tracing(level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
}

/// Claims carried by the identity token issued after challenge submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub ethereum_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Verify the token signature with `key` and return its claims
pub fn decode_id_token(
    token: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
) -> Result<IdTokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(algorithm);
    validation.validate_aud = false;

    let token_data = decode::<IdTokenClaims>(token, key, &validation)?;
    Ok(token_data.claims)
}

/// Read the claims without any signature or expiry check
pub fn decode_id_token_unverified(token: &str) -> Result<IdTokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<IdTokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(token_data.claims)
}
