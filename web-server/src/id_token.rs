// web-server/src/id_token.rs
//! Identity token verification against the issuer's published key set.

use common::{decode_id_token, decode_id_token_unverified, AuthConfig, IdTokenClaims};
use jsonwebtoken::jwk::{Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode_header, Algorithm, DecodingKey};
use reqwest::Client;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};

pub enum IdTokenVerifier {
    /// Signature and expiry checked with keys from the issuer's JWKS
    Jwks(JwksVerifier),
    /// Claims read without any check. Local development only.
    Unverified,
}

impl IdTokenVerifier {
    pub fn from_config(config: &AuthConfig, http: Client) -> Result<Self> {
        if config.allow_unverified_id_tokens {
            tracing::warn!("Identity tokens are NOT verified (auth.allow_unverified_id_tokens = true)");
            return Ok(IdTokenVerifier::Unverified);
        }

        match config.jwks_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(IdTokenVerifier::Jwks(JwksVerifier::new(http, url))),
            _ => Err(ApiError::Internal(
                "auth.jwks_url is required unless auth.allow_unverified_id_tokens is set".to_string(),
            )),
        }
    }

    pub async fn claims(&self, token: &str) -> Result<IdTokenClaims> {
        match self {
            IdTokenVerifier::Jwks(verifier) => verifier.verify(token).await,
            IdTokenVerifier::Unverified => Ok(decode_id_token_unverified(token)?),
        }
    }

    /// Wallet address the token was issued to
    pub async fn wallet_address(&self, token: &str) -> Result<String> {
        let claims = self.claims(token).await?;
        if claims.ethereum_address.is_empty() {
            return Err(ApiError::Unauthorized("Identity token has no wallet address".to_string()));
        }
        Ok(claims.ethereum_address)
    }
}

pub struct JwksVerifier {
    http: Client,
    url: String,
    keys: RwLock<Option<JwkSet>>,
}

impl JwksVerifier {
    pub fn new(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
            keys: RwLock::new(None),
        }
    }

    async fn verify(&self, token: &str) -> Result<IdTokenClaims> {
        let header = decode_header(token)?;

        let (key, declared) = match self.cached_key(header.kid.as_deref()).await? {
            Some(found) => found,
            None => {
                // Unknown kid: the issuer may have rotated keys
                self.refresh().await?;
                self.cached_key(header.kid.as_deref())
                    .await?
                    .ok_or_else(|| ApiError::Unauthorized("Identity token signed with unknown key".to_string()))?
            }
        };

        // The issuer's declared algorithm wins over whatever the token header claims
        let algorithm = match declared {
            Some(algorithm) if algorithm != header.alg => {
                return Err(ApiError::Unauthorized(
                    "Identity token algorithm does not match its signing key".to_string(),
                ));
            },
            Some(algorithm) => algorithm,
            None => header.alg,
        };

        Ok(decode_id_token(token, &key, algorithm)?)
    }

    async fn cached_key(&self, kid: Option<&str>) -> Result<Option<(DecodingKey, Option<Algorithm>)>> {
        let keys = self.keys.read().await;
        let Some(set) = keys.as_ref() else {
            return Ok(None);
        };

        let jwk = match kid {
            Some(kid) => set.find(kid),
            None if set.keys.len() == 1 => set.keys.first(),
            None => None,
        };

        match jwk {
            Some(jwk) => Ok(Some((DecodingKey::from_jwk(jwk)?, declared_algorithm(jwk)))),
            None => Ok(None),
        }
    }

    async fn refresh(&self) -> Result<()> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ApiError::transport("Failed to fetch identity key set", e))?;

        let set: JwkSet = crate::clients::decode_json("identity key set", response).await?;
        tracing::info!("Loaded {} identity signing keys", set.keys.len());

        *self.keys.write().await = Some(set);
        Ok(())
    }
}

/// Signature algorithm the key set declares for a key, if any
fn declared_algorithm(jwk: &Jwk) -> Option<Algorithm> {
    let algorithm = match jwk.common.key_algorithm.as_ref()? {
        KeyAlgorithm::HS256 => Algorithm::HS256,
        KeyAlgorithm::HS384 => Algorithm::HS384,
        KeyAlgorithm::HS512 => Algorithm::HS512,
        KeyAlgorithm::ES256 => Algorithm::ES256,
        KeyAlgorithm::ES384 => Algorithm::ES384,
        KeyAlgorithm::RS256 => Algorithm::RS256,
        KeyAlgorithm::RS384 => Algorithm::RS384,
        KeyAlgorithm::RS512 => Algorithm::RS512,
        KeyAlgorithm::PS256 => Algorithm::PS256,
        KeyAlgorithm::PS384 => Algorithm::PS384,
        KeyAlgorithm::PS512 => Algorithm::PS512,
        KeyAlgorithm::EdDSA => Algorithm::EdDSA,
        // encryption algorithms never sign identity tokens
        _ => return None,
    };
    Some(algorithm)
}
