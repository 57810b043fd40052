// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use config::{Config as ConfigFile, File, Environment};

/// Central configuration for the trips API
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web_server_addr: String,
    pub log_level: String,

    pub auth: AuthConfig,
    pub upstream: UpstreamConfig,
    pub exchange: ExchangeConfig,
    pub session: SessionConfig,
    pub trips: TripsConfig,
}

/// OAuth-style parameters for the wallet challenge flow
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub client_id: String,
    pub domain: String,
    pub scope: String,
    pub response_type: String,
    pub grant_type: String,
    pub generate_challenge_url: String,
    pub submit_challenge_url: String,
    /// Issuer key set used to verify identity tokens
    pub jwks_url: Option<String>,
    /// Read identity token claims without checking the signature. Local development only.
    pub allow_unverified_id_tokens: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub identity_api_url: String,
    pub trips_api_base_url: String,
    pub telemetry_api_url: String,
    pub token_exchange_api_url: String,
    pub device_data_api_base_url: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub nft_contract_address: String,
    pub privileges: Vec<u32>,
    /// Exchange a privilege token when a vehicle lookup finds none cached
    pub on_demand: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_domain: String,
    pub cookie_secure: bool,
    pub session_ttl_secs: i64,
    pub privilege_ttl_secs: i64,
    pub cleanup_interval_secs: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TripsConfig {
    pub max_trips: usize,
    pub lookup_fallback: TripLookupFallback,
}

/// What trip resolution does when the reverse index has never seen a trip id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripLookupFallback {
    /// Report the trip as not found
    Fail,
    /// Re-list every vehicle of the wallet and scan their trips
    Scan,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_server_addr: "127.0.0.1:3007".to_string(),
            log_level: "info".to_string(),
            auth: AuthConfig::default(),
            upstream: UpstreamConfig::default(),
            exchange: ExchangeConfig::default(),
            session: SessionConfig::default(),
            trips: TripsConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            domain: "http://localhost:3000".to_string(),
            scope: "openid email".to_string(),
            response_type: "code".to_string(),
            grant_type: "authorization_code".to_string(),
            generate_challenge_url: "https://auth.dimo.zone/auth/web3/generate_challenge".to_string(),
            submit_challenge_url: "https://auth.dimo.zone/auth/web3/submit_challenge".to_string(),
            jwks_url: Some("https://auth.dimo.zone/keys".to_string()),
            allow_unverified_id_tokens: false,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            identity_api_url: "https://identity-api.dimo.zone/query".to_string(),
            trips_api_base_url: "https://trips-api.dimo.zone".to_string(),
            telemetry_api_url: "https://telemetry-api.dimo.zone/query".to_string(),
            token_exchange_api_url: "https://token-exchange-api.dimo.zone/v1/tokens/exchange".to_string(),
            device_data_api_base_url: None,
            request_timeout_secs: 30,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            nft_contract_address: "0xbA5738a18d83D41847dfFbDC6101d37C69c9B0cF".to_string(),
            privileges: vec![4],
            on_demand: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session_id".to_string(),
            cookie_domain: "localhost".to_string(),
            cookie_secure: false,
            session_ttl_secs: 2 * 60 * 60,
            privilege_ttl_secs: 10 * 60,
            cleanup_interval_secs: 10 * 60,
        }
    }
}

impl Default for TripsConfig {
    fn default() -> Self {
        Self {
            max_trips: 20,
            lookup_fallback: TripLookupFallback::Fail,
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        Self::load_from(&config_dir, &run_mode)
    }

    /// Layer `default.toml`, `{run_mode}.toml` and `local.toml` from `config_dir`, then `APP__` variables
    pub fn load_from(config_dir: &Path, run_mode: &str) -> Result<Self, config::ConfigError> {
        ConfigFile::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Environment variables with prefix "APP", e.g. APP__UPSTREAM__TRIPS_API_BASE_URL
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Load from files, falling back to defaults plus plain environment variables.
    ///
    /// Runs before tracing is installed, so the load error is handed back
    /// for the caller to log instead of being logged here.
    pub fn from_env() -> (Self, Option<config::ConfigError>) {
        Self::or_env_fallback(Self::load())
    }

    pub fn or_env_fallback(loaded: Result<Self, config::ConfigError>) -> (Self, Option<config::ConfigError>) {
        match loaded {
            Ok(config) => (config, None),
            Err(e) => {
                let mut config = Self::default();

                if let Ok(addr) = env::var("WEB_SERVER_ADDR") {
                    config.web_server_addr = addr;
                }
                if let Ok(level) = env::var("LOG_LEVEL") {
                    config.log_level = level;
                }
                if let Ok(client_id) = env::var("CLIENT_ID") {
                    config.auth.client_id = client_id;
                }
                if let Ok(domain) = env::var("DOMAIN") {
                    config.auth.domain = domain;
                }
                config.auth.allow_unverified_id_tokens = env::var("ALLOW_UNVERIFIED_ID_TOKENS")
                    .map(|v| v.to_lowercase() == "true")
                    .unwrap_or(false);

                (config, Some(e))
            }
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session.session_ttl_secs)
    }

    pub fn privilege_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session.privilege_ttl_secs)
    }
}
