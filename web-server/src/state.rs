// web-server/src/state.rs
use std::sync::Arc;

use common::models::session::SessionEntry;
use common::Config;

use crate::cache::{InMemoryTripIndex, Purge, TokenCache, TripIndex};
use crate::clients::Upstream;
use crate::error::Result;
use crate::id_token::IdTokenVerifier;
use crate::views::{HtmlFragments, Renderer};

/// Everything a handler needs, shared across workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// session id -> identity token
    pub sessions: Arc<TokenCache<SessionEntry>>,
    /// `privilegeToken_{session}_{vehicle}` -> privilege token
    pub privileges: Arc<TokenCache<String>>,
    pub trip_index: Arc<dyn TripIndex>,
    pub upstream: Upstream,
    pub verifier: Arc<IdTokenVerifier>,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let upstream = Upstream::from_config(&config)?;
        let verifier = IdTokenVerifier::from_config(&config.auth, upstream.http().clone())?;

        Ok(Self {
            sessions: Arc::new(TokenCache::new("sessions", config.session_ttl())),
            privileges: Arc::new(TokenCache::new("privileges", config.privilege_ttl())),
            trip_index: Arc::new(InMemoryTripIndex::new()),
            upstream,
            verifier: Arc::new(verifier),
            renderer: Arc::new(HtmlFragments),
            config: Arc::new(config),
        })
    }

    /// Caches the janitor should sweep
    pub fn caches(&self) -> Vec<Arc<dyn Purge>> {
        vec![
            self.sessions.clone() as Arc<dyn Purge>,
            self.privileges.clone() as Arc<dyn Purge>,
        ]
    }
}
