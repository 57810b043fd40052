// web-server/src/api/web3.rs
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{post, web, HttpResponse};
use common::models::session::SessionEntry;
use common::{GenerateChallengeForm, SessionStartedResponse, SubmitChallengeForm};

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::utils::token::create_session_id;

fn required(value: &Option<String>, field: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation(format!("Missing {}", field)))
}

// Relay a login challenge for the wallet
#[post("/generate_challenge")]
pub async fn generate_challenge(
    state: web::Data<AppState>,
    form: web::Form<GenerateChallengeForm>,
) -> Result<HttpResponse> {
    let address = required(&form.address, "address")?;
    let challenge = state.upstream.auth.generate_challenge(&address).await?;

    tracing::info!(address = %address, "Challenge generated");
    Ok(HttpResponse::Ok().json(challenge))
}

// Submit the signed challenge and start a session
#[post("/submit_challenge")]
pub async fn submit_challenge(
    state: web::Data<AppState>,
    form: web::Form<SubmitChallengeForm>,
) -> Result<HttpResponse> {
    let challenge_state = required(&form.state, "state")?;
    let signature = required(&form.signature, "signature")?;

    let id_token = state.upstream.auth.submit_challenge(&challenge_state, &signature).await?;

    let session_id = create_session_id();
    let session_cfg = &state.config.session;
    state
        .sessions
        .put(session_id.clone(), SessionEntry::new(id_token.clone()), state.config.session_ttl());

    let cookie = Cookie::build(session_cfg.cookie_name.clone(), session_id)
        .domain(session_cfg.cookie_domain.clone())
        .path("/")
        .secure(session_cfg.cookie_secure)
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(session_cfg.session_ttl_secs))
        .finish();

    tracing::info!("Challenge accepted, session started");

    Ok(HttpResponse::Ok().cookie(cookie).json(SessionStartedResponse {
        message: "Challenge accepted and session started!".to_string(),
        id_token,
    }))
}
