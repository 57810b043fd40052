// web-server/src/api/exchange.rs
use actix_web::{post, web, HttpResponse};
use common::models::session::AuthenticatedSession;
use common::TokenExchangeResponse;

use crate::error::Result;
use crate::state::AppState;

/// Exchange the session's identity token for a privilege token on its first vehicle
#[post("/token_exchange")]
pub async fn token_exchange(
    state: web::Data<AppState>,
    session: web::ReqData<AuthenticatedSession>,
) -> Result<HttpResponse> {
    let token = state.exchange_for_first_vehicle(&session).await?;
    Ok(HttpResponse::Ok().json(TokenExchangeResponse { token }))
}
