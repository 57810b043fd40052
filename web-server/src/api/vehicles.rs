// web-server/src/api/vehicles.rs
use actix_web::http::header::ContentType;
use actix_web::{get, web, HttpResponse};
use common::models::session::AuthenticatedSession;

use crate::error::{ApiError, Result};
use crate::state::AppState;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

#[get("/vehicles/me")]
pub async fn my_vehicles(
    state: web::Data<AppState>,
    session: web::ReqData<AuthenticatedSession>,
) -> Result<HttpResponse> {
    let vehicles = state.vehicles_with_details(&session).await?;
    Ok(html(state.renderer.vehicles("My vehicles", &vehicles)))
}

#[get("/vehicle/{tokenid}/trips")]
pub async fn vehicle_trips(
    state: web::Data<AppState>,
    session: web::ReqData<AuthenticatedSession>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let token_id: i64 = path
        .parse()
        .map_err(|_| ApiError::Validation("Invalid token ID".to_string()))?;

    let trips = state.trips_for(&session, token_id).await?;
    Ok(html(state.renderer.trips(token_id, &trips)))
}
