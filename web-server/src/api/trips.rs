// web-server/src/api/trips.rs
use actix_web::{get, web, HttpResponse};
use common::models::session::AuthenticatedSession;
use common::TripWindowQuery;

use crate::error::Result;
use crate::state::AppState;

/// GeoJSON trace of one trip plus its speed colors
#[get("/trip/{trip_id}")]
pub async fn trip_trace(
    state: web::Data<AppState>,
    session: web::ReqData<AuthenticatedSession>,
    path: web::Path<String>,
    query: web::Query<TripWindowQuery>,
) -> Result<HttpResponse> {
    let trip_id = path.into_inner();
    let window = match query.into_inner() {
        TripWindowQuery {
            start: Some(start),
            end: Some(end),
        } if !start.is_empty() && !end.is_empty() => Some((start, end)),
        _ => None,
    };

    let response = state.trip_trace(&session, &trip_id, window).await?;
    Ok(HttpResponse::Ok().json(response))
}
