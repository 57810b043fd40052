// web-server/src/api/mod.rs
pub mod exchange;
pub mod trips;
pub mod vehicles;
pub mod web3;

use actix_web::{get, web, HttpResponse, Responder};

use crate::error::ApiError;
use crate::middleware::RequireSession;

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Trips API is running")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| ApiError::Validation(err.to_string()).into()))
        .app_data(web::PathConfig::default().error_handler(|err, _req| ApiError::Validation(err.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| ApiError::Validation(err.to_string()).into()))
        .service(index)
        .service(
            web::scope("/auth/web3")
                .service(web3::generate_challenge)
                .service(web3::submit_challenge),
        )
        .service(
            web::scope("/api")
                .wrap(RequireSession)
                .service(exchange::token_exchange)
                .service(vehicles::my_vehicles)
                .service(vehicles::vehicle_trips)
                .service(trips::trip_trace),
        );
}
