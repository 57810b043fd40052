// web-server/src/main.rs
use std::time::Duration;

use actix::Actor;
use actix_web::{web, App, HttpServer};
use common::{setup_tracing, Config};
use trips_api::cache::CacheJanitor;
use trips_api::middleware::ErrorLog;
use trips_api::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration; the outcome is logged once tracing is up
    let (config, load_error) = Config::from_env();

    if let Err(e) = setup_tracing(&config.log_level) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    match load_error {
        None => tracing::info!("Configuration loaded from files and environment"),
        Some(e) => {
            tracing::warn!("Failed to load configuration from files: {}", e);
            tracing::info!("Falling back to environment variables only");
        }
    }

    // Save address before moving config into the state
    let server_addr = config.web_server_addr.clone();
    let cleanup_interval = Duration::from_secs(config.session.cleanup_interval_secs.max(1));

    let state = AppState::from_config(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // Start the cache janitor
    let _janitor = CacheJanitor::new(state.caches(), cleanup_interval).start();

    tracing::info!("Starting Trips API on {}", server_addr);

    let state_data = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(ErrorLog)
            .app_data(state_data.clone())
            .configure(trips_api::configure)
    })
    .bind(&server_addr)?
    .run()
    .await
}
