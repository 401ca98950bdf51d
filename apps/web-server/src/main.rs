//! # Blogicum web server
//!
//! Server-rendered blog on Actix-web: posts, categories, locations,
//! comments and user accounts.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod forms;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;
mod views;

#[cfg(test)]
mod tests;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

/// Largest accepted form body; post texts can be long.
const FORM_LIMIT_BYTES: usize = 256 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());
    views::check_templates().map_err(std::io::Error::other)?;

    let config = AppConfig::from_env();
    tracing::info!("Starting Blogicum on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await;

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::FormConfig::default().limit(FORM_LIMIT_BYTES))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
