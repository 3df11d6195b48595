use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();
    let cors_origins = config.cors_allowed_origins.clone();

    // Analyzer failures are reported through /api/health rather than aborting
    let state = web::Data::new(AppState::new(&config).await);

    tracing::info!("Starting sentiment analysis server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(api::cors::cors(&cors_origins))
            .app_data(state.clone())
            .configure(api::index::configure)
            .configure(api::analyze::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
