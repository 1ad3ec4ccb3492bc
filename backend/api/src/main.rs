//! Department dashboard API — entry point.
//!
//! Serves the payout engine's computed structures over a small Axum
//! REST API backed by SQLite: payment splits, category aggregates,
//! worker profiles, and flat report rows for the export writers.

mod api;
mod config;
mod db;
mod errors;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    // Load config from environment.
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Set up the SQLite connection pool and run migrations.
    let pool = db::init_pool(&config.database_url).await?;

    let state = Arc::new(api::ApiState { pool });

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/departments/:id/overview", get(api::department_overview))
        .route(
            "/departments/:id/aggregate/:category",
            get(api::category_aggregate),
        )
        .route(
            "/departments/:id/workers/:worker_id/profile",
            get(api::worker_profile),
        )
        .route(
            "/departments/:id/reports/listing/:category",
            get(api::listing_report),
        )
        .route(
            "/departments/:id/reports/category/:category",
            get(api::category_report),
        )
        .route("/projects/:id/allocations", get(api::project_allocations))
        .route("/projects/:id/members", post(api::assign_member))
        .route(
            "/projects/:id/members/:worker_id",
            patch(api::reassign_member).delete(api::unassign_member),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
