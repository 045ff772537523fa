use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use catalog::{CatalogConfig, Dispatcher};
use common::database::{DatabaseConfig, ensure_schema, health_check, init_pool};
use tracing::info;
use tracing_subscriber::{EnvFilter, prelude::*};

mod config;
mod error;
mod log_buffer;
mod middleware;
mod models;
mod rate_limiter;
mod repositories;
mod routes;
mod state;

use crate::{
    config::ApiConfig,
    log_buffer::LogBuffer,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let api_config = ApiConfig::load()?;

    // Initialize logging; recent lines are also kept for /api/dev-logs
    let log_buffer = LogBuffer::new(api_config.log_buffer_size);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(log_buffer.layer())
        .try_init()?;

    info!("Starting BingePal API");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    ensure_schema(&pool).await?;

    let catalog_config = CatalogConfig::from_env();
    let dispatcher = Dispatcher::new(&catalog_config)?;

    let search_limiter = RateLimiter::new(RateLimiterConfig {
        max_requests: api_config.search_rate_limit,
        window: Duration::from_secs(api_config.search_rate_window),
    });

    let bind_address = api_config.bind_address.clone();
    let app_state = AppState::new(pool, dispatcher, search_limiter, log_buffer, api_config);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("BingePal API listening on {}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
