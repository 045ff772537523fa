//! Application state shared across handlers

use std::sync::Arc;

use catalog::Dispatcher;
use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::log_buffer::LogBuffer;
use crate::rate_limiter::RateLimiter;
use crate::repositories::{RatingRepository, SearchLogRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub search_logs: SearchLogRepository,
    pub ratings: RatingRepository,
    pub catalog: Arc<Dispatcher>,
    pub search_limiter: RateLimiter,
    pub log_buffer: LogBuffer,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        catalog: Dispatcher,
        search_limiter: RateLimiter,
        log_buffer: LogBuffer,
        config: ApiConfig,
    ) -> Self {
        Self {
            search_logs: SearchLogRepository::new(db_pool.clone()),
            ratings: RatingRepository::new(db_pool),
            catalog: Arc::new(catalog),
            search_limiter,
            log_buffer,
            config: Arc::new(config),
        }
    }
}
