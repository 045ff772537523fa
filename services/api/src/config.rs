//! Service settings read from `BINGEPAL_*` environment variables

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// API service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Token expected in the `Authorization` header of `/api/dev-logs`
    ///
    /// The endpoint rejects every request while this is unset.
    pub dev_logs_token: Option<String>,
    /// Searches allowed per client IP within one window
    pub search_rate_limit: u32,
    /// Length of the search rate limit window in seconds
    pub search_rate_window: u64,
    /// Number of log lines kept for `/api/dev-logs`
    pub log_buffer_size: usize,
}

impl ApiConfig {
    /// Load the configuration, falling back to defaults for unset variables
    ///
    /// # Environment Variables
    /// - `BINGEPAL_BIND_ADDRESS` (default: `0.0.0.0:8000`)
    /// - `BINGEPAL_DEV_LOGS_TOKEN`
    /// - `BINGEPAL_SEARCH_RATE_LIMIT` (default: 10)
    /// - `BINGEPAL_SEARCH_RATE_WINDOW` (default: 60)
    /// - `BINGEPAL_LOG_BUFFER_SIZE` (default: 100)
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .set_default("bind_address", "0.0.0.0:8000")?
            .set_default("search_rate_limit", 10_i64)?
            .set_default("search_rate_window", 60_i64)?
            .set_default("log_buffer_size", 100_i64)?
            .add_source(Environment::with_prefix("BINGEPAL").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.search_rate_limit == 0 || config.search_rate_window == 0 {
            return Err(ConfigError::Message(
                "search rate limit and window must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
