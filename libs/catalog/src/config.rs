//! Endpoint and credential configuration for the catalog adapters

use std::env;
use std::time::Duration;

/// Default upstream request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Catalog configuration
///
/// Base URLs never end with a slash; adapters append their paths to them.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// TMDb v3 API key
    pub tmdb_api_key: Option<String>,
    /// RAWG API key
    pub rawg_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    /// AniList GraphQL endpoint
    pub anilist_url: String,
    pub jikan_base_url: String,
    pub rawg_base_url: String,
    pub openlibrary_base_url: String,
    pub openlibrary_covers_url: String,
    pub mangadex_base_url: String,
    pub mangadex_uploads_url: String,
    /// Timeout applied to every upstream request
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            rawg_api_key: None,
            tmdb_base_url: "https://api.themoviedb.org/3".to_string(),
            tmdb_image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            anilist_url: "https://graphql.anilist.co".to_string(),
            jikan_base_url: "https://api.jikan.moe/v4".to_string(),
            rawg_base_url: "https://api.rawg.io/api".to_string(),
            openlibrary_base_url: "https://openlibrary.org".to_string(),
            openlibrary_covers_url: "https://covers.openlibrary.org".to_string(),
            mangadex_base_url: "https://api.mangadex.org".to_string(),
            mangadex_uploads_url: "https://uploads.mangadex.org".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CatalogConfig {
    /// Create a new CatalogConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TMDB_API_KEY`, `RAWG_API_KEY`: provider credentials
    /// - `TMDB_BASE_URL`, `TMDB_IMAGE_BASE_URL`, `ANILIST_URL`, `JIKAN_BASE_URL`,
    ///   `RAWG_BASE_URL`, `OPENLIBRARY_BASE_URL`, `OPENLIBRARY_COVERS_URL`,
    ///   `MANGADEX_BASE_URL`, `MANGADEX_UPLOADS_URL`: endpoint overrides
    /// - `CATALOG_REQUEST_TIMEOUT`: timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let request_timeout = env::var("CATALOG_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            tmdb_api_key: secret("TMDB_API_KEY"),
            rawg_api_key: secret("RAWG_API_KEY"),
            tmdb_base_url: url_or("TMDB_BASE_URL", defaults.tmdb_base_url),
            tmdb_image_base_url: url_or("TMDB_IMAGE_BASE_URL", defaults.tmdb_image_base_url),
            anilist_url: url_or("ANILIST_URL", defaults.anilist_url),
            jikan_base_url: url_or("JIKAN_BASE_URL", defaults.jikan_base_url),
            rawg_base_url: url_or("RAWG_BASE_URL", defaults.rawg_base_url),
            openlibrary_base_url: url_or("OPENLIBRARY_BASE_URL", defaults.openlibrary_base_url),
            openlibrary_covers_url: url_or(
                "OPENLIBRARY_COVERS_URL",
                defaults.openlibrary_covers_url,
            ),
            mangadex_base_url: url_or("MANGADEX_BASE_URL", defaults.mangadex_base_url),
            mangadex_uploads_url: url_or("MANGADEX_UPLOADS_URL", defaults.mangadex_uploads_url),
            request_timeout,
        }
    }

    /// Point every adapter at one base URL, with a sub-path per provider
    ///
    /// Used to run the adapters against a local fixture server.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            tmdb_api_key: Some("test-key".to_string()),
            rawg_api_key: Some("test-key".to_string()),
            tmdb_base_url: format!("{}/tmdb", base),
            tmdb_image_base_url: format!("{}/tmdb-images", base),
            anilist_url: format!("{}/anilist", base),
            jikan_base_url: format!("{}/jikan", base),
            rawg_base_url: format!("{}/rawg", base),
            openlibrary_base_url: format!("{}/openlibrary", base),
            openlibrary_covers_url: format!("{}/covers", base),
            mangadex_base_url: format!("{}/mangadex", base),
            mangadex_uploads_url: format!("{}/uploads", base),
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn secret(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn url_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .map(|value| value.trim_end_matches('/').to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_catalog_config_from_env_defaults() {
        unsafe {
            env::remove_var("TMDB_API_KEY");
            env::remove_var("TMDB_BASE_URL");
            env::remove_var("CATALOG_REQUEST_TIMEOUT");
        }

        let config = CatalogConfig::from_env();
        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_catalog_config_from_env_with_overrides() {
        unsafe {
            env::set_var("TMDB_API_KEY", "abc");
            env::set_var("TMDB_BASE_URL", "http://localhost:9000/tmdb/");
            env::set_var("CATALOG_REQUEST_TIMEOUT", "3");
        }

        let config = CatalogConfig::from_env();
        assert_eq!(config.tmdb_api_key.as_deref(), Some("abc"));
        assert_eq!(config.tmdb_base_url, "http://localhost:9000/tmdb");
        assert_eq!(config.request_timeout, Duration::from_secs(3));

        unsafe {
            env::remove_var("TMDB_API_KEY");
            env::remove_var("TMDB_BASE_URL");
            env::remove_var("CATALOG_REQUEST_TIMEOUT");
        }
    }
}
