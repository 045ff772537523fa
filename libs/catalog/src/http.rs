//! Shared HTTP plumbing for the adapters

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};

/// Build the HTTP client shared by every adapter
pub fn build_client(config: &CatalogConfig) -> CatalogResult<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("bingepal/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| CatalogError::Http {
            provider: "catalog",
            source,
        })
}

/// `base` followed by `segments`, each percent-encoded as a single path segment
///
/// Caller-supplied ids go through here so `/`, `?` or `#` cannot reshape the request.
pub(crate) fn endpoint_url(
    provider: &'static str,
    base: &str,
    segments: &[&str],
) -> CatalogResult<Url> {
    let invalid = || CatalogError::InvalidBaseUrl {
        provider,
        url: base.to_string(),
    };

    let mut url = Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request and decode a successful JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: &'static str,
    request: RequestBuilder,
) -> CatalogResult<T> {
    let response = request
        .send()
        .await
        .map_err(|source| CatalogError::Http { provider, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status { provider, status });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| CatalogError::Http { provider, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_appends_segments() {
        let url = endpoint_url("RAWG", "https://api.rawg.io/api", &["games", "3328"]).unwrap();
        assert_eq!(url.as_str(), "https://api.rawg.io/api/games/3328");
    }

    #[test]
    fn endpoint_url_keeps_id_in_one_segment() {
        let url = endpoint_url(
            "TMDb",
            "https://api.themoviedb.org/3",
            &["movie", "550/videos?append=1#top"],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/550%2Fvideos%3Fappend=1%23top"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn endpoint_url_rejects_unusable_base() {
        let err = endpoint_url("MangaDex", "not a url", &["manga"]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBaseUrl { provider: "MangaDex", .. }));
        assert!(!err.is_bad_request());
    }
}
