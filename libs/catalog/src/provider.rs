//! Capabilities shared by the catalog adapters

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::CatalogResult;
use crate::model::{EpisodeOrChapter, MediaSummary, MediaType};

/// Upper bound on the number of records a search returns
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Search and detail lookups against one upstream catalog
///
/// Implementors provide the fallible `fetch_*` calls; `search` applies the
/// degrade-to-empty policy and the result cap on top of them.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Query the provider's text search
    async fn fetch_search(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> CatalogResult<Vec<MediaSummary>>;

    /// Fetch a single record by its provider id
    async fn get_detail(&self, media_type: MediaType, id: &str) -> CatalogResult<MediaSummary>;

    /// Search, returning at most [`MAX_SEARCH_RESULTS`] records
    ///
    /// Failures are logged and reported as an empty result.
    async fn search(&self, media_type: MediaType, query: &str) -> Vec<MediaSummary> {
        info!("[{}] Searching '{}' as type '{}'", self.name(), query, media_type);

        match self.fetch_search(media_type, query).await {
            Ok(mut results) => {
                results.truncate(MAX_SEARCH_RESULTS);
                results
            }
            Err(e) => {
                error!("[{}] API error: {}", self.name(), e);
                Vec::new()
            }
        }
    }

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Episode or chapter listings for episodic media
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    /// Fetch the listing, failing on the first unrecoverable error
    async fn fetch_episodes(&self, id: &str) -> CatalogResult<Vec<EpisodeOrChapter>>;

    /// Fetch the listing; failures are logged and reported as empty
    async fn get_episodes(&self, id: &str) -> Vec<EpisodeOrChapter> {
        match self.fetch_episodes(id).await {
            Ok(episodes) => {
                info!(
                    "[{}] Found {} entries for {}",
                    self.episodes_provider(),
                    episodes.len(),
                    id
                );
                episodes
            }
            Err(e) => {
                error!("[{}] Listing fetch failed for {}: {}", self.episodes_provider(), id, e);
                Vec::new()
            }
        }
    }

    /// Name of the service answering listing requests
    fn episodes_provider(&self) -> &'static str;
}
