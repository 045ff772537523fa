//! Routing from a declared media type to the adapter serving it

use tracing::info;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::http::build_client;
use crate::model::{EpisodeOrChapter, MediaSummary, MediaType};
use crate::provider::{EpisodeSource, MediaCatalog};
use crate::providers::{
    AniListAdapter, MangaDexAdapter, OpenLibraryAdapter, RawgAdapter, TmdbAdapter,
};

/// Owns one adapter per catalog and the tables selecting between them
///
/// Type strings are validated before any upstream call is made.
#[derive(Clone)]
pub struct Dispatcher {
    tmdb: TmdbAdapter,
    anilist: AniListAdapter,
    rawg: RawgAdapter,
    openlibrary: OpenLibraryAdapter,
    mangadex: MangaDexAdapter,
}

impl Dispatcher {
    /// Build every adapter around one shared HTTP client
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = build_client(config)?;

        if config.tmdb_api_key.is_none() {
            tracing::warn!("TMDB_API_KEY is not set; movie and series lookups will fail");
        }
        if config.rawg_api_key.is_none() {
            tracing::warn!("RAWG_API_KEY is not set; game lookups will fail");
        }

        Ok(Self {
            tmdb: TmdbAdapter::new(client.clone(), config),
            anilist: AniListAdapter::new(client.clone(), config),
            rawg: RawgAdapter::new(client.clone(), config),
            openlibrary: OpenLibraryAdapter::new(client.clone(), config),
            mangadex: MangaDexAdapter::new(client, config),
        })
    }

    /// Search and detail table
    pub fn catalog_for(&self, media_type: MediaType) -> &dyn MediaCatalog {
        match media_type {
            MediaType::Movie | MediaType::Series => &self.tmdb,
            MediaType::Anime => &self.anilist,
            MediaType::Game => &self.rawg,
            MediaType::Book => &self.openlibrary,
            MediaType::Manga => &self.mangadex,
        }
    }

    /// Episode table; movies, games and books have no listing
    pub fn episodes_for(&self, media_type: MediaType) -> Option<&dyn EpisodeSource> {
        match media_type {
            MediaType::Series => Some(&self.tmdb),
            MediaType::Anime => Some(&self.anilist),
            MediaType::Manga => Some(&self.mangadex),
            MediaType::Movie | MediaType::Game | MediaType::Book => None,
        }
    }

    /// Search the catalog serving `media_type`
    ///
    /// Only an unknown type is an error; upstream failures yield an empty list.
    pub async fn search(&self, media_type: &str, query: &str) -> CatalogResult<Vec<MediaSummary>> {
        let media_type: MediaType = media_type.parse()?;
        Ok(self.catalog_for(media_type).search(media_type, query).await)
    }

    /// Fetch one record; upstream failures are returned to the caller
    pub async fn detail(&self, media_type: &str, id: &str) -> CatalogResult<MediaSummary> {
        let media_type: MediaType = media_type.parse()?;
        self.catalog_for(media_type).get_detail(media_type, id).await
    }

    /// List episodes or chapters; upstream failures yield an empty list
    pub async fn episodes(
        &self,
        media_type: &str,
        id: &str,
    ) -> CatalogResult<Vec<EpisodeOrChapter>> {
        let media_type: MediaType = media_type.parse()?;
        let source = self
            .episodes_for(media_type)
            .ok_or_else(|| CatalogError::NotEpisodic(media_type.to_string()))?;

        info!("[Chapters] Requested type={}, id={}", media_type, id);
        Ok(source.get_episodes(id).await)
    }
}
