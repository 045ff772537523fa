//! RAWG adapter for games

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{error, info};

use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::http::{endpoint_url, fetch_json};
use crate::model::{CatalogSource, MediaSummary, MediaType, first_title, non_blank, non_empty};
use crate::provider::{MAX_SEARCH_RESULTS, MediaCatalog};

const PROVIDER: &str = "RAWG";
const NO_DESCRIPTION: &str = "No description.";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Game>>,
}

#[derive(Debug, Deserialize)]
struct Game {
    id: i64,
    name: Option<String>,
    description_raw: Option<String>,
    background_image: Option<String>,
    released: Option<String>,
    #[serde(default)]
    genres: Option<Vec<Named>>,
    #[serde(default)]
    platforms: Option<Vec<PlatformEntry>>,
    rating: Option<f64>,
    ratings_count: Option<i64>,
    /// Hours
    playtime: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlatformEntry {
    platform: Named,
}

/// RAWG adapter
#[derive(Clone)]
pub struct RawgAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RawgAdapter {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.rawg_base_url.clone(),
            api_key: config.rawg_api_key.clone(),
        }
    }

    fn get(&self, segments: &[&str]) -> CatalogResult<RequestBuilder> {
        let request = self
            .client
            .get(endpoint_url(PROVIDER, &self.base_url, segments)?);
        Ok(match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        })
    }
}

/// Year from the first four characters of the release date
///
/// The prefix is taken as-is; it only has to parse as an integer.
fn release_year(released: Option<&str>) -> Option<i32> {
    let released = released?;
    let prefix = released
        .char_indices()
        .nth(4)
        .map_or(released, |(end, _)| &released[..end]);
    prefix.parse().ok()
}

/// Average duration in minutes; zero or missing playtime is absent
fn playtime_minutes(playtime_hours: Option<i32>) -> Option<i32> {
    playtime_hours
        .filter(|hours| *hours > 0)
        .map(|hours| hours * 60)
}

/// Genre names followed by platform names, in provider order
fn genres_and_platforms(
    genres: Option<Vec<Named>>,
    platforms: Option<Vec<PlatformEntry>>,
) -> Vec<String> {
    genres
        .unwrap_or_default()
        .into_iter()
        .map(|genre| genre.name)
        .chain(
            platforms
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry.platform.name),
        )
        .collect()
}

fn map_game(game: Game, with_description: bool) -> MediaSummary {
    let mut record = MediaSummary::new(
        game.id.to_string(),
        first_title([game.name.as_deref()]),
        MediaType::Game,
        CatalogSource::Rawg,
    );
    if with_description {
        record.description =
            Some(non_blank(game.description_raw).unwrap_or_else(|| NO_DESCRIPTION.to_string()));
    }
    record.poster_url = non_blank(game.background_image);
    record.year = release_year(game.released.as_deref());
    record.genres = non_empty(genres_and_platforms(game.genres, game.platforms));
    record.rating = game.rating;
    record.rating_count = game.ratings_count;
    record.average_duration = playtime_minutes(game.playtime);
    record
}

#[async_trait]
impl MediaCatalog for RawgAdapter {
    async fn fetch_search(
        &self,
        _media_type: MediaType,
        query: &str,
    ) -> CatalogResult<Vec<MediaSummary>> {
        let page_size = MAX_SEARCH_RESULTS.to_string();
        let request = self
            .get(&["games"])?
            .query(&[("search", query), ("page_size", page_size.as_str())]);
        let response: SearchResponse = fetch_json(PROVIDER, request).await?;

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|game| map_game(game, false))
            .collect())
    }

    async fn get_detail(&self, _media_type: MediaType, id: &str) -> CatalogResult<MediaSummary> {
        info!("[{}] Fetching detail for game ID: {}", PROVIDER, id);

        let game: Game = fetch_json(PROVIDER, self.get(&["games", id])?)
            .await
            .inspect_err(|e| error!("[{}] API error: {}", PROVIDER, e))?;

        Ok(map_game(game, true))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
