//! TMDb adapter for movies and series

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{error, info};

use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::http::{endpoint_url, fetch_json};
use crate::model::{
    CatalogSource, EpisodeOrChapter, MediaSummary, MediaType, first_title, non_blank, non_empty,
};
use crate::provider::{EpisodeSource, MAX_SEARCH_RESULTS, MediaCatalog};

const PROVIDER: &str = "TMDb";
const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: i64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genre_ids: Option<Vec<i64>>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: i64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    genres: Option<Vec<Genre>>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    number_of_seasons: Option<i32>,
    number_of_episodes: Option<i32>,
    runtime: Option<i32>,
    #[serde(default)]
    episode_run_time: Option<Vec<i32>>,
    #[serde(default)]
    seasons: Option<Vec<SeasonRef>>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeasonRef {
    season_number: i32,
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    #[serde(default)]
    episodes: Option<Vec<EpisodeItem>>,
}

#[derive(Debug, Deserialize)]
struct EpisodeItem {
    episode_number: Option<i32>,
    name: Option<String>,
    air_date: Option<String>,
}

/// TMDb adapter
#[derive(Clone)]
pub struct TmdbAdapter {
    client: Client,
    base_url: String,
    image_base_url: String,
    api_key: Option<String>,
}

impl TmdbAdapter {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.tmdb_base_url.clone(),
            image_base_url: config.tmdb_image_base_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        }
    }

    fn get(&self, segments: &[&str]) -> CatalogResult<RequestBuilder> {
        let request = self
            .client
            .get(endpoint_url(PROVIDER, &self.base_url, segments)?);
        Ok(match &self.api_key {
            Some(key) => request.query(&[("api_key", key)]),
            None => request,
        })
    }

    fn poster_url(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.image_base_url, p))
    }

    fn map_search_item(&self, item: SearchItem, media_type: MediaType) -> MediaSummary {
        let mut record = MediaSummary::new(
            item.id.to_string(),
            first_title([item.title.as_deref(), item.name.as_deref()]),
            media_type,
            CatalogSource::Tmdb,
        );
        record.description =
            Some(non_blank(item.overview).unwrap_or_else(|| NO_DESCRIPTION.to_string()));
        record.poster_url = self.poster_url(item.poster_path.as_deref());
        record.year = parse_year(item.release_date.as_deref(), item.first_air_date.as_deref());
        record.genres = non_empty(
            item.genre_ids
                .unwrap_or_default()
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        );
        record.rating = item.vote_average;
        record.rating_count = item.vote_count;
        record
    }

    fn map_detail(&self, data: DetailResponse, media_type: MediaType) -> MediaSummary {
        let mut record = MediaSummary::new(
            data.id.to_string(),
            first_title([data.title.as_deref(), data.name.as_deref()]),
            media_type,
            CatalogSource::Tmdb,
        );
        record.description =
            Some(non_blank(data.overview).unwrap_or_else(|| NO_DESCRIPTION.to_string()));
        record.poster_url = self.poster_url(data.poster_path.as_deref());
        record.year = parse_year(data.release_date.as_deref(), data.first_air_date.as_deref());
        record.genres = non_empty(
            data.genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.name)
                .collect(),
        );
        record.rating = data.vote_average;
        record.rating_count = data.vote_count;
        if media_type == MediaType::Series {
            record.total_seasons = data.number_of_seasons;
            record.total_episodes = data.number_of_episodes;
        }
        record.average_duration = data.runtime.filter(|minutes| *minutes > 0).or_else(|| {
            data.episode_run_time
                .and_then(|runtimes| runtimes.into_iter().next())
        });
        record
    }
}

/// Endpoint segment for a media type: `movie` for movies, `tv` otherwise
fn endpoint(media_type: MediaType) -> &'static str {
    if media_type == MediaType::Movie {
        "movie"
    } else {
        "tv"
    }
}

/// Year from the first four characters of the release or first-air date
///
/// The prefix must be four ASCII digits; anything else yields no year.
fn parse_year(release_date: Option<&str>, first_air_date: Option<&str>) -> Option<i32> {
    let raw = release_date
        .filter(|date| !date.is_empty())
        .or(first_air_date)
        .unwrap_or_default();

    let prefix = raw.get(..4)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}

fn map_episode(season: i32, episode: EpisodeItem) -> EpisodeOrChapter {
    let number = episode.episode_number.unwrap_or(0);
    EpisodeOrChapter {
        season: Some(season),
        number,
        title: non_blank(episode.name).unwrap_or_else(|| format!("Episode {}", number)),
        air_date: non_blank(episode.air_date),
    }
}

#[async_trait]
impl MediaCatalog for TmdbAdapter {
    async fn fetch_search(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> CatalogResult<Vec<MediaSummary>> {
        let request = self
            .get(&["search", endpoint(media_type)])?
            .query(&[("query", query)]);
        let response: SearchResponse = fetch_json(PROVIDER, request).await?;

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|item| self.map_search_item(item, media_type))
            .collect())
    }

    async fn get_detail(&self, media_type: MediaType, id: &str) -> CatalogResult<MediaSummary> {
        info!("[{}] Fetching detail for {} with ID: {}", PROVIDER, media_type, id);

        let data: DetailResponse = fetch_json(PROVIDER, self.get(&[endpoint(media_type), id])?)
            .await
            .inspect_err(|e| error!("[{}] Detail API error: {}", PROVIDER, e))?;

        Ok(self.map_detail(data, media_type))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[async_trait]
impl EpisodeSource for TmdbAdapter {
    /// One request for the show, then one per season in season order
    ///
    /// A season that fails is logged and skipped.
    async fn fetch_episodes(&self, id: &str) -> CatalogResult<Vec<EpisodeOrChapter>> {
        let show: DetailResponse = fetch_json(PROVIDER, self.get(&["tv", id])?).await?;

        let mut seasons: Vec<i32> = show
            .seasons
            .unwrap_or_default()
            .into_iter()
            .map(|season| season.season_number)
            .collect();
        seasons.sort_unstable();

        let mut episodes = Vec::new();
        for season in seasons {
            let season_number = season.to_string();
            let request = self.get(&["tv", id, "season", &season_number])?;
            match fetch_json::<SeasonResponse>(PROVIDER, request).await {
                Ok(data) => episodes.extend(
                    data.episodes
                        .unwrap_or_default()
                        .into_iter()
                        .map(|episode| map_episode(season, episode)),
                ),
                Err(e) => {
                    error!("[{}] Season {} fetch failed for {}: {}", PROVIDER, season, id, e);
                    continue;
                }
            }
        }

        Ok(episodes)
    }

    fn episodes_provider(&self) -> &'static str {
        PROVIDER
    }
}
