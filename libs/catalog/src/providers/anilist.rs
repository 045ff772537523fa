//! Anime adapter: AniList GraphQL for search and detail, Jikan REST for episodes

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::http::{endpoint_url, fetch_json};
use crate::model::{
    CatalogSource, EpisodeOrChapter, MediaSummary, MediaType, first_title, non_blank, non_empty,
};
use crate::provider::{EpisodeSource, MAX_SEARCH_RESULTS, MediaCatalog};

const PROVIDER: &str = "AniList";
const EPISODES_PROVIDER: &str = "Jikan";

const SEARCH_QUERY: &str = r#"
query ($search: String) {
  Page(perPage: 10) {
    media(search: $search, type: ANIME) {
      id
      title { romaji english }
      description(asHtml: false)
      coverImage { large }
      startDate { year }
      episodes
      duration
      genres
      averageScore
    }
  }
}
"#;

const DETAIL_QUERY: &str = r#"
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    id
    title { romaji english }
    description(asHtml: false)
    coverImage { large }
    startDate { year }
    episodes
    duration
    genres
    averageScore
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: Option<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    media: Option<Vec<Media>>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    id: i64,
    title: Option<MediaTitle>,
    description: Option<String>,
    cover_image: Option<CoverImage>,
    start_date: Option<StartDate>,
    episodes: Option<i32>,
    duration: Option<i32>,
    genres: Option<Vec<String>>,
    average_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MediaTitle {
    english: Option<String>,
    romaji: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoverImage {
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StartDate {
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct JikanEpisodes {
    #[serde(default)]
    data: Option<Vec<JikanEpisode>>,
}

#[derive(Debug, Deserialize)]
struct JikanEpisode {
    mal_id: i32,
    title: Option<String>,
    aired: Option<serde_json::Value>,
}

/// AniList adapter
#[derive(Clone)]
pub struct AniListAdapter {
    client: Client,
    graphql_url: String,
    jikan_base_url: String,
}

impl AniListAdapter {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            graphql_url: config.anilist_url.clone(),
            jikan_base_url: config.jikan_base_url.clone(),
        }
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> CatalogResult<T> {
        let request = self
            .client
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }));

        let response: GraphQlResponse<T> = fetch_json(PROVIDER, request).await?;
        response.data.ok_or(CatalogError::MissingData {
            provider: PROVIDER,
            what: "data",
        })
    }
}

/// Rating on a 0-10 scale from AniList's 0-100 score
///
/// A missing score counts as zero.
fn normalize_score(average_score: Option<f64>) -> f64 {
    average_score.unwrap_or(0.0) / 10.0
}

fn map_media(media: Media) -> MediaSummary {
    let (english, romaji) = media
        .title
        .map(|title| (title.english, title.romaji))
        .unwrap_or_default();

    let mut record = MediaSummary::new(
        media.id.to_string(),
        first_title([english.as_deref(), romaji.as_deref()]),
        MediaType::Anime,
        CatalogSource::Anilist,
    );
    record.description = non_blank(media.description);
    record.poster_url = media.cover_image.and_then(|cover| non_blank(cover.large));
    record.year = media.start_date.and_then(|date| date.year);
    record.genres = media.genres.and_then(non_empty);
    record.rating = Some(normalize_score(media.average_score));
    record.total_episodes = media.episodes;
    record.average_duration = media.duration;
    record
}

fn map_episode(episode: JikanEpisode) -> EpisodeOrChapter {
    EpisodeOrChapter {
        season: None,
        number: episode.mal_id,
        title: non_blank(episode.title).unwrap_or_else(|| format!("Episode {}", episode.mal_id)),
        air_date: episode
            .aired
            .as_ref()
            .and_then(|aired| aired.as_str())
            .map(str::to_string),
    }
}

#[async_trait]
impl MediaCatalog for AniListAdapter {
    async fn fetch_search(
        &self,
        _media_type: MediaType,
        query: &str,
    ) -> CatalogResult<Vec<MediaSummary>> {
        let data: PageData = self
            .query(SEARCH_QUERY, json!({ "search": query }))
            .await?;

        Ok(data
            .page
            .and_then(|page| page.media)
            .unwrap_or_default()
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(map_media)
            .collect())
    }

    async fn get_detail(&self, _media_type: MediaType, id: &str) -> CatalogResult<MediaSummary> {
        info!("[{}] Fetching detail for anime ID: {}", PROVIDER, id);

        let numeric_id: i64 = id.trim().parse().map_err(|_| CatalogError::InvalidId {
            provider: PROVIDER,
            id: id.to_string(),
        })?;

        let data: MediaData = self
            .query(DETAIL_QUERY, json!({ "id": numeric_id }))
            .await
            .inspect_err(|e| error!("[{}] API error: {}", PROVIDER, e))?;

        data.media.map(map_media).ok_or(CatalogError::MissingData {
            provider: PROVIDER,
            what: "Media",
        })
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[async_trait]
impl EpisodeSource for AniListAdapter {
    async fn fetch_episodes(&self, id: &str) -> CatalogResult<Vec<EpisodeOrChapter>> {
        info!("[{}] Fetching episodes for anime ID: {}", EPISODES_PROVIDER, id);

        let url = endpoint_url(
            EPISODES_PROVIDER,
            &self.jikan_base_url,
            &["anime", id, "episodes"],
        )?;
        let response: JikanEpisodes = fetch_json(EPISODES_PROVIDER, self.client.get(url)).await?;

        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(map_episode)
            .collect())
    }

    fn episodes_provider(&self) -> &'static str {
        EPISODES_PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(value: serde_json::Value) -> Media {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn score_is_scaled_to_ten() {
        assert_eq!(normalize_score(Some(85.0)), 8.5);
        assert_eq!(normalize_score(None), 0.0);
    }

    #[test]
    fn media_prefers_english_title() {
        let record = map_media(media(json!({
            "id": 16498,
            "title": { "romaji": "Shingeki no Kyojin", "english": "Attack on Titan" },
            "description": "Humans fight titans.",
            "coverImage": { "large": "https://img.anili.st/16498.jpg" },
            "startDate": { "year": 2013 },
            "episodes": 25,
            "duration": 24,
            "genres": ["Action", "Drama"],
            "averageScore": 85
        })));

        assert_eq!(record.id, "16498");
        assert_eq!(record.title, "Attack on Titan");
        assert_eq!(record.source, CatalogSource::Anilist);
        assert_eq!(record.year, Some(2013));
        assert_eq!(record.rating, Some(8.5));
        assert_eq!(record.rating_count, None);
        assert_eq!(record.total_episodes, Some(25));
        assert_eq!(record.average_duration, Some(24));
        assert_eq!(record.total_seasons, None);
        assert_eq!(
            record.genres,
            Some(vec!["Action".to_string(), "Drama".to_string()])
        );
    }

    #[test]
    fn media_falls_back_to_romaji_and_zero_rating() {
        let record = map_media(media(json!({
            "id": 1,
            "title": { "romaji": "Cowboy Bebop", "english": null },
            "averageScore": null
        })));

        assert_eq!(record.title, "Cowboy Bebop");
        assert_eq!(record.rating, Some(0.0));
        assert_eq!(record.poster_url, None);
    }

    #[test]
    fn jikan_episode_title_is_synthesized() {
        let episode: JikanEpisode = serde_json::from_value(json!({
            "mal_id": 4,
            "title": null,
            "aired": "2013-04-28T00:00:00+00:00"
        }))
        .unwrap();

        let mapped = map_episode(episode);
        assert_eq!(mapped.season, None);
        assert_eq!(mapped.number, 4);
        assert_eq!(mapped.title, "Episode 4");
        assert_eq!(mapped.air_date.as_deref(), Some("2013-04-28T00:00:00+00:00"));
    }

    #[test]
    fn jikan_non_string_air_date_is_dropped() {
        let episode: JikanEpisode = serde_json::from_value(json!({
            "mal_id": 1,
            "title": "To You, in 2000 Years",
            "aired": { "from": "2013-04-07" }
        }))
        .unwrap();

        assert_eq!(map_episode(episode).air_date, None);
    }
}
