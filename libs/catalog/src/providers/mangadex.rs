//! MangaDex adapter for manga and chapters

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::http::{endpoint_url, fetch_json};
use crate::model::{
    CatalogSource, EpisodeOrChapter, MediaSummary, MediaType, UNKNOWN_TITLE, non_blank, non_empty,
};
use crate::provider::{EpisodeSource, MAX_SEARCH_RESULTS, MediaCatalog};

const PROVIDER: &str = "MangaDex";
const NO_DESCRIPTION: &str = "No description.";
const UNTITLED: &str = "Untitled";
const COVER_ART: &str = "cover_art";
const CHAPTER_LIMIT: &str = "100";

#[derive(Debug, Deserialize)]
struct MangaList {
    #[serde(default)]
    data: Option<Vec<Manga>>,
}

#[derive(Debug, Deserialize)]
struct MangaEnvelope {
    data: Manga,
}

#[derive(Debug, Deserialize)]
struct Manga {
    id: String,
    attributes: MangaAttributes,
    #[serde(default)]
    relationships: Option<Vec<Relationship>>,
}

/// Localized fields are language-code maps; an empty one may arrive as `[]`
#[derive(Debug, Deserialize)]
struct MangaAttributes {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    year: Option<i32>,
    #[serde(default)]
    tags: Option<Vec<Tag>>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    attributes: Option<TagAttributes>,
}

#[derive(Debug, Deserialize)]
struct TagAttributes {
    #[serde(default)]
    name: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(rename = "type")]
    kind: String,
    attributes: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChapterList {
    #[serde(default)]
    data: Option<Vec<Chapter>>,
}

#[derive(Debug, Deserialize)]
struct Chapter {
    attributes: ChapterAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterAttributes {
    chapter: Option<String>,
    title: Option<String>,
    publish_at: Option<String>,
}

/// MangaDex adapter
#[derive(Clone)]
pub struct MangaDexAdapter {
    client: Client,
    base_url: String,
    uploads_url: String,
}

impl MangaDexAdapter {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.mangadex_base_url.clone(),
            uploads_url: config.mangadex_uploads_url.clone(),
        }
    }

    fn map_manga(&self, manga: Manga) -> MediaSummary {
        let attributes = manga.attributes;
        let title =
            localized(attributes.title.as_ref()).unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let mut record = MediaSummary::new(
            manga.id.clone(),
            title,
            MediaType::Manga,
            CatalogSource::Mangadex,
        );
        record.description = Some(
            localized(attributes.description.as_ref())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        );
        record.poster_url = cover_file_name(manga.relationships.as_deref()).map(|file_name| {
            format!("{}/covers/{}/{}", self.uploads_url, manga.id, file_name)
        });
        record.year = attributes.year;
        record.genres = non_empty(
            attributes
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|tag| tag.attributes)
                .filter_map(|tag| localized(tag.name.as_ref()))
                .collect(),
        );
        record
    }
}

/// English text, else the first language the provider lists
fn localized(text: Option<&Value>) -> Option<String> {
    let translations = text?.as_object()?;

    translations
        .get("en")
        .and_then(present)
        .or_else(|| translations.values().find_map(present))
        .map(str::to_string)
}

fn present(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// File name of the cover attached through the `cover_art` relationship
fn cover_file_name(relationships: Option<&[Relationship]>) -> Option<String> {
    relationships?
        .iter()
        .filter(|rel| rel.kind == COVER_ART)
        .filter_map(|rel| rel.attributes.as_ref())
        .find_map(|attributes| attributes.get("fileName").and_then(Value::as_str))
        .map(str::to_string)
}

/// Chapter number from MangaDex's string field; anything non-numeric is 0
fn parse_chapter_number(chapter: Option<&str>) -> i32 {
    match chapter {
        Some(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
            raw.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn map_chapter(chapter: Chapter) -> EpisodeOrChapter {
    let attributes = chapter.attributes;
    EpisodeOrChapter {
        season: None,
        number: parse_chapter_number(attributes.chapter.as_deref()),
        title: non_blank(attributes.title).unwrap_or_else(|| UNTITLED.to_string()),
        air_date: attributes.publish_at,
    }
}

#[async_trait]
impl MediaCatalog for MangaDexAdapter {
    async fn fetch_search(
        &self,
        _media_type: MediaType,
        query: &str,
    ) -> CatalogResult<Vec<MediaSummary>> {
        let limit = MAX_SEARCH_RESULTS.to_string();
        let request = self
            .client
            .get(format!("{}/manga", self.base_url))
            .query(&[
                ("title", query),
                ("limit", limit.as_str()),
                ("includes[]", COVER_ART),
            ]);
        let response: MangaList = fetch_json(PROVIDER, request).await?;

        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|manga| self.map_manga(manga))
            .collect())
    }

    async fn get_detail(&self, _media_type: MediaType, id: &str) -> CatalogResult<MediaSummary> {
        info!("[{}] Fetching detail for manga ID: {}", PROVIDER, id);

        let request = self
            .client
            .get(endpoint_url(PROVIDER, &self.base_url, &["manga", id])?)
            .query(&[("includes[]", COVER_ART)]);
        let envelope: MangaEnvelope = fetch_json(PROVIDER, request)
            .await
            .inspect_err(|e| error!("[{}] API error: {}", PROVIDER, e))?;

        Ok(self.map_manga(envelope.data))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[async_trait]
impl EpisodeSource for MangaDexAdapter {
    async fn fetch_episodes(&self, id: &str) -> CatalogResult<Vec<EpisodeOrChapter>> {
        let request = self
            .client
            .get(format!("{}/chapter", self.base_url))
            .query(&[
                ("manga", id),
                ("translatedLanguage[]", "en"),
                ("limit", CHAPTER_LIMIT),
                ("order[chapter]", "asc"),
            ]);
        let response: ChapterList = fetch_json(PROVIDER, request).await?;

        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(map_chapter)
            .collect())
    }

    fn episodes_provider(&self) -> &'static str {
        PROVIDER
    }
}
