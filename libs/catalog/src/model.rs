//! Canonical records produced by every catalog adapter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Fallback title used when a provider has no usable title
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Media type declared by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Anime,
    Game,
    Book,
    Manga,
}

impl MediaType {
    /// Every supported media type
    pub const ALL: [MediaType; 6] = [
        MediaType::Movie,
        MediaType::Series,
        MediaType::Anime,
        MediaType::Game,
        MediaType::Book,
        MediaType::Manga,
    ];

    /// Get the media type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Anime => "anime",
            MediaType::Game => "game",
            MediaType::Book => "book",
            MediaType::Manga => "manga",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = CatalogError;

    /// Parse a media type, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        MediaType::ALL
            .into_iter()
            .find(|media_type| media_type.as_str() == lowered)
            .ok_or_else(|| CatalogError::UnsupportedType(s.to_string()))
    }
}

/// Upstream catalog a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Tmdb,
    Anilist,
    Rawg,
    Openlibrary,
    Mangadex,
}

impl CatalogSource {
    /// Get the source tag as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSource::Tmdb => "tmdb",
            CatalogSource::Anilist => "anilist",
            CatalogSource::Rawg => "rawg",
            CatalogSource::Openlibrary => "openlibrary",
            CatalogSource::Mangadex => "mangadex",
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical search and detail record
///
/// Optional fields are left out of the serialized form when the provider
/// has no data for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub source: CatalogSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<i32>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_duration: Option<i32>,
}

impl MediaSummary {
    /// Create a record with the required fields; everything else starts absent
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        media_type: MediaType,
        source: CatalogSource,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            media_type,
            description: None,
            poster_url: None,
            year: None,
            source,
            genres: None,
            rating: None,
            rating_count: None,
            total_seasons: None,
            total_episodes: None,
            average_duration: None,
        }
    }
}

/// One episode of a show or one chapter of a manga
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOrChapter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
    pub number: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_date: Option<String>,
}

/// Pick the first title candidate that is present and not blank
pub(crate) fn first_title<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> String {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|title| !title.is_empty())
        .unwrap_or(UNKNOWN_TITLE)
        .to_string()
}

/// Keep a genre list only when it has entries
pub(crate) fn non_empty(genres: Vec<String>) -> Option<Vec<String>> {
    if genres.is_empty() { None } else { Some(genres) }
}

/// Keep a text field only when it has visible content
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_type_parses_case_insensitively() {
        assert_eq!("Movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("SERIES".parse::<MediaType>().unwrap(), MediaType::Series);
        assert_eq!(" manga ".parse::<MediaType>().unwrap(), MediaType::Manga);
    }

    #[test]
    fn media_type_rejects_unknown_values() {
        let err = "podcast".parse::<MediaType>().unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedType(ref t) if t == "podcast"));
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let record = MediaSummary::new("42", "Dune", MediaType::Book, CatalogSource::Openlibrary);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "42",
                "title": "Dune",
                "type": "book",
                "source": "openlibrary"
            })
        );
    }

    #[test]
    fn zero_values_are_kept_distinct_from_absent() {
        let mut record = MediaSummary::new("1", "Zero", MediaType::Anime, CatalogSource::Anilist);
        record.rating = Some(0.0);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["rating"], json!(0.0));
        assert!(value.get("rating_count").is_none());
    }

    #[test]
    fn first_title_skips_blank_candidates() {
        assert_eq!(first_title([None, Some("  "), Some("Name")]), "Name");
        assert_eq!(first_title([None, None]), UNKNOWN_TITLE);
    }
}
