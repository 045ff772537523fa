//! Open Library adapter for books

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::http::{endpoint_url, fetch_json};
use crate::model::{CatalogSource, MediaSummary, MediaType, first_title, non_blank, non_empty};
use crate::provider::{MAX_SEARCH_RESULTS, MediaCatalog};

const PROVIDER: &str = "OpenLibrary";
const NO_AUTHOR: &str = "No author listed.";
const MAX_AUTHORS: usize = 3;
const MAX_SUBJECTS: usize = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<Doc>>,
}

#[derive(Debug, Deserialize)]
struct Doc {
    key: Option<String>,
    title: Option<String>,
    #[serde(default)]
    author_name: Option<Vec<String>>,
    cover_edition_key: Option<String>,
    first_publish_year: Option<i32>,
    #[serde(default)]
    subject: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Work {
    title: Option<String>,
    description: Option<Description>,
    #[serde(default)]
    subjects: Option<Vec<String>>,
}

/// Work synopsis, either plain text or a typed `{"type": ..., "value": ...}` object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Typed { value: Option<String> },
}

impl Description {
    fn into_text(self) -> Option<String> {
        match self {
            Description::Text(text) => Some(text),
            Description::Typed { value } => value,
        }
    }
}

/// Open Library adapter
#[derive(Clone)]
pub struct OpenLibraryAdapter {
    client: Client,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryAdapter {
    pub fn new(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.openlibrary_base_url.clone(),
            covers_url: config.openlibrary_covers_url.clone(),
        }
    }

    fn map_doc(&self, doc: Doc) -> MediaSummary {
        let id = doc
            .key
            .as_deref()
            .unwrap_or_default()
            .trim_start_matches("/works/")
            .to_string();

        let mut record = MediaSummary::new(
            id,
            first_title([doc.title.as_deref()]),
            MediaType::Book,
            CatalogSource::Openlibrary,
        );
        record.description = Some(author_line(doc.author_name));
        record.poster_url = non_blank(doc.cover_edition_key)
            .map(|olid| format!("{}/b/olid/{}-L.jpg", self.covers_url, olid));
        record.year = doc.first_publish_year;
        record.genres = leading_subjects(doc.subject);
        record
    }
}

/// Up to three author names joined by commas
///
/// Search results carry no synopsis, so the author line stands in for it.
fn author_line(authors: Option<Vec<String>>) -> String {
    let authors: Vec<String> = authors
        .unwrap_or_default()
        .into_iter()
        .take(MAX_AUTHORS)
        .collect();

    if authors.is_empty() {
        NO_AUTHOR.to_string()
    } else {
        authors.join(", ")
    }
}

fn leading_subjects(subjects: Option<Vec<String>>) -> Option<Vec<String>> {
    subjects
        .map(|subjects| subjects.into_iter().take(MAX_SUBJECTS).collect())
        .and_then(non_empty)
}

/// Detail never carries a poster: works have no cover edition key
fn map_work(id: &str, work: Work) -> MediaSummary {
    let mut record = MediaSummary::new(
        id,
        first_title([work.title.as_deref()]),
        MediaType::Book,
        CatalogSource::Openlibrary,
    );
    record.description = non_blank(work.description.and_then(Description::into_text));
    record.genres = leading_subjects(work.subjects);
    record
}

#[async_trait]
impl MediaCatalog for OpenLibraryAdapter {
    async fn fetch_search(
        &self,
        _media_type: MediaType,
        query: &str,
    ) -> CatalogResult<Vec<MediaSummary>> {
        let request = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[("q", query)]);
        let response: SearchResponse = fetch_json(PROVIDER, request).await?;

        Ok(response
            .docs
            .unwrap_or_default()
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|doc| self.map_doc(doc))
            .collect())
    }

    async fn get_detail(&self, _media_type: MediaType, id: &str) -> CatalogResult<MediaSummary> {
        info!("[{}] Fetching detail for book ID: {}", PROVIDER, id);

        let file_name = format!("{}.json", id);
        let url = endpoint_url(PROVIDER, &self.base_url, &["works", &file_name])?;
        let work: Work = fetch_json(PROVIDER, self.client.get(url))
            .await
            .inspect_err(|e| error!("[{}] API error: {}", PROVIDER, e))?;

        Ok(map_work(id, work))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapter() -> OpenLibraryAdapter {
        OpenLibraryAdapter::new(Client::new(), &CatalogConfig::default())
    }

    #[test]
    fn search_description_lists_three_authors() {
        let doc: Doc = serde_json::from_value(json!({
            "key": "/works/OL27448W",
            "title": "The Lord of the Rings",
            "author_name": ["J.R.R. Tolkien", "Alan Lee", "Christopher Tolkien", "Ted Nasmith"],
            "cover_edition_key": "OL51711484M",
            "first_publish_year": 1954,
            "subject": ["Fantasy", "Fiction", "Elves", "Hobbits", "Quests", "Rings"]
        }))
        .unwrap();

        let record = adapter().map_doc(doc);
        assert_eq!(record.id, "OL27448W");
        assert_eq!(
            record.description.as_deref(),
            Some("J.R.R. Tolkien, Alan Lee, Christopher Tolkien")
        );
        assert_eq!(
            record.poster_url.as_deref(),
            Some("https://covers.openlibrary.org/b/olid/OL51711484M-L.jpg")
        );
        assert_eq!(record.year, Some(1954));
        assert_eq!(record.genres.as_ref().map(Vec::len), Some(5));
    }

    #[test]
    fn search_without_authors_or_cover() {
        let doc: Doc = serde_json::from_value(json!({ "key": "/works/OL1W" })).unwrap();

        let record = adapter().map_doc(doc);
        assert_eq!(record.title, "Unknown Title");
        assert_eq!(record.description.as_deref(), Some(NO_AUTHOR));
        assert_eq!(record.poster_url, None);
        assert_eq!(record.genres, None);
    }

    #[test]
    fn detail_reads_nested_description() {
        let work: Work = serde_json::from_value(json!({
            "title": "Dune",
            "description": { "type": "/type/text", "value": "A desert planet." },
            "subjects": ["Science fiction"]
        }))
        .unwrap();

        let record = map_work("OL893415W", work);
        assert_eq!(record.id, "OL893415W");
        assert_eq!(record.description.as_deref(), Some("A desert planet."));
        assert_eq!(record.poster_url, None);
        assert_eq!(record.year, None);
    }

    #[test]
    fn detail_reads_plain_description() {
        let work: Work = serde_json::from_value(json!({
            "title": "Dune",
            "description": "A desert planet."
        }))
        .unwrap();

        assert_eq!(
            map_work("OL893415W", work).description.as_deref(),
            Some("A desert planet.")
        );
    }
}
