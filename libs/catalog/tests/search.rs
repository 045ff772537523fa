//! Search behavior of every adapter against a local fixture server

mod support;

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    routing::{get, post},
};
use catalog::{CatalogSource, MAX_SEARCH_RESULTS, MediaType};
use serde_json::{Value, json};

fn oversized_router() -> Router {
    Router::new()
        .route(
            "/tmdb/search/:endpoint",
            get(|| async { Json(support::tmdb_movies(20)) }),
        )
        .route(
            "/anilist",
            post(|| async { Json(support::anilist_page(15)) }),
        )
        .route(
            "/rawg/games",
            get(|| async { Json(support::rawg_games(40)) }),
        )
        .route(
            "/openlibrary/search.json",
            get(|| async { Json(support::openlibrary_docs(100)) }),
        )
        .route(
            "/mangadex/manga",
            get(|| async { Json(support::mangadex_list(32)) }),
        )
}

fn empty_router() -> Router {
    Router::new()
        .route(
            "/tmdb/search/:endpoint",
            get(|| async { Json(json!({ "page": 1, "results": [] })) }),
        )
        .route(
            "/anilist",
            post(|| async { Json(json!({ "data": { "Page": { "media": [] } } })) }),
        )
        .route(
            "/rawg/games",
            get(|| async { Json(json!({ "count": 0, "results": [] })) }),
        )
        .route(
            "/openlibrary/search.json",
            get(|| async { Json(json!({ "numFound": 0, "docs": [] })) }),
        )
        .route(
            "/mangadex/manga",
            get(|| async { Json(json!({ "result": "ok", "data": [] })) }),
        )
}

#[tokio::test]
async fn test_search_never_exceeds_ten_results() {
    let dispatcher = support::dispatcher(oversized_router()).await;

    for media_type in MediaType::ALL {
        let results = dispatcher
            .search(media_type.as_str(), "anything")
            .await
            .expect("known type");

        assert_eq!(
            results.len(),
            MAX_SEARCH_RESULTS,
            "{} search returned {} results",
            media_type,
            results.len()
        );
        assert!(results.iter().all(|r| r.media_type == media_type));
    }
}

#[tokio::test]
async fn test_search_with_no_matches_is_empty() {
    let dispatcher = support::dispatcher(empty_router()).await;

    for media_type in MediaType::ALL {
        let results = dispatcher
            .search(media_type.as_str(), "zzzzzz")
            .await
            .expect("known type");
        assert!(results.is_empty(), "{} search was not empty", media_type);
    }
}

#[tokio::test]
async fn test_search_degrades_to_empty_on_upstream_errors() {
    let failing = Router::new()
        .route(
            "/tmdb/search/:endpoint",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/anilist", post(|| async { "not json" }))
        .route("/rawg/games", get(|| async { StatusCode::UNAUTHORIZED }))
        .route(
            "/openlibrary/search.json",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        )
        .route(
            "/mangadex/manga",
            get(|| async { Json(json!({ "data": "unexpected" })) }),
        );
    let dispatcher = support::dispatcher(failing).await;

    for media_type in MediaType::ALL {
        let results = dispatcher.search(media_type.as_str(), "x").await;
        assert!(matches!(results, Ok(ref r) if r.is_empty()), "{}", media_type);
    }
}

#[tokio::test]
async fn test_search_degrades_to_empty_when_unreachable() {
    let dispatcher = support::unreachable_dispatcher().await;

    let results = dispatcher.search("game", "portal").await.expect("known type");
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_search_type_is_case_insensitive() {
    let dispatcher = support::dispatcher(oversized_router()).await;

    let results = dispatcher.search("SeRiEs", "bad").await.expect("known type");
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.media_type == MediaType::Series));
}

#[tokio::test]
async fn test_tmdb_search_sends_key_and_picks_endpoint() {
    let router = Router::new().route(
        "/tmdb/search/:endpoint",
        get(
            |axum::extract::Path(endpoint): axum::extract::Path<String>,
             Query(params): Query<HashMap<String, String>>| async move {
                if params.get("api_key").map(String::as_str) != Some("test-key") {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                let body = match endpoint.as_str() {
                    "tv" => json!({ "results": [{
                        "id": 1396,
                        "name": "Breaking Bad",
                        "first_air_date": "2008-01-20"
                    }]}),
                    _ => json!({ "results": [{
                        "id": 550,
                        "title": params.get("query").cloned().unwrap_or_default(),
                        "release_date": ""
                    }]}),
                };
                (StatusCode::OK, Json(body))
            },
        ),
    );
    let dispatcher = support::dispatcher(router).await;

    let series = dispatcher.search("series", "breaking").await.unwrap();
    assert_eq!(series[0].title, "Breaking Bad");
    assert_eq!(series[0].year, Some(2008));

    let movies = dispatcher.search("movie", "Fight Club").await.unwrap();
    assert_eq!(movies[0].title, "Fight Club");
    assert_eq!(movies[0].year, None);
    assert_eq!(movies[0].source, CatalogSource::Tmdb);
}

#[tokio::test]
async fn test_anilist_search_posts_graphql_variables() {
    let router = Router::new().route(
        "/anilist",
        post(|Json(body): Json<Value>| async move {
            let search = body["variables"]["search"].as_str().unwrap_or_default().to_string();
            Json(json!({ "data": { "Page": { "media": [{
                "id": 1,
                "title": { "romaji": search, "english": null },
                "averageScore": 85
            }]}}}))
        }),
    );
    let dispatcher = support::dispatcher(router).await;

    let results = dispatcher.search("anime", "Cowboy Bebop").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Cowboy Bebop");
    assert_eq!(results[0].rating, Some(8.5));
}

#[tokio::test]
async fn test_rawg_search_maps_duration_and_genres() {
    let dispatcher = support::dispatcher(oversized_router()).await;

    let results = dispatcher.search("game", "witcher").await.unwrap();
    let first = &results[0];
    assert_eq!(first.average_duration, Some(180));
    assert_eq!(
        first.genres,
        Some(vec!["RPG".to_string(), "PC".to_string()])
    );
    assert_eq!(first.description, None);
}
