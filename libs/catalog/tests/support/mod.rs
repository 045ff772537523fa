//! Local fixture server standing in for the upstream catalogs

#![allow(dead_code)]

use axum::Router;
use catalog::{CatalogConfig, Dispatcher};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture server");
    let addr = listener.local_addr().expect("fixture address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fixture server");
    });

    format!("http://{}", addr)
}

/// Dispatcher whose adapters all talk to the fixture server
pub async fn dispatcher(router: Router) -> Dispatcher {
    let base = serve(router).await;
    Dispatcher::new(&CatalogConfig::with_base_url(&base)).expect("client builds")
}

/// Dispatcher pointed at a port nothing listens on
pub async fn unreachable_dispatcher() -> Dispatcher {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);

    Dispatcher::new(&CatalogConfig::with_base_url(&format!("http://{}", addr)))
        .expect("client builds")
}

pub fn tmdb_movies(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": 1000 + i,
                "title": format!("Movie {}", i),
                "overview": "A film.",
                "poster_path": format!("/poster{}.jpg", i),
                "release_date": "1994-03-01",
                "genre_ids": [18],
                "vote_average": 7.5,
                "vote_count": 100
            })
        })
        .collect();
    json!({ "page": 1, "results": results })
}

pub fn anilist_page(count: usize) -> Value {
    let media: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": 20 + i,
                "title": { "romaji": format!("Anime {}", i), "english": null },
                "description": "An anime.",
                "coverImage": { "large": null },
                "startDate": { "year": 2001 },
                "episodes": 12,
                "duration": 24,
                "genres": ["Action"],
                "averageScore": 80
            })
        })
        .collect();
    json!({ "data": { "Page": { "media": media } } })
}

pub fn rawg_games(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": 3000 + i,
                "name": format!("Game {}", i),
                "released": "2015-05-18",
                "genres": [{ "name": "RPG" }],
                "platforms": [{ "platform": { "name": "PC" } }],
                "playtime": 3
            })
        })
        .collect();
    json!({ "count": count, "results": results })
}

pub fn openlibrary_docs(count: usize) -> Value {
    let docs: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "key": format!("/works/OL{}W", i),
                "title": format!("Book {}", i),
                "author_name": ["Author"]
            })
        })
        .collect();
    json!({ "numFound": count, "docs": docs })
}

pub fn mangadex_list(count: usize) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("manga-{}", i),
                "type": "manga",
                "attributes": { "title": { "en": format!("Manga {}", i) }, "description": {} },
                "relationships": []
            })
        })
        .collect();
    json!({ "result": "ok", "data": data })
}
