//! API service routes

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{limit_searches, log_request, require_dev_token},
    models::{
        LookupQuery, SearchQuery,
        activity::{
            DEFAULT_TRENDING_DAYS, HistoryQuery, LogEntry, MAX_HISTORY_LIMIT, RatingIn, RatingKey,
            RatingQuery, TrendingQuery, TrendingResponse,
        },
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let search_routes = Router::new()
        .route("/search", get(search))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_searches,
        ));

    let logged_routes = Router::new()
        .merge(search_routes)
        .route("/detail", get(detail))
        .route("/chapter", get(chapters))
        .route(
            "/rate",
            post(rate).get(list_ratings).delete(delete_rating),
        )
        .route_layer(middleware::from_fn(log_request));

    let dev_routes = Router::new()
        .route("/dev-logs", get(dev_logs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_dev_token,
        ));

    let api_routes = Router::new()
        .merge(logged_routes)
        .merge(dev_routes)
        .route("/log", post(record_search))
        .route("/history", get(history))
        .route("/trending", get(trending));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "BingePal API is alive"
    }))
}

/// Search the catalog serving the requested type
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let results = state
        .catalog
        .search(&query.media_type, &query.query)
        .await?;

    Ok(Json(results))
}

/// Fetch one record; upstream failures surface as 500
pub async fn detail(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .catalog
        .detail(&query.media_type, &query.id)
        .await
        .map_err(|e| {
            if e.is_bad_request() {
                ApiError::from(e)
            } else {
                ApiError::Upstream(format!("Failed to fetch detail: {}", e))
            }
        })?;

    Ok(Json(record))
}

/// Episodes of a series or anime, chapters of a manga
pub async fn chapters(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<impl IntoResponse> {
    let episodes = state
        .catalog
        .episodes(&query.media_type, &query.id)
        .await?;

    Ok(Json(episodes))
}

/// Record a search the client reported
pub async fn record_search(
    State(state): State<AppState>,
    Json(entry): Json<LogEntry>,
) -> ApiResult<StatusCode> {
    state.search_logs.record(&entry).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recent searches, newest first
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit().ok_or_else(|| {
        ApiError::BadRequest(format!("limit must be between 1 and {}", MAX_HISTORY_LIMIT))
    })?;

    let logs = state
        .search_logs
        .history(limit, query.media_type.as_deref())
        .await?;

    Ok(Json(logs))
}

/// Most searched titles of a type
pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<impl IntoResponse> {
    let days = query.days.unwrap_or(DEFAULT_TRENDING_DAYS);
    let trending = state.search_logs.trending(&query.media_type, days).await?;

    Ok(Json(TrendingResponse {
        media_type: query.media_type,
        days,
        trending,
    }))
}

/// Add or replace a rating
pub async fn rate(
    State(state): State<AppState>,
    Json(payload): Json<RatingIn>,
) -> ApiResult<impl IntoResponse> {
    let rating = state.ratings.upsert(&payload).await?;
    Ok(Json(rating))
}

/// Every rating of one title
pub async fn list_ratings(
    State(state): State<AppState>,
    Query(query): Query<RatingQuery>,
) -> ApiResult<impl IntoResponse> {
    let ratings = state.ratings.list(&query.source, &query.source_id).await?;
    Ok(Json(ratings))
}

/// Remove a user's rating of one title
pub async fn delete_rating(
    State(state): State<AppState>,
    Query(key): Query<RatingKey>,
) -> ApiResult<StatusCode> {
    if state.ratings.delete(&key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Rating not found".to_string()))
    }
}

/// Recent log lines as plain text
pub async fn dev_logs(State(state): State<AppState>) -> String {
    state.log_buffer.recent().join("\n")
}
