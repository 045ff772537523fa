//! Search log and rating payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of history rows returned
pub const DEFAULT_HISTORY_LIMIT: i64 = 100;
/// Largest history page a client may request
pub const MAX_HISTORY_LIMIT: i64 = 500;
/// Default trending window in days
pub const DEFAULT_TRENDING_DAYS: i64 = 7;

/// A search the client chose to record
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub source: String,
    pub source_id: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: String,
}

/// A recorded search as returned by `/api/history`
#[derive(Debug, Clone, Serialize)]
pub struct SearchLogOut {
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub source_id: String,
}

/// Query parameters for `/api/history`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

impl HistoryQuery {
    /// Requested limit, or the default; `None` when out of range
    pub fn limit(&self) -> Option<i64> {
        let limit = self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        (1..=MAX_HISTORY_LIMIT).contains(&limit).then_some(limit)
    }
}

/// Query parameters for `/api/trending`
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingQuery {
    #[serde(rename = "type")]
    pub media_type: String,
    pub days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingItem {
    pub title: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
    #[serde(rename = "type")]
    pub media_type: String,
    pub days: i64,
    pub trending: Vec<TrendingItem>,
}

/// Rating submitted by a user; replaces any earlier rating for the same title
#[derive(Debug, Clone, Deserialize)]
pub struct RatingIn {
    pub source: String,
    pub source_id: String,
    pub username: String,
    pub rate_score: f64,
    pub rate_descr: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingOut {
    pub source: String,
    pub source_id: String,
    pub username: String,
    pub rate_score: f64,
    pub rate_descr: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for listing ratings of one title
#[derive(Debug, Clone, Deserialize)]
pub struct RatingQuery {
    pub source: String,
    pub source_id: String,
}

/// Query parameters identifying a single user's rating
#[derive(Debug, Clone, Deserialize)]
pub struct RatingKey {
    pub source: String,
    pub source_id: String,
    pub username: String,
}
