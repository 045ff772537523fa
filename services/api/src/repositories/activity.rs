//! Search log and rating persistence

use chrono::{DateTime, Duration, Utc};
use common::error::DatabaseResult;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::models::activity::{LogEntry, RatingIn, RatingKey, RatingOut, SearchLogOut, TrendingItem};

/// Number of titles returned by a trending query
const TRENDING_LIMIT: i64 = 10;

/// Search log repository for database operations
#[derive(Clone)]
pub struct SearchLogRepository {
    pool: PgPool,
}

impl SearchLogRepository {
    /// Create a new search log repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record one search
    pub async fn record(&self, entry: &LogEntry) -> DatabaseResult<()> {
        sqlx::query(
            r#"
            INSERT INTO search_logs (source, source_id, type, title)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&entry.source)
        .bind(&entry.source_id)
        .bind(&entry.media_type)
        .bind(&entry.title)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent searches first, optionally restricted to one type
    pub async fn history(
        &self,
        limit: i64,
        media_type: Option<&str>,
    ) -> DatabaseResult<Vec<SearchLogOut>> {
        let rows = sqlx::query(
            r#"
            SELECT title, type, timestamp, source, source_id
            FROM search_logs
            WHERE ($2::VARCHAR IS NULL OR type = $2)
            ORDER BY timestamp DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(media_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SearchLogOut {
                title: row.get("title"),
                media_type: row.get("type"),
                timestamp: row.get("timestamp"),
                source: row.get("source"),
                source_id: row.get("source_id"),
            })
            .collect())
    }

    /// Most searched titles for a type over the last `days` days
    ///
    /// A non-positive `days` covers the whole log.
    pub async fn trending(&self, media_type: &str, days: i64) -> DatabaseResult<Vec<TrendingItem>> {
        let rows = sqlx::query(
            r#"
            SELECT title, COUNT(*) AS count
            FROM search_logs
            WHERE type = $1
              AND ($2::TIMESTAMPTZ IS NULL OR timestamp >= $2)
            GROUP BY title
            ORDER BY count DESC
            LIMIT $3
            "#,
        )
        .bind(media_type)
        .bind(trending_since(days, Utc::now()))
        .bind(TRENDING_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TrendingItem {
                title: row.get("title"),
                count: row.get("count"),
            })
            .collect())
    }
}

/// Start of the trending window, or `None` for all time
fn trending_since(days: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (days > 0)
        .then(|| Duration::try_days(days))
        .flatten()
        .and_then(|window| now.checked_sub_signed(window))
}

/// Rating repository for database operations
#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// Create a new rating repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a rating, or replace the user's earlier rating of the same title
    pub async fn upsert(&self, rating: &RatingIn) -> DatabaseResult<RatingOut> {
        let row = sqlx::query(
            r#"
            INSERT INTO ratings (source, source_id, username, rate_score, rate_descr)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username, source, source_id) DO UPDATE
            SET rate_score = EXCLUDED.rate_score,
                rate_descr = EXCLUDED.rate_descr,
                timestamp = now()
            RETURNING source, source_id, username, rate_score, rate_descr, timestamp
            "#,
        )
        .bind(&rating.source)
        .bind(&rating.source_id)
        .bind(&rating.username)
        .bind(rating.rate_score)
        .bind(&rating.rate_descr)
        .fetch_one(&self.pool)
        .await?;

        Ok(rating_from_row(&row))
    }

    /// Every rating of one title
    pub async fn list(&self, source: &str, source_id: &str) -> DatabaseResult<Vec<RatingOut>> {
        let rows = sqlx::query(
            r#"
            SELECT source, source_id, username, rate_score, rate_descr, timestamp
            FROM ratings
            WHERE source = $1 AND source_id = $2
            ORDER BY timestamp DESC
            "#,
        )
        .bind(source)
        .bind(source_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(rating_from_row).collect())
    }

    /// Delete a user's rating; `false` when there was none
    pub async fn delete(&self, key: &RatingKey) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM ratings
            WHERE source = $1 AND source_id = $2 AND username = $3
            "#,
        )
        .bind(&key.source)
        .bind(&key.source_id)
        .bind(&key.username)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn rating_from_row(row: &PgRow) -> RatingOut {
    RatingOut {
        source: row.get("source"),
        source_id: row.get("source_id"),
        username: row.get("username"),
        rate_score: row.get("rate_score"),
        rate_descr: row.get("rate_descr"),
        timestamp: row.get("timestamp"),
    }
}
