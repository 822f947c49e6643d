//! Database operations for the `reviews` table.
//!
//! The ingestion path only ever appends; [`delete_all_reviews`] is the one
//! destructive query and is reserved for the explicit reset command.

use chrono::{DateTime, Utc};
use revdb_core::{ScoredReview, SentimentLabel};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `reviews` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub product_name: String,
    pub review_text: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl ReviewRow {
    /// Parse the stored label column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidColumn`] if the column holds an unknown label.
    pub fn label(&self) -> Result<SentimentLabel, DbError> {
        self.sentiment_label
            .parse()
            .map_err(|_| DbError::InvalidColumn {
                column: "sentiment_label",
                value: self.sentiment_label.clone(),
            })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Escape `%`, `_` and `\` so `value` matches literally inside a `LIKE` pattern.
#[must_use]
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(query: &str) -> String {
    format!("%{}%", escape_like(query.trim()))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert one review and return its generated id.
///
/// Generic over the executor so a caller can run a batch of single-row inserts
/// on one acquired connection, each committing independently.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (constraint violation,
/// connection loss).
pub async fn insert_review<'e, E>(executor: E, review: &ScoredReview) -> Result<i64, DbError>
where
    E: PgExecutor<'e>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO reviews \
             (product_name, review_text, sentiment_label, sentiment_score, source, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(&review.product_query)
    .bind(&review.text)
    .bind(review.sentiment_label.as_str())
    .bind(review.sentiment_score)
    .bind(&review.source_name)
    .bind(review.created_at)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Count rows whose `product_name` contains `query` (case-insensitive) and
/// whose `created_at` is at or after `since`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_recent_reviews<'e, E>(
    executor: E,
    query: &str,
    since: DateTime<Utc>,
) -> Result<i64, DbError>
where
    E: PgExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reviews \
         WHERE product_name ILIKE $1 ESCAPE '\\' \
           AND created_at >= $2",
    )
    .bind(contains_pattern(query))
    .bind(since)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// List the most recent reviews, newest first, optionally filtered by a
/// product-name substring.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_reviews(
    pool: &PgPool,
    product_filter: Option<&str>,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = match product_filter {
        Some(filter) => {
            sqlx::query_as::<_, ReviewRow>(
                "SELECT id, product_name, review_text, sentiment_label, sentiment_score, \
                        source, created_at \
                 FROM reviews \
                 WHERE product_name ILIKE $1 ESCAPE '\\' \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $2",
            )
            .bind(contains_pattern(filter))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ReviewRow>(
                "SELECT id, product_name, review_text, sentiment_label, sentiment_score, \
                        source, created_at \
                 FROM reviews \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $1",
            )
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}

/// Remove every row from `reviews` and return how many were deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_all_reviews(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM reviews").execute(pool).await?;
    Ok(result.rows_affected())
}
