//! Persistence boundary for scored reviews.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use revdb_core::ScoredReview;
use sqlx::PgPool;

use crate::error::StoreError;

/// Result of one `insert_many` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    pub inserted: usize,
    pub failed: usize,
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert `rows` one at a time. A failing row is logged and counted in
    /// [`InsertSummary::failed`]; it never undoes rows already written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] only when the store cannot be
    /// reached at all.
    async fn insert_many(&self, rows: &[ScoredReview]) -> Result<InsertSummary, StoreError>;

    /// Count rows whose product name contains `query` (case-insensitive) and
    /// that were created within `window` of now.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    async fn count_recent(&self, query: &str, window: Duration) -> Result<i64, StoreError>;
}

/// Earliest `created_at` still inside `window`.
pub(crate) fn window_start(window: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(window)
        .ok()
        .and_then(|w| Utc::now().checked_sub_signed(w))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Postgres-backed store over the `reviews` table.
#[derive(Debug, Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn insert_many(&self, rows: &[ScoredReview]) -> Result<InsertSummary, StoreError> {
        // One connection for the batch; each INSERT autocommits on its own.
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::Unavailable {
                reason: e.to_string(),
            })?;

        let mut summary = InsertSummary::default();
        for (index, row) in rows.iter().enumerate() {
            match revdb_db::insert_review(&mut *conn, row).await {
                Ok(id) => {
                    summary.inserted += 1;
                    tracing::trace!(id, source = %row.source_name, "review inserted");
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        row = index,
                        source = %row.source_name,
                        error = %e,
                        "review insert failed; skipping row"
                    );
                }
            }
        }

        Ok(summary)
    }

    async fn count_recent(&self, query: &str, window: Duration) -> Result<i64, StoreError> {
        let count =
            revdb_db::count_recent_reviews(&self.pool, query, window_start(window)).await?;
        Ok(count)
    }
}

/// In-process store with the same row checks as the `reviews` schema.
///
/// Backs `ingest --dry-run` and pipeline tests.
#[derive(Debug, Default)]
pub struct MemoryReviewStore {
    rows: Mutex<Vec<ScoredReview>>,
    insert_calls: AtomicUsize,
}

impl MemoryReviewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate rows, bypassing validation.
    #[must_use]
    pub fn with_rows(rows: Vec<ScoredReview>) -> Self {
        Self {
            rows: Mutex::new(rows),
            insert_calls: AtomicUsize::new(0),
        }
    }

    /// Snapshot of stored rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> Vec<ScoredReview> {
        self.rows
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    /// Number of `insert_many` calls received.
    #[must_use]
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    fn validate(row: &ScoredReview) -> Result<(), StoreError> {
        if !(-1.0..=1.0).contains(&row.sentiment_score) {
            return Err(StoreError::RowInsertFailure {
                reason: format!("sentiment_score {} out of range", row.sentiment_score),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert_many(&self, rows: &[ScoredReview]) -> Result<InsertSummary, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut stored = self.rows.lock().map_err(|_| StoreError::Unavailable {
            reason: "memory store lock poisoned".to_string(),
        })?;

        let mut summary = InsertSummary::default();
        for (index, row) in rows.iter().enumerate() {
            match Self::validate(row) {
                Ok(()) => {
                    stored.push(row.clone());
                    summary.inserted += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(row = index, error = %e, "review insert failed; skipping row");
                }
            }
        }
        Ok(summary)
    }

    async fn count_recent(&self, query: &str, window: Duration) -> Result<i64, StoreError> {
        let since = window_start(window);
        let needle = query.trim().to_lowercase();
        let stored = self.rows.lock().map_err(|_| StoreError::Unavailable {
            reason: "memory store lock poisoned".to_string(),
        })?;
        let count = stored
            .iter()
            .filter(|r| r.created_at >= since)
            .filter(|r| r.product_query.to_lowercase().contains(&needle))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}
