//! Freshness gate in front of extraction.
//!
//! Matching is a case-insensitive substring test on the stored product name,
//! so "mouse" is served by rows stored for "wireless mouse" but not the other
//! way round.

use std::sync::Arc;
use std::time::Duration;

use revdb_core::IngestConfig;

use crate::error::IngestError;
use crate::store::ReviewStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDecision {
    pub hit: bool,
    pub matched_count: i64,
}

impl CacheDecision {
    #[must_use]
    pub fn miss() -> Self {
        Self {
            hit: false,
            matched_count: 0,
        }
    }
}

pub struct FreshnessCache {
    store: Arc<dyn ReviewStore>,
    window: Duration,
    min_rows: i64,
}

impl FreshnessCache {
    #[must_use]
    pub fn new(store: Arc<dyn ReviewStore>, window: Duration, min_rows: i64) -> Self {
        Self {
            store,
            window,
            min_rows,
        }
    }

    #[must_use]
    pub fn from_ingest_config(store: Arc<dyn ReviewStore>, config: &IngestConfig) -> Self {
        Self::new(store, config.freshness_window, config.freshness_min_rows)
    }

    /// Look up recent matches for `query`. A blank query matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::CacheLookupFailure`] if the store query fails.
    pub async fn lookup(&self, query: &str) -> Result<CacheDecision, IngestError> {
        // An empty substring pattern would match every stored row.
        if query.trim().is_empty() {
            return Ok(CacheDecision::miss());
        }
        let matched_count = self
            .store
            .count_recent(query, self.window)
            .await
            .map_err(IngestError::CacheLookupFailure)?;
        Ok(CacheDecision {
            hit: matched_count > self.min_rows,
            matched_count,
        })
    }

    /// `true` iff more than the threshold of recent rows match `query`.
    ///
    /// Fails closed: a lookup error is logged and reported as not fresh.
    pub async fn is_fresh(&self, query: &str) -> bool {
        match self.lookup(query).await {
            Ok(decision) => decision.hit,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "freshness lookup failed; treating as stale");
                false
            }
        }
    }
}
