//! Orchestrates one ingestion call:
//! cache check → bounded parallel extraction → scoring → persistence.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use revdb_core::{truncate_chars, IngestConfig, ScoredReview};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheDecision, FreshnessCache};
use crate::error::IngestError;
use crate::extractor::{Snippet, SnippetPolicy, SourceExtractor};
use crate::scorer::SentimentScorer;
use crate::store::{InsertSummary, ReviewStore};

/// How an ingestion call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Enough recent rows existed; no extractor ran.
    CacheHit,
    /// Extraction produced nothing usable; nothing was written.
    NoSnippets,
    /// Snippets were scored and handed to the store.
    Persisted,
}

/// Per-extractor result of the extraction phase.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source_name: String,
    /// Snippets kept after the length filter and cap.
    pub snippets: usize,
    /// Rendered extractor error, if the source failed.
    pub error: Option<String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub query: String,
    pub outcome: IngestOutcome,
    pub cache: CacheDecision,
    /// In completion order.
    pub sources: Vec<SourceReport>,
    pub items_added: usize,
    pub rows_failed: usize,
    pub elapsed: Duration,
}

pub struct IngestionCoordinator {
    extractors: Vec<Arc<dyn SourceExtractor>>,
    store: Arc<dyn ReviewStore>,
    scorer: SentimentScorer,
    cache: FreshnessCache,
    config: IngestConfig,
    policy: SnippetPolicy,
}

impl std::fmt::Debug for IngestionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.extractors.iter().map(|e| e.name()).collect();
        f.debug_struct("IngestionCoordinator")
            .field("extractors", &names)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IngestionCoordinator {
    #[must_use]
    pub fn new(
        config: IngestConfig,
        store: Arc<dyn ReviewStore>,
        extractors: Vec<Arc<dyn SourceExtractor>>,
    ) -> Self {
        let cache = FreshnessCache::from_ingest_config(Arc::clone(&store), &config);
        let policy = SnippetPolicy::from_ingest_config(&config);
        Self {
            extractors,
            store,
            scorer: SentimentScorer::default(),
            cache,
            config,
            policy,
        }
    }

    /// Replace the default lexicon scorer.
    #[must_use]
    pub fn with_scorer(mut self, scorer: SentimentScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Ingest reviews for `query` and return the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::StoreUnavailable`] when the store cannot be
    /// reached for persistence. Source failures never surface here.
    pub async fn ingest(&self, query: &str) -> Result<usize, IngestError> {
        self.ingest_with_cancel(query, CancellationToken::new())
            .await
    }

    /// [`Self::ingest`] under an external cancellation token.
    ///
    /// # Errors
    ///
    /// As [`Self::ingest`], plus [`IngestError::Cancelled`] when `cancel`
    /// fires before persistence starts.
    pub async fn ingest_with_cancel(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<usize, IngestError> {
        self.run(query, &cancel).await.map(|r| r.items_added)
    }

    /// Full ingestion with a per-phase report.
    ///
    /// Once persistence has started the batch is written to completion, even
    /// if `cancel` fires or this future is dropped.
    ///
    /// # Errors
    ///
    /// See [`Self::ingest_with_cancel`].
    pub async fn run(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<IngestReport, IngestError> {
        let started = Instant::now();
        tracing::info!(query = %query, sources = self.extractors.len(), "ingestion started");

        let cache = match self.cache.lookup(query).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "freshness lookup failed; extracting anyway");
                CacheDecision::miss()
            }
        };
        if cache.hit {
            tracing::info!(
                query = %query,
                matched = cache.matched_count,
                "recent reviews found; skipping extraction"
            );
            return Ok(IngestReport {
                query: query.to_string(),
                outcome: IngestOutcome::CacheHit,
                cache,
                sources: Vec::new(),
                items_added: 0,
                rows_failed: 0,
                elapsed: started.elapsed(),
            });
        }

        if cancel.is_cancelled() {
            return Err(IngestError::Cancelled);
        }

        let (snippets, sources) = self.extract_all(query, cancel).await;

        if cancel.is_cancelled() {
            tracing::info!(query = %query, "ingestion cancelled during extraction");
            return Err(IngestError::Cancelled);
        }

        if snippets.is_empty() {
            tracing::info!(query = %query, "no snippets extracted; nothing to persist");
            return Ok(IngestReport {
                query: query.to_string(),
                outcome: IngestOutcome::NoSnippets,
                cache,
                sources,
                items_added: 0,
                rows_failed: 0,
                elapsed: started.elapsed(),
            });
        }

        let rows = self.score_all(query, &snippets);
        let summary = self.persist(query, rows).await?;

        tracing::info!(
            query = %query,
            inserted = summary.inserted,
            failed = summary.failed,
            "ingestion complete"
        );

        Ok(IngestReport {
            query: query.to_string(),
            outcome: IngestOutcome::Persisted,
            cache,
            sources,
            items_added: summary.inserted,
            rows_failed: summary.failed,
            elapsed: started.elapsed(),
        })
    }

    async fn extract_all(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> (Vec<Snippet>, Vec<SourceReport>) {
        let budget = self.config.extractor_timeout;
        let limit = self.config.max_concurrent_sources.max(1);
        let policy = self.policy;

        let runs: Vec<_> = self
            .extractors
            .iter()
            .cloned()
            .map(|extractor| {
                run_source(
                    extractor,
                    cancel.child_token(),
                    query.to_string(),
                    budget,
                    policy,
                )
            })
            .collect();
        let outcomes: Vec<(SourceReport, Vec<Snippet>)> =
            stream::iter(runs).buffer_unordered(limit).collect().await;

        let mut snippets = Vec::new();
        let mut reports = Vec::with_capacity(outcomes.len());
        for (report, found) in outcomes {
            snippets.extend(found);
            reports.push(report);
        }
        (snippets, reports)
    }

    fn score_all(&self, query: &str, snippets: &[Snippet]) -> Vec<ScoredReview> {
        let created_at = Utc::now();
        snippets
            .iter()
            .map(|snippet| {
                let (sentiment_label, sentiment_score) = self.scorer.score(&snippet.text);
                ScoredReview {
                    product_query: query.to_string(),
                    text: truncate_chars(&snippet.text, self.config.max_review_chars).to_string(),
                    sentiment_label,
                    sentiment_score,
                    source_name: snippet.source_name.clone(),
                    created_at,
                }
            })
            .collect()
    }

    async fn persist(
        &self,
        query: &str,
        rows: Vec<ScoredReview>,
    ) -> Result<InsertSummary, IngestError> {
        let store = Arc::clone(&self.store);
        let query = query.to_string();
        // Detached from the caller: dropping the ingest future must not
        // abandon a half-written batch, so the outcome is logged in the task.
        let handle = tokio::spawn(async move {
            let result = store.insert_many(&rows).await;
            match &result {
                Ok(summary) => tracing::info!(
                    query = %query,
                    inserted = summary.inserted,
                    failed = summary.failed,
                    "review batch persisted"
                ),
                Err(e) => tracing::error!(query = %query, error = %e, "review store unavailable"),
            }
            result
        });
        match handle.await {
            Ok(Ok(summary)) => Ok(summary),
            Ok(Err(e)) => Err(IngestError::StoreUnavailable(e)),
            Err(e) => Err(IngestError::PersistTaskFailed(e.to_string())),
        }
    }
}

/// Run one extractor under its own budget and cancellation token.
async fn run_source(
    extractor: Arc<dyn SourceExtractor>,
    token: CancellationToken,
    query: String,
    budget: Duration,
    policy: SnippetPolicy,
) -> (SourceReport, Vec<Snippet>) {
    let source_name = extractor.name().to_string();
    let started = Instant::now();

    let result = tokio::select! {
        () = token.cancelled() => Err(IngestError::ExtractionCancelled {
            source_name: source_name.clone(),
        }),
        outcome = tokio::time::timeout(budget, extractor.extract(&token, &query)) => {
            outcome.unwrap_or_else(|_| {
                Err(IngestError::ExtractionTimeout {
                    source_name: source_name.clone(),
                    budget,
                })
            })
        }
    };
    // Anything the extractor spawned under this token stops too.
    token.cancel();

    let elapsed = started.elapsed();
    match result {
        Ok(found) => {
            let found = policy.enforce(found);
            tracing::debug!(
                source = %source_name,
                snippets = found.len(),
                elapsed_ms = elapsed.as_millis(),
                "source finished"
            );
            (
                SourceReport {
                    source_name,
                    snippets: found.len(),
                    error: None,
                    elapsed,
                },
                found,
            )
        }
        Err(e) => {
            tracing::warn!(source = %source_name, error = %e, "source failed; continuing");
            (
                SourceReport {
                    source_name,
                    snippets: 0,
                    error: Some(e.to_string()),
                    elapsed,
                },
                Vec::new(),
            )
        }
    }
}
