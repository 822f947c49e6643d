//! `ingest` command handler.

use std::sync::Arc;

use revdb_core::{AppConfig, IngestConfig};
use revdb_ingest::{
    default_extractors, HttpPageFetcher, IngestOutcome, IngestReport, IngestionCoordinator,
    MemoryReviewStore, PageFetcher, PgReviewStore, ReviewStore, SiteUrls, SnippetPolicy,
};
use tokio_util::sync::CancellationToken;

use crate::db::connect;

/// Cancel the returned token on the first Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling ingestion");
            trigger.cancel();
        }
    });
    token
}

/// Run one ingestion for `query` and print a per-source summary.
///
/// With `dry_run`, rows are scored into an in-memory store and printed
/// instead of written to the database.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the run is interrupted
/// before anything was persisted. Individual source failures are reported in
/// the summary only.
pub(crate) async fn run_ingest(config: &AppConfig, query: &str, dry_run: bool) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let ingest_config = IngestConfig::from_app_config(config);
    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpPageFetcher::new(config.fetch_timeout()));
    let extractors = default_extractors(
        &SiteUrls::from_app_config(config),
        &fetcher,
        SnippetPolicy::from_ingest_config(&ingest_config),
    );

    let memory = Arc::new(MemoryReviewStore::new());
    let pool = if dry_run {
        None
    } else {
        let pool = connect(config).await?;
        revdb_db::health_check(&pool).await?;
        Some(pool)
    };
    let store: Arc<dyn ReviewStore> = match &pool {
        Some(pool) => Arc::new(PgReviewStore::new(pool.clone())),
        None => memory.clone(),
    };

    let coordinator = IngestionCoordinator::new(ingest_config, store, extractors);
    let cancel = cancel_on_interrupt();
    let report = coordinator.run(query, &cancel).await?;

    print_report(&report, dry_run);
    if dry_run {
        for row in memory.rows() {
            println!(
                "  [{:<8}] {:>6.3} {:<8} {}",
                row.source_name,
                row.sentiment_score,
                row.sentiment_label.as_str(),
                row.text
            );
        }
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    Ok(())
}

fn print_report(report: &IngestReport, dry_run: bool) {
    match report.outcome {
        IngestOutcome::CacheHit => {
            println!(
                "'{}': {} recent reviews already stored; skipped scraping",
                report.query, report.cache.matched_count
            );
            return;
        }
        IngestOutcome::NoSnippets => {
            println!("'{}': no reviews found on any source", report.query);
        }
        IngestOutcome::Persisted => {
            let verb = if dry_run { "scored" } else { "stored" };
            println!(
                "'{}': {} reviews {verb} ({} failed) in {:.1}s",
                report.query,
                report.items_added,
                report.rows_failed,
                report.elapsed.as_secs_f64()
            );
        }
    }

    for source in &report.sources {
        match &source.error {
            Some(error) => println!("  {:<10} failed: {error}", source.source_name),
            None => println!(
                "  {:<10} {} snippets in {:.1}s",
                source.source_name,
                source.snippets,
                source.elapsed.as_secs_f64()
            ),
        }
    }
}
