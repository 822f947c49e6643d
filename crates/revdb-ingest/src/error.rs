use std::time::Duration;

use thiserror::Error;

/// Failures reported by the ingestion pipeline.
///
/// Only [`IngestError::StoreUnavailable`], [`IngestError::Cancelled`] and
/// [`IngestError::PersistTaskFailed`] ever reach a caller of
/// [`crate::IngestionCoordinator::ingest`]; extraction and cache errors are
/// logged and absorbed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("extraction from {source_name} timed out after {budget:?}")]
    ExtractionTimeout {
        source_name: String,
        budget: Duration,
    },

    #[error("extraction from {source_name} was cancelled")]
    ExtractionCancelled { source_name: String },

    #[error("extraction from {source_name} failed: {reason}")]
    ExtractionFailure { source_name: String, reason: String },

    #[error("freshness lookup failed: {0}")]
    CacheLookupFailure(#[source] StoreError),

    #[error("review store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("ingestion cancelled before persistence")]
    Cancelled,

    #[error("persistence task failed: {0}")]
    PersistTaskFailed(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {reason}")]
    Unavailable { reason: String },

    #[error("row insert failed: {reason}")]
    RowInsertFailure { reason: String },

    #[error(transparent)]
    Db(#[from] revdb_db::DbError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("page session already released")]
    SessionReleased,

    #[error("fetch cancelled")]
    Cancelled,
}
