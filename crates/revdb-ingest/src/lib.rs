//! Review ingestion pipeline.
//!
//! Given a product query, checks whether enough recent reviews are already
//! stored, otherwise runs every registered [`SourceExtractor`] in a bounded
//! parallel pool, scores each snippet with a [`SentimentScorer`], and writes
//! the scored rows through a [`ReviewStore`].

pub mod cache;
pub mod coordinator;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod scorer;
pub mod sources;
pub mod store;

pub use cache::{CacheDecision, FreshnessCache};
pub use coordinator::{IngestOutcome, IngestReport, IngestionCoordinator, SourceReport};
pub use error::{FetchError, IngestError, StoreError};
pub use extractor::{Snippet, SnippetPolicy, SourceExtractor};
pub use fetch::{HttpPageFetcher, PageFetcher, PageSession, SessionGuard};
pub use scorer::{LexiconPolarity, PolarityEstimator, SentimentScorer};
pub use sources::{default_extractors, SiteUrls};
pub use store::{InsertSummary, MemoryReviewStore, PgReviewStore, ReviewStore};
