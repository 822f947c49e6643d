use std::time::Duration;

use crate::AppConfig;

/// Policy knobs for one ingestion coordinator.
///
/// All limits are explicit so tests can drive boundary values such as a zero
/// freshness window or a zero row threshold.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Budget for a single extractor invocation.
    pub extractor_timeout: Duration,
    /// Upper bound on extractors running at the same time.
    pub max_concurrent_sources: usize,
    /// Per-source snippet cap.
    pub max_snippets_per_source: usize,
    /// Snippets with this many characters or fewer are dropped.
    pub min_snippet_chars: usize,
    /// Persisted review text is truncated to this many characters.
    pub max_review_chars: usize,
    /// Rows younger than this count toward the freshness check.
    pub freshness_window: Duration,
    /// The cache is fresh when strictly more than this many rows match.
    pub freshness_min_rows: i64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extractor_timeout: Duration::from_secs(15),
            max_concurrent_sources: 2,
            max_snippets_per_source: 25,
            min_snippet_chars: 10,
            max_review_chars: 1000,
            freshness_window: Duration::from_secs(24 * 60 * 60),
            freshness_min_rows: 5,
        }
    }
}

impl IngestConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            extractor_timeout: config.extractor_timeout(),
            max_concurrent_sources: config.max_concurrent_sources,
            max_snippets_per_source: config.max_snippets_per_source,
            min_snippet_chars: config.min_snippet_chars,
            max_review_chars: config.max_review_chars,
            freshness_window: config.freshness_window(),
            freshness_min_rows: config.freshness_min_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let cfg = IngestConfig::default();
        assert_eq!(cfg.max_concurrent_sources, 2);
        assert_eq!(cfg.max_snippets_per_source, 25);
        assert_eq!(cfg.min_snippet_chars, 10);
        assert_eq!(cfg.max_review_chars, 1000);
        assert_eq!(cfg.freshness_window, Duration::from_secs(86_400));
        assert_eq!(cfg.freshness_min_rows, 5);
    }
}
