//! The extractor seam: one implementation per external review source.

use async_trait::async_trait;
use revdb_core::IngestConfig;
use tokio_util::sync::CancellationToken;

use crate::error::IngestError;

/// One raw unit of extracted text attributed to a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    pub source_name: String,
}

/// Produces review snippets for a query from one external source.
///
/// Implementations must:
/// - return promptly once `cancel` fires,
/// - hold at most one page session per call and release it on every exit path
///   (see [`crate::fetch::SessionGuard`]),
/// - filter and cap their output with a [`SnippetPolicy`],
/// - report failures as an `Err` rather than panicking.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Stable source label, persisted in the `source` column.
    fn name(&self) -> &str;

    /// Extract snippets for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::ExtractionFailure`] when the source cannot be
    /// read and [`IngestError::ExtractionCancelled`] when `cancel` fires first.
    async fn extract(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> Result<Vec<Snippet>, IngestError>;
}

/// Length filter and per-source cap applied to raw extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetPolicy {
    pub max_snippets: usize,
    /// Texts with this many characters or fewer are dropped.
    pub min_chars: usize,
}

impl Default for SnippetPolicy {
    fn default() -> Self {
        Self::from_ingest_config(&IngestConfig::default())
    }
}

impl SnippetPolicy {
    #[must_use]
    pub fn from_ingest_config(config: &IngestConfig) -> Self {
        Self {
            max_snippets: config.max_snippets_per_source,
            min_chars: config.min_snippet_chars,
        }
    }

    /// Whether `text` is long enough to be a review rather than UI chrome.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        text.trim().chars().count() > self.min_chars
    }

    /// Trim, drop short texts, and keep at most `max_snippets`, preserving order.
    pub fn apply<I, S>(&self, source_name: &str, texts: I) -> Vec<Snippet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .filter(|t| self.accepts(t.as_ref()))
            .take(self.max_snippets)
            .map(|t| Snippet {
                text: t.as_ref().trim().to_string(),
                source_name: source_name.to_string(),
            })
            .collect()
    }

    /// Re-apply the policy to snippets produced elsewhere, trimming them the
    /// same way [`Self::apply`] does.
    #[must_use]
    pub fn enforce(&self, snippets: Vec<Snippet>) -> Vec<Snippet> {
        snippets
            .into_iter()
            .filter(|s| self.accepts(&s.text))
            .take(self.max_snippets)
            .map(|s| Snippet {
                text: s.text.trim().to_string(),
                source_name: s.source_name,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_snippets: usize, min_chars: usize) -> SnippetPolicy {
        SnippetPolicy {
            max_snippets,
            min_chars,
        }
    }

    #[test]
    fn drops_texts_of_ten_characters_or_fewer() {
        let out = policy(25, 10).apply("Amazon", ["ok", "0123456789", "0123456789a"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "0123456789a");
        assert_eq!(out[0].source_name, "Amazon");
    }

    #[test]
    fn length_is_measured_after_trimming() {
        let out = policy(25, 10).apply("Amazon", ["   short     "]);
        assert!(out.is_empty());
    }

    #[test]
    fn caps_output_preserving_order() {
        let texts: Vec<String> = (0..40).map(|i| format!("review number {i:02}")).collect();
        let out = policy(25, 10).apply("Flipkart", &texts);
        assert_eq!(out.len(), 25);
        assert_eq!(out[0].text, "review number 00");
        assert_eq!(out[24].text, "review number 24");
    }

    #[test]
    fn cap_counts_only_accepted_texts() {
        let out = policy(2, 10).apply("Amazon", ["no", "first long one", "x", "second long one"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].text, "second long one");
    }

    #[test]
    fn enforce_filters_foreign_snippets() {
        let snippets = vec![
            Snippet {
                text: "tiny".to_string(),
                source_name: "Custom".to_string(),
            },
            Snippet {
                text: "long enough to keep".to_string(),
                source_name: "Custom".to_string(),
            },
        ];
        let out = policy(25, 10).enforce(snippets);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "long enough to keep");
    }

    #[test]
    fn enforce_trims_like_apply() {
        let snippets = vec![Snippet {
            text: "  \n padded review text \t ".to_string(),
            source_name: "Custom".to_string(),
        }];
        let enforced = policy(25, 10).enforce(snippets);
        let applied = policy(25, 10).apply("Custom", ["  \n padded review text \t "]);
        assert_eq!(enforced[0].text, "padded review text");
        assert_eq!(enforced, applied);
    }

    #[test]
    fn multibyte_text_is_counted_in_characters() {
        // 11 characters, 22 bytes
        let text = "é".repeat(11);
        assert!(policy(25, 10).accepts(&text));
        assert!(!policy(25, 11).accepts(&text));
    }
}
