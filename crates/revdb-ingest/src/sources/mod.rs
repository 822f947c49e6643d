//! Built-in review sources.

mod amazon;
mod flipkart;
mod html;
mod retail;

use std::sync::Arc;

pub use amazon::{AmazonExtractor, AMAZON_SOURCE};
pub use flipkart::{FlipkartExtractor, FLIPKART_SOURCE};

use crate::extractor::{SnippetPolicy, SourceExtractor};
use crate::fetch::PageFetcher;

/// Site origins for the built-in extractors.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    pub amazon: String,
    pub flipkart: String,
}

impl SiteUrls {
    #[must_use]
    pub fn from_app_config(config: &revdb_core::AppConfig) -> Self {
        Self {
            amazon: config.amazon_base_url.clone(),
            flipkart: config.flipkart_base_url.clone(),
        }
    }
}

/// Every built-in extractor, sharing one fetcher.
#[must_use]
pub fn default_extractors(
    urls: &SiteUrls,
    fetcher: &Arc<dyn PageFetcher>,
    policy: SnippetPolicy,
) -> Vec<Arc<dyn SourceExtractor>> {
    vec![
        Arc::new(FlipkartExtractor::new(
            &urls.flipkart,
            Arc::clone(fetcher),
            policy,
        )),
        Arc::new(AmazonExtractor::new(
            &urls.amazon,
            Arc::clone(fetcher),
            policy,
        )),
    ]
}
