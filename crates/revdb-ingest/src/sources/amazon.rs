//! Amazon-style storefront extractor.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tokio_util::sync::CancellationToken;

use super::retail::{scrape_site, SiteRules};
use crate::error::IngestError;
use crate::extractor::{Snippet, SnippetPolicy, SourceExtractor};
use crate::fetch::PageFetcher;

pub const AMAZON_SOURCE: &str = "Amazon";

static PRODUCT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)data-component-type="s-search-result".*?<a[^>]*class="[^"]*a-link-normal[^"]*"[^>]*href="([^"]+)""#,
    )
    .expect("valid amazon product link regex")
});
static REVIEW_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<(?:span|div)[^>]*data-hook="review-(?:body|collapsed)"[^>]*>(.*?)</(?:span|div)>"#,
    )
    .expect("valid amazon review regex")
});
static REVIEW_TEXT_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span[^>]*class="[^"]*a-size-base review-text[^"]*"[^>]*>(.*?)</span>"#)
        .expect("valid amazon review-text regex")
});
static RESULT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<span[^>]*class="[^"]*a-size-medium a-color-base a-text-normal[^"]*"[^>]*>(.*?)</span>"#,
    )
    .expect("valid amazon title regex")
});

fn rules() -> SiteRules {
    SiteRules {
        name: AMAZON_SOURCE,
        search_path: "/s",
        search_param: "k",
        product_link: &PRODUCT_LINK,
        review_blocks: vec![&*REVIEW_BODY, &*REVIEW_TEXT_CLASS],
        fallback_blocks: vec![&*RESULT_TITLE],
    }
}

pub struct AmazonExtractor {
    base_url: String,
    fetcher: Arc<dyn PageFetcher>,
    policy: SnippetPolicy,
}

impl AmazonExtractor {
    #[must_use]
    pub fn new(base_url: &str, fetcher: Arc<dyn PageFetcher>, policy: SnippetPolicy) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
            policy,
        }
    }
}

#[async_trait]
impl SourceExtractor for AmazonExtractor {
    fn name(&self) -> &str {
        AMAZON_SOURCE
    }

    async fn extract(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> Result<Vec<Snippet>, IngestError> {
        scrape_site(
            &rules(),
            self.fetcher.as_ref(),
            &self.base_url,
            self.policy,
            cancel,
            query,
        )
        .await
    }
}
