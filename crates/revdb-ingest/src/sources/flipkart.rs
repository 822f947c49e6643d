//! Flipkart-style storefront extractor.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tokio_util::sync::CancellationToken;

use super::retail::{scrape_site, SiteRules};
use crate::error::IngestError;
use crate::extractor::{Snippet, SnippetPolicy, SourceExtractor};
use crate::fetch::PageFetcher;

pub const FLIPKART_SOURCE: &str = "Flipkart";

static PRODUCT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*data-id="[^"]*"[^>]*>.*?<a[^>]*href="([^"]+)""#)
        .expect("valid flipkart product link regex")
});
static REVIEW_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="[^"]*(?:ZmyHeo|t-ZTKy)[^"]*"[^>]*>(.*?)</div>"#)
        .expect("valid flipkart review regex")
});
static REVIEW_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<p[^>]*class="[^"]*_2-N8zT[^"]*"[^>]*>(.*?)</p>"#)
        .expect("valid flipkart review paragraph regex")
});
static TITLE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*title="([^"]+)""#).expect("valid flipkart title regex")
});
static TITLE_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="[^"]*_4rR01T[^"]*"[^>]*>(.*?)</div>"#)
        .expect("valid flipkart title div regex")
});

fn rules() -> SiteRules {
    SiteRules {
        name: FLIPKART_SOURCE,
        search_path: "/search",
        search_param: "q",
        product_link: &PRODUCT_LINK,
        review_blocks: vec![&*REVIEW_DIV, &*REVIEW_PARAGRAPH],
        fallback_blocks: vec![&*TITLE_ATTR, &*TITLE_DIV],
    }
}

pub struct FlipkartExtractor {
    base_url: String,
    fetcher: Arc<dyn PageFetcher>,
    policy: SnippetPolicy,
}

impl FlipkartExtractor {
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
impl SourceExtractor for FlipkartExtractor {
    fn name(&self) -> &str {
        FLIPKART_SOURCE
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
