//! Shared search → product page → review text flow for retail sites.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use tokio_util::sync::CancellationToken;

use super::html::{capture_texts, first_link};
use crate::error::{FetchError, IngestError};
use crate::extractor::{Snippet, SnippetPolicy};
use crate::fetch::{PageFetcher, SessionGuard};

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Markup rules for one retail site.
pub(crate) struct SiteRules {
    pub name: &'static str,
    /// Path and query-parameter name of the search page, e.g. `("/s", "k")`.
    pub search_path: &'static str,
    pub search_param: &'static str,
    /// First capture group is the href of the top search result.
    pub product_link: &'static Regex,
    /// First capture group is a review body.
    pub review_blocks: Vec<&'static Regex>,
    /// Used when the page has no review bodies; first capture group is a title.
    pub fallback_blocks: Vec<&'static Regex>,
}

/// Form-encode a search query (`wireless mouse` → `wireless+mouse`).
pub(crate) fn encode_query(query: &str) -> String {
    utf8_percent_encode(query.trim(), QUERY_VALUE)
        .to_string()
        .replace("%20", "+")
}

fn search_url(rules: &SiteRules, base_url: &str, query: &str) -> String {
    format!(
        "{}{}?{}={}",
        base_url.trim_end_matches('/'),
        rules.search_path,
        rules.search_param,
        encode_query(query)
    )
}

fn failure(rules: &SiteRules, reason: impl std::fmt::Display) -> IngestError {
    IngestError::ExtractionFailure {
        source_name: rules.name.to_string(),
        reason: reason.to_string(),
    }
}

fn map_fetch_error(rules: &SiteRules, err: FetchError) -> IngestError {
    match err {
        FetchError::Cancelled => IngestError::ExtractionCancelled {
            source_name: rules.name.to_string(),
        },
        other => failure(rules, other),
    }
}

fn collect_texts(rules: &SiteRules, html: &str) -> Vec<String> {
    let reviews = capture_texts(html, &rules.review_blocks);
    if !reviews.is_empty() {
        return reviews;
    }
    capture_texts(html, &rules.fallback_blocks)
}

/// Run the site flow with one scoped page session.
///
/// A failed product-page load is not fatal: the search page is mined instead.
pub(crate) async fn scrape_site(
    rules: &SiteRules,
    fetcher: &dyn PageFetcher,
    base_url: &str,
    policy: SnippetPolicy,
    cancel: &CancellationToken,
    query: &str,
) -> Result<Vec<Snippet>, IngestError> {
    let mut session = SessionGuard::acquire(fetcher)
        .await
        .map_err(|e| failure(rules, format!("could not open page session: {e}")))?;

    let url = search_url(rules, base_url, query);
    tracing::debug!(source = rules.name, url = %url, "loading search page");
    let mut html = session
        .fetch(&url, cancel)
        .await
        .map_err(|e| map_fetch_error(rules, e))?;

    if let Some(product_url) = first_link(&html, rules.product_link, base_url) {
        match session.fetch(&product_url, cancel).await {
            Ok(product_html) => html = product_html,
            Err(FetchError::Cancelled) => return Err(map_fetch_error(rules, FetchError::Cancelled)),
            Err(e) => {
                tracing::warn!(
                    source = rules.name,
                    url = %product_url,
                    error = %e,
                    "product page failed; reading search results instead"
                );
            }
        }
    } else {
        tracing::debug!(source = rules.name, "no product link on search page");
    }

    let texts = collect_texts(rules, &html);
    if texts.is_empty() {
        return Err(failure(rules, "no review or title elements matched"));
    }

    Ok(policy.apply(rules.name, texts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_query_uses_plus_for_spaces() {
        assert_eq!(encode_query("wireless mouse"), "wireless+mouse");
        assert_eq!(encode_query(" a&b=c "), "a%26b%3Dc");
        assert_eq!(encode_query("usb-c_hub.v2~"), "usb-c_hub.v2~");
    }
}
