//! Regex-based HTML text helpers shared by the retail site extractors.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break regex"));
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("valid script regex")
});
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid entity regex"));

/// Strip markup from an HTML fragment and collapse whitespace.
pub(crate) fn fragment_text(fragment: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(fragment, " ");
    let with_breaks = BREAK_RE.replace_all(&without_scripts, " ");
    let stripped = TAG_RE.replace_all(&with_breaks, " ");
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = if let Some(hex) = raw.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()
        } else {
            raw.parse::<u32>().ok()
        };
        code.and_then(char::from_u32)
            .map_or_else(String::new, |c| c.to_string())
    });
    numeric
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Text of every first capture group of any of `patterns`, in document
/// order, markup stripped and empty results skipped.
///
/// An element matched by more than one pattern is returned once.
pub(crate) fn capture_texts(html: &str, patterns: &[&Regex]) -> Vec<String> {
    let mut found: Vec<(usize, String)> = patterns
        .iter()
        .flat_map(|re| re.captures_iter(html))
        .filter_map(|cap| {
            let start = cap.get(0)?.start();
            let text = fragment_text(cap.get(1)?.as_str());
            (!text.is_empty()).then_some((start, text))
        })
        .collect();
    found.sort_by_key(|(start, _)| *start);
    found.dedup_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, text)| text).collect()
}

/// First link captured by `re`, resolved against `base`.
pub(crate) fn first_link(html: &str, re: &Regex, base: &str) -> Option<String> {
    re.captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| decode_entities(m.as_str().trim())))
        .find_map(|href| resolve(&href, base))
}

fn resolve(href: &str, base: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if let Some(rest) = href.strip_prefix("//") {
        Some(format!("https://{rest}"))
    } else if href.starts_with('/') {
        Some(format!("{}{href}", base.trim_end_matches('/')))
    } else {
        None
    }
}
