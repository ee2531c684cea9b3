//! Search-engine results-page parsing.
//!
//! The engine's HTML results page marks organic result links with a
//! `result__a` anchor class and often wraps destinations in a redirect
//! path carrying the real URL in a `uddg=` query parameter. This module
//! turns that page into an ordered list of `(title, url)` pairs, silently
//! dropping anything malformed — bad entries are expected noise, not
//! errors.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::html::extract_text;

/// One parsed search result, valid only within a single context build.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: Url,
}

static RESULT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*class="result__a"[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#)
        .expect("result link regex is valid")
});

/// Parse a results page into ordered `(title, url)` pairs.
///
/// Order is preserved (first result first); duplicates keep their first
/// occurrence; entries that resolve to no valid http(s) URL are dropped.
pub fn parse_results(html: &str) -> Vec<SearchResult> {
    let mut items = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for captures in RESULT_LINK_RE.captures_iter(html) {
        let (Some(href), Some(title_html)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let title = extract_text(title_html.as_str());

        let Some(url) = normalize_href(href.as_str()) else {
            debug!(href = href.as_str(), "Dropping unparseable result link");
            continue;
        };
        if seen.insert(url.as_str().to_string()) {
            items.push(SearchResult { title, url });
        }
    }

    debug!(count = items.len(), "Parsed search results");
    items
}

/// Resolve a raw result href into its real destination URL.
///
/// Normalization order: decode `&amp;`; protocol-relative `//` hrefs get
/// an `https:` prefix; redirect hrefs carrying a `uddg=` parameter yield
/// the percent-decoded inner URL; anything else is accepted directly only
/// with an http(s) scheme.
fn normalize_href(raw: &str) -> Option<Url> {
    let mut href = raw.replace("&amp;", "&");

    if href.starts_with("//") {
        href = format!("https:{href}");
    }

    if let Some(start) = href.find("uddg=") {
        let inner = &href[start + "uddg=".len()..];
        let inner = match inner.find('&') {
            Some(end) => &inner[..end],
            None => inner,
        };
        let decoded = percent_decode_str(inner).decode_utf8().ok()?;
        return parse_http_url(&decoded);
    }

    parse_http_url(&href)
}

fn parse_http_url(s: &str) -> Option<Url> {
    let url = Url::parse(s).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
