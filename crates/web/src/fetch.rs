//! Page fetching with timeouts, caps, and soft failure.
//!
//! Every network failure here — timeout, non-2xx status, undecodable
//! body — yields "no content" rather than an error. A page that cannot be
//! retrieved must never abort the turn that asked for it.

use async_trait::async_trait;
use chatweave_config::WebConfig;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::context::{SearchPage, SearchTransport};
use crate::html::extract_text;

/// Fetches one page and distills it to capped plain text.
#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    user_agent: String,
    timeout: Duration,
    char_cap: usize,
}

impl PageFetcher {
    pub fn new(config: &WebConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.page_timeout_secs),
            char_cap: config.page_char_cap,
        }
    }

    /// GET a page and return its extracted text, truncated to the cap.
    ///
    /// Returns `None` on any network error, non-2xx status, or
    /// undecodable body.
    pub async fn fetch_page_text(&self, url: &Url) -> Option<String> {
        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "Page fetch rejected");
            return None;
        }

        let bytes = response.bytes().await.ok()?;
        let html = decode_body(&bytes)?;
        let text = extract_text(&html);
        Some(truncate_chars(&text, self.char_cap))
    }
}

/// HTTP implementation of [`SearchTransport`], used outside tests.
#[derive(Clone)]
pub struct HttpTransport {
    fetcher: PageFetcher,
    client: reqwest::Client,
    search_endpoint: String,
    search_user_agent: String,
    search_timeout: Duration,
    probe_url: String,
    probe_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &WebConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");
        Self {
            fetcher: PageFetcher::new(config),
            client,
            search_endpoint: config.search_endpoint.clone(),
            search_user_agent: config.search_user_agent.clone(),
            search_timeout: Duration::from_secs(config.search_timeout_secs),
            probe_url: config.probe_url.clone(),
            probe_timeout: Duration::from_secs(config.page_timeout_secs),
        }
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    /// Any HTTP response at all counts as reachable; only transport
    /// errors mean the network is down.
    async fn probe(&self) -> bool {
        self.client
            .get(&self.probe_url)
            .timeout(self.probe_timeout)
            .send()
            .await
            .is_ok()
    }

    async fn search_page(&self, query: &str) -> SearchPage {
        let mut url = match Url::parse(&self.search_endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!(endpoint = %self.search_endpoint, error = %e, "Bad search endpoint");
                return SearchPage::Unreachable;
            }
        };
        url.query_pairs_mut().append_pair("q", query);

        let response = match self
            .client
            .get(url)
            .header(USER_AGENT, &self.search_user_agent)
            .timeout(self.search_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Search request failed");
                return SearchPage::Unreachable;
            }
        };

        let status = response.status();
        if !status.is_success() {
            return SearchPage::Rejected(status.as_u16());
        }

        let Ok(bytes) = response.bytes().await else {
            return SearchPage::Undecodable;
        };
        match decode_body(&bytes) {
            Some(html) => SearchPage::Html(html),
            None => SearchPage::Undecodable,
        }
    }

    async fn page_text(&self, url: &Url) -> Option<String> {
        self.fetcher.fetch_page_text(url).await
    }
}

/// Decode a body as UTF-8, falling back to Latin-1.
fn decode_body(bytes: &[u8]) -> Option<String> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s.to_string()),
        Err(_) => Some(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Truncate to at most `cap` characters (not bytes).
pub(crate) fn truncate_chars(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        s.to_string()
    } else {
        s.chars().take(cap).collect()
    }
}

/// Find the first explicit http(s) URL embedded in free text.
///
/// Used by the turn controller to bypass search when the user already
/// named a page.
pub fn find_first_url(text: &str) -> Option<Url> {
    for token in text.split_whitespace() {
        if token.starts_with("http://") || token.starts_with("https://") {
            let trimmed = token.trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
            if let Ok(url) = Url::parse(trimmed) {
                return Some(url);
            }
        }
    }
    None
}
