//! Web context assembly.
//!
//! Orchestrates probe → search → parse → fetch into a single bounded
//! block of text for the prompt assembler. The builder never returns an
//! error: connectivity problems and empty searches degrade into advisory
//! strings the caller can surface, and only an undecodable search page
//! yields nothing at all.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::fetch::truncate_chars;
use crate::policy::budget_for;
use crate::results::parse_results;

/// Outcome of a context build, consumed by the turn controller.
#[derive(Debug, Clone, PartialEq)]
pub enum WebContext {
    /// Assembled source blocks, ready to prepend to a prompt.
    Block {
        text: String,
        /// How many sources made it into the block.
        source_count: usize,
    },
    /// Nothing retrievable; a user-facing explanation instead.
    Advisory(String),
}

/// Raw outcome of one search-page request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPage {
    Html(String),
    /// Non-2xx response from the engine.
    Rejected(u16),
    /// Body could not be decoded as text.
    Undecodable,
    /// Transport-level failure.
    Unreachable,
}

/// Network seam for the builder. The production implementation is
/// [`crate::fetch::HttpTransport`]; tests script this directly.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Whether the network is reachable at all. Any HTTP response counts.
    async fn probe(&self) -> bool;

    /// Request the engine's results page for a query.
    async fn search_page(&self, query: &str) -> SearchPage;

    /// Fetch one result page as capped plain text. `None` on any failure.
    async fn page_text(&self, url: &Url) -> Option<String>;
}

/// Builds a [`WebContext`] for a query.
pub struct WebContextBuilder {
    transport: Arc<dyn SearchTransport>,
}

impl WebContextBuilder {
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }

    /// Run the full pipeline for one query.
    ///
    /// Returns `None` only when the engine's body could not be decoded;
    /// every other failure mode becomes an [`WebContext::Advisory`].
    pub async fn build(&self, query: &str) -> Option<WebContext> {
        if !self.transport.probe().await {
            return Some(WebContext::Advisory(
                "Cannot reach the network. Check your connection.".to_string(),
            ));
        }

        let budget = budget_for(query);
        debug!(
            query,
            sources = budget.source_count,
            per_source = budget.per_source_char_cap,
            "Planned retrieval budget"
        );

        let html = match self.transport.search_page(query).await {
            SearchPage::Html(html) => html,
            SearchPage::Rejected(status) => {
                return Some(WebContext::Advisory(format!(
                    "The search engine rejected the request (status {status})."
                )));
            }
            SearchPage::Undecodable | SearchPage::Unreachable => return None,
        };

        let results = parse_results(&html);
        if results.is_empty() {
            return Some(WebContext::Advisory(
                "The search found no valid results.".to_string(),
            ));
        }

        let mut blocks: Vec<String> = Vec::new();
        let mut total_chars = 0usize;
        for (index, result) in results.iter().take(budget.source_count).enumerate() {
            let Some(text) = self.transport.page_text(&result.url).await else {
                debug!(url = %result.url, "Source yielded no content");
                continue;
            };
            let text = truncate_chars(&text, budget.per_source_char_cap);
            let block = format!("SOURCE {}: {}\n\n{}", index + 1, result.title, text);

            // An overflowing source is skipped whole, never trimmed to fit
            let block_chars = block.chars().count();
            if total_chars + block_chars >= budget.total_char_cap {
                break;
            }
            total_chars += block_chars;
            blocks.push(block);
        }

        if blocks.is_empty() {
            return Some(WebContext::Advisory(format!(
                "Found {} results but could not retrieve their content.",
                results.len()
            )));
        }

        let source_count = blocks.len();
        info!(query, source_count, total_chars, "Assembled web context");
        let text = format!(
            "WEB FINDINGS FOR: {query}\n\nSynthesize the {source_count} source(s) below into one coherent answer.\n\n{}",
            blocks.join("\n\n")
        );
        Some(WebContext::Block { text, source_count })
    }
}
