//! # Chatweave Web
//!
//! The context-acquisition pipeline: decide how much of the web a query
//! needs, fetch it, and distill it into a single bounded context block for
//! the prompt assembler.
//!
//! Components, leaf-first:
//! - [`html`] — strip markup from untrusted pages into plain text
//! - [`results`] — parse a search-engine results page into `(title, url)` pairs
//! - [`policy`] — classify a query into a retrieval budget
//! - [`fetch`] — fetch one page with timeout and caps
//! - [`context`] — orchestrate the above into a [`context::WebContext`]
//!
//! Retrieval failures here are never fatal: they degrade into advisory
//! strings or silent drops, and the surrounding turn always completes.

pub mod context;
pub mod fetch;
pub mod html;
pub mod policy;
pub mod results;

pub use context::{SearchPage, SearchTransport, WebContext, WebContextBuilder};
pub use fetch::{HttpTransport, PageFetcher, find_first_url};
pub use policy::{ContextBudget, QueryIntent};
pub use results::SearchResult;
