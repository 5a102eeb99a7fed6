//! Outbound adapters for web search and page retrieval.
//!
//! Both are capability traits (`WebSearch`, `PageFetcher`) so the pipeline can be
//! driven by in-memory fakes in tests.

pub mod page_fetch;
pub mod sanitize;
pub mod web_search;
