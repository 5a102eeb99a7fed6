//! Concurrent page retrieval.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::models::run::FetchOutcome;
use crate::pipeline::pool::{run_bounded, with_deadline};
use crate::providers::page_fetch::PageFetcher;
use crate::providers::sanitize::sanitize_html;

/// Fetches every URL with at most `limit` requests in flight.
///
/// Returns one outcome per URL in completion order. Successful bodies are sanitized.
pub async fn fetch_pages(
    fetcher: Arc<dyn PageFetcher>,
    urls: Vec<String>,
    limit: usize,
    deadline: Option<Instant>,
) -> Vec<FetchOutcome> {
    info!("Fetching {} pages (concurrency {limit})", urls.len());

    run_bounded(urls, limit, |url: String| {
        let fetcher = Arc::clone(&fetcher);
        async move {
            let fetched = with_deadline(deadline, fetcher.fetch(&url)).await;
            match fetched {
                Ok(page) => {
                    debug!("Fetched {url} (status {}, {} bytes)", page.status, page.html.len());
                    FetchOutcome::ok(url, sanitize_html(&page.html))
                }
                Err(e) => {
                    debug!("Fetch failed for {url}: {e}");
                    FetchOutcome::failed(url, e)
                }
            }
        }
    })
    .await
}
