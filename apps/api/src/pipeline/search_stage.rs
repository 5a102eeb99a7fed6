//! Scoped, paginated web search that yields a deduplicated list of job detail URLs.

use std::collections::HashSet;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::PipelineError;
use crate::models::profile::{CandidateProfile, SearchFilter};
use crate::models::run::SearchHit;
use crate::pipeline::pool::with_deadline;
use crate::pipeline::query_planner::{first_non_empty, remote_hint};
use crate::pipeline::PipelineConfig;
use crate::providers::web_search::{SearchRequest, WebSearch};

/// Site restrictions searched in order, one query per scope.
pub const DEFAULT_SEARCH_SCOPES: &[&str] = &[
    "site:linkedin.com/jobs/view",
    "site:jobstreet.com",
    "site:jobstreet.co.id",
    "site:dealls.com/loker",
    "site:glints.com/opportunities",
    "site:kalibrr.com/c",
    "site:id.indeed.com",
];

/// Runs every scope and returns hits in discovery order, unique by URL.
///
/// A failing scope is skipped from the failing page onward. Only when every
/// scope fails on its first page is the run aborted.
pub async fn search_jobs(
    search: &dyn WebSearch,
    profile: &CandidateProfile,
    base_query: &str,
    filter: &SearchFilter,
    config: &PipelineConfig,
    deadline: Option<Instant>,
) -> Result<Vec<SearchHit>, PipelineError> {
    let query = compose_query(base_query, profile);
    let date_restrict = filter.date_restrict().map(String::from);
    info!("Searching {} scopes for '{query}'", config.search_scopes.len());

    let mut seen: HashSet<String> = HashSet::new();
    let mut hits: Vec<SearchHit> = Vec::new();
    let mut scopes_down = 0;
    let mut last_error = String::new();

    for scope in &config.search_scopes {
        for page in 0..config.search_max_pages {
            let request = SearchRequest {
                query: query.clone(),
                scope: scope.clone(),
                page,
                page_size: config.search_page_size,
                date_restrict: date_restrict.clone(),
            };

            let page_hits = match with_deadline(deadline, search.search(&request)).await {
                Ok(page_hits) => page_hits,
                Err(e) => {
                    warn!("Search failed for {scope} (page {}): {e}", page + 1);
                    if page == 0 {
                        scopes_down += 1;
                        last_error = e.to_string();
                    }
                    break;
                }
            };

            let returned = page_hits.len();
            for hit in page_hits {
                if hit.url.is_empty() {
                    continue;
                }
                if seen.insert(hit.url.clone()) && is_preferred_detail_url(&hit.url) {
                    hits.push(hit);
                }
            }
            debug!("{scope} page {}: {returned} results", page + 1);

            if returned < config.search_page_size {
                break;
            }
        }
    }

    if !config.search_scopes.is_empty() && scopes_down == config.search_scopes.len() {
        return Err(PipelineError::SearchProviderFailed(last_error));
    }

    info!("Found {} unique job URLs", hits.len());
    Ok(hits)
}

/// Appends "job", the first preferred location and the remote hint, skipping any already present.
pub fn compose_query(base_query: &str, profile: &CandidateProfile) -> String {
    let mut query = base_query.trim().to_string();

    let mut append = |term: &str| {
        if !query.to_lowercase().contains(&term.to_lowercase()) {
            if !query.is_empty() {
                query.push(' ');
            }
            query.push_str(term);
        }
    };

    append("job");
    if let Some(location) = first_non_empty(&profile.preferred_locations) {
        append(location);
    }
    if let Some(hint) = first_non_empty(&profile.preferred_remote_modes).and_then(remote_hint) {
        append(hint);
    }

    query
}

/// Keeps detail pages only for boards whose search results mix in listing pages.
///
/// JobStreet detail URLs carry `jobId`, Indeed detail URLs carry `vjk`.
/// Anything unparseable is kept.
pub fn is_preferred_detail_url(link: &str) -> bool {
    let Ok(url) = Url::parse(link) else {
        return true;
    };
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let has_param = |name: &str| url.query_pairs().any(|(key, _)| key == name);

    if host.contains("jobstreet") {
        has_param("jobId")
    } else if host.contains("indeed") {
        has_param("vjk")
    } else {
        true
    }
}
