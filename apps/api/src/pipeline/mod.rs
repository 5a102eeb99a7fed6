//! Search-and-rank pipeline.
//!
//! BuildProfile → PlanQuery → Search → Fetch → Extract → Score → Rank, strictly
//! forward. Fetch, extraction and scoring each fan out over a bounded worker pool
//! (`pool::run_bounded`) and join before the next stage starts. One optional
//! deadline bounds every outbound call of a run.

pub mod extract_stage;
pub mod fetch_stage;
pub mod pool;
pub mod profile_builder;
pub mod query_planner;
pub mod ranking;
pub mod score_stage;
pub mod search_stage;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::intelligence::JobIntelligence;
use crate::models::job::RankedJob;
use crate::models::profile::CandidateProfile;
use crate::models::run::{PipelineInput, SearchOutput, SearchRunStats};
use crate::providers::page_fetch::PageFetcher;
use crate::providers::web_search::WebSearch;

/// Per-run limits. Handed to the pipeline at construction time.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Outbound calls in flight per stage.
    pub max_concurrent_requests: usize,
    pub max_pages_to_extract: usize,
    pub max_jobs_to_score: usize,
    pub max_results: usize,
    pub min_match_score: u8,
    pub search_scopes: Vec<String>,
    pub search_max_pages: usize,
    pub search_page_size: usize,
    /// Deadline for a whole run. `None` means unbounded.
    pub run_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 5,
            max_pages_to_extract: 10,
            max_jobs_to_score: 30,
            max_results: 50,
            min_match_score: 50,
            search_scopes: search_stage::DEFAULT_SEARCH_SCOPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search_max_pages: 5,
            search_page_size: 10,
            run_timeout: None,
        }
    }
}

pub struct JobSearchPipeline {
    intelligence: Arc<dyn JobIntelligence>,
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn PageFetcher>,
    config: PipelineConfig,
}

impl JobSearchPipeline {
    pub fn new(
        intelligence: Arc<dyn JobIntelligence>,
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn PageFetcher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            intelligence,
            search,
            fetcher,
            config,
        }
    }

    /// Runs a search under the configured run timeout.
    pub async fn run_search(&self, input: PipelineInput) -> Result<SearchOutput, PipelineError> {
        let deadline = self.config.run_timeout.map(|timeout| Instant::now() + timeout);
        self.run_search_with_deadline(input, deadline).await
    }

    /// Runs a search bounded by a caller-supplied deadline.
    pub async fn run_search_with_deadline(
        &self,
        input: PipelineInput,
        deadline: Option<Instant>,
    ) -> Result<SearchOutput, PipelineError> {
        let run_id = Uuid::new_v4();
        self.execute(input, deadline)
            .instrument(info_span!("search_run", %run_id))
            .await
    }

    async fn execute(
        &self,
        input: PipelineInput,
        deadline: Option<Instant>,
    ) -> Result<SearchOutput, PipelineError> {
        let config = &self.config;
        let mut stats = SearchRunStats::default();

        let profile =
            profile_builder::build_profile(self.intelligence.as_ref(), &input, deadline).await?;

        let query = query_planner::effective_query(input.query(), &profile);
        let hits = search_stage::search_jobs(
            self.search.as_ref(),
            &profile,
            &query,
            &input.filter,
            config,
            deadline,
        )
        .await?;
        stats.urls_found = hits.len();
        if hits.is_empty() {
            info!("No job URLs found, finishing early");
            return Ok(finish(Vec::new(), profile, stats));
        }

        let urls = hits.into_iter().map(|hit| hit.url).collect();
        let outcomes = fetch_stage::fetch_pages(
            Arc::clone(&self.fetcher),
            urls,
            config.max_concurrent_requests,
            deadline,
        )
        .await;
        stats.pages_fetched = outcomes.len();
        stats.fetch_errors = outcomes.iter().filter(|o| o.error.is_some()).count();

        let extraction = extract_stage::extract_jobs(
            Arc::clone(&self.intelligence),
            outcomes,
            config.max_pages_to_extract,
            config.max_concurrent_requests,
            deadline,
        )
        .await;
        stats.jobs_extracted = extraction.jobs.len();
        stats.extract_errors = extraction.errors;
        if extraction.jobs.is_empty() {
            info!("No job postings extracted, finishing early");
            return Ok(finish(Vec::new(), profile, stats));
        }

        let profile = Arc::new(profile);
        let scored = score_stage::score_jobs(
            Arc::clone(&self.intelligence),
            Arc::clone(&profile),
            extraction.jobs,
            config.max_jobs_to_score,
            config.max_concurrent_requests,
            deadline,
        )
        .await;
        stats.jobs_scored = scored.len();

        let results = ranking::rank(scored, config.min_match_score, config.max_results);
        stats.jobs_returned = results.len();
        info!(
            urls_found = stats.urls_found,
            pages_fetched = stats.pages_fetched,
            jobs_extracted = stats.jobs_extracted,
            jobs_scored = stats.jobs_scored,
            jobs_returned = stats.jobs_returned,
            "Search run complete"
        );

        Ok(finish(results, Arc::unwrap_or_clone(profile), stats))
    }
}

fn finish(
    results: Vec<RankedJob>,
    profile: CandidateProfile,
    stats: SearchRunStats,
) -> SearchOutput {
    SearchOutput {
        results,
        profile,
        stats,
    }
}
