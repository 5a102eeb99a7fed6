//! Structured posting extraction from fetched pages.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::CapabilityError;
use crate::intelligence::{ExtractedJob, JobIntelligence};
use crate::models::job::JobPosting;
use crate::models::run::FetchOutcome;
use crate::pipeline::pool::{run_bounded, with_deadline};

pub const POSTING_SOURCE: &str = "web";

#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub jobs: Vec<JobPosting>,
    /// Pages whose extraction call failed.
    pub errors: usize,
}

/// Extracts postings from the first `max_pages` eligible outcomes, in the given order.
pub async fn extract_jobs(
    intelligence: Arc<dyn JobIntelligence>,
    outcomes: Vec<FetchOutcome>,
    max_pages: usize,
    limit: usize,
    deadline: Option<Instant>,
) -> ExtractionReport {
    let eligible: Vec<FetchOutcome> = outcomes
        .into_iter()
        .filter(FetchOutcome::is_extractable)
        .take(max_pages)
        .collect();
    info!("Extracting jobs from {} pages", eligible.len());

    let results = run_bounded(eligible, limit, |page: FetchOutcome| {
        let intelligence = Arc::clone(&intelligence);
        async move {
            let extracted = with_deadline(deadline, intelligence.extract_job(&page.html, &page.url)).await;
            accept(extracted, page.url)
        }
    })
    .await;

    let mut report = ExtractionReport::default();
    for result in results {
        match result {
            Ok(Some(job)) => report.jobs.push(job),
            Ok(None) => {}
            Err(_) => report.errors += 1,
        }
    }
    info!(
        "Extracted {} jobs ({} extraction errors)",
        report.jobs.len(),
        report.errors
    );
    report
}

/// Keeps titled postings, pinned to the crawled URL.
fn accept(
    extracted: Result<ExtractedJob, CapabilityError>,
    url: String,
) -> Result<Option<JobPosting>, CapabilityError> {
    match extracted {
        Ok(ExtractedJob::Posting(mut job)) if !job.title.trim().is_empty() => {
            job.url = url;
            job.source = POSTING_SOURCE.to_string();
            Ok(Some(job))
        }
        Ok(ExtractedJob::Posting(_)) => {
            debug!("Discarding untitled posting from {url}");
            Ok(None)
        }
        Ok(ExtractedJob::NotAJobPosting) => {
            debug!("{url} is not a job posting");
            Ok(None)
        }
        Err(e) => {
            warn!("Extraction failed for {url}: {e}");
            Err(e)
        }
    }
}
