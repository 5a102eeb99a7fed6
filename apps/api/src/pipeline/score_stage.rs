//! Posting-vs-profile scoring. A failed score degrades to a neutral default.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, warn};

use crate::intelligence::JobIntelligence;
use crate::models::job::{JobPosting, RankedJob};
use crate::models::profile::CandidateProfile;
use crate::pipeline::pool::{run_bounded, with_deadline};

pub const FALLBACK_SCORE: u8 = 50;
pub const FALLBACK_REASON: &str = "Unable to calculate match score";

/// Scores the first `max_jobs` postings. Every attempted posting comes back ranked.
pub async fn score_jobs(
    intelligence: Arc<dyn JobIntelligence>,
    profile: Arc<CandidateProfile>,
    jobs: Vec<JobPosting>,
    max_jobs: usize,
    limit: usize,
    deadline: Option<Instant>,
) -> Vec<RankedJob> {
    let jobs: Vec<JobPosting> = jobs.into_iter().take(max_jobs).collect();
    info!("Scoring {} jobs", jobs.len());

    run_bounded(jobs, limit, |job: JobPosting| {
        let intelligence = Arc::clone(&intelligence);
        let profile = Arc::clone(&profile);
        async move {
            let verdict = with_deadline(deadline, intelligence.score_match(&profile, &job)).await;
            match verdict {
                Ok(verdict) => RankedJob {
                    match_score: verdict.clamped(),
                    match_reason: verdict.reason,
                    job,
                },
                Err(e) => {
                    warn!("Scoring failed for {}: {e}", job.url);
                    RankedJob {
                        job,
                        match_score: FALLBACK_SCORE,
                        match_reason: FALLBACK_REASON.to_string(),
                    }
                }
            }
        }
    })
    .await
}
