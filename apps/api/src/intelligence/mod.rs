//! Job Intelligence — the text-generation capability the pipeline depends on.
//!
//! The pipeline only sees the `JobIntelligence` trait, held as
//! `Arc<dyn JobIntelligence>`. `LlmJobIntelligence` implements it on top of the
//! shared `LlmClient`; tests plug in in-memory fakes.

pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::CapabilityError;
use crate::llm_client::{prompts::JSON_ONLY_SYSTEM, LlmClient};
use crate::models::job::JobPosting;
use crate::models::profile::CandidateProfile;

/// Longest HTML excerpt (in characters) sent for extraction.
pub const MAX_EXTRACT_HTML_CHARS: usize = 50_000;

const NOT_A_JOB_POSTING: &str = "not_a_job_posting";

// ────────────────────────────────────────────────────────────────────────────
// Capability contract
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of asking the capability to read one page.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedJob {
    Posting(JobPosting),
    NotAJobPosting,
}

/// Raw match verdict. The score is unclamped; see [`MatchScore::clamped`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatchScore {
    #[serde(rename = "match_score", default)]
    pub score: f64,
    #[serde(rename = "match_reason", default)]
    pub reason: String,
}

impl MatchScore {
    pub fn clamped(&self) -> u8 {
        if self.score.is_nan() {
            return 0;
        }
        self.score.round().clamp(0.0, 100.0) as u8
    }
}

#[async_trait]
pub trait JobIntelligence: Send + Sync {
    async fn parse_profile_from_text(
        &self,
        cv_text: &str,
    ) -> Result<CandidateProfile, CapabilityError>;

    async fn parse_profile_from_document(
        &self,
        pdf: &[u8],
        filename: &str,
    ) -> Result<CandidateProfile, CapabilityError>;

    async fn refine_profile(
        &self,
        profile: &CandidateProfile,
        query: &str,
    ) -> Result<CandidateProfile, CapabilityError>;

    async fn derive_profile(&self, query: &str) -> Result<CandidateProfile, CapabilityError>;

    async fn extract_job(&self, html: &str, url: &str) -> Result<ExtractedJob, CapabilityError>;

    async fn score_match(
        &self,
        profile: &CandidateProfile,
        job: &JobPosting,
    ) -> Result<MatchScore, CapabilityError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmJobIntelligence — Claude-backed implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmJobIntelligence(pub LlmClient);

#[async_trait]
impl JobIntelligence for LlmJobIntelligence {
    async fn parse_profile_from_text(
        &self,
        cv_text: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        let prompt = prompts::parse_cv_text_prompt(cv_text);
        Ok(self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?)
    }

    async fn parse_profile_from_document(
        &self,
        pdf: &[u8],
        filename: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        debug!("Parsing CV document {filename} ({} bytes)", pdf.len());
        let prompt = prompts::parse_cv_document_prompt();
        Ok(self
            .0
            .call_json_with_pdf(pdf, &prompt, JSON_ONLY_SYSTEM)
            .await?)
    }

    async fn refine_profile(
        &self,
        profile: &CandidateProfile,
        query: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        let profile_json = to_json(profile)?;
        let prompt = prompts::refine_profile_prompt(&profile_json, query);
        Ok(self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?)
    }

    async fn derive_profile(&self, query: &str) -> Result<CandidateProfile, CapabilityError> {
        let prompt = prompts::derive_profile_prompt(query);
        Ok(self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?)
    }

    async fn extract_job(&self, html: &str, url: &str) -> Result<ExtractedJob, CapabilityError> {
        let prompt = prompts::extract_job_prompt(url, truncate_chars(html, MAX_EXTRACT_HTML_CHARS));
        let value: serde_json::Value = self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        interpret_extraction(value)
    }

    async fn score_match(
        &self,
        profile: &CandidateProfile,
        job: &JobPosting,
    ) -> Result<MatchScore, CapabilityError> {
        let prompt = prompts::score_match_prompt(&to_json(profile)?, &to_json(job)?);
        Ok(self.0.call_json(&prompt, JSON_ONLY_SYSTEM).await?)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CapabilityError> {
    serde_json::to_string(value).map_err(|e| CapabilityError::Parse(e.to_string()))
}

/// Maps the model's JSON to a posting, honouring the not-a-job sentinel.
fn interpret_extraction(value: serde_json::Value) -> Result<ExtractedJob, CapabilityError> {
    if value.get("error").and_then(|e| e.as_str()) == Some(NOT_A_JOB_POSTING) {
        return Ok(ExtractedJob::NotAJobPosting);
    }
    if !value.is_object() {
        return Err(CapabilityError::Parse(
            "expected a JSON object for the job posting".to_string(),
        ));
    }
    let posting: JobPosting =
        serde_json::from_value(value).map_err(|e| CapabilityError::Parse(e.to_string()))?;
    Ok(ExtractedJob::Posting(posting))
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
