//! Per-run input, intermediate records and output of a search run.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::job::RankedJob;
use super::profile::{CandidateProfile, SearchFilter};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// One result row returned by the web search provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Result of retrieving one URL. `error` is `None` on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub url: String,
    pub html: String,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn ok(url: String, html: String) -> Self {
        Self {
            url,
            html,
            error: None,
        }
    }

    pub fn failed(url: String, error: impl ToString) -> Self {
        Self {
            url,
            html: String::new(),
            error: Some(error.to_string()),
        }
    }

    /// Eligible for extraction: fetched without error and has content.
    pub fn is_extractable(&self) -> bool {
        self.error.is_none() && !self.html.trim().is_empty()
    }
}

/// Counters accumulated across the stages of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRunStats {
    pub urls_found: usize,
    /// Fetch outcomes, failed ones included.
    pub pages_fetched: usize,
    pub jobs_extracted: usize,
    pub jobs_scored: usize,
    pub jobs_returned: usize,
    pub fetch_errors: usize,
    pub extract_errors: usize,
}

/// An uploaded CV file, kept as raw bytes.
#[derive(Debug, Clone)]
pub struct CvFile {
    pub bytes: Bytes,
    pub filename: String,
}

impl CvFile {
    /// `.pdf` extension or `%PDF-` magic bytes.
    pub fn is_pdf(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf") || self.bytes.starts_with(PDF_MAGIC)
    }
}

/// Everything a caller supplies to start a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub cv_text: String,
    pub cv_file: Option<CvFile>,
    pub query: String,
    pub filter: SearchFilter,
}

impl PipelineInput {
    pub fn has_any_source(&self) -> bool {
        !self.cv_text.trim().is_empty()
            || self.cv_file.as_ref().is_some_and(|f| !f.bytes.is_empty())
            || !self.query.trim().is_empty()
    }

    /// The uploaded file, when it is a non-empty PDF.
    pub fn pdf(&self) -> Option<&CvFile> {
        self.cv_file
            .as_ref()
            .filter(|f| !f.bytes.is_empty() && f.is_pdf())
    }

    /// Explicit CV text, or a non-PDF upload that is valid UTF-8.
    pub fn effective_cv_text(&self) -> Option<&str> {
        let explicit = self.cv_text.trim();
        if !explicit.is_empty() {
            return Some(explicit);
        }
        self.cv_file
            .as_ref()
            .filter(|f| !f.is_pdf())
            .and_then(|f| std::str::from_utf8(&f.bytes).ok())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn query(&self) -> Option<&str> {
        let query = self.query.trim();
        (!query.is_empty()).then_some(query)
    }
}

/// What a completed run hands back to its caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutput {
    pub results: Vec<RankedJob>,
    pub profile: CandidateProfile,
    pub stats: SearchRunStats,
}
