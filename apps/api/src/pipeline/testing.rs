//! In-memory capability fakes for pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::CapabilityError;
use crate::intelligence::{ExtractedJob, JobIntelligence, MatchScore};
use crate::models::job::JobPosting;
use crate::models::profile::CandidateProfile;
use crate::models::run::SearchHit;
use crate::providers::page_fetch::{FetchedPage, PageFetcher};
use crate::providers::web_search::{SearchRequest, WebSearch};

/// Tracks how many calls are running at once and the highest value seen.
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

async fn pause(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => tokio::task::yield_now().await,
    }
}

fn fake_failure(what: &str) -> CapabilityError {
    CapabilityError::Parse(format!("fake {what} failure"))
}

// ────────────────────────────────────────────────────────────────────────────
// Intelligence
// ────────────────────────────────────────────────────────────────────────────

/// What the fake reports for a crawled page.
#[derive(Debug, Clone)]
pub enum FakePage {
    Job(&'static str),
    Untitled,
    NotAJob,
    Fail,
}

/// `None` for a profile source, or a missing score, means the call fails.
#[derive(Default)]
pub struct FakeIntelligence {
    pub cv_profile: Option<CandidateProfile>,
    pub refined: Option<CandidateProfile>,
    pub derived: Option<CandidateProfile>,
    /// Keyed by page URL. Missing pages are not job postings.
    pub pages: HashMap<String, FakePage>,
    /// Keyed by posting URL.
    pub scores: HashMap<String, f64>,
    pub delay: Option<Duration>,
    pub extract_in_flight: InFlight,
    pub score_in_flight: InFlight,
    pub calls: Mutex<Vec<String>>,
}

impl FakeIntelligence {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn extracted_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("extract:").map(String::from))
            .collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn profile_or_fail(
        &self,
        profile: &Option<CandidateProfile>,
        what: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        profile.clone().ok_or_else(|| fake_failure(what))
    }
}

#[async_trait]
impl JobIntelligence for FakeIntelligence {
    async fn parse_profile_from_text(
        &self,
        _cv_text: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        self.record("parse_text");
        pause(self.delay).await;
        self.profile_or_fail(&self.cv_profile, "parse")
    }

    async fn parse_profile_from_document(
        &self,
        _pdf: &[u8],
        _filename: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        self.record("parse_document");
        pause(self.delay).await;
        self.profile_or_fail(&self.cv_profile, "parse")
    }

    async fn refine_profile(
        &self,
        _profile: &CandidateProfile,
        _query: &str,
    ) -> Result<CandidateProfile, CapabilityError> {
        self.record("refine");
        self.profile_or_fail(&self.refined, "refine")
    }

    async fn derive_profile(&self, _query: &str) -> Result<CandidateProfile, CapabilityError> {
        self.record("derive");
        self.profile_or_fail(&self.derived, "derive")
    }

    async fn extract_job(&self, _html: &str, url: &str) -> Result<ExtractedJob, CapabilityError> {
        self.record(format!("extract:{url}"));
        self.extract_in_flight.enter();
        pause(self.delay).await;
        self.extract_in_flight.leave();

        match self.pages.get(url).cloned().unwrap_or(FakePage::NotAJob) {
            FakePage::Job(title) => Ok(ExtractedJob::Posting(JobPosting {
                title: title.to_string(),
                company: "Acme".to_string(),
                url: "https://model-invented.example/".to_string(),
                source: "model".to_string(),
                ..Default::default()
            })),
            FakePage::Untitled => Ok(ExtractedJob::Posting(JobPosting::default())),
            FakePage::NotAJob => Ok(ExtractedJob::NotAJobPosting),
            FakePage::Fail => Err(fake_failure("extract")),
        }
    }

    async fn score_match(
        &self,
        _profile: &CandidateProfile,
        job: &JobPosting,
    ) -> Result<MatchScore, CapabilityError> {
        self.record(format!("score:{}", job.url));
        self.score_in_flight.enter();
        pause(self.delay).await;
        self.score_in_flight.leave();

        self.scores
            .get(&job.url)
            .map(|score| MatchScore {
                score: *score,
                reason: format!("scored {score}"),
            })
            .ok_or_else(|| fake_failure("score"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Search
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSearch {
    /// Keyed by (scope, zero-based page). Missing pages are empty.
    pub pages: HashMap<(String, usize), Vec<SearchHit>>,
    pub failing_scopes: HashSet<String>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl FakeSearch {
    pub fn with_page(mut self, scope: &str, page: usize, urls: &[&str]) -> Self {
        self.pages
            .insert((scope.to_string(), page), urls.iter().map(|u| hit(u)).collect());
        self
    }

    pub fn failing(mut self, scope: &str) -> Self {
        self.failing_scopes.insert(scope.to_string());
        self
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, CapabilityError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing_scopes.contains(&request.scope) {
            return Err(CapabilityError::Status {
                status: 503,
                message: "fake search outage".to_string(),
            });
        }
        Ok(self
            .pages
            .get(&(request.scope.clone(), request.page))
            .cloned()
            .unwrap_or_default())
    }
}

pub fn hit(url: &str) -> SearchHit {
    SearchHit {
        title: format!("Result for {url}"),
        url: url.to_string(),
        snippet: String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fetch
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeFetcher {
    /// URL → raw HTML. Missing URLs answer 404.
    pub pages: HashMap<String, String>,
    pub delay: Option<Duration>,
    pub in_flight: InFlight,
}

impl FakeFetcher {
    pub fn serving(urls: &[&str]) -> Self {
        Self {
            pages: urls
                .iter()
                .map(|u| (u.to_string(), format!("<h1>{u}</h1>")))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        self.in_flight.enter();
        pause(self.delay).await;
        self.in_flight.leave();

        match self.pages.get(url) {
            Some(html) => Ok(FetchedPage {
                html: html.clone(),
                status: 200,
            }),
            None => Err(CapabilityError::Status {
                status: 404,
                message: "page returned status 404".to_string(),
            }),
        }
    }
}
