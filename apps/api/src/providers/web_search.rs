//! Web search capability and its Google Programmable Search Engine adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::CapabilityError;
use crate::models::run::SearchHit;

const PSE_API_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// One page of one scoped query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Site restriction appended to the query, e.g. `site:glints.com/opportunities`.
    pub scope: String,
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
    pub date_restrict: Option<String>,
}

impl SearchRequest {
    pub fn scoped_query(&self) -> String {
        if self.scope.trim().is_empty() {
            self.query.clone()
        } else {
            format!("{} {}", self.query, self.scope)
        }
    }

    /// 1-based offset of the first result on this page.
    pub fn start(&self) -> usize {
        self.page * self.page_size + 1
    }
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, CapabilityError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Programmable Search Engine (Custom Search JSON API)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PseResponse {
    #[serde(default)]
    items: Vec<PseItem>,
}

#[derive(Debug, Deserialize)]
struct PseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Clone)]
pub struct PseSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    api_url: String,
}

impl PseSearchClient {
    pub fn new(api_key: String, engine_id: String, timeout: Duration) -> Result<Self, CapabilityError> {
        Self::with_api_url(api_key, engine_id, timeout, PSE_API_URL.to_string())
    }

    pub fn with_api_url(
        api_key: String,
        engine_id: String,
        timeout: Duration,
        api_url: String,
    ) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            engine_id,
            api_url,
        })
    }
}

#[async_trait]
impl WebSearch for PseSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, CapabilityError> {
        let mut params = vec![
            ("key", self.api_key.clone()),
            ("cx", self.engine_id.clone()),
            ("q", request.scoped_query()),
            ("num", request.page_size.to_string()),
            ("start", request.start().to_string()),
        ];
        if let Some(restrict) = &request.date_restrict {
            params.push(("dateRestrict", restrict.clone()));
        }

        let response = self.client.get(&self.api_url).query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: PseResponse = response.json().await?;
        debug!(
            "PSE returned {} items for '{}' (start {})",
            body.items.len(),
            request.scoped_query(),
            request.start()
        );

        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit {
                title: item.title,
                url: item.link,
                snippet: item.snippet,
            })
            .collect())
    }
}
