//! Page retrieval capability and its reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    redirect, Client,
};
use tracing::debug;

use crate::errors::CapabilityError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

pub const MAX_REDIRECTS: usize = 5;
/// Bodies beyond this many bytes are truncated, not rejected.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    pub status: u16,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError>;
}

#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, CapabilityError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, CapabilityError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CapabilityError::Status {
                status: status.as_u16(),
                message: format!("page returned status {}", status.as_u16()),
            });
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                debug!("Truncated {url} at {} bytes", self.max_body_bytes);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedPage {
            html: String::from_utf8_lossy(&body).into_owned(),
            status: status.as_u16(),
        })
    }
}
