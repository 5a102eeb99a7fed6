use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::pipeline::PipelineConfig;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub pse_api_key: String,
    pub pse_engine_id: String,
    pub port: u16,
    pub rust_log: String,
    pub http_timeout_seconds: u64,
    pub max_job_results: usize,
    pub max_concurrent_requests: usize,
    pub max_pages_to_extract: usize,
    pub max_jobs_to_score: usize,
    pub search_max_pages: usize,
    /// 0 disables the per-run deadline.
    pub run_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            pse_api_key: require_env("PSE_API_KEY")?,
            pse_engine_id: require_env("PSE_ENGINE_ID")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            http_timeout_seconds: env_or("HTTP_TIMEOUT_SECONDS", 30)?,
            max_job_results: env_or("MAX_JOB_RESULTS", 50)?,
            max_concurrent_requests: env_or("MAX_CONCURRENT_REQUESTS", 5)?,
            max_pages_to_extract: env_or("MAX_PAGES_TO_EXTRACT", 10)?,
            max_jobs_to_score: env_or("MAX_JOBS_TO_SCORE", 30)?,
            search_max_pages: env_or("SEARCH_MAX_PAGES", 5)?,
            run_timeout_seconds: env_or("RUN_TIMEOUT_SECONDS", 120)?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Pipeline limits derived from this configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_concurrent_requests: self.max_concurrent_requests,
            max_pages_to_extract: self.max_pages_to_extract,
            max_jobs_to_score: self.max_jobs_to_score,
            max_results: self.max_job_results,
            search_max_pages: self.search_max_pages,
            run_timeout: (self.run_timeout_seconds > 0)
                .then(|| Duration::from_secs(self.run_timeout_seconds)),
            ..PipelineConfig::default()
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        _ => Ok(default),
    }
}
