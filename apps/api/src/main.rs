mod config;
mod errors;
mod intelligence;
mod llm_client;
mod models;
mod pipeline;
mod providers;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::intelligence::LlmJobIntelligence;
use crate::llm_client::LlmClient;
use crate::pipeline::JobSearchPipeline;
use crate::providers::page_fetch::{HttpPageFetcher, MAX_BODY_BYTES};
use crate::providers::web_search::PseSearchClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM-backed job intelligence
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let intelligence = Arc::new(LlmJobIntelligence(llm));

    // Initialize web search and page fetching
    let search = Arc::new(
        PseSearchClient::new(
            config.pse_api_key.clone(),
            config.pse_engine_id.clone(),
            config.http_timeout(),
        )
        .context("Failed to build search client")?,
    );
    let fetcher = Arc::new(
        HttpPageFetcher::new(config.http_timeout(), MAX_BODY_BYTES)
            .context("Failed to build page fetcher")?,
    );

    let pipeline_config = config.pipeline_config();
    info!(
        "Pipeline limits: concurrency={} extract={} score={} results={}",
        pipeline_config.max_concurrent_requests,
        pipeline_config.max_pages_to_extract,
        pipeline_config.max_jobs_to_score,
        pipeline_config.max_results
    );
    let pipeline = JobSearchPipeline::new(intelligence, search, fetcher, pipeline_config);

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict allowed origins once the frontend host is fixed
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
