use std::sync::Arc;

use crate::pipeline::JobSearchPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Search-and-rank pipeline. Capabilities are swapped at construction time.
    pub pipeline: Arc<JobSearchPipeline>,
}
