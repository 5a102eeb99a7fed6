use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Failure of one call to an external capability (LLM, search provider, page fetch).
/// Always local to a unit of work; the pipeline decides whether it is fatal.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not parse capability response: {0}")]
    Parse(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Errors that abort a search run. Everything else degrades in place.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to build candidate profile: {0}")]
    ProfileBuildFailed(#[source] CapabilityError),

    #[error("web search failed: {0}")]
    SearchProviderFailed(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(PipelineError::ProfileBuildFailed(e)) => {
                tracing::error!("Profile build failed: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PROFILE_BUILD_FAILED",
                    format!("Could not read the provided CV: {e}"),
                )
            }
            AppError::Pipeline(PipelineError::SearchProviderFailed(msg)) => {
                tracing::error!("Search provider failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SEARCH_PROVIDER_FAILED",
                    format!("Job search failed: {msg}"),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("missing input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_fatal_pipeline_errors_map_to_bad_gateway() {
        let search = AppError::from(PipelineError::SearchProviderFailed("down".to_string()));
        assert_eq!(search.into_response().status(), StatusCode::BAD_GATEWAY);

        let profile = AppError::from(PipelineError::ProfileBuildFailed(
            CapabilityError::DeadlineExceeded,
        ));
        assert_eq!(profile.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_profile_build_failed_message_includes_cause() {
        let err = PipelineError::ProfileBuildFailed(CapabilityError::Parse("bad json".to_string()));
        assert!(err.to_string().contains("bad json"));
    }
}
