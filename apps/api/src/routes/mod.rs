pub mod health;
pub mod search;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Body cap for the CV upload route (axum defaults to 2 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs/search", post(search::handle_search))
        .route(
            "/api/v1/jobs/search/upload",
            post(search::handle_search_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::models::profile::CandidateProfile;
    use crate::pipeline::testing::{FakeFetcher, FakeIntelligence, FakePage, FakeSearch};
    use crate::pipeline::{JobSearchPipeline, PipelineConfig};

    const SCOPE: &str = "site:jobs.example";
    const JOB_URL: &str = "https://jobs.example/1";

    fn router(intelligence: FakeIntelligence, search: FakeSearch) -> Router {
        let pipeline = JobSearchPipeline::new(
            Arc::new(intelligence),
            Arc::new(search),
            Arc::new(FakeFetcher::serving(&[JOB_URL])),
            PipelineConfig {
                search_scopes: vec![SCOPE.to_string()],
                ..Default::default()
            },
        );
        build_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(body: &str) -> Request<Body> {
        Request::post("/api/v1/jobs/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(FakeIntelligence::default(), FakeSearch::default());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "jobmatch-api");
    }

    #[tokio::test]
    async fn test_missing_inputs_is_validation_error() {
        let app = router(FakeIntelligence::default(), FakeSearch::default());
        let response = app.oneshot(json_request(r#"{"query": "  "}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_json_search_returns_ranked_results() {
        let intelligence = FakeIntelligence {
            derived: Some(CandidateProfile {
                title: "Rust Engineer".to_string(),
                ..Default::default()
            }),
            pages: [(JOB_URL.to_string(), FakePage::Job("Rust Engineer"))]
                .into_iter()
                .collect(),
            scores: [(JOB_URL.to_string(), 77.0)].into_iter().collect(),
            ..Default::default()
        };
        let search = FakeSearch::default().with_page(SCOPE, 0, &[JOB_URL]);
        let app = router(intelligence, search);

        let response = app
            .oneshot(json_request(r#"{"query": "rust engineer", "filters": {"locations": ["Jakarta"]}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_results"], 1);
        assert_eq!(body["results"][0]["url"], JOB_URL);
        assert_eq!(body["results"][0]["match_score"], 77);
        assert_eq!(body["profile"]["preferred_locations"][0], "Jakarta");
        assert_eq!(body["stats"]["urls_found"], 1);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_empty_search_carries_message() {
        let app = router(FakeIntelligence::default(), FakeSearch::default());
        let response = app
            .oneshot(json_request(r#"{"query": "astronaut"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total_results"], 0);
        assert_eq!(body["message"], search::NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_search_outage_is_bad_gateway() {
        let app = router(FakeIntelligence::default(), FakeSearch::default().failing(SCOPE));
        let response = app
            .oneshot(json_request(r#"{"query": "rust"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "SEARCH_PROVIDER_FAILED");
    }

    #[tokio::test]
    async fn test_multipart_upload_parses_fields() {
        let intelligence = FakeIntelligence {
            cv_profile: Some(CandidateProfile {
                title: "Data Engineer".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let app = router(intelligence, FakeSearch::default());

        let boundary = "XBOUNDARY";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"cv_file\"; filename=\"cv.txt\"\r\nContent-Type: text/plain\r\n\r\nJane Doe, data engineer\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"locations\"\r\n\r\nJakarta, Bandung\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"locations\"\r\n\r\nBali\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"remote_modes\"\r\n\r\nWFH\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = Request::post("/api/v1/jobs/search/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["profile"]["title"], "Data Engineer");
        assert_eq!(
            body["profile"]["preferred_locations"],
            serde_json::json!(["Jakarta", "Bandung", "Bali"])
        );
        assert_eq!(body["profile"]["preferred_remote_modes"][0], "WFH");
    }

    #[tokio::test]
    async fn test_upload_accepts_pdf_over_default_body_limit() {
        let intelligence = FakeIntelligence {
            cv_profile: Some(CandidateProfile {
                title: "Platform Engineer".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let app = router(intelligence, FakeSearch::default());

        let boundary = "XBOUNDARY";
        let pdf = format!("%PDF-1.4\n{}", "0".repeat(3 * 1024 * 1024));
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"cv_file\"; filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n{pdf}\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = Request::post("/api/v1/jobs/search/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["profile"]["title"], "Platform Engineer");
    }
}
