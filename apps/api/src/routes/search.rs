use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::RankedJob;
use crate::models::profile::{CandidateProfile, SearchFilter};
use crate::models::run::{CvFile, PipelineInput, SearchOutput, SearchRunStats};
use crate::state::AppState;

pub const NO_RESULTS_MESSAGE: &str = "No matching jobs found. Try adjusting your search criteria.";

#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub cv_text: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: SearchFilter,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<RankedJob>,
    pub profile: CandidateProfile,
    pub total_results: usize,
    pub stats: SearchRunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SearchOutput> for SearchResponse {
    fn from(output: SearchOutput) -> Self {
        let message = output
            .results
            .is_empty()
            .then(|| NO_RESULTS_MESSAGE.to_string());
        Self {
            total_results: output.results.len(),
            results: output.results,
            profile: output.profile,
            stats: output.stats,
            message,
        }
    }
}

/// POST /api/v1/jobs/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let input = PipelineInput {
        cv_text: req.cv_text,
        cv_file: None,
        query: req.query,
        filter: req.filters,
    };
    run(&state, input).await
}

/// POST /api/v1/jobs/search/upload
///
/// Multipart fields: `cv_file`, `cv_text`, `query`, `date_posted`, and the list
/// fields `locations`, `remote_modes`, `job_types` (repeated or comma-separated).
pub async fn handle_search_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SearchResponse>, AppError> {
    let mut input = PipelineInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv_file" => {
                let filename = field.file_name().unwrap_or("cv").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read CV file: {e}")))?;
                if !bytes.is_empty() {
                    input.cv_file = Some(CvFile { bytes, filename });
                }
            }
            "cv_text" => input.cv_text = field_text(field).await?,
            "query" => input.query = field_text(field).await?,
            "date_posted" => input.filter.date_posted = field_text(field).await?,
            "locations" => push_list(&mut input.filter.locations, &field_text(field).await?),
            "remote_modes" => push_list(&mut input.filter.remote_modes, &field_text(field).await?),
            "job_types" => push_list(&mut input.filter.job_types, &field_text(field).await?),
            _ => {}
        }
    }

    run(&state, input).await
}

async fn run(state: &AppState, input: PipelineInput) -> Result<Json<SearchResponse>, AppError> {
    if !input.has_any_source() {
        return Err(AppError::Validation(
            "Provide a CV file, CV text or a search query".to_string(),
        ));
    }
    let output = state.pipeline.run_search(input).await?;
    info!("Returning {} jobs", output.results.len());
    Ok(Json(output.into()))
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map(|text| text.trim().to_string())
        .map_err(|e| AppError::Validation(format!("Invalid value for '{name}': {e}")))
}

/// Appends a repeated field value, splitting comma-separated lists.
fn push_list(target: &mut Vec<String>, raw: &str) {
    target.extend(
        raw.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from),
    );
}
