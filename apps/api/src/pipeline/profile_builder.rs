//! Turns the caller's CV and/or query into a candidate profile.

use tokio::time::Instant;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::intelligence::JobIntelligence;
use crate::models::profile::CandidateProfile;
use crate::models::run::PipelineInput;
use crate::pipeline::pool::with_deadline;

/// Builds the profile from the highest-priority source present, then applies the filter.
///
/// Priority: PDF upload, then CV text (typed or a plain-text upload), then the
/// query alone. Only a failure to read the CV itself is fatal.
pub async fn build_profile(
    intelligence: &dyn JobIntelligence,
    input: &PipelineInput,
    deadline: Option<Instant>,
) -> Result<CandidateProfile, PipelineError> {
    let query = input.query();

    if let Some(file) = &input.cv_file {
        if !file.is_pdf() && std::str::from_utf8(&file.bytes).is_err() {
            warn!("Ignoring unsupported CV upload '{}'", file.filename);
        }
    }

    let mut profile = if let Some(pdf) = input.pdf() {
        info!("Parsing CV document '{}' ({} bytes)", pdf.filename, pdf.bytes.len());
        let parsed = with_deadline(
            deadline,
            intelligence.parse_profile_from_document(&pdf.bytes, &pdf.filename),
        )
        .await
        .map_err(PipelineError::ProfileBuildFailed)?;
        refine(intelligence, parsed, query, deadline).await
    } else if let Some(cv_text) = input.effective_cv_text() {
        info!("Parsing CV text ({} chars)", cv_text.chars().count());
        let parsed = with_deadline(deadline, intelligence.parse_profile_from_text(cv_text))
            .await
            .map_err(PipelineError::ProfileBuildFailed)?;
        refine(intelligence, parsed, query, deadline).await
    } else if let Some(query) = query {
        info!("Deriving profile from query");
        match with_deadline(deadline, intelligence.derive_profile(query)).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Profile derivation failed, continuing with an empty profile: {e}");
                CandidateProfile::default()
            }
        }
    } else {
        CandidateProfile::default()
    };

    profile.merge_filter(&input.filter);
    Ok(profile)
}

async fn refine(
    intelligence: &dyn JobIntelligence,
    mut profile: CandidateProfile,
    query: Option<&str>,
    deadline: Option<Instant>,
) -> CandidateProfile {
    let Some(query) = query else {
        return profile;
    };
    match with_deadline(deadline, intelligence.refine_profile(&profile, query)).await {
        Ok(refined) => profile.absorb(refined),
        Err(e) => warn!("Profile refinement failed, keeping the parsed profile: {e}"),
    }
    profile
}
