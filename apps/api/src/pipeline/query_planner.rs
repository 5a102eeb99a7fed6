//! Derives the search string when the caller gave no explicit query.

use crate::models::job::SiteSetting;
use crate::models::profile::CandidateProfile;

const MAX_QUERY_SKILLS: usize = 3;

/// The caller's query if present, otherwise one planned from the profile.
pub fn effective_query(query: Option<&str>, profile: &CandidateProfile) -> String {
    match query {
        Some(query) => query.to_string(),
        None => plan_query(profile),
    }
}

/// title (or first preferred role) + first 3 skills + first location + remote hint + "job".
pub fn plan_query(profile: &CandidateProfile) -> String {
    let mut parts: Vec<&str> = Vec::new();

    let role = Some(profile.title.trim())
        .filter(|t| !t.is_empty())
        .or_else(|| first_non_empty(&profile.preferred_roles));
    parts.extend(role);

    parts.extend(
        profile
            .skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .take(MAX_QUERY_SKILLS),
    );

    parts.extend(first_non_empty(&profile.preferred_locations));
    parts.extend(first_non_empty(&profile.preferred_remote_modes).and_then(remote_hint));
    parts.push("job");

    parts.join(" ")
}

/// Search keyword for a remote-mode preference. Office-only work adds nothing.
pub fn remote_hint(mode: &str) -> Option<&'static str> {
    match SiteSetting::normalize(mode) {
        SiteSetting::Wfh => Some("remote"),
        SiteSetting::Hybrid => Some("hybrid"),
        SiteSetting::Wfo | SiteSetting::Unknown => None,
    }
}

pub(crate) fn first_non_empty(values: &[String]) -> Option<&str> {
    values.iter().map(|v| v.trim()).find(|v| !v.is_empty())
}
